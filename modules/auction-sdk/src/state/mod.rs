mod auction;
pub use auction::*;

mod auction_extended;
pub use auction_extended::*;

mod bid_state;
pub use bid_state::*;

mod bidder_metadata;
pub use bidder_metadata::*;

mod bidder_pot;
pub use bidder_pot::*;

mod escrow;
pub use escrow::*;

mod price_floor;
pub use price_floor::*;
