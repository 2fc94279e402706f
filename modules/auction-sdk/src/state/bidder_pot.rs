use std::io;

use anchor_lang::prelude::Pubkey;
use auction_layout::{Field, Layout, Record, Schema};

use crate::accounts::{AccountSpace, AuctionAccount};

const BIDDER_POT_FIELDS: &[Field] = &[
    Field {
        name: "bidder_pot",
        layout: Layout::Pubkey,
    },
    Field {
        name: "bidder_act",
        layout: Layout::Pubkey,
    },
    Field {
        name: "auction_act",
        layout: Layout::Pubkey,
    },
    Field {
        name: "emptied",
        layout: Layout::Bool,
    },
];

/// Escrow holding a bidder's funds for one auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidderPot {
    /// Token account holding the escrowed bid.
    pub bidder_pot: Pubkey,
    pub bidder_act: Pubkey,
    pub auction_act: Pubkey,

    /// Flips to true once, when the funds are claimed or refunded.
    pub emptied: bool,
}

impl AuctionAccount for BidderPot {
    const SCHEMA: Schema = Schema::new("BidderPot", BIDDER_POT_FIELDS);
    const SPACE: AccountSpace = AccountSpace::Fixed;

    fn from_record(record: &Record) -> io::Result<Self> {
        Ok(Self {
            bidder_pot: record.pubkey("bidder_pot")?,
            bidder_act: record.pubkey("bidder_act")?,
            auction_act: record.pubkey("auction_act")?,
            emptied: record.bool("emptied")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("bidder_pot", self.bidder_pot)
            .with("bidder_act", self.bidder_act)
            .with("auction_act", self.auction_act)
            .with("emptied", self.emptied)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn layout() {
        assert_eq!(BidderPot::SCHEMA.fixed_size(), Some(97));
        assert_eq!(BidderPot::SCHEMA.offset_of("bidder_act"), Some(32));
        assert_eq!(BidderPot::SCHEMA.offset_of("auction_act"), Some(64));
        assert_eq!(BidderPot::SCHEMA.offset_of("missing"), None);
    }

    #[test]
    fn round_trip() {
        let pot = BidderPot {
            bidder_pot: Pubkey::new_unique(),
            bidder_act: Pubkey::new_unique(),
            auction_act: Pubkey::new_unique(),
            emptied: false,
        };

        let data = pot.try_serialize().unwrap();
        assert_eq!(data.len(), 97);
        assert_eq!(&data[64..96], pot.auction_act.as_ref());
        assert_eq!(BidderPot::try_deserialize(&data).unwrap(), pot);
    }

    #[test]
    fn rent_for_fixed_size() {
        let pot = BidderPot {
            bidder_pot: Pubkey::new_unique(),
            bidder_act: Pubkey::new_unique(),
            auction_act: Pubkey::new_unique(),
            emptied: true,
        };

        assert_eq!(
            pot.rent_exempt_lamports().unwrap(),
            anchor_lang::prelude::Rent::default().minimum_balance(97)
        );
    }
}
