use anchor_lang::prelude::*;

use super::{Auction, BidderMetadata, BidderPot};
use crate::error::AuctionSdkError;

/// Where a bidder's escrowed funds stand in an auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidderStanding {
    /// The bid holds winner slot `rank`. `amount` is the bidder's latest bid, which is what the
    /// pot holds.
    Winning { rank: u64, amount: u64 },

    /// The bid lost or was cancelled and `amount` can be reclaimed.
    Refundable { amount: u64 },

    /// The pot has already been emptied.
    Settled,
}

/// Classify a bidder from their metadata and pot. Both must belong to the same bidder and
/// auction, otherwise [AuctionSdkError::InvalidAccountData].
pub fn bidder_standing(
    auction: &Auction,
    metadata: &BidderMetadata,
    pot: &BidderPot,
) -> Result<BidderStanding> {
    require_keys_eq!(
        metadata.bidder_pubkey,
        pot.bidder_act,
        AuctionSdkError::InvalidAccountData
    );
    require_keys_eq!(
        metadata.auction_pubkey,
        pot.auction_act,
        AuctionSdkError::InvalidAccountData
    );

    if pot.emptied {
        return Ok(BidderStanding::Settled);
    }

    let rank = (!metadata.cancelled)
        .then(|| auction.bid_state.winner_index_of(&metadata.bidder_pubkey))
        .flatten();

    Ok(match rank {
        Some(rank) => BidderStanding::Winning {
            rank,
            amount: metadata.last_bid,
        },
        None => BidderStanding::Refundable {
            amount: metadata.last_bid,
        },
    })
}
