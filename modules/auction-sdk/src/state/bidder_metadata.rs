use std::io;

use anchor_lang::prelude::Pubkey;
use auction_layout::{Field, Layout, Record, Schema};

use crate::accounts::{AccountSpace, AuctionAccount};

const BIDDER_METADATA_FIELDS: &[Field] = &[
    Field {
        name: "bidder_pubkey",
        layout: Layout::Pubkey,
    },
    Field {
        name: "auction_pubkey",
        layout: Layout::Pubkey,
    },
    Field {
        name: "last_bid",
        layout: Layout::U64,
    },
    Field {
        name: "last_bid_timestamp",
        layout: Layout::U64,
    },
    Field {
        name: "cancelled",
        layout: Layout::Bool,
    },
];

/// Per-bidder record of the most recent bid placed on an auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidderMetadata {
    pub bidder_pubkey: Pubkey,
    pub auction_pubkey: Pubkey,
    pub last_bid: u64,
    pub last_bid_timestamp: u64,

    /// Set once the bidder withdraws. A cancelled bid no longer occupies a winner slot.
    pub cancelled: bool,
}

impl AuctionAccount for BidderMetadata {
    const SCHEMA: Schema = Schema::new("BidderMetadata", BIDDER_METADATA_FIELDS);
    const SPACE: AccountSpace = AccountSpace::Fixed;

    fn from_record(record: &Record) -> io::Result<Self> {
        Ok(Self {
            bidder_pubkey: record.pubkey("bidder_pubkey")?,
            auction_pubkey: record.pubkey("auction_pubkey")?,
            last_bid: record.u64("last_bid")?,
            last_bid_timestamp: record.u64("last_bid_timestamp")?,
            cancelled: record.bool("cancelled")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("bidder_pubkey", self.bidder_pubkey)
            .with("auction_pubkey", self.auction_pubkey)
            .with("last_bid", self.last_bid)
            .with("last_bid_timestamp", self.last_bid_timestamp)
            .with("cancelled", self.cancelled)
    }
}
