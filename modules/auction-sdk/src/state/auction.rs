use std::io;

use anchor_lang::prelude::Pubkey;
use auction_layout::{Field, Layout, Record, Schema, Value};

use super::{price_floor::PRICE_FLOOR_FIELDS, BidState, PriceFloor, BID_STATE_FIELDS};
use crate::accounts::{AccountSpace, AuctionAccount};

const PRICE_FLOOR: Layout = Layout::Struct(PRICE_FLOOR_FIELDS);
const BID_STATE: Layout = Layout::Struct(BID_STATE_FIELDS);
const TIMESTAMP: Layout = Layout::Option(&Layout::U64);

const AUCTION_FIELDS: &[Field] = &[
    Field {
        name: "authority",
        layout: Layout::Pubkey,
    },
    Field {
        name: "token_mint",
        layout: Layout::Pubkey,
    },
    Field {
        name: "last_bid",
        layout: TIMESTAMP,
    },
    Field {
        name: "ended_at",
        layout: TIMESTAMP,
    },
    Field {
        name: "end_auction_at",
        layout: TIMESTAMP,
    },
    Field {
        name: "end_auction_gap",
        layout: TIMESTAMP,
    },
    Field {
        name: "price_floor",
        layout: PRICE_FLOOR,
    },
    Field {
        name: "state",
        layout: Layout::U8,
    },
    Field {
        name: "bid_state",
        layout: BID_STATE,
    },
    Field {
        name: "total_uncancelled_bids",
        layout: Layout::U64,
    },
];

/// Lifecycle of an auction. The program only ever moves it forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AuctionState {
    Created,
    Started,
    Ended,
}

impl From<AuctionState> for u8 {
    fn from(state: AuctionState) -> u8 {
        match state {
            AuctionState::Created => 0,
            AuctionState::Started => 1,
            AuctionState::Ended => 2,
        }
    }
}

impl TryFrom<u8> for AuctionState {
    type Error = io::Error;

    fn try_from(tag: u8) -> io::Result<Self> {
        match tag {
            0 => Ok(Self::Created),
            1 => Ok(Self::Started),
            2 => Ok(Self::Ended),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid auction state {other}"),
            )),
        }
    }
}

impl std::fmt::Display for AuctionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuctionState::Created => write!(f, "Created"),
            AuctionState::Started => write!(f, "Started"),
            AuctionState::Ended => write!(f, "Ended"),
        }
    }
}

/// Auction account (`AuctionData`). Timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auction {
    /// Authority allowed to start and end the auction.
    pub authority: Pubkey,

    /// Mint of the token bids are paid in.
    pub token_mint: Pubkey,

    /// Time of the most recent bid.
    pub last_bid: Option<u64>,

    /// Time the auction was ended, if it has been.
    pub ended_at: Option<u64>,

    /// Cut-off after which the auction ends on its own.
    pub end_auction_at: Option<u64>,

    /// Window after the last bid during which bidding stays open past `end_auction_at`.
    pub end_auction_gap: Option<u64>,

    pub price_floor: PriceFloor,
    pub state: AuctionState,
    pub bid_state: BidState,
    pub total_uncancelled_bids: u64,
}

impl Auction {
    /// Time after which no bid can be placed: the cut-off, pushed back by the gap following the
    /// most recent bid. `None` when the auction has no cut-off.
    pub fn ends_at(&self) -> Option<u64> {
        let end = self.end_auction_at?;
        match (self.end_auction_gap, self.last_bid) {
            (Some(gap), Some(last)) => Some(end.max(last.saturating_add(gap))),
            _ => Some(end),
        }
    }

    pub fn has_ended(&self, now: u64) -> bool {
        self.state == AuctionState::Ended || self.ends_at().is_some_and(|end| now > end)
    }

    /// Seconds until [Auction::ends_at], zero once it has passed.
    pub fn time_to_end(&self, now: u64) -> Option<u64> {
        self.ends_at().map(|end| end.saturating_sub(now))
    }

    pub fn is_winner(&self, bidder: &Pubkey) -> bool {
        self.bid_state.winner_index_of(bidder).is_some()
    }
}

fn optional_u64(record: &Record, name: &str) -> io::Result<Option<u64>> {
    record.optional(name)?.map(Value::as_u64).transpose()
}

impl AuctionAccount for Auction {
    const SCHEMA: Schema = Schema::new("AuctionData", AUCTION_FIELDS);
    const SPACE: AccountSpace = AccountSpace::Fixable;

    fn from_record(record: &Record) -> io::Result<Self> {
        Ok(Self {
            authority: record.pubkey("authority")?,
            token_mint: record.pubkey("token_mint")?,
            last_bid: optional_u64(record, "last_bid")?,
            ended_at: optional_u64(record, "ended_at")?,
            end_auction_at: optional_u64(record, "end_auction_at")?,
            end_auction_gap: optional_u64(record, "end_auction_gap")?,
            price_floor: PriceFloor::from_record(record.record("price_floor")?)?,
            state: AuctionState::try_from(record.u8("state")?)?,
            bid_state: BidState::from_record(record.record("bid_state")?)?,
            total_uncancelled_bids: record.u64("total_uncancelled_bids")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("authority", self.authority)
            .with("token_mint", self.token_mint)
            .with("last_bid", self.last_bid)
            .with("ended_at", self.ended_at)
            .with("end_auction_at", self.end_auction_at)
            .with("end_auction_gap", self.end_auction_gap)
            .with("price_floor", self.price_floor.to_record())
            .with("state", u8::from(self.state))
            .with("bid_state", self.bid_state.to_record())
            .with("total_uncancelled_bids", self.total_uncancelled_bids)
    }
}
