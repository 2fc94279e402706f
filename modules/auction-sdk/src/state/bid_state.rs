use std::io;

use anchor_lang::prelude::Pubkey;
use auction_layout::{Field, Layout, Record, Value};

const BID_FIELDS: &[Field] = &[
    Field {
        name: "key",
        layout: Layout::Pubkey,
    },
    Field {
        name: "amount",
        layout: Layout::U64,
    },
];

const BID: Layout = Layout::Struct(BID_FIELDS);

pub(crate) const BID_STATE_FIELDS: &[Field] = &[
    Field {
        name: "type",
        layout: Layout::U8,
    },
    Field {
        name: "bids",
        layout: Layout::Vec(&BID),
    },
    Field {
        name: "max",
        layout: Layout::U64,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidStateType {
    /// Fixed number of winner slots.
    EnglishAuction,
    /// Every bidder can win.
    OpenEdition,
}

impl From<BidStateType> for u8 {
    fn from(kind: BidStateType) -> u8 {
        match kind {
            BidStateType::EnglishAuction => 0,
            BidStateType::OpenEdition => 1,
        }
    }
}

impl TryFrom<u8> for BidStateType {
    type Error = io::Error;

    fn try_from(tag: u8) -> io::Result<Self> {
        match tag {
            0 => Ok(Self::EnglishAuction),
            1 => Ok(Self::OpenEdition),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid bid state type {other}"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bid {
    pub key: Pubkey,
    pub amount: u64,
}

impl Bid {
    fn from_value(value: &Value) -> io::Result<Self> {
        let record = value.as_record()?;
        Ok(Self {
            key: record.pubkey("key")?,
            amount: record.u64("amount")?,
        })
    }

    fn to_value(self) -> Value {
        Record::new()
            .with("key", self.key)
            .with("amount", self.amount)
            .into()
    }
}

/// Bids in the order they were placed, oldest first.
///
/// Later bids supersede earlier ones, so the most recent bid holds rank 0 and only the last
/// `max` bids are winners. The fetched order is authoritative and is never re-sorted by amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidState {
    pub kind: BidStateType,
    pub bids: Vec<Bid>,
    pub max: u64,
}

impl BidState {
    pub fn len(&self) -> usize {
        self.bids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty()
    }

    /// Array index holding `rank`, counted back from the most recent bid.
    fn index_of_rank(&self, rank: u64) -> Option<usize> {
        let len = u64::try_from(self.bids.len()).ok()?;
        let index = len.checked_sub(rank)?.checked_sub(1)?;
        usize::try_from(index).ok()
    }

    /// Whether `rank` is a winner slot. Open editions have no limit, whatever `max` says.
    fn is_winning_rank(&self, rank: u64) -> bool {
        match self.kind {
            BidStateType::EnglishAuction => rank < self.max,
            BidStateType::OpenEdition => true,
        }
    }

    fn bid_at(&self, rank: u64) -> Option<&Bid> {
        if !self.is_winning_rank(rank) {
            return None;
        }
        self.bids.get(self.index_of_rank(rank)?)
    }

    /// Bidder holding winner slot `rank`. Rank 0 is the most recently placed bid. In an English
    /// auction, ranks outside the `max` winner slots hold nobody.
    pub fn winner_at(&self, rank: u64) -> Option<Pubkey> {
        self.bid_at(rank).map(|bid| bid.key)
    }

    pub fn amount_at(&self, rank: u64) -> Option<u64> {
        self.bid_at(rank).map(|bid| bid.amount)
    }

    /// Rank of `bidder`, located at its earliest position in the bid array, if that rank is a
    /// winner slot.
    pub fn winner_index_of(&self, bidder: &Pubkey) -> Option<u64> {
        let position = self.bids.iter().position(|bid| bid.key == *bidder)?;
        let len = u64::try_from(self.bids.len()).ok()?;
        let rank = len
            .checked_sub(u64::try_from(position).ok()?)?
            .checked_sub(1)?;

        self.is_winning_rank(rank).then_some(rank)
    }

    /// Winning bids in rank order, most recent first.
    pub fn winning_bids(&self) -> impl Iterator<Item = &Bid> {
        let slots = match self.kind {
            BidStateType::EnglishAuction => usize::try_from(self.max).unwrap_or(usize::MAX),
            BidStateType::OpenEdition => usize::MAX,
        };
        self.bids.iter().rev().take(slots)
    }

    pub(crate) fn from_record(record: &Record) -> io::Result<Self> {
        Ok(Self {
            kind: BidStateType::try_from(record.u8("type")?)?,
            bids: record
                .list("bids")?
                .iter()
                .map(Bid::from_value)
                .collect::<io::Result<_>>()?,
            max: record.u64("max")?,
        })
    }

    pub(crate) fn to_record(&self) -> Record {
        Record::new()
            .with("type", u8::from(self.kind))
            .with(
                "bids",
                self.bids.iter().copied().map(Bid::to_value).collect::<Vec<_>>(),
            )
            .with("max", self.max)
    }
}
