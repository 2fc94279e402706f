use std::io;

use auction_layout::{Field, Layout, Record, Schema, Value};

use crate::accounts::{AccountSpace, AuctionAccount};

/// Bytes the program allocates for the extended account, regardless of content.
pub const AUCTION_DATA_EXTENDED_SIZE: usize = 219;

pub const AUCTION_NAME_LEN: usize = 32;

const NAME: Layout = Layout::Bytes(AUCTION_NAME_LEN);

const AUCTION_DATA_EXTENDED_FIELDS: &[Field] = &[
    Field {
        name: "total_uncancelled_bids",
        layout: Layout::U64,
    },
    Field {
        name: "tick_size",
        layout: Layout::Option(&Layout::U64),
    },
    Field {
        name: "gap_tick_size_percentage",
        layout: Layout::Option(&Layout::U8),
    },
    Field {
        name: "instant_sale_price",
        layout: Layout::Option(&Layout::U64),
    },
    Field {
        name: "name",
        layout: Layout::Option(&NAME),
    },
];

/// Settings added to auctions after the `AuctionData` layout was fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuctionDataExtended {
    pub total_uncancelled_bids: u64,

    /// Bids must be a multiple of this.
    pub tick_size: Option<u64>,

    /// Minimum raise over the current winning bid inside the end gap, in percent.
    pub gap_tick_size_percentage: Option<u8>,

    pub instant_sale_price: Option<u64>,
    pub name: Option<[u8; AUCTION_NAME_LEN]>,
}

impl AuctionDataExtended {
    /// Display name with the zero padding removed. `None` when unset or not UTF-8.
    pub fn name(&self) -> Option<&str> {
        let name = self.name.as_ref()?;
        let len = name
            .iter()
            .rposition(|byte| *byte != 0)
            .map_or(0, |last| last.saturating_add(1));
        std::str::from_utf8(&name[..len]).ok()
    }

    pub fn is_instant_sale(&self, amount: u64) -> bool {
        self.instant_sale_price.is_some_and(|price| amount >= price)
    }
}

impl AuctionAccount for AuctionDataExtended {
    const SCHEMA: Schema = Schema::new("AuctionDataExtended", AUCTION_DATA_EXTENDED_FIELDS);
    const SPACE: AccountSpace = AccountSpace::Allocated(AUCTION_DATA_EXTENDED_SIZE);

    fn from_record(record: &Record) -> io::Result<Self> {
        Ok(Self {
            total_uncancelled_bids: record.u64("total_uncancelled_bids")?,
            tick_size: record.optional("tick_size")?.map(Value::as_u64).transpose()?,
            gap_tick_size_percentage: record
                .optional("gap_tick_size_percentage")?
                .map(Value::as_u8)
                .transpose()?,
            instant_sale_price: record
                .optional("instant_sale_price")?
                .map(Value::as_u64)
                .transpose()?,
            name: record.optional("name")?.map(Value::as_array).transpose()?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("total_uncancelled_bids", self.total_uncancelled_bids)
            .with("tick_size", self.tick_size)
            .with("gap_tick_size_percentage", self.gap_tick_size_percentage)
            .with("instant_sale_price", self.instant_sale_price)
            .with("name", self.name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn named(name: &str) -> [u8; AUCTION_NAME_LEN] {
        let mut padded = [0; AUCTION_NAME_LEN];
        padded[..name.len()].copy_from_slice(name.as_bytes());
        padded
    }

    #[test]
    fn name_trims_padding() {
        let extended = AuctionDataExtended {
            name: Some(named("Genesis Drop")),
            ..Default::default()
        };
        assert_eq!(extended.name(), Some("Genesis Drop"));

        assert_eq!(AuctionDataExtended::default().name(), None);

        let blank = AuctionDataExtended {
            name: Some([0; AUCTION_NAME_LEN]),
            ..Default::default()
        };
        assert_eq!(blank.name(), Some(""));
    }

    #[test]
    fn instant_sale() {
        let extended = AuctionDataExtended {
            instant_sale_price: Some(1_000),
            ..Default::default()
        };
        assert!(!extended.is_instant_sale(999));
        assert!(extended.is_instant_sale(1_000));
        assert!(!AuctionDataExtended::default().is_instant_sale(u64::MAX));
    }

    #[test]
    fn serialized_to_allocated_size() {
        let extended = AuctionDataExtended {
            total_uncancelled_bids: 3,
            tick_size: Some(10),
            gap_tick_size_percentage: Some(5),
            instant_sale_price: None,
            name: Some(named("lot 7")),
        };

        let data = extended.try_serialize().unwrap();
        assert_eq!(data.len(), AUCTION_DATA_EXTENDED_SIZE);
        assert_eq!(extended.byte_size().unwrap(), 8 + 9 + 2 + 1 + 33);
        assert!(data[extended.byte_size().unwrap()..].iter().all(|byte| *byte == 0));
        assert_eq!(AuctionDataExtended::try_deserialize(&data).unwrap(), extended);
    }
}
