use std::io;

use auction_layout::{Field, Layout, Record};

pub const PRICE_FLOOR_HASH_LEN: usize = 32;

pub(crate) const PRICE_FLOOR_FIELDS: &[Field] = &[
    Field {
        name: "type",
        layout: Layout::U8,
    },
    Field {
        name: "hash",
        layout: Layout::Bytes(PRICE_FLOOR_HASH_LEN),
    },
];

/// Minimum acceptable bid. Always occupies a one-byte tag and a 32-byte field on chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceFloor {
    #[default]
    None,
    /// Stored little-endian in the first 8 bytes of the hash field.
    Minimum(u64),
    /// Commitment to a hidden floor. There is no client-decodable value behind it.
    BlindedPrice([u8; PRICE_FLOOR_HASH_LEN]),
}

impl PriceFloor {
    const NONE: u8 = 0;
    const MINIMUM: u8 = 1;
    const BLINDED_PRICE: u8 = 2;

    /// Read a minimum floor from a raw hash field, as the program stores it.
    pub fn minimum_from_bytes(bytes: [u8; PRICE_FLOOR_HASH_LEN]) -> Self {
        let mut floor = [0; 8];
        floor.copy_from_slice(&bytes[..8]);
        Self::Minimum(u64::from_le_bytes(floor))
    }

    pub fn tag(&self) -> u8 {
        match self {
            Self::None => Self::NONE,
            Self::Minimum(_) => Self::MINIMUM,
            Self::BlindedPrice(_) => Self::BLINDED_PRICE,
        }
    }

    pub fn to_bytes(&self) -> [u8; PRICE_FLOOR_HASH_LEN] {
        let mut bytes = [0; PRICE_FLOOR_HASH_LEN];
        match self {
            Self::None => {}
            Self::Minimum(floor) => bytes[..8].copy_from_slice(&floor.to_le_bytes()),
            Self::BlindedPrice(hash) => bytes = *hash,
        }
        bytes
    }

    pub fn from_parts(tag: u8, bytes: [u8; PRICE_FLOOR_HASH_LEN]) -> io::Result<Self> {
        match tag {
            Self::NONE => Ok(Self::None),
            Self::MINIMUM => Ok(Self::minimum_from_bytes(bytes)),
            Self::BLINDED_PRICE => Ok(Self::BlindedPrice(bytes)),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid price floor type {other}"),
            )),
        }
    }

    pub fn minimum(&self) -> Option<u64> {
        match self {
            Self::Minimum(floor) => Some(*floor),
            Self::None | Self::BlindedPrice(_) => None,
        }
    }

    /// Whether a bid of `amount` clears the floor. A blinded floor cannot be checked without the
    /// committed value, so the answer is `None`.
    pub fn admits(&self, amount: u64) -> Option<bool> {
        match self {
            Self::None => Some(true),
            Self::Minimum(floor) => Some(amount >= *floor),
            Self::BlindedPrice(_) => None,
        }
    }

    pub(crate) fn from_record(record: &Record) -> io::Result<Self> {
        Self::from_parts(record.u8("type")?, record.array("hash")?)
    }

    pub(crate) fn to_record(&self) -> Record {
        Record::new()
            .with("type", self.tag())
            .with("hash", self.to_bytes())
    }
}

#[cfg(test)]
mod test {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn minimum_round_trip() {
        let floor = PriceFloor::Minimum(42);
        let bytes = floor.to_bytes();

        assert_eq!(bytes[..8], [42, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(bytes[8..], [0; 24]);
        assert_eq!(PriceFloor::from_parts(floor.tag(), bytes).unwrap(), floor);
    }

    #[test]
    fn minimum_from_raw_bytes() {
        let mut bytes = [0; 32];
        bytes[..8].copy_from_slice(&1_000_000_000u64.to_le_bytes());

        let floor = PriceFloor::minimum_from_bytes(bytes);
        assert_eq!(floor, PriceFloor::Minimum(1_000_000_000));
        assert_eq!(floor.to_bytes(), bytes);
    }

    #[test]
    fn none_is_all_zero() {
        assert_eq!(PriceFloor::None.to_bytes(), [0; 32]);
        assert_eq!(PriceFloor::None.tag(), 0);
    }

    #[test]
    fn blinded_price_is_opaque() {
        let hash = hex!("8b1a9953c4611296a827abf8c47804d7e6c49c6b1a2b3c4d5e6f708192a3b4c5");
        let floor = PriceFloor::BlindedPrice(hash);

        assert_eq!(floor.to_bytes(), hash);
        assert_eq!(floor.minimum(), None);
        assert_eq!(floor.admits(u64::MAX), None);
        assert_eq!(PriceFloor::from_parts(2, hash).unwrap(), floor);
    }

    #[test]
    fn admits() {
        assert_eq!(PriceFloor::None.admits(0), Some(true));
        assert_eq!(PriceFloor::Minimum(100).admits(99), Some(false));
        assert_eq!(PriceFloor::Minimum(100).admits(100), Some(true));
    }

    #[test]
    fn unknown_tag() {
        let err = PriceFloor::from_parts(3, [0; 32]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn record_round_trip() {
        let floor = PriceFloor::Minimum(7);
        assert_eq!(PriceFloor::from_record(&floor.to_record()).unwrap(), floor);
    }
}
