//! The schema codec must produce the same bytes the program's own (borsh) serialization does.

use anchor_lang::prelude::*;
use auction_layout::{Field, Layout, Record, Schema, Value};
use hex_literal::hex;

#[derive(Debug, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
struct Entry {
    key: Pubkey,
    amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
struct Ledger {
    authority: Pubkey,
    sequence: u32,
    window: u16,
    last_update: Option<u64>,
    closed: bool,
    entries: Vec<Entry>,
    memo: [u8; 8],
    bump: u8,
}

const ENTRY_FIELDS: &[Field] = &[
    Field {
        name: "key",
        layout: Layout::Pubkey,
    },
    Field {
        name: "amount",
        layout: Layout::U64,
    },
];

const ENTRY: Layout = Layout::Struct(ENTRY_FIELDS);

const LEDGER: Schema = Schema::new(
    "Ledger",
    &[
        Field {
            name: "authority",
            layout: Layout::Pubkey,
        },
        Field {
            name: "sequence",
            layout: Layout::U32,
        },
        Field {
            name: "window",
            layout: Layout::U16,
        },
        Field {
            name: "last_update",
            layout: Layout::Option(&Layout::U64),
        },
        Field {
            name: "closed",
            layout: Layout::Bool,
        },
        Field {
            name: "entries",
            layout: Layout::Vec(&ENTRY),
        },
        Field {
            name: "memo",
            layout: Layout::Bytes(8),
        },
        Field {
            name: "bump",
            layout: Layout::U8,
        },
    ],
);

fn to_record(ledger: &Ledger) -> Record {
    Record::new()
        .with("authority", ledger.authority)
        .with("sequence", ledger.sequence)
        .with("window", ledger.window)
        .with("last_update", ledger.last_update)
        .with("closed", ledger.closed)
        .with(
            "entries",
            ledger
                .entries
                .iter()
                .map(|entry| {
                    Value::from(
                        Record::new()
                            .with("key", entry.key)
                            .with("amount", entry.amount),
                    )
                })
                .collect::<Vec<_>>(),
        )
        .with("memo", ledger.memo)
        .with("bump", ledger.bump)
}

fn ledgers() -> Vec<Ledger> {
    vec![
        Ledger {
            authority: Pubkey::new_unique(),
            sequence: 0,
            window: 0,
            last_update: None,
            closed: false,
            entries: vec![],
            memo: [0; 8],
            bump: 255,
        },
        Ledger {
            authority: Pubkey::new_unique(),
            sequence: 69,
            window: 420,
            last_update: Some(1_712_345_678),
            closed: true,
            entries: vec![
                Entry {
                    key: Pubkey::new_unique(),
                    amount: 10,
                },
                Entry {
                    key: Pubkey::new_unique(),
                    amount: u64::MAX,
                },
            ],
            memo: hex!("deadbeefdeadbeef"),
            bump: 1,
        },
    ]
}

#[test]
fn encode_matches_borsh() {
    for ledger in ledgers() {
        let mut expected = Vec::new();
        ledger.serialize(&mut expected).unwrap();

        let record = to_record(&ledger);
        let encoded = LEDGER.encode(&record).unwrap();

        assert_eq!(encoded, expected);
        assert_eq!(LEDGER.byte_size(&record).unwrap(), expected.len());
    }
}

#[test]
fn decode_matches_borsh() {
    for ledger in ledgers() {
        let mut encoded = Vec::new();
        ledger.serialize(&mut encoded).unwrap();

        let record = LEDGER.decode(&encoded).unwrap();
        assert_eq!(record, to_record(&ledger));

        let decoded = Ledger::deserialize(&mut encoded.as_slice()).unwrap();
        assert_eq!(decoded, ledger);
    }
}

#[test]
fn min_size_is_empty_encoding() {
    let ledger = ledgers().remove(0);
    let mut encoded = Vec::new();
    ledger.serialize(&mut encoded).unwrap();

    assert_eq!(LEDGER.min_size(), encoded.len());
}
