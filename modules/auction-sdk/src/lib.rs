#![allow(clippy::result_large_err)]

pub mod accounts;

pub mod error;

pub mod pda;

pub mod state;

pub use auction_layout as layout;

use solana_program::{pubkey, pubkey::Pubkey};

cfg_if::cfg_if! {
    if #[cfg(feature = "localnet")] {
        pub const AUCTION_PROGRAM_ID: Pubkey = pubkey!("Auction111111111111111111111111111111111111");
    } else {
        pub const AUCTION_PROGRAM_ID: Pubkey = pubkey!("auctxRXPeJoc4817jDhf4HbjnhEcr1cCXenosMhK5R8");
    }
}

pub const AUCTION_SEED_PREFIX: &[u8] = b"auction";
pub const BIDDER_METADATA_SEED: &[u8] = b"metadata";
pub const AUCTION_EXTENDED_SEED: &[u8] = b"extended";
