//! Schema-driven binary codec for program accounts.
//!
//! A [Schema] is a `const` descriptor listing an account's fields in the exact order the owning
//! program lays them out in memory. The same descriptor drives [Schema::decode],
//! [Schema::encode] and [Schema::byte_size], so there is no per-account serialization code to
//! keep in sync with the program.
//!
//! Encoding rules follow the program's borsh layout:
//!
//! * integers are little-endian,
//! * booleans are a single byte (`0` or `1`),
//! * options are a one-byte flag followed by the value only when present,
//! * vectors are a `u32` little-endian length followed by the elements,
//! * nested records are their fields in order, with no padding.
//!
//! Failures are reported as [std::io::Error]s, the same way borsh reports them.

mod codec;

mod layout;
pub use layout::*;

mod schema;
pub use schema::*;

mod value;
pub use value::*;

pub use anchor_lang::prelude::Pubkey;
