//! Program derived addresses.
//!
//! An address is the SHA-256 hash of the seeds, the owning program id and a fixed marker. Only
//! hashes that are not valid ed25519 points are accepted, so no private key can exist for a
//! derived address and only the owning program can sign for it.

use anchor_lang::prelude::*;
use solana_program::{
    hash::hashv,
    pubkey::{MAX_SEEDS, MAX_SEED_LEN},
};

use crate::{
    error::AuctionSdkError, AUCTION_EXTENDED_SEED, AUCTION_SEED_PREFIX, BIDDER_METADATA_SEED,
};

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

fn require_valid_seeds(seeds: &[&[u8]], max_seeds: usize) -> Result<()> {
    require!(seeds.len() <= max_seeds, AuctionSdkError::InvalidSeed);
    require!(
        seeds.iter().all(|seed| seed.len() <= MAX_SEED_LEN),
        AuctionSdkError::InvalidSeed
    );
    Ok(())
}

fn hash_to_address(seeds: &[&[u8]], bump: Option<u8>, program_id: &Pubkey) -> Option<Pubkey> {
    let bump_seed = bump.map(|bump| [bump]);

    let mut preimage: Vec<&[u8]> = Vec::with_capacity(seeds.len().saturating_add(3));
    preimage.extend_from_slice(seeds);
    if let Some(bump_seed) = &bump_seed {
        preimage.push(bump_seed);
    }
    preimage.push(program_id.as_ref());
    preimage.push(PDA_MARKER);

    let address = Pubkey::new_from_array(hashv(&preimage).to_bytes());
    (!address.is_on_curve()).then_some(address)
}

/// Address for an explicit set of seeds, bump included. Seeds that hash onto the curve are
/// rejected as [AuctionSdkError::InvalidSeed].
pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Pubkey> {
    require_valid_seeds(seeds, MAX_SEEDS)?;
    hash_to_address(seeds, None, program_id).ok_or_else(|| error!(AuctionSdkError::InvalidSeed))
}

/// Search bumps from 255 downward and return the first off-curve address with its bump.
///
/// Bump 0 is never tried, the same as `Pubkey::find_program_address`, so both always agree.
///
/// The bump is appended as the last seed, so at most `MAX_SEEDS - 1` seeds may be passed in.
pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    require_valid_seeds(seeds, MAX_SEEDS.saturating_sub(1))?;

    for bump in (1..=u8::MAX).rev() {
        if let Some(address) = hash_to_address(seeds, Some(bump), program_id) {
            tracing::trace!(%address, bump, %program_id, "derived program address");
            return Ok((address, bump));
        }
    }

    err!(AuctionSdkError::AddressDerivationExhausted)
}

/// `["auction", program_id, resource]`
pub fn auction_address(program_id: &Pubkey, resource: &Pubkey) -> Result<(Pubkey, u8)> {
    find_program_address(
        &[AUCTION_SEED_PREFIX, program_id.as_ref(), resource.as_ref()],
        program_id,
    )
}

/// `["auction", program_id, resource, "extended"]`
pub fn auction_extended_address(program_id: &Pubkey, resource: &Pubkey) -> Result<(Pubkey, u8)> {
    find_program_address(
        &[
            AUCTION_SEED_PREFIX,
            program_id.as_ref(),
            resource.as_ref(),
            AUCTION_EXTENDED_SEED,
        ],
        program_id,
    )
}

/// `["auction", program_id, auction, bidder]`
pub fn bidder_pot_address(
    program_id: &Pubkey,
    auction: &Pubkey,
    bidder: &Pubkey,
) -> Result<(Pubkey, u8)> {
    find_program_address(
        &[
            AUCTION_SEED_PREFIX,
            program_id.as_ref(),
            auction.as_ref(),
            bidder.as_ref(),
        ],
        program_id,
    )
}

/// `["auction", program_id, auction, bidder, "metadata"]`
pub fn bidder_metadata_address(
    program_id: &Pubkey,
    auction: &Pubkey,
    bidder: &Pubkey,
) -> Result<(Pubkey, u8)> {
    find_program_address(
        &[
            AUCTION_SEED_PREFIX,
            program_id.as_ref(),
            auction.as_ref(),
            bidder.as_ref(),
            BIDDER_METADATA_SEED,
        ],
        program_id,
    )
}
