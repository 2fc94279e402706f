//! Loading auction program accounts from a remote source.
//!
//! Every account is validated before it is handed out: it must be owned by the auction program,
//! its size must fit the account kind and its bytes must decode. There is no partially valid
//! account.

use std::io;

use anchor_lang::prelude::*;
use auction_layout::{Record, Schema};

use crate::{
    error::AuctionSdkError,
    pda,
    state::{Auction, AuctionDataExtended, BidderMetadata, BidderPot},
    AUCTION_PROGRAM_ID,
};

/// How many bytes an account of a given kind occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountSpace {
    /// Exactly the schema's fixed size.
    Fixed,
    /// At least the schema's minimum size. Length depends on content.
    Fixable,
    /// Exactly this many bytes, content first and zero padded.
    Allocated(usize),
}

impl AccountSpace {
    /// Length every account of this kind must have, if it is known up front.
    pub fn exact_len(&self, schema: &Schema) -> Option<usize> {
        match self {
            Self::Fixed => schema.fixed_size(),
            Self::Fixable => None,
            Self::Allocated(len) => Some(*len),
        }
    }

    pub fn admits(&self, schema: &Schema, len: usize) -> bool {
        match self.exact_len(schema) {
            Some(exact) => len == exact,
            None => len >= schema.min_size(),
        }
    }
}

/// Account kinds owned by the auction program.
pub trait AuctionAccount: Sized {
    const SCHEMA: Schema;
    const SPACE: AccountSpace;

    fn from_record(record: &Record) -> io::Result<Self>;

    fn to_record(&self) -> Record;

    fn try_deserialize(data: &[u8]) -> Result<Self> {
        Self::SCHEMA
            .decode(data)
            .and_then(|record| Self::from_record(&record))
            .map_err(|e| {
                tracing::debug!(account = Self::SCHEMA.name, error = %e, "decode failed");
                error!(AuctionSdkError::DeserializationError)
            })
    }

    /// Validate and decode an account fetched from `program_id`.
    fn try_from_remote(program_id: &Pubkey, account: &RemoteAccount) -> Result<Self> {
        require_keys_eq!(account.owner, *program_id, AuctionSdkError::InvalidOwner);
        require!(
            Self::SPACE.admits(&Self::SCHEMA, account.data.len()),
            AuctionSdkError::InvalidAccountData
        );

        Self::try_deserialize(&account.data)
    }

    /// Account data as the program writes it, padded to the allocated size where there is one.
    fn try_serialize(&self) -> Result<Vec<u8>> {
        let mut data = Self::SCHEMA
            .encode(&self.to_record())
            .map_err(|_| error!(ErrorCode::AccountDidNotSerialize))?;

        if let AccountSpace::Allocated(len) = Self::SPACE {
            require!(data.len() <= len, ErrorCode::AccountDidNotSerialize);
            data.resize(len, 0);
        }

        Ok(data)
    }

    /// Encoded size of the content, without allocation padding.
    fn byte_size(&self) -> Result<usize> {
        Self::SCHEMA
            .byte_size(&self.to_record())
            .map_err(|_| error!(ErrorCode::AccountDidNotSerialize))
    }

    /// Bytes to allocate for this account.
    fn space(&self) -> Result<usize> {
        match Self::SPACE.exact_len(&Self::SCHEMA) {
            Some(len) => Ok(len),
            None => self.byte_size(),
        }
    }

    fn rent_exempt_lamports(&self) -> Result<u64> {
        Ok(Rent::default().minimum_balance(self.space()?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAccount {
    pub owner: Pubkey,
    pub data: Vec<u8>,
}

/// Server-side account filter. Filters passed together must all match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountFilter {
    /// Data at `offset` starts with `bytes`.
    Memcmp { offset: u32, bytes: Vec<u8> },
    /// Data is exactly this long.
    DataSize(u32),
}

impl AccountFilter {
    /// Compare `bytes` against the top-level field `name` of account kind `T`.
    pub fn field<T: AuctionAccount>(name: &str, bytes: impl AsRef<[u8]>) -> Result<Self> {
        let offset = T::SCHEMA
            .offset_of(name)
            .and_then(|offset| u32::try_from(offset).ok())
            .ok_or_else(|| error!(AuctionSdkError::InvalidAccountData))?;

        Ok(Self::Memcmp {
            offset,
            bytes: bytes.as_ref().to_vec(),
        })
    }

    pub fn matches(&self, data: &[u8]) -> bool {
        match self {
            Self::Memcmp { offset, bytes } => usize::try_from(*offset)
                .ok()
                .and_then(|offset| data.get(offset..))
                .is_some_and(|rest| rest.starts_with(bytes)),
            Self::DataSize(len) => usize::try_from(*len).is_ok_and(|len| data.len() == len),
        }
    }
}

/// Where accounts come from, typically an RPC node.
#[allow(async_fn_in_trait)]
pub trait AccountSource {
    /// `None` if no account exists at `address`.
    async fn fetch(&self, address: &Pubkey) -> Result<Option<RemoteAccount>>;

    /// Accounts owned by `program_id` that match every filter.
    async fn fetch_filtered(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, RemoteAccount)>>;
}

pub struct AccountLoader<S> {
    program_id: Pubkey,
    source: S,
}

impl<S: AccountSource> AccountLoader<S> {
    pub fn new(source: S) -> Self {
        Self::with_program_id(AUCTION_PROGRAM_ID, source)
    }

    pub fn with_program_id(program_id: Pubkey, source: S) -> Self {
        Self { program_id, source }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn validate<T: AuctionAccount>(&self, address: &Pubkey, account: &RemoteAccount) -> Result<T> {
        T::try_from_remote(&self.program_id, account).map_err(|err| {
            tracing::warn!(
                %address,
                account = T::SCHEMA.name,
                owner = %account.owner,
                len = account.data.len(),
                error = %err,
                "rejected account"
            );
            err
        })
    }

    pub async fn try_load<T: AuctionAccount>(&self, address: &Pubkey) -> Result<Option<T>> {
        tracing::debug!(%address, account = T::SCHEMA.name, "load");

        match self.source.fetch(address).await? {
            Some(account) => self.validate(address, &account).map(Some),
            None => Ok(None),
        }
    }

    pub async fn load<T: AuctionAccount>(&self, address: &Pubkey) -> Result<T> {
        self.try_load(address)
            .await?
            .ok_or_else(|| error!(AuctionSdkError::AccountNotFound))
    }

    /// All accounts of kind `T` matching `filters`. Kinds with a known length get a data size
    /// filter in front. Every returned account is checked against the filters again.
    ///
    /// One account that fails the filters fails the whole scan with
    /// [AuctionSdkError::InvalidAccountData], and one that fails validation fails it with that
    /// error. Nothing is skipped.
    pub async fn scan<T: AuctionAccount>(
        &self,
        filters: Vec<AccountFilter>,
    ) -> Result<Vec<(Pubkey, T)>> {
        let mut filters = filters;
        if let Some(len) = T::SPACE.exact_len(&T::SCHEMA) {
            let len = u32::try_from(len).map_err(|_| error!(AuctionSdkError::InvalidAccountData))?;
            filters.insert(0, AccountFilter::DataSize(len));
        }

        tracing::debug!(account = T::SCHEMA.name, ?filters, "scan");

        let accounts = self
            .source
            .fetch_filtered(&self.program_id, &filters)
            .await?;

        let mut out = Vec::with_capacity(accounts.len());
        for (address, account) in accounts {
            if let Some(filter) = filters.iter().find(|filter| !filter.matches(&account.data)) {
                tracing::warn!(
                    %address,
                    account = T::SCHEMA.name,
                    len = account.data.len(),
                    ?filter,
                    "scan returned non-matching account"
                );
                return err!(AuctionSdkError::InvalidAccountData);
            }
            out.push((address, self.validate(&address, &account)?));
        }

        tracing::debug!(account = T::SCHEMA.name, count = out.len(), "scanned");

        Ok(out)
    }

    pub async fn bidder_pots_for_auction(
        &self,
        auction: &Pubkey,
    ) -> Result<Vec<(Pubkey, BidderPot)>> {
        self.scan(vec![AccountFilter::field::<BidderPot>("auction_act", auction)?])
            .await
    }

    pub async fn bidder_metadata_for_auction(
        &self,
        auction: &Pubkey,
    ) -> Result<Vec<(Pubkey, BidderMetadata)>> {
        self.scan(vec![AccountFilter::field::<BidderMetadata>(
            "auction_pubkey",
            auction,
        )?])
        .await
    }

    /// Auction created for `resource`, along with its address.
    pub async fn load_auction_by_resource(&self, resource: &Pubkey) -> Result<(Pubkey, Auction)> {
        let (address, _) = pda::auction_address(&self.program_id, resource)?;
        Ok((address, self.load(&address).await?))
    }

    /// Extended settings of the auction created for `resource`. Older auctions have none.
    pub async fn load_auction_extended(
        &self,
        resource: &Pubkey,
    ) -> Result<Option<AuctionDataExtended>> {
        let (address, _) = pda::auction_extended_address(&self.program_id, resource)?;
        self.try_load(&address).await
    }

    pub async fn load_bidder_pot(&self, auction: &Pubkey, bidder: &Pubkey) -> Result<BidderPot> {
        let (address, _) = pda::bidder_pot_address(&self.program_id, auction, bidder)?;
        self.load(&address).await
    }

    pub async fn load_bidder_metadata(
        &self,
        auction: &Pubkey,
        bidder: &Pubkey,
    ) -> Result<BidderMetadata> {
        let (address, _) = pda::bidder_metadata_address(&self.program_id, auction, bidder)?;
        self.load(&address).await
    }
}
