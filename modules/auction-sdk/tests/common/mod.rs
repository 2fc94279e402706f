#![allow(dead_code)]

use std::{
    collections::BTreeMap,
    io,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use anchor_lang::prelude::*;
use auction_sdk::{
    accounts::{AccountFilter, AccountSource, AuctionAccount, RemoteAccount},
    AUCTION_PROGRAM_ID,
};
use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

static CAPTURED_LOGS: Lazy<Arc<Mutex<Vec<String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(Vec::new())));

pub fn init_tracing() {
    static INITIALIZED: Lazy<bool> = Lazy::new(|| {
        let fmt_layer = fmt::Layer::default()
            .with_ansi(false)
            .with_writer(|| LogCaptureWriter(Arc::clone(&CAPTURED_LOGS)));

        let subscriber = Registry::default()
            .with(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("auction_sdk=debug")),
            )
            .with(fmt_layer);

        tracing::subscriber::set_global_default(subscriber).is_ok()
    });

    let _ = *INITIALIZED;
}

pub fn captured_logs() -> Vec<String> {
    CAPTURED_LOGS.lock().unwrap().clone()
}

struct LogCaptureWriter(Arc<Mutex<Vec<String>>>);

impl io::Write for LogCaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap()
            .push(String::from_utf8_lossy(buf).into_owned());
        io::stdout().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// Accounts held in memory, standing in for an RPC node.
#[derive(Default)]
pub struct MemorySource {
    accounts: Mutex<BTreeMap<Pubkey, RemoteAccount>>,
    fetches: AtomicUsize,

    /// Return every account from `fetch_filtered`, like a node that does not apply filters.
    pub ignore_filters: bool,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unfiltered() -> Self {
        Self {
            ignore_filters: true,
            ..Default::default()
        }
    }

    pub fn insert_raw(&self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
        self.accounts
            .lock()
            .unwrap()
            .insert(address, RemoteAccount { owner, data });
    }

    /// Store `account` as the auction program would.
    pub fn insert<T: AuctionAccount>(&self, address: Pubkey, account: &T) {
        self.insert_raw(address, AUCTION_PROGRAM_ID, account.try_serialize().unwrap());
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl AccountSource for MemorySource {
    async fn fetch(&self, address: &Pubkey) -> Result<Option<RemoteAccount>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn fetch_filtered(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, RemoteAccount)>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, account)| {
                self.ignore_filters
                    || (account.owner == *program_id
                        && filters.iter().all(|filter| filter.matches(&account.data)))
            })
            .map(|(address, account)| (*address, account.clone()))
            .collect())
    }
}
