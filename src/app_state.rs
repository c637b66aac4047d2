//! Implements a struct that holds the state of the server.
//!
//! The state is the single owner of the ledger snapshot: the full-page
//! handler replaces it atomically after each successful fetch, and the
//! partial endpoints only read it. There is no other mutation path.

use std::sync::{Arc, Mutex};

use crate::{
    Error,
    ledger::{FeedConfig, LedgerSnapshot},
    store::TransactionStore,
};

/// The state of the server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Client for the upstream transaction store.
    pub(crate) store: Arc<TransactionStore>,

    /// The most recently fetched ledger snapshot, if any.
    pub(crate) snapshot: Arc<Mutex<Option<Arc<LedgerSnapshot>>>>,

    /// The local timezone as a canonical timezone name, e.g. "America/Detroit".
    pub(crate) local_timezone: String,

    /// The config that controls how the recent feed pages its data.
    pub(crate) feed_config: FeedConfig,
}

impl AppState {
    /// Create a new [AppState] around a [TransactionStore].
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g.
    /// "America/Detroit"; it is used for the export filename date.
    pub fn new(store: TransactionStore, local_timezone: &str, feed_config: FeedConfig) -> Self {
        Self {
            store: Arc::new(store),
            snapshot: Arc::new(Mutex::new(None)),
            local_timezone: local_timezone.to_owned(),
            feed_config,
        }
    }

    /// Atomically replaces the cached snapshot.
    pub(crate) fn put_snapshot(&self, snapshot: LedgerSnapshot) -> Result<Arc<LedgerSnapshot>, Error> {
        let snapshot = Arc::new(snapshot);
        let mut slot = self
            .snapshot
            .lock()
            .map_err(|_| Error::SnapshotLockError)?;
        *slot = Some(snapshot.clone());

        Ok(snapshot)
    }

    /// The cached snapshot, or [Error::SnapshotMissing] when no full page
    /// load has populated it yet.
    pub(crate) fn current_snapshot(&self) -> Result<Arc<LedgerSnapshot>, Error> {
        self.snapshot
            .lock()
            .map_err(|_| Error::SnapshotLockError)?
            .clone()
            .ok_or(Error::SnapshotMissing)
    }
}
