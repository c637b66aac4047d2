//! The upstream transaction store.
//!
//! The store hands out a time-limited presigned URL for the ledger payload;
//! fetching that URL yields the transaction map. Both steps share one retry
//! policy. Everything downstream of a successful response (payload shape,
//! emptiness) is terminal and never retried.

mod client;
mod payload;

pub use client::{FetchedLedger, TransactionStore};
