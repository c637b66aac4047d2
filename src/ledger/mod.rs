//! The transaction ledger feature.
//!
//! This module contains everything for the ledger console:
//! - The `Transaction` model and its fallback-resolution functions
//! - The pivot rollup builders and the `PivotNode` tree they produce
//! - The cached `LedgerSnapshot` built once per fetch
//! - Paging for the recent feed and CSV export of the flat list
//! - View handlers and HTML rendering for the ledger pages

mod export;
mod feed;
mod ledger_page;
pub(crate) mod model;
mod partials;
pub(crate) mod pivot;
mod snapshot;
mod view;

pub use feed::FeedConfig;
pub use model::Transaction;
pub(crate) use snapshot::LedgerSnapshot;

pub(crate) use ledger_page::get_ledger_page;
pub(crate) use partials::{
    get_node_drawer, get_pivot_tree, get_recent_feed_page, get_transactions_csv,
};
