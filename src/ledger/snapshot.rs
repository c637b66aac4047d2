//! The in-process snapshot of the upstream ledger.
//!
//! A snapshot is built once per successful fetch: the flat list is sorted
//! for the feed and all three pivot rollups are computed eagerly, so user
//! interaction (tab switches, expand/collapse, drawer opens, feed paging)
//! never recomputes anything and never touches the network.

use super::{
    feed::sort_most_recent_first,
    model::Transaction,
    pivot::{PivotNode, ViewMode, pivot_by_category, pivot_by_devotee, pivot_by_year},
};

/// Totals across the whole flat list, shown in the stats card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerStats {
    /// Reversal-adjusted sum over every transaction.
    pub total_amount: f64,
    /// Number of transactions.
    pub total_count: usize,
}

/// Everything derived from one fetch of the upstream transaction list.
#[derive(Debug)]
pub struct LedgerSnapshot {
    /// The flat list, sorted by booked date, most recent first.
    pub transactions: Vec<Transaction>,
    /// Year → category → service rollup.
    pub by_year: Vec<PivotNode>,
    /// Category → service → year rollup.
    pub by_category: Vec<PivotNode>,
    /// Devotee → year → category rollup.
    pub by_devotee: Vec<PivotNode>,
    /// Whole-list totals.
    pub stats: LedgerStats,
    /// The upstream store's last-update timestamp, verbatim.
    pub last_updated: Option<String>,
}

impl LedgerSnapshot {
    /// Builds a snapshot from a freshly fetched flat list.
    pub fn build(mut transactions: Vec<Transaction>, last_updated: Option<String>) -> Self {
        let stats = LedgerStats {
            total_amount: transactions.iter().map(Transaction::signed_amount).sum(),
            total_count: transactions.len(),
        };

        let by_year = pivot_by_year(&transactions);
        let by_category = pivot_by_category(&transactions);
        let by_devotee = pivot_by_devotee(&transactions);

        sort_most_recent_first(&mut transactions);

        Self {
            transactions,
            by_year,
            by_category,
            by_devotee,
            stats,
            last_updated,
        }
    }

    /// The rollup for a view mode.
    pub(crate) fn pivot(&self, mode: ViewMode) -> &[PivotNode] {
        match mode {
            ViewMode::ByYear => &self.by_year,
            ViewMode::ByCategory => &self.by_category,
            ViewMode::ByDevotee => &self.by_devotee,
        }
    }

    pub(crate) fn find_transaction(&self, transaction_id: &str) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|t| t.transaction_id == transaction_id)
    }
}

/// Wraps a single feed transaction as a drawer node: count 1, the signed
/// amount, and the record itself attached.
pub(crate) fn synthetic_node(transaction: &Transaction) -> PivotNode {
    PivotNode {
        id: transaction.transaction_id.clone(),
        label: transaction.devotee_name.clone(),
        amount: transaction.signed_amount(),
        count: 1,
        level: 3,
        children: Vec::new(),
        transactions: vec![transaction.clone()],
    }
}
