//! Client-side paging for the recent-transactions feed.
//!
//! The feed shows the already-fetched flat list sorted most recent first and
//! pages through it in fixed-size slices; requesting a page never touches the
//! upstream store.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use super::model::Transaction;

const BOOKED_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The config that controls how the recent feed pages its data.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Number of records appended per scroll-triggered load.
    pub page_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { page_size: 20 }
    }
}

/// One page of the recent feed.
#[derive(Debug, PartialEq)]
pub(crate) struct FeedPage<'a> {
    /// The records on this page, already sorted most recent first.
    pub(crate) items: &'a [Transaction],
    /// Whether any records remain after this page.
    pub(crate) has_more: bool,
}

/// The sort key for booked dates.
///
/// Dates that parse as ISO `year-month-day` compare as dates; values that do
/// not parse compare lexicographically among themselves and sort after every
/// parseable date in the descending feed. All booked-date ordering in the
/// crate goes through this one key.
pub(crate) fn booked_date_key(booked_date: &str) -> (Option<Date>, &str) {
    (
        Date::parse(booked_date, BOOKED_DATE_FORMAT).ok(),
        booked_date,
    )
}

/// Sorts transactions by booked date, most recent first.
pub(crate) fn sort_most_recent_first(transactions: &mut [Transaction]) {
    transactions
        .sort_by(|a, b| booked_date_key(&b.booked_date).cmp(&booked_date_key(&a.booked_date)));
}

/// Returns the 1-based `page` of the feed.
///
/// Pages past the end of the list are empty with `has_more` false, so a
/// straggling scroll event can never restart the load chain.
pub(crate) fn feed_page(transactions: &[Transaction], page: usize, page_size: usize) -> FeedPage<'_> {
    let start = page.saturating_sub(1).saturating_mul(page_size).min(transactions.len());
    let end = start.saturating_add(page_size).min(transactions.len());

    FeedPage {
        items: &transactions[start..end],
        has_more: end < transactions.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::{booked_date_key, feed_page, sort_most_recent_first};
    use crate::ledger::model::{Transaction, test_utils::transaction};

    fn dated(id: &str, booked_date: &str) -> Transaction {
        let mut t = transaction(id, 10.0, "202401", None, None, false);
        t.booked_date = booked_date.to_owned();
        t
    }

    #[test]
    fn pages_through_forty_five_records_in_three_loads() {
        let transactions: Vec<Transaction> = (0..45)
            .map(|i| dated(&format!("t{i}"), &format!("2024-03-{:02}", (i % 28) + 1)))
            .collect();

        let first = feed_page(&transactions, 1, 20);
        assert_eq!(first.items.len(), 20);
        assert!(first.has_more);

        let second = feed_page(&transactions, 2, 20);
        assert_eq!(second.items.len(), 20);
        assert!(second.has_more);

        let third = feed_page(&transactions, 3, 20);
        assert_eq!(third.items.len(), 5);
        assert!(!third.has_more);

        // A stray load past the end stays empty and closed.
        let fourth = feed_page(&transactions, 4, 20);
        assert!(fourth.items.is_empty());
        assert!(!fourth.has_more);
    }

    #[test]
    fn short_lists_fit_on_one_page() {
        let transactions = vec![dated("t1", "2024-01-01"), dated("t2", "2024-01-02")];

        let page = feed_page(&transactions, 1, 20);

        assert_eq!(page.items.len(), 2);
        assert!(!page.has_more);
    }

    #[test]
    fn sorts_most_recent_first() {
        let mut transactions = vec![
            dated("t1", "2023-12-31"),
            dated("t2", "2024-02-01"),
            dated("t3", "2024-01-15"),
        ];

        sort_most_recent_first(&mut transactions);

        let order: Vec<&str> = transactions
            .iter()
            .map(|t| t.transaction_id.as_str())
            .collect();
        assert_eq!(order, ["t2", "t3", "t1"]);
    }

    #[test]
    fn unparseable_dates_sort_after_parseable_ones() {
        let mut transactions = vec![
            dated("t1", "not a date"),
            dated("t2", "2024-02-01"),
            dated("t3", ""),
        ];

        sort_most_recent_first(&mut transactions);

        assert_eq!(transactions[0].transaction_id, "t2");
        assert!(booked_date_key("not a date").0.is_none());
        assert!(booked_date_key("2024-02-01").0.is_some());
    }
}
