//! The application's endpoint URIs.

/// The root route, which redirects to the ledger page.
pub const ROOT: &str = "/";
/// The page that displays the transaction ledger (recent feed and pivots).
pub const LEDGER_VIEW: &str = "/ledger";
/// The partial that returns one page of the recent feed.
pub const LEDGER_RECENT: &str = "/ledger/recent";
/// The partial that returns the pivot tree for a view mode.
pub const LEDGER_PIVOT: &str = "/ledger/pivot";
/// The partial that returns the detail drawer for a pivot node or a single
/// transaction.
pub const LEDGER_NODE: &str = "/ledger/node";
/// The CSV download of the full flat transaction list.
pub const LEDGER_EXPORT: &str = "/ledger/transactions.csv";
