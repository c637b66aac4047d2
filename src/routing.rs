//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::get,
};

use crate::{
    AppState, endpoints,
    ledger::{
        get_ledger_page, get_node_drawer, get_pivot_tree, get_recent_feed_page,
        get_transactions_csv,
    },
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
///
/// Session handling lives in the surrounding admin shell; this router only
/// serves the ledger console itself.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::LEDGER_VIEW, get(get_ledger_page))
        .route(endpoints::LEDGER_RECENT, get(get_recent_feed_page))
        .route(endpoints::LEDGER_PIVOT, get(get_pivot_tree))
        .route(endpoints::LEDGER_NODE, get(get_node_drawer))
        .route(endpoints::LEDGER_EXPORT, get(get_transactions_csv))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the ledger page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::LEDGER_VIEW)
}
