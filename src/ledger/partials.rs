//! Partial endpoints for the ledger page, plus the CSV download.
//!
//! All of these read the snapshot cached by the last full page load and
//! never contact the upstream store, so feed scrolling, drawer opens, search
//! and export stay network-free. Hitting them before any page load redirects
//! to the full page instead.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRequest;
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{AppState, Error, endpoints, timezone::get_local_offset};

use super::{
    export::{export_csv, export_filename},
    feed::feed_page,
    pivot::{ViewMode, find_node},
    snapshot::synthetic_node,
    view::{drawer_view, feed_page_fragment, filter_level_one, initial_expanded, pivot_tree_view},
};

/// Query parameters for a recent-feed page.
#[derive(Debug, Deserialize)]
pub(crate) struct FeedPageQuery {
    page: Option<usize>,
}

/// Returns one page of the recent feed as an HTML fragment.
pub async fn get_recent_feed_page(
    State(state): State<AppState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<FeedPageQuery>,
) -> Result<Response, Error> {
    if !is_htmx_request {
        return Ok(Redirect::to(endpoints::LEDGER_VIEW).into_response());
    }

    let snapshot = state.current_snapshot()?;
    let page_number = query.page.unwrap_or(1).max(1);
    let page = feed_page(
        &snapshot.transactions,
        page_number,
        state.feed_config.page_size,
    );

    Ok(feed_page_fragment(&page, page_number + 1).into_response())
}

/// Query parameters for the pivot-tree partial.
#[derive(Debug, Deserialize)]
pub(crate) struct PivotTreeQuery {
    view: Option<ViewMode>,
    q: Option<String>,
}

/// Returns the pivot tree for a view mode, optionally filtered by devotee
/// name.
pub async fn get_pivot_tree(
    State(state): State<AppState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<PivotTreeQuery>,
) -> Result<Response, Error> {
    if !is_htmx_request {
        return Ok(Redirect::to(endpoints::LEDGER_VIEW).into_response());
    }

    let snapshot = state.current_snapshot()?;
    let view_mode = query.view.unwrap_or_default();
    let forest = snapshot.pivot(view_mode);
    let visible = filter_level_one(forest, view_mode, query.q.as_deref());
    let expanded = initial_expanded(&visible);

    Ok(pivot_tree_view(&visible, &expanded, view_mode).into_response())
}

/// Query parameters for the detail drawer: either a pivot node (`view` +
/// `id`) or a single feed transaction (`txn`).
#[derive(Debug, Deserialize)]
pub(crate) struct DrawerQuery {
    view: Option<ViewMode>,
    id: Option<String>,
    txn: Option<String>,
}

/// Returns the detail drawer for a pivot node or a single transaction.
pub async fn get_node_drawer(
    State(state): State<AppState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<DrawerQuery>,
) -> Result<Response, Error> {
    if !is_htmx_request {
        return Ok(Redirect::to(endpoints::LEDGER_VIEW).into_response());
    }

    let snapshot = state.current_snapshot()?;

    if let Some(transaction_id) = query.txn {
        let transaction = snapshot
            .find_transaction(&transaction_id)
            .ok_or(Error::NotFound)?;
        return Ok(drawer_view(&synthetic_node(transaction)).into_response());
    }

    let node_id = query.id.ok_or(Error::NotFound)?;
    let view_mode = query.view.unwrap_or_default();
    let node = find_node(snapshot.pivot(view_mode), &node_id).ok_or(Error::NotFound)?;

    // The drawer only opens for nodes that carry records.
    if !node.has_transactions() {
        return Err(Error::NotFound);
    }

    Ok(drawer_view(node).into_response())
}

/// Serves the full flat transaction list as a CSV attachment.
///
/// The export always covers every fetched transaction, regardless of the
/// active tab, view mode, or devotee filter.
pub async fn get_transactions_csv(State(state): State<AppState>) -> Result<Response, Error> {
    let snapshot = state.current_snapshot()?;
    let bytes = export_csv(&snapshot.transactions)?;
    let filename = export_filename(current_local_date(&state.local_timezone)?);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

fn current_local_date(local_timezone: &str) -> Result<Date, Error> {
    let Some(local_offset) = get_local_offset(local_timezone) else {
        tracing::error!("Invalid timezone {}", local_timezone);
        return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
    };

    Ok(OffsetDateTime::now_utc().to_offset(local_offset).date())
}
