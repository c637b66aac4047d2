//! Seva Ledger is the transaction console for the temple admin tools: it
//! pulls the donation/seva ledger from the upstream transaction store and
//! serves HTML pages with a recent-transactions feed, three pivot rollups
//! (by year, by category, by devotee), a transaction detail drawer, and CSV
//! export.
//!
//! This library provides an HTTP server that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod endpoints;
mod html;
mod ledger;
mod navigation;
mod not_found;
mod retry;
mod routing;
mod store;
mod timezone;

pub use app_state::AppState;
pub use ledger::{FeedConfig, Transaction};
pub use retry::RetryPolicy;
pub use routing::build_router;
pub use store::{FetchedLedger, TransactionStore};

use crate::{html::error_view, not_found::get_404_not_found_response};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The upstream store kept answering 401 until the retry budget ran out.
    ///
    /// The surrounding admin shell owns re-authentication; this component
    /// only reports that the session is gone.
    #[error("unauthorized - login expired")]
    SessionExpired,

    /// A fetch step failed (transport error or a non-401 error status) and
    /// the retry budget ran out.
    #[error("could not fetch data from the transaction store: {0}")]
    UpstreamFetch(String),

    /// A response arrived successfully but its body was not the expected
    /// shape. Never retried.
    #[error("invalid transaction payload: {0}")]
    InvalidPayload(String),

    /// The upstream store answered with an empty transaction list.
    #[error("no transaction data received")]
    NoData,

    /// A partial endpoint was hit before any full page load populated the
    /// ledger snapshot.
    #[error("no ledger snapshot has been loaded yet")]
    SnapshotMissing,

    /// Could not acquire the snapshot lock.
    #[error("could not acquire the snapshot lock")]
    SnapshotLockError,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the
    /// parameters (e.g., node id) are correct.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An error occurred while serializing transactions as CSV.
    #[error("could not serialize transactions as CSV: {0}")]
    CsvExport(String),

    /// An error occurred while getting the local timezone from a canonical
    /// timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::SessionExpired => render_error_page(
                StatusCode::UNAUTHORIZED,
                "Session Expired",
                "Unauthorized - Login expired. Please log in again.",
            ),
            Error::UpstreamFetch(details) => {
                tracing::error!("upstream fetch failed: {details}");
                render_error_page(
                    StatusCode::BAD_GATEWAY,
                    "Fetch Failed",
                    "An error occurred while fetching data.",
                )
            }
            Error::InvalidPayload(details) => {
                tracing::error!("invalid upstream payload: {details}");
                render_error_page(
                    StatusCode::BAD_GATEWAY,
                    "Invalid Payload",
                    "Invalid transaction payload.",
                )
            }
            Error::NoData => {
                render_error_page(StatusCode::OK, "No Data", "No transaction data received.")
            }
            Error::SnapshotMissing => Redirect::to(endpoints::LEDGER_VIEW).into_response(),
            Error::NotFound => get_404_not_found_response(),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_error_page(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "Sorry, something went wrong. Try again later or check the server logs.",
                )
            }
        }
    }
}

fn render_error_page(status_code: StatusCode, title: &str, message: &str) -> Response {
    (status_code, error_view(title, message)).into_response()
}
