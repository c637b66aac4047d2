//! HTTP client for the upstream transaction store.

use axum::http::{StatusCode, header};
use url::Url;

use crate::{Error, ledger::Transaction, retry::RetryPolicy};

use super::payload::{LedgerPayload, PresignedResponse};

/// The application path that returns a presigned URL for the ledger payload.
const LIST_PATH: &str = "/transactions/transactions";

/// How long to wait on a single upstream request before treating it as a
/// transport failure (which the retry policy then handles).
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// The result of one successful ledger fetch.
#[derive(Debug)]
pub struct FetchedLedger {
    /// The flat transaction list, in upstream key order.
    pub transactions: Vec<Transaction>,
    /// The upstream store's last-update timestamp, verbatim.
    pub last_updated: Option<String>,
}

/// Client for the two-step presigned-URL fetch against the upstream store.
///
/// Both steps run under the same [RetryPolicy]: 401 and transport failures
/// are retried with doubling delays; a response that arrives successfully is
/// never refetched, so payload-shape failures are terminal.
#[derive(Debug)]
pub struct TransactionStore {
    client: reqwest::Client,
    base_url: String,
    session_cookie: Option<String>,
    policy: RetryPolicy,
}

/// How a single request attempt failed. Every variant is retryable; the
/// distinction only matters once the attempt budget is exhausted.
enum FetchAttemptError {
    Unauthorized,
    Status(u16),
    Transport(String),
}

impl TransactionStore {
    /// Creates a store client for `base_url`, optionally forwarding a session
    /// cookie with every request.
    pub fn new(
        base_url: &str,
        session_cookie: Option<String>,
        policy: RetryPolicy,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| Error::UpstreamFetch(format!("could not build HTTP client: {error}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            session_cookie,
            policy,
        })
    }

    /// Fetches the current ledger: presigned URL first, then the payload.
    ///
    /// # Errors
    /// [Error::SessionExpired] when retries exhaust on 401,
    /// [Error::UpstreamFetch] when they exhaust on anything else,
    /// [Error::InvalidPayload] for shape failures after a successful
    /// response, and [Error::NoData] for an empty transaction list.
    pub async fn fetch_ledger(&self) -> Result<FetchedLedger, Error> {
        let list_url = format!("{}{}?{}", self.base_url, LIST_PATH, list_query());

        let response = self.get_with_retry(&list_url).await?;
        let presigned: PresignedResponse = response.json().await.map_err(|error| {
            Error::InvalidPayload(format!("presigned URL response did not parse: {error}"))
        })?;

        let presigned_url = presigned
            .presigned_url
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                Error::InvalidPayload("no presigned URL received from server".to_owned())
            })?;
        Url::parse(&presigned_url).map_err(|error| {
            Error::InvalidPayload(format!("presigned URL is not a valid URL: {error}"))
        })?;

        let response = self.get_with_retry(&presigned_url).await?;
        let payload: LedgerPayload = response.json().await.map_err(|error| {
            Error::InvalidPayload(format!("ledger payload did not parse: {error}"))
        })?;

        let last_updated = payload.last_updated_michigan.clone();
        let transactions = payload.into_transactions()?;

        if transactions.is_empty() {
            return Err(Error::NoData);
        }

        tracing::debug!("fetched {} transactions from upstream", transactions.len());

        Ok(FetchedLedger {
            transactions,
            last_updated,
        })
    }

    async fn get_with_retry(&self, url: &str) -> Result<reqwest::Response, Error> {
        self.policy
            .run(|| self.get_once(url), |_| true)
            .await
            .map_err(|error| match error {
                FetchAttemptError::Unauthorized => Error::SessionExpired,
                FetchAttemptError::Status(status) => {
                    Error::UpstreamFetch(format!("upstream returned HTTP {status}"))
                }
                FetchAttemptError::Transport(message) => Error::UpstreamFetch(message),
            })
    }

    async fn get_once(&self, url: &str) -> Result<reqwest::Response, FetchAttemptError> {
        let mut request = self.client.get(url);
        if let Some(cookie) = &self.session_cookie {
            request = request.header(header::COOKIE, cookie.clone());
        }

        let response = request
            .send()
            .await
            .map_err(|error| FetchAttemptError::Transport(error.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else if status == StatusCode::UNAUTHORIZED {
            Err(FetchAttemptError::Unauthorized)
        } else {
            Err(FetchAttemptError::Status(status.as_u16()))
        }
    }
}

fn list_query() -> String {
    serde_urlencoded::to_string([("uri", LIST_PATH)]).expect("static query string serializes")
}
