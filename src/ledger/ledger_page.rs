//! Defines the route handler for the main ledger page.
//!
//! A full page load is the only thing that talks to the upstream store: the
//! handler fetches the flat list (with retries), rebuilds the snapshot, and
//! renders whichever tab and view mode the query selects. Missing query
//! params normalize via redirect so every rendered page has a canonical URL.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{AppState, Error, endpoints};

use super::{pivot::ViewMode, snapshot::LedgerSnapshot, view::ledger_view};

/// Which tab of the ledger page is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub(crate) enum Tab {
    /// The infinite-scroll feed of the most recent transactions.
    #[default]
    #[serde(rename = "recent")]
    Recent,
    /// The pivot rollup view with the stats card.
    #[serde(rename = "detailed")]
    Detailed,
}

impl Tab {
    pub(crate) fn as_query_value(self) -> &'static str {
        match self {
            Tab::Recent => "recent",
            Tab::Detailed => "detailed",
        }
    }
}

/// The raw query parameters accepted by the ledger page.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct LedgerPageQuery {
    tab: Option<Tab>,
    view: Option<ViewMode>,
    q: Option<String>,
}

/// URL encoding helper for ledger page links.
///
/// This is used to build consistent tab and pill links from already
/// normalized values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LedgerQuery {
    tab: Tab,
    view_mode: ViewMode,
}

impl LedgerQuery {
    pub(crate) fn new(tab: Tab, view_mode: ViewMode) -> Self {
        Self { tab, view_mode }
    }

    pub(crate) fn to_query_string(self) -> String {
        format!(
            "tab={}&view={}",
            self.tab.as_query_value(),
            self.view_mode.as_query_value()
        )
    }

    pub(crate) fn to_url(self, route: &str) -> String {
        format!("{route}?{}", self.to_query_string())
    }
}

/// Validated selection of tab/view options after normalization.
pub(crate) struct LedgerViewOptions {
    /// The active tab.
    pub(crate) tab: Tab,
    /// The active pivot view mode.
    pub(crate) view_mode: ViewMode,
    /// Devotee-name filter for the by-devotee view, if any.
    pub(crate) devotee_filter: Option<String>,
}

enum QueryDecision {
    Redirect(String),
    Normalized(LedgerViewOptions),
}

fn normalize_query(query: LedgerPageQuery) -> QueryDecision {
    let has_missing_params = query.tab.is_none() || query.view.is_none();
    let tab = query.tab.unwrap_or_default();
    let view_mode = query.view.unwrap_or_default();
    let devotee_filter = query.q.filter(|filter| !filter.is_empty());

    if has_missing_params {
        let mut redirect_url = LedgerQuery::new(tab, view_mode).to_url(endpoints::LEDGER_VIEW);
        if let Some(filter) = &devotee_filter {
            match serde_urlencoded::to_string([("q", filter)]) {
                Ok(encoded) => {
                    redirect_url.push('&');
                    redirect_url.push_str(&encoded);
                }
                Err(error) => {
                    tracing::error!("could not encode devotee filter {filter}: {error}");
                }
            }
        }
        return QueryDecision::Redirect(redirect_url);
    }

    QueryDecision::Normalized(LedgerViewOptions {
        tab,
        view_mode,
        devotee_filter,
    })
}

/// Render the ledger page after refetching the flat transaction list.
pub async fn get_ledger_page(
    State(state): State<AppState>,
    Query(query_params): Query<LedgerPageQuery>,
) -> Result<Response, Error> {
    let options = match normalize_query(query_params) {
        QueryDecision::Normalized(options) => options,
        QueryDecision::Redirect(redirect_url) => {
            return Ok(Redirect::to(&redirect_url).into_response());
        }
    };

    let ledger = state
        .store
        .fetch_ledger()
        .await
        .inspect_err(|error| tracing::error!("could not fetch ledger: {error}"))?;

    let snapshot =
        state.put_snapshot(LedgerSnapshot::build(ledger.transactions, ledger.last_updated))?;

    Ok(ledger_view(&snapshot, &options, state.feed_config.page_size).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        extract::{Query, State},
        http::{HeaderMap, StatusCode},
        routing::get,
    };
    use scraper::{Html, Selector};
    use serde_json::{Value, json};

    use super::{
        LedgerPageQuery, LedgerQuery, QueryDecision, Tab, get_ledger_page, normalize_query,
    };
    use crate::{
        AppState, Error, endpoints,
        ledger::{FeedConfig, pivot::ViewMode},
        retry::RetryPolicy,
        store::TransactionStore,
    };

    #[test]
    fn normalize_query_redirects_when_default_params_missing() {
        let decision = normalize_query(LedgerPageQuery::default());

        let QueryDecision::Redirect(redirect_url) = decision else {
            panic!("Expected redirect for missing default query params");
        };
        let expected_url =
            LedgerQuery::new(Tab::Recent, ViewMode::ByYear).to_url(endpoints::LEDGER_VIEW);
        assert_eq!(redirect_url, expected_url);
    }

    #[test]
    fn normalize_query_preserves_the_devotee_filter_across_redirects() {
        let decision = normalize_query(LedgerPageQuery {
            tab: Some(Tab::Detailed),
            view: None,
            q: Some("Asha Patel".to_owned()),
        });

        let QueryDecision::Redirect(redirect_url) = decision else {
            panic!("Expected redirect when the view param is missing");
        };
        assert!(
            redirect_url.contains("q=Asha+Patel") || redirect_url.contains("q=Asha%20Patel"),
            "got: {redirect_url}"
        );
    }

    #[test]
    fn normalize_query_accepts_complete_params() {
        let decision = normalize_query(LedgerPageQuery {
            tab: Some(Tab::Detailed),
            view: Some(ViewMode::ByDevotee),
            q: Some(String::new()),
        });

        let QueryDecision::Normalized(options) = decision else {
            panic!("Expected normalized options");
        };
        assert_eq!(options.tab, Tab::Detailed);
        assert_eq!(options.view_mode, ViewMode::ByDevotee);
        assert_eq!(options.devotee_filter, None, "empty filter is dropped");
    }

    async fn serve_upstream() -> String {
        async fn presigned(headers: HeaderMap) -> Json<Value> {
            let host = headers
                .get("host")
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_owned();
            Json(json!({ "presignedUrl": format!("http://{host}/ledger.json") }))
        }

        let router = Router::new()
            .route("/transactions/transactions", get(presigned))
            .route(
                "/ledger.json",
                get(|| async {
                    Json(json!({
                        "transactions": {
                            "k1": {
                                "TransactionId": "t1",
                                "DevoteeName": "Asha Patel",
                                "Amount": 100.0,
                                "YearMonth": "202401",
                                "BookedDate": "2024-01-15",
                                "service_parent": "POOJA",
                                "service_id": "abhishekam"
                            },
                            "k2": {
                                "TransactionId": "t2",
                                "DevoteeName": "Kiran Rao",
                                "Amount": 30.0,
                                "YearMonth": "202401",
                                "BookedDate": "2024-01-20",
                                "IsReversal": true
                            }
                        },
                        "last_updated_michigan": "2024-03-01 09:00 EST"
                    }))
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{addr}")
    }

    fn test_state(base_url: &str) -> AppState {
        let store = TransactionStore::new(
            base_url,
            None,
            RetryPolicy {
                max_retries: 0,
                base_delay: std::time::Duration::ZERO,
            },
        )
        .unwrap();
        AppState::new(store, "Etc/UTC", FeedConfig::default())
    }

    #[tokio::test]
    async fn ledger_page_redirects_to_canonical_query_params() {
        let state = test_state(&serve_upstream().await);

        let response = get_ledger_page(State(state), Query(LedgerPageQuery::default()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response
            .headers()
            .get("location")
            .expect("Missing redirect location header");
        assert_eq!(location, "/ledger?tab=recent&view=byYear");
    }

    #[tokio::test]
    async fn ledger_page_fetches_and_renders_the_feed() {
        let state = test_state(&serve_upstream().await);

        let response = get_ledger_page(
            State(state.clone()),
            Query(LedgerPageQuery {
                tab: Some(Tab::Recent),
                view: Some(ViewMode::ByYear),
                q: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = Html::parse_document(&String::from_utf8_lossy(&body));

        let cards: Vec<_> = html
            .select(&Selector::parse("div[data-feed-card='true']").unwrap())
            .collect();
        assert_eq!(cards.len(), 2);

        // The page load populated the shared snapshot for the partials.
        assert!(state.current_snapshot().is_ok());
    }

    #[tokio::test]
    async fn ledger_page_surfaces_fetch_failures() {
        // Nothing is listening on this port.
        let state = test_state("http://127.0.0.1:9");

        let error = get_ledger_page(
            State(state),
            Query(LedgerPageQuery {
                tab: Some(Tab::Recent),
                view: Some(ViewMode::ByYear),
                q: None,
            }),
        )
        .await
        .expect_err("fetch against a closed port should fail");

        assert!(matches!(error, Error::UpstreamFetch(_)));
    }
}
