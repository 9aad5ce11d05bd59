use futures::executor::block_on;
use futures::future::{self, LocalBoxFuture};
use risk_dashboard_wasm::application::{DETAIL_TABLE_ERROR, DetailTableService, PageActionService, detail_title};
use risk_dashboard_wasm::domain::errors::{FetchError, FetchResult};
use risk_dashboard_wasm::domain::filters::FilterState;
use risk_dashboard_wasm::infrastructure::{DataFetcher, ManualClock};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// Answers every URL with the same response and records what was asked.
struct ScriptedFetcher {
    response: FetchResult<Value>,
    requested: RefCell<Vec<String>>,
}

impl ScriptedFetcher {
    fn new(response: FetchResult<Value>) -> Rc<Self> {
        Rc::new(Self { response, requested: RefCell::new(Vec::new()) })
    }

    fn requests(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl DataFetcher for ScriptedFetcher {
    fn fetch_json<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, FetchResult<Value>> {
        self.requested.borrow_mut().push(url.to_string());
        Box::pin(future::ready(self.response.clone()))
    }
}

fn filters() -> FilterState {
    let mut filters = FilterState::new("raydium", "USX-USDC", "7d");
    filters.mkt1 = "pt-usx".to_string();
    filters
}

fn table_response() -> Value {
    json!({
        "status": "success",
        "data": {
            "kind": "table",
            "columns": [{"key": "pool", "label": "USX Pool"}, {"key": "tvl", "label": "TVL"}],
            "rows": [{"pool": "USX/USDC", "tvl": 1200}, {"pool": "USX/SOL", "tvl": 300}]
        }
    })
}

#[test]
fn detail_table_is_cached_until_ttl_expires() {
    let fetcher = ScriptedFetcher::new(Ok(table_response()));
    let clock = Arc::new(ManualClock::new(1_000));
    let service = DetailTableService::new(fetcher.clone(), "https://api.example", 30_000, clock.clone());

    let first = block_on(service.open("/detail/pools", &filters()));
    assert_eq!(first.headers, vec!["USX Pool", "TVL"]);
    assert_eq!(first.rows.len(), 2);
    assert_eq!(first.message, None);

    clock.advance(29_999);
    let cached = block_on(service.open("/detail/pools", &filters()));
    assert_eq!(cached, first);
    assert_eq!(fetcher.requests().len(), 1);

    clock.advance(1);
    block_on(service.open("/detail/pools", &filters()));
    assert_eq!(fetcher.requests().len(), 2);
    assert_eq!(
        fetcher.requests()[0],
        "https://api.example/detail/pools?protocol=raydium&pair=USX-USDC&last_window=7d&mkt1=pt-usx"
    );
}

#[test]
fn other_filters_are_a_separate_cache_entry() {
    let fetcher = ScriptedFetcher::new(Ok(table_response()));
    let service = DetailTableService::new(fetcher.clone(), "", 30_000, Arc::new(ManualClock::new(0)));

    block_on(service.open("/detail/pools", &filters()));
    let mut other = filters();
    other.last_window = "24h".to_string();
    block_on(service.open("/detail/pools", &other));

    assert_eq!(fetcher.requests().len(), 2);
    assert_eq!(service.cached_entries(), 2);
}

#[test]
fn bad_detail_envelopes_show_the_inline_error() {
    let responses = [
        Ok(json!({"status": "error", "detail": "nope"})),
        Ok(json!({"status": "success", "data": {"kind": "kpi", "primary": 1}})),
        Err(FetchError::HttpStatus(502)),
    ];
    for response in responses {
        let fetcher = ScriptedFetcher::new(response);
        let service = DetailTableService::new(fetcher, "", 30_000, Arc::new(ManualClock::new(0)));
        let view = block_on(service.open("/detail/pools", &filters()));
        assert_eq!(view.message.as_deref(), Some(DETAIL_TABLE_ERROR));
        // failures are not cached
        assert_eq!(service.cached_entries(), 0);
    }
}

#[test]
fn detail_title_falls_back_for_blank_titles() {
    assert_eq!(detail_title("Top Pools"), "Top Pools — Full Detail");
    assert_eq!(detail_title("   "), "Detail — Full Detail");
}

#[test]
fn page_action_renders_nested_table_with_market_params_only() {
    let response = json!({
        "status": "success",
        "data": {
            "columns": [{"key": "market", "label": "Market"}],
            "rows": [{"market": "PT-USX"}]
        }
    });
    let fetcher = ScriptedFetcher::new(Ok(response));
    let service = PageActionService::new(fetcher.clone(), "https://api.example/", 60_000, Arc::new(ManualClock::new(0)));

    let view = block_on(service.open("actions/markets", &filters()));
    assert_eq!(view.headers, vec!["Market"]);
    assert_eq!(view.rows[0].cells, vec!["PT-USX"]);
    assert_eq!(fetcher.requests(), vec!["https://api.example/actions/markets?mkt1=pt-usx"]);

    block_on(service.open("actions/markets", &filters()));
    assert_eq!(fetcher.requests().len(), 1);
}

#[test]
fn page_action_failures_and_missing_endpoint() {
    let fetcher = ScriptedFetcher::new(Err(FetchError::HttpStatus(500)));
    let service = PageActionService::new(fetcher.clone(), "", 60_000, Arc::new(ManualClock::new(0)));

    let failed = block_on(service.open("/actions/x", &filters()));
    assert_eq!(failed.message.as_deref(), Some("Failed to load data: HTTP 500"));

    let missing = block_on(service.open("  ", &filters()));
    assert_eq!(missing.message.as_deref(), Some("No endpoint configured."));
    assert_eq!(fetcher.requests().len(), 1);
}

#[test]
fn page_action_without_table_shape_says_no_data() {
    let fetcher = ScriptedFetcher::new(Ok(json!({"status": "success", "data": {"rows": []}})));
    let service = PageActionService::new(fetcher, "", 60_000, Arc::new(ManualClock::new(0)));
    let view = block_on(service.open("/actions/x", &filters()));
    assert_eq!(view.message.as_deref(), Some("No data."));
}

#[test]
fn page_action_error_status_is_a_failure_and_not_cached() {
    let response = json!({
        "status": "error",
        "data": {"columns": [{"key": "a"}], "rows": [{"a": 1}]}
    });
    let fetcher = ScriptedFetcher::new(Ok(response));
    let service = PageActionService::new(fetcher.clone(), "", 60_000, Arc::new(ManualClock::new(0)));

    let view = block_on(service.open("/actions/x", &filters()));
    assert_eq!(view.message.as_deref(), Some("Failed to load data: unexpected envelope: status error"));
    assert!(view.rows.is_empty());
    assert_eq!(service.cached_entries(), 0);

    block_on(service.open("/actions/x", &filters()));
    assert_eq!(fetcher.requests().len(), 2);
}
