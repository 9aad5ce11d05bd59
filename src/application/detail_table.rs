//! On-demand tables opened from a widget ("full detail") or a page action
//! button. Both fetch through a [`DataFetcher`] and keep results in a
//! short-lived [`TtlCache`] keyed by the request URL.

use super::requests::RequestParams;
use crate::domain::{
    errors::{FetchError, FetchResult},
    filters::FilterState,
    logging::{LogComponent, TimeProvider, get_logger},
    widget::{TableView, columns, rows},
};
use crate::infrastructure::{
    cache::TtlCache,
    http::{DataFetcher, HttpUtils},
};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

pub const DETAIL_TABLE_ERROR: &str = "Failed to load table";
const DETAIL_TABLE_WIDGET: &str = "detail-modal";

/// Heading of the detail modal opened from a widget titled `title`.
pub fn detail_title(title: &str) -> String {
    let title = title.trim();
    let title = if title.is_empty() { "Detail" } else { title };
    format!("{} — Full Detail", title)
}

#[derive(Clone)]
pub struct DetailTableService {
    fetcher: Rc<dyn DataFetcher>,
    cache: Rc<RefCell<TtlCache<TableView>>>,
    base_url: String,
}

impl DetailTableService {
    pub fn new(fetcher: Rc<dyn DataFetcher>, base_url: &str, ttl_ms: i64, clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            fetcher,
            cache: Rc::new(RefCell::new(TtlCache::new(ttl_ms, clock))),
            base_url: base_url.to_string(),
        }
    }

    pub fn url_for(&self, endpoint: &str, filters: &FilterState) -> String {
        HttpUtils::build_url_with_params(
            &HttpUtils::resolve_endpoint(&self.base_url, endpoint),
            RequestParams::for_filters(filters).pairs(),
        )
    }

    /// Table for `endpoint` under `filters`; any failure becomes the inline
    /// "Failed to load table" message.
    pub async fn open(&self, endpoint: &str, filters: &FilterState) -> TableView {
        let url = self.url_for(endpoint, filters);
        if let Some(view) = self.cache.borrow_mut().get(&url) {
            get_logger().debug(LogComponent::Application("DetailTable"), &format!("📦 Cache hit: {}", url));
            return view;
        }

        match self.fetch(&url, &filters.pair).await {
            Ok(view) => {
                self.cache.borrow_mut().insert(&url, view.clone());
                view
            }
            Err(error) => {
                get_logger().warn(
                    LogComponent::Application("DetailTable"),
                    &format!("⚠️ Detail table {} failed: {}", url, error),
                );
                TableView::message(DETAIL_TABLE_ERROR)
            }
        }
    }

    async fn fetch(&self, url: &str, pair: &str) -> FetchResult<TableView> {
        let response = self.fetcher.fetch_json(url).await?;
        let data = response.get("data").unwrap_or(&Value::Null);
        let is_table = response.get("status").and_then(Value::as_str) == Some("success")
            && data.get("kind").and_then(Value::as_str) == Some("table");
        if !is_table {
            return Err(FetchError::UnexpectedEnvelope("expected a successful table response".to_string()));
        }
        Ok(TableView::build(
            DETAIL_TABLE_WIDGET,
            &columns(data.get("columns")),
            &rows(data.get("rows")),
            pair,
        ))
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.borrow().len()
    }
}

#[derive(Clone)]
pub struct PageActionService {
    fetcher: Rc<dyn DataFetcher>,
    cache: Rc<RefCell<TtlCache<Value>>>,
    base_url: String,
}

impl PageActionService {
    pub fn new(fetcher: Rc<dyn DataFetcher>, base_url: &str, ttl_ms: i64, clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            fetcher,
            cache: Rc::new(RefCell::new(TtlCache::new(ttl_ms, clock))),
            base_url: base_url.to_string(),
        }
    }

    pub fn url_for(&self, endpoint: &str, filters: &FilterState) -> String {
        HttpUtils::build_url_with_params(
            &HttpUtils::resolve_endpoint(&self.base_url, endpoint),
            RequestParams::for_markets(filters).pairs(),
        )
    }

    /// Raw response body of the action; the cache holds it unparsed.
    ///
    /// Only a `"status": "success"` body counts as loaded; anything else is
    /// an error and is not cached.
    pub async fn load(&self, endpoint: &str, filters: &FilterState) -> FetchResult<Value> {
        let url = self.url_for(endpoint, filters);
        if let Some(payload) = self.cache.borrow_mut().get(&url) {
            return Ok(payload);
        }
        let payload = self.fetcher.fetch_json(&url).await?;
        let status = payload.get("status").and_then(Value::as_str).unwrap_or("missing");
        if status != "success" {
            return Err(FetchError::UnexpectedEnvelope(format!("status {}", status)));
        }
        self.cache.borrow_mut().insert(&url, payload.clone());
        Ok(payload)
    }

    /// Table view of the action, or its inline failure message.
    pub async fn open(&self, endpoint: &str, filters: &FilterState) -> TableView {
        if endpoint.trim().is_empty() {
            return TableView::message("No endpoint configured.");
        }
        match self.load(endpoint, filters).await {
            Ok(payload) => TableView::from_page_action(&payload),
            Err(error) => {
                get_logger().warn(
                    LogComponent::Application("PageAction"),
                    &format!("⚠️ Page action {} failed: {}", endpoint, error),
                );
                TableView::message(&format!("Failed to load data: {}", error))
            }
        }
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.borrow().len()
    }
}
