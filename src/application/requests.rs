//! Request tagging and parameter enrichment.

use crate::config::DashboardConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use crate::domain::filters::FilterState;

/// Epoch and filter snapshot attached to an issued widget request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTicket {
    pub epoch: u64,
    pub filters: FilterState,
}

impl RequestTicket {
    /// A response is current only for the epoch and filters it was issued under.
    pub fn is_current(&self, epoch: u64, filters: &FilterState) -> bool {
        self.epoch == epoch && &self.filters == filters
    }
}

/// Ordered query parameters of a request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestParams(pub Vec<(String, String)>);

impl RequestParams {
    fn push(&mut self, key: &str, value: &str) {
        self.0.push((key.to_string(), value.to_string()));
    }

    fn push_markets(&mut self, filters: &FilterState) {
        if !filters.mkt1.is_empty() {
            self.push("mkt1", &filters.mkt1);
        }
        if !filters.mkt2.is_empty() {
            self.push("mkt2", &filters.mkt2);
        }
    }

    /// Global filters: protocol, pair, window, then markets when selected.
    pub fn for_filters(filters: &FilterState) -> Self {
        let mut params = Self::default();
        params.push("protocol", &filters.protocol);
        params.push("pair", &filters.pair);
        params.push("last_window", &filters.last_window);
        params.push_markets(filters);
        params
    }

    /// Page actions only carry the market selection.
    pub fn for_markets(filters: &FilterState) -> Self {
        let mut params = Self::default();
        params.push_markets(filters);
        params
    }

    /// Widget request: global filters plus the widget's mode parameters.
    /// `modes` holds the host's current mode values; missing ones take the
    /// configured defaults.
    pub fn for_widget(widget_id: &str, filters: &FilterState, modes: &Value, config: &DashboardConfig) -> Self {
        let mut params = Self::for_filters(filters);
        if let Some(defaults) = config.mode_params(widget_id) {
            for (key, default) in defaults {
                let value = modes
                    .get(key)
                    .and_then(Value::as_str)
                    .filter(|value| !value.is_empty())
                    .unwrap_or(default.as_str());
                params.push(key, value);
            }
        }
        params
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}
