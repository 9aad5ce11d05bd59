use serde::{Deserialize, Serialize};

/// Global filter selection attached to every widget request
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub protocol: String,
    pub pair: String,
    pub last_window: String,
    #[serde(default)]
    pub mkt1: String,
    #[serde(default)]
    pub mkt2: String,
}

impl FilterState {
    pub fn new(protocol: &str, pair: &str, last_window: &str) -> Self {
        Self {
            protocol: protocol.to_string(),
            pair: pair.to_string(),
            last_window: last_window.to_string(),
            mkt1: String::new(),
            mkt2: String::new(),
        }
    }

    /// The part of the selection that survives a page reload.
    pub fn persisted(&self) -> PersistedFilters {
        PersistedFilters {
            protocol: self.protocol.clone(),
            pair: self.pair.clone(),
            last_window: self.last_window.clone(),
        }
    }

    /// Overlays stored values; empty stored fields keep the current ones.
    pub fn restore(&mut self, stored: &PersistedFilters) {
        for (target, value) in [
            (&mut self.protocol, &stored.protocol),
            (&mut self.pair, &stored.pair),
            (&mut self.last_window, &stored.last_window),
        ] {
            if !value.is_empty() {
                target.clone_from(value);
            }
        }
    }
}

/// Stored filter record (`{protocol, pair, lastWindow}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedFilters {
    pub protocol: String,
    pub pair: String,
    pub last_window: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_record_uses_camel_case() {
        let filters = FilterState::new("orca", "USX-USDC", "24h");
        let json = serde_json::to_value(filters.persisted()).unwrap();
        assert_eq!(json, serde_json::json!({"protocol": "orca", "pair": "USX-USDC", "lastWindow": "24h"}));
    }

    #[test]
    fn restore_skips_empty_fields() {
        let mut filters = FilterState::new("raydium", "USX-USDC", "7d");
        filters.restore(&PersistedFilters { protocol: "orca".into(), pair: String::new(), last_window: "1h".into() });
        assert_eq!(filters, FilterState::new("orca", "USX-USDC", "1h"));
    }
}
