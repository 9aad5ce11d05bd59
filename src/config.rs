//! Dashboard configuration: linked groups, widget profiles, cache TTLs and
//! request defaults. Every field has a default matching the production
//! dashboard, so an empty JSON object is a complete config.

use crate::domain::chart::{Transform, WidgetProfile};
use crate::domain::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const DETAIL_TABLE_TTL_MS: i64 = 30_000;
pub const PAGE_ACTION_TTL_MS: i64 = 60_000;
pub const FILTER_STORAGE_KEY: &str = "dashboard.globalFilters.v1";
pub const FIXED_FOCUS_GROUP: &str = "linked-zoom-left";

const DISTRIBUTION_WIDGETS: [&str; 3] = [
    "swaps-sell-usx-distribution",
    "swaps-1h-net-sell-pressure-distribution",
    "swaps-distribution-toggle",
];

/// Named set of widgets that pan/zoom together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub id: String,
    pub members: Vec<String>,
}

impl GroupSpec {
    fn new(id: &str, members: &[&str]) -> Self {
        Self { id: id.to_string(), members: members.iter().map(|m| m.to_string()).collect() }
    }

    pub fn contains(&self, widget_id: &str) -> bool {
        self.members.iter().any(|member| member == widget_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkedGroupsConfig {
    /// Groups sharing one computed focus window.
    pub fixed_focus: Vec<GroupSpec>,
    /// Time-series groups that only mirror gestures.
    pub peer_timeseries: Vec<GroupSpec>,
}

impl Default for LinkedGroupsConfig {
    fn default() -> Self {
        Self {
            fixed_focus: vec![GroupSpec::new(
                FIXED_FOCUS_GROUP,
                &["liquidity-distribution", "liquidity-depth", "liquidity-change-heatmap"],
            )],
            peer_timeseries: vec![
                GroupSpec::new(
                    "linked-ts-right",
                    &[
                        "usdc-lp-flows",
                        "usdc-pool-share-concentration",
                        "trade-impact-toggle",
                        "swaps-flows-toggle",
                        "swaps-price-impacts",
                        "swaps-spread-volatility",
                        "swaps-ohlcv",
                    ],
                ),
                GroupSpec::new(
                    "linked-ts-kamino",
                    &[
                        "kamino-utilization-timeseries",
                        "kamino-ltv-hf-timeseries",
                        "kamino-liability-flows",
                        "kamino-liquidations",
                    ],
                ),
                exponent_group("mkt1"),
                exponent_group("mkt2"),
                GroupSpec::new("linked-ts-health-base", &["health-base-chart-events", "health-base-chart-accounts"]),
            ],
        }
    }
}

fn exponent_group(market: &str) -> GroupSpec {
    let members = [
        "exponent-pt-swap-flows",
        "exponent-token-strip-flows",
        "exponent-vault-sy-balance",
        "exponent-yt-staked",
        "exponent-yield-trading-liq",
        "exponent-realized-rates",
        "exponent-divergence",
    ]
    .map(|prefix| format!("{}-{}", prefix, market));
    GroupSpec { id: format!("linked-ts-exp-{}", market), members: members.to_vec() }
}

impl LinkedGroupsConfig {
    pub fn all_groups(&self) -> impl Iterator<Item = &GroupSpec> {
        self.fixed_focus.iter().chain(self.peer_timeseries.iter())
    }

    /// Memberships must be disjoint: a widget follows at most one group.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for group in self.all_groups() {
            if group.id.trim().is_empty() {
                return Err(ConfigError::InvalidParameter("linked group id is empty".to_string()));
            }
            for member in &group.members {
                if !seen.insert(member.as_str()) {
                    return Err(ConfigError::OverlappingGroups(member.clone()));
                }
            }
        }
        Ok(())
    }
}

/// Initial global filter selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterDefaults {
    pub protocol: String,
    pub pair: String,
    pub last_window: String,
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self { protocol: "raydium".to_string(), pair: "USX-USDC".to_string(), last_window: "7d".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    /// Prefix for relative detail-table and page-action endpoints.
    pub api_base_url: String,
    pub detail_table_ttl_ms: i64,
    pub page_action_ttl_ms: i64,
    pub filter_storage_key: String,
    pub default_filters: FilterDefaults,
    pub linked_groups: LinkedGroupsConfig,
    /// Transforms per widget id, on top of group-derived ones.
    pub widget_transforms: BTreeMap<String, Vec<Transform>>,
    /// Widget mode parameters and their defaults, e.g.
    /// `swaps-flows-toggle → {flow_mode: usx}`.
    pub mode_defaults: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        use Transform::*;

        let mut widget_transforms = BTreeMap::new();
        let mut set = |widget: &str, transforms: Vec<Transform>| {
            widget_transforms.insert(widget.to_string(), transforms);
        };
        set("swaps-flows-toggle", vec![TrimTrailingBucket, SwapsFlowAxes]);
        set("swaps-ohlcv", vec![TrimToTrailingWindow]);
        set("liquidity-depth", vec![DepthZeroFill, ComparableLiquidityLayout, TickReferenceMarks]);
        set("liquidity-distribution", vec![ComparableLiquidityLayout, DistributionStacking, TickReferenceMarks]);
        set("liquidity-change-heatmap", vec![ComparableLiquidityLayout, TickReferenceMarks]);
        set("usdc-lp-flows", vec![LpFlowSymmetricAxes]);
        set("swaps-price-impacts", vec![PriceImpactAxis]);
        set("swaps-spread-volatility", vec![SpreadVolatilityAxes]);
        for widget in DISTRIBUTION_WIDGETS {
            set(widget, vec![DistributionAxes]);
        }

        let mut mode_defaults = BTreeMap::new();
        let mut mode = |widget: &str, params: &[(&str, &str)]| {
            mode_defaults.insert(
                widget.to_string(),
                params.iter().map(|(key, value)| (key.to_string(), value.to_string())).collect(),
            );
        };
        mode("trade-impact-toggle", &[("impact_mode", "size")]);
        mode("swaps-flows-toggle", &[("flow_mode", "usx")]);
        mode("swaps-distribution-toggle", &[("distribution_mode", "sell-order")]);
        mode("swaps-ohlcv", &[("ohlcv_interval", "1d")]);
        mode("health-queue-chart", &[("health_schema", "dexes"), ("health_attribute", "Write Rate")]);
        mode("health-base-chart-events", &[("health_base_schema", "dexes")]);
        mode("health-base-chart-accounts", &[("health_base_schema", "dexes")]);

        Self {
            api_base_url: String::new(),
            detail_table_ttl_ms: DETAIL_TABLE_TTL_MS,
            page_action_ttl_ms: PAGE_ACTION_TTL_MS,
            filter_storage_key: FILTER_STORAGE_KEY.to_string(),
            default_filters: FilterDefaults::default(),
            linked_groups: LinkedGroupsConfig::default(),
            widget_transforms,
            mode_defaults,
        }
    }
}

impl DashboardConfig {
    /// Parses and validates a JSON config; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::InvalidJson(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.detail_table_ttl_ms <= 0 {
            return Err(ConfigError::InvalidParameter("detailTableTtlMs must be positive".to_string()));
        }
        if self.page_action_ttl_ms <= 0 {
            return Err(ConfigError::InvalidParameter("pageActionTtlMs must be positive".to_string()));
        }
        self.linked_groups.validate()
    }

    pub fn is_fixed_focus(&self, widget_id: &str) -> bool {
        self.linked_groups.fixed_focus.iter().any(|group| group.contains(widget_id))
    }

    pub fn is_peer_timeseries(&self, widget_id: &str) -> bool {
        self.linked_groups.peer_timeseries.iter().any(|group| group.contains(widget_id))
    }

    /// Resolved profile: configured transforms plus linked-timeseries
    /// formatting for peer-group members.
    pub fn profile_for(&self, widget_id: &str) -> WidgetProfile {
        let mut transforms = self.widget_transforms.get(widget_id).cloned().unwrap_or_default();
        if self.is_peer_timeseries(widget_id) {
            transforms.push(Transform::LinkedTimeseriesFormat);
        }
        WidgetProfile::new(transforms, self.is_fixed_focus(widget_id))
    }

    pub fn mode_params(&self, widget_id: &str) -> Option<&BTreeMap<String, String>> {
        self.mode_defaults.get(widget_id)
    }
}
