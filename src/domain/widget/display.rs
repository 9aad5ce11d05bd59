//! Text rendering of KPI and table widgets.

use super::payload::{KpiPayload, SplitTablePayload, TableColumn, TablePayload, TableRow};
use crate::domain::formatting::{
    PLACEHOLDER, finite_number, format_bps_2dp, format_grouped, format_number, format_signed,
    pair_aware_label, to_fixed, value_text,
};
use serde::Serialize;
use serde_json::Value;

const DEPTH_TABLE_ID: &str = "liquidity-depth-table";
const RED_FLAG_COLUMN: &str = "is_red";
pub const EMPTY_TABLE_MESSAGE: &str = "No rows returned";

/// Primary font step, picked from how many ` / `-separated values the KPI shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum KpiSize {
    Large,
    Medium,
    Small,
}

impl KpiSize {
    pub fn for_text(text: &str) -> Self {
        match text.split(" / ").count() {
            0 | 1 => KpiSize::Large,
            2 => KpiSize::Medium,
            _ => KpiSize::Small,
        }
    }

    pub fn font_px(&self) -> u32 {
        match self {
            KpiSize::Large => 28,
            KpiSize::Medium => 22,
            KpiSize::Small => 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiText {
    pub primary: String,
    pub secondary: String,
    pub size: KpiSize,
}

impl KpiText {
    pub fn new(primary: String, secondary: String) -> Self {
        let size = KpiSize::for_text(&primary);
        Self { primary, secondary, size }
    }

    /// `--` with no caption, shown while a filter change reloads.
    pub fn loading() -> Self {
        Self::new(PLACEHOLDER.to_string(), String::new())
    }
}

fn present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}

fn fixed4_or_placeholder(value: &Value) -> String {
    finite_number(value)
        .map(|number| to_fixed(number, 4))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn kpi_text(widget_id: &str, data: &KpiPayload) -> KpiText {
    let (primary, secondary) = match widget_id {
        "kpi-impact-500k" | "kpi-largest-impact" | "kpi-average-impact" => (
            format_signed(finite_number(&data.primary), " bps"),
            if present(&data.secondary) {
                format!("Size: {}", format_number(&data.secondary))
            } else {
                String::new()
            },
        ),
        "kpi-pool-balance" => (
            format!("{}%", format_number(&data.primary)),
            format!("{}%", format_number(&data.secondary)),
        ),
        "kpi-reserves" => (
            format!("{}m", format_number(&data.primary)),
            format!("{}m", format_number(&data.secondary)),
        ),
        "kpi-price-min-max" => (
            format!("{} / {}", fixed4_or_placeholder(&data.primary), fixed4_or_placeholder(&data.secondary)),
            "min / max".to_string(),
        ),
        "kpi-vwap-buy-sell" => (
            format!("{} / {}", fixed4_or_placeholder(&data.primary), fixed4_or_placeholder(&data.secondary)),
            "buy / sell".to_string(),
        ),
        "kpi-vwap-spread" => (format_bps_2dp(finite_number(&data.primary)), String::new()),
        "kpi-largest-usx-sell" | "kpi-largest-usx-buy" | "kpi-max-1h-sell-pressure"
        | "kpi-max-1h-buy-pressure" => (
            format_number(&data.primary),
            format!("Est impact: {}", format_bps_2dp(finite_number(&data.secondary))),
        ),
        _ => (
            format_number(&data.primary),
            if present(&data.secondary) {
                format_number(&data.secondary)
            } else {
                String::new()
            },
        ),
    };
    KpiText::new(primary, secondary)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableViewRow {
    pub cells: Vec<String>,
    pub flagged: bool,
}

/// Display-ready table: visible column labels, formatted cells and an
/// optional message shown instead of the rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<TableViewRow>,
    pub message: Option<String>,
}

impl TableView {
    pub fn empty() -> Self {
        Self { headers: Vec::new(), rows: Vec::new(), message: None }
    }

    pub fn message(text: &str) -> Self {
        Self { headers: Vec::new(), rows: Vec::new(), message: Some(text.to_string()) }
    }

    pub fn build(widget_id: &str, columns: &[TableColumn], rows: &[TableRow], pair: &str) -> Self {
        if rows.is_empty() {
            return Self::message(EMPTY_TABLE_MESSAGE);
        }

        let is_depth_table = widget_id == DEPTH_TABLE_ID;
        let flags_rows = widget_id.starts_with("health-");
        let visible: Vec<TableColumn> = columns
            .iter()
            .filter(|column| column.key != RED_FLAG_COLUMN)
            .map(|column| if is_depth_table { relabel_depth_column(column) } else { column.clone() })
            .collect();

        let headers = visible.iter().map(|column| pair_aware_label(&column.label, pair)).collect();
        let rows = rows
            .iter()
            .map(|row| {
                let cells = visible
                    .iter()
                    .map(|column| {
                        let raw = row.get(&column.key).unwrap_or(&Value::Null);
                        if is_depth_table {
                            format_depth_value(&column.key, raw)
                        } else {
                            match raw {
                                Value::String(text) => pair_aware_label(text, pair),
                                other => value_text(other),
                            }
                        }
                    })
                    .collect();
                let flagged = flags_rows && row.get(RED_FLAG_COLUMN).is_some_and(present);
                TableViewRow { cells, flagged }
            })
            .collect();

        Self { headers, rows, message: None }
    }

    pub fn from_table(widget_id: &str, table: &TablePayload, pair: &str) -> Self {
        Self::build(widget_id, &table.columns, &table.rows, pair)
    }

    /// Render a page-action response: `data.data` when present, else `data`.
    ///
    /// Cells are shown verbatim (no pair relabelling); a response without
    /// `columns` and `rows` renders as "No data.".
    pub fn from_page_action(response: &Value) -> Self {
        let table = response.get("data").filter(|data| !data.is_null()).unwrap_or(response);
        let (Some(columns), Some(rows)) = (
            table.get("columns").filter(|c| c.is_array()),
            table.get("rows").filter(|r| r.is_array()),
        ) else {
            return Self::message("No data.");
        };

        let columns = super::payload::columns(Some(columns));
        let headers = columns.iter().map(|column| column.label.clone()).collect();
        let rows = super::payload::rows(Some(rows))
            .iter()
            .map(|row| TableViewRow {
                cells: columns
                    .iter()
                    .map(|column| row.get(&column.key).map(value_text).unwrap_or_default())
                    .collect(),
                flagged: false,
            })
            .collect();
        Self { headers, rows, message: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitTableView {
    pub left_title: String,
    pub right_title: String,
    pub left: TableView,
    pub right: TableView,
}

impl SplitTableView {
    pub fn build(widget_id: &str, table: &SplitTablePayload, pair: &str) -> Self {
        Self {
            left_title: pair_aware_label(&table.left_title, pair),
            right_title: pair_aware_label(&table.right_title, pair),
            left: TableView::build(widget_id, &table.columns, &table.left_rows, pair),
            right: TableView::build(widget_id, &table.columns, &table.right_rows, pair),
        }
    }

    pub fn empty() -> Self {
        Self {
            left_title: String::new(),
            right_title: String::new(),
            left: TableView::empty(),
            right: TableView::empty(),
        }
    }
}

fn relabel_depth_column(column: &TableColumn) -> TableColumn {
    let label = match column.key.as_str() {
        "bps_target" => "Δ (bps)".to_string(),
        "price_change_pct" => "Δ (%)".to_string(),
        _ => column.label.clone(),
    };
    TableColumn { key: column.key.clone(), label }
}

fn format_depth_value(key: &str, value: &Value) -> String {
    if value.is_null() || value.as_str() == Some("") {
        return String::new();
    }
    match finite_number(value) {
        Some(number) if matches!(key, "liquidity_in_band" | "swap_size_equivalent" | "pct_of_reserve") => {
            format_grouped(number, 0)
        }
        _ => value_text(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kpi(primary: Value, secondary: Value) -> KpiPayload {
        KpiPayload { primary, secondary }
    }

    #[test]
    fn impact_kpis_are_signed_bps() {
        let text = kpi_text("kpi-impact-500k", &kpi(json!(1.23456), json!(500000)));
        assert_eq!(text.primary, "+1.235 bps");
        assert_eq!(text.secondary, "Size: 500,000");
        assert_eq!(text.size, KpiSize::Large);

        let missing = kpi_text("kpi-average-impact", &kpi(Value::Null, Value::Null));
        assert_eq!(missing.primary, "--");
        assert_eq!(missing.secondary, "");
    }

    #[test]
    fn paired_kpis_shrink_font() {
        let text = kpi_text("kpi-price-min-max", &kpi(json!(0.99871), json!("bad")));
        assert_eq!(text.primary, "0.9987 / --");
        assert_eq!(text.secondary, "min / max");
        assert_eq!(text.size, KpiSize::Medium);
        assert_eq!(text.size.font_px(), 22);
    }

    #[test]
    fn pressure_kpis_show_estimated_impact() {
        let text = kpi_text("kpi-max-1h-sell-pressure", &kpi(json!(1250000.5), json!(3.456)));
        assert_eq!(text.primary, "1,250,000.5");
        assert_eq!(text.secondary, "Est impact: 3.46 bps");
    }

    #[test]
    fn depth_table_relabels_and_rounds() {
        let columns = vec![
            TableColumn { key: "bps_target".into(), label: "bps".into() },
            TableColumn { key: "liquidity_in_band".into(), label: "USX in band".into() },
        ];
        let row = json!({"bps_target": 25, "liquidity_in_band": 1234567.8});
        let rows = vec![row.as_object().cloned().unwrap()];
        let view = TableView::build("liquidity-depth-table", &columns, &rows, "SOL-USDT");
        assert_eq!(view.headers, vec!["Δ (bps)", "SOL in band"]);
        assert_eq!(view.rows[0].cells, vec!["25", "1,234,568"]);
    }

    #[test]
    fn health_rows_are_flagged_and_flag_column_hidden() {
        let columns = vec![
            TableColumn { key: "name".into(), label: "Name".into() },
            TableColumn { key: "is_red".into(), label: "Red".into() },
        ];
        let rows = vec![
            json!({"name": "queue", "is_red": true}).as_object().cloned().unwrap(),
            json!({"name": "other", "is_red": false}).as_object().cloned().unwrap(),
        ];
        let view = TableView::build("health-queue", &columns, &rows, "USX-USDC");
        assert_eq!(view.headers, vec!["Name"]);
        assert!(view.rows[0].flagged);
        assert!(!view.rows[1].flagged);

        let plain = TableView::build("other-table", &columns, &rows, "USX-USDC");
        assert!(!plain.rows[0].flagged);
    }

    #[test]
    fn empty_rows_show_message() {
        let view = TableView::build("any", &[], &[], "USX-USDC");
        assert_eq!(view.message.as_deref(), Some("No rows returned"));
    }

    #[test]
    fn page_action_unwraps_nested_data() {
        let response = json!({
            "status": "success",
            "data": {"columns": [{"key": "term", "label": "Term"}], "rows": [{"term": "LTV"}, {"term": null}]}
        });
        let view = TableView::from_page_action(&response);
        assert_eq!(view.headers, vec!["Term"]);
        assert_eq!(view.rows[1].cells, vec![""]);
        assert_eq!(TableView::from_page_action(&json!({})).message.as_deref(), Some("No data."));
    }
}
