use futures::future::{self, LocalBoxFuture};
use risk_dashboard_wasm::application::{
    DashboardPorts, DisplaySink, ReflowReason, RenderTrigger, RendererFactory, RendererHandle, SelectionSource,
    ThemeSource, WidgetKind, WidgetRegistry,
};
use risk_dashboard_wasm::config::DashboardConfig;
use risk_dashboard_wasm::domain::chart::{Theme, ZoomWindow};
use risk_dashboard_wasm::domain::errors::{AppError, FetchError, FetchResult, RenderError};
use risk_dashboard_wasm::domain::filters::FilterState;
use risk_dashboard_wasm::domain::widget::{KpiText, SplitTableView, TableView};
use risk_dashboard_wasm::infrastructure::{DataFetcher, ManualClock};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    SetOption(String, Value, bool),
    Clear(String),
    Resize(String),
    Zoom(String, ZoomWindow),
    Join(String, String),
    ResetBindings(String),
    BindExpand(String),
}

type Calls = Rc<RefCell<Vec<Call>>>;
type Shown = Rc<RefCell<Vec<(String, String)>>>;

struct MockChart {
    id: String,
    calls: Calls,
    option: Option<Value>,
}

impl RendererHandle for MockChart {
    fn set_option(&mut self, option: &Value, not_merge: bool) {
        self.option = Some(option.clone());
        self.calls.borrow_mut().push(Call::SetOption(self.id.clone(), option.clone(), not_merge));
    }

    fn current_option(&self) -> Option<Value> {
        self.option.clone()
    }

    fn clear(&mut self) {
        self.option = None;
        self.calls.borrow_mut().push(Call::Clear(self.id.clone()));
    }

    fn resize(&mut self) {
        self.calls.borrow_mut().push(Call::Resize(self.id.clone()));
    }

    fn dispatch_zoom(&mut self, window: ZoomWindow) {
        self.calls.borrow_mut().push(Call::Zoom(self.id.clone(), window));
    }

    fn join_group(&mut self, group_id: &str) {
        self.calls.borrow_mut().push(Call::Join(self.id.clone(), group_id.to_string()));
    }

    fn reset_bindings(&mut self) {
        self.calls.borrow_mut().push(Call::ResetBindings(self.id.clone()));
    }

    fn bind_expand(&mut self, widget_id: &str) {
        self.calls.borrow_mut().push(Call::BindExpand(widget_id.to_string()));
    }
}

struct MockFactory {
    calls: Calls,
    missing: Vec<&'static str>,
    has_modal: bool,
}

impl MockFactory {
    fn chart(&self, id: &str) -> Box<dyn RendererHandle> {
        Box::new(MockChart { id: id.to_string(), calls: self.calls.clone(), option: None })
    }
}

impl RendererFactory for MockFactory {
    fn create(&self, widget_id: &str) -> Option<Box<dyn RendererHandle>> {
        (!self.missing.iter().any(|id| *id == widget_id)).then(|| self.chart(widget_id))
    }

    fn create_modal(&self) -> Option<Box<dyn RendererHandle>> {
        self.has_modal.then(|| self.chart("modal"))
    }
}

struct MockDisplay {
    shown: Shown,
}

impl MockDisplay {
    fn push(&self, widget_id: &str, text: String) {
        self.shown.borrow_mut().push((widget_id.to_string(), text));
    }
}

impl DisplaySink for MockDisplay {
    fn show_kpi(&self, widget_id: &str, text: &KpiText) {
        self.push(widget_id, format!("kpi {} | {}", text.primary, text.secondary));
    }

    fn show_table(&self, widget_id: &str, view: &TableView) {
        let text = match &view.message {
            Some(message) => format!("table message {}", message),
            None => format!("table {} rows", view.rows.len()),
        };
        self.push(widget_id, text);
    }

    fn show_split_table(&self, widget_id: &str, view: &SplitTableView) {
        self.push(widget_id, format!("split {} / {}", view.left_title, view.right_title));
    }

    fn show_status(&self, widget_id: &str, caption: &str) {
        self.push(widget_id, format!("status {}", caption));
    }

    fn show_error(&self, widget_id: &str, caption: &str) {
        self.push(widget_id, format!("alert {}", caption));
    }
}

struct SharedTheme(Rc<RefCell<Theme>>);

impl ThemeSource for SharedTheme {
    fn theme(&self) -> Theme {
        self.0.borrow().clone()
    }
}

struct SharedSelection(Rc<RefCell<FilterState>>);

impl SelectionSource for SharedSelection {
    fn filters(&self) -> FilterState {
        self.0.borrow().clone()
    }
}

struct OfflineFetcher;

impl DataFetcher for OfflineFetcher {
    fn fetch_json<'a>(&'a self, _url: &'a str) -> LocalBoxFuture<'a, FetchResult<Value>> {
        Box::pin(future::ready(Err(FetchError::RequestFailed("offline".to_string()))))
    }
}

struct Harness {
    registry: WidgetRegistry,
    calls: Calls,
    shown: Shown,
    theme: Rc<RefCell<Theme>>,
    filters: Rc<RefCell<FilterState>>,
}

impl Harness {
    fn new() -> Self {
        Self::with_factory(Vec::new(), true)
    }

    fn with_factory(missing: Vec<&'static str>, has_modal: bool) -> Self {
        let calls = Calls::default();
        let shown = Shown::default();
        let theme = Rc::new(RefCell::new(Theme::dark()));
        let filters = Rc::new(RefCell::new(FilterState::new("raydium", "USX-USDC", "7d")));
        let ports = DashboardPorts {
            renderers: Box::new(MockFactory { calls: calls.clone(), missing, has_modal }),
            display: Box::new(MockDisplay { shown: shown.clone() }),
            theme: Box::new(SharedTheme(theme.clone())),
            selection: Box::new(SharedSelection(filters.clone())),
            fetcher: Rc::new(OfflineFetcher),
            clock: Arc::new(ManualClock::new(1_767_225_600_000)),
        };
        Self { registry: WidgetRegistry::new(DashboardConfig::default(), ports), calls, shown, theme, filters }
    }

    fn shown_for(&self, widget_id: &str) -> Vec<String> {
        self.shown.borrow().iter().filter(|(id, _)| id == widget_id).map(|(_, text)| text.clone()).collect()
    }

    fn calls_for(&self, widget_id: &str) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| match call {
                Call::SetOption(id, ..)
                | Call::Clear(id)
                | Call::Resize(id)
                | Call::Zoom(id, _)
                | Call::Join(id, _)
                | Call::ResetBindings(id)
                | Call::BindExpand(id) => id == widget_id,
            })
            .cloned()
            .collect()
    }

    fn last_option(&self, widget_id: &str) -> Option<Value> {
        self.calls_for(widget_id).into_iter().rev().find_map(|call| match call {
            Call::SetOption(_, option, _) => Some(option),
            _ => None,
        })
    }
}

fn envelope(data: Value) -> String {
    json!({"status": "success", "data": data, "metadata": {"generated_at": "2026-01-01T12:34:56Z"}}).to_string()
}

fn spike_chart(spike_at: usize) -> Value {
    let x: Vec<String> = (0..40).map(|i| format!("{:.4}", 0.98 + i as f64 * 0.001)).collect();
    let data: Vec<f64> = (0..40).map(|i| if i == spike_at { 80.0 } else { 0.0 }).collect();
    json!({"kind": "chart", "chart": "line-bar", "x": x, "series": [{"name": "Liquidity", "type": "bar", "data": data}]})
}

fn hourly_chart() -> Value {
    json!({
        "kind": "chart",
        "x": ["2025-12-31T20:00:00Z", "2025-12-31T21:00:00Z", "2025-12-31T22:00:00Z"],
        "series": [{"name": "Events", "data": [1, 2, 3]}]
    })
}

#[test]
fn kpi_response_updates_text_and_caption() {
    let mut harness = Harness::new();
    let raw = envelope(json!({"kind": "kpi", "primary": 12.5, "secondary": null}));

    harness.registry.render_response("kpi-tvl", &raw, None).expect("kpi renders");

    let shown = harness.shown_for("kpi-tvl");
    assert_eq!(shown.len(), 2);
    assert!(shown[0].starts_with("kpi "));
    assert_eq!(shown[1], "status updated 12:34:56");
}

#[test]
fn envelope_failures_become_inline_errors() {
    let mut harness = Harness::new();

    assert!(harness.registry.render_response("a", "", None).is_err());
    assert!(harness.registry.render_response("b", r#"{"status":"error","detail":"boom"}"#, None).is_err());
    assert!(harness.registry.render_response("c", r#"{"status":"error"}"#, None).is_err());
    assert!(harness.registry.render_response("d", r#"{"status":"success","data":[1,2]}"#, None).is_err());

    assert_eq!(harness.shown_for("a"), vec!["alert error: no response from API"]);
    assert_eq!(harness.shown_for("b"), vec!["alert error: boom"]);
    assert_eq!(harness.shown_for("c"), vec!["alert error: request failed"]);
    assert_eq!(harness.shown_for("d"), vec!["alert error: payload is not an object"]);
}

#[test]
fn chart_render_joins_group_and_opens_on_focus() {
    let mut harness = Harness::new();
    harness.registry.render_response("liquidity-depth", &envelope(spike_chart(20)), None).expect("chart renders");

    let calls = harness.calls_for("liquidity-depth");
    assert!(matches!(calls[0], Call::ResetBindings(_)));
    assert!(matches!(calls[1], Call::SetOption(_, _, true)));
    assert_eq!(calls[2], Call::Join("liquidity-depth".to_string(), "linked-zoom-left".to_string()));
    let Call::Zoom(_, window) = calls[3] else {
        panic!("fixed-focus member should jump to the focus window, got {:?}", calls[3]);
    };
    assert!(window.width() >= 22.0);
    assert_eq!(calls[4], Call::BindExpand("liquidity-depth".to_string()));

    let option = harness.last_option("liquidity-depth").expect("option applied");
    assert_eq!(option["dataZoom"][0]["start"], json!(window.start));
    assert_eq!(harness.registry.chart_count(), 1);
}

#[test]
fn focus_window_is_shared_across_the_group() {
    let mut harness = Harness::new();
    harness.registry.render_response("liquidity-depth", &envelope(spike_chart(20)), None).expect("first");
    // same axis signature, different data: the cached window is reused
    harness.registry.render_response("liquidity-distribution", &envelope(spike_chart(5)), None).expect("second");

    let zoom_of = |id: &str| {
        harness.calls_for(id).into_iter().find_map(|call| match call {
            Call::Zoom(_, window) => Some(window),
            _ => None,
        })
    };
    assert!(zoom_of("liquidity-depth").is_some());
    assert_eq!(zoom_of("liquidity-depth"), zoom_of("liquidity-distribution"));
}

#[test]
fn missing_container_is_a_silent_no_op() {
    let mut harness = Harness::with_factory(vec!["liquidity-depth"], true);
    let result = harness.registry.render_response("liquidity-depth", &envelope(spike_chart(3)), None);

    assert!(result.is_ok());
    assert_eq!(harness.registry.chart_count(), 0);
    assert!(harness.calls.borrow().is_empty());
    assert!(harness.shown_for("liquidity-depth").iter().all(|text| !text.starts_with("alert")));
}

#[test]
fn responses_issued_before_a_reset_are_dropped() {
    let mut harness = Harness::new();
    let ticket = harness.registry.begin_request("kamino-liquidations", false).expect("visible");

    harness.registry.reset_all(&[("kamino-liquidations".to_string(), WidgetKind::Chart)]);

    let result = harness.registry.render(RenderTrigger::new("kamino-liquidations", hourly_chart()).with_ticket(ticket));
    assert!(matches!(result, Err(AppError::Render(RenderError::StaleResponse(_)))));
    assert_eq!(harness.registry.chart_count(), 0);

    let fresh = harness.registry.begin_request("kamino-liquidations", false).expect("visible");
    harness
        .registry
        .render(RenderTrigger::new("kamino-liquidations", hourly_chart()).with_ticket(fresh))
        .expect("current ticket renders");
    assert_eq!(harness.registry.chart_count(), 1);
}

#[test]
fn filter_change_alone_makes_a_ticket_stale() {
    let mut harness = Harness::new();
    let ticket = harness.registry.begin_request("kpi-tvl", false).expect("visible");
    harness.filters.borrow_mut().pair = "USX-USDT".to_string();

    let trigger = RenderTrigger::new("kpi-tvl", json!({"kind": "kpi", "primary": 1})).with_ticket(ticket);
    assert!(harness.registry.render(trigger).is_err());
    assert!(harness.shown_for("kpi-tvl").is_empty());
}

#[test]
fn hidden_document_skips_requests() {
    let harness = Harness::new();
    assert_eq!(harness.registry.begin_request("kpi-tvl", true), None);
    let ticket = harness.registry.begin_request("kpi-tvl", false).expect("visible");
    assert_eq!(ticket.epoch, 0);
    assert_eq!(ticket.filters.protocol, "raydium");
}

#[test]
fn reset_all_returns_widgets_to_loading_state() {
    let mut harness = Harness::new();
    harness.registry.render_response("kamino-liquidations", &envelope(hourly_chart()), None).expect("chart");
    harness.shown.borrow_mut().clear();

    harness.registry.reset_all(&[
        ("kpi-tvl".to_string(), WidgetKind::Kpi),
        ("swaps-top-trades".to_string(), WidgetKind::from_tag("table")),
        ("kamino-liquidations".to_string(), WidgetKind::from_tag("anything-else")),
    ]);

    assert_eq!(harness.registry.epoch(), 1);
    assert_eq!(harness.shown_for("kpi-tvl"), vec!["status loading...", "kpi -- | "]);
    assert_eq!(harness.shown_for("swaps-top-trades"), vec!["status loading...", "table 0 rows"]);
    assert_eq!(harness.shown_for("kamino-liquidations"), vec!["status loading..."]);
    assert_eq!(harness.calls_for("kamino-liquidations").last(), Some(&Call::Clear("kamino-liquidations".to_string())));
    // instances are cleared, not destroyed
    assert_eq!(harness.registry.chart_count(), 1);
}

#[test]
fn theme_change_rebuilds_from_stored_payloads() {
    let mut harness = Harness::new();
    harness.registry.render_response("kamino-liquidations", &envelope(hourly_chart()), None).expect("chart");
    let dark = harness.last_option("kamino-liquidations").expect("dark option");

    *harness.theme.borrow_mut() = Theme::light();
    harness.registry.reflow(ReflowReason::ThemeChanged);

    let light = harness.last_option("kamino-liquidations").expect("light option");
    assert_eq!(dark["color"][0], json!("#4bb7ff"));
    assert_eq!(light["color"][0], json!("#0a78f0"));
    assert_eq!(light["xAxis"][0]["data"], dark["xAxis"][0]["data"]);
}

#[test]
fn user_zoom_is_mirrored_to_peers_only() {
    let mut harness = Harness::new();
    for id in ["health-base-chart-events", "health-base-chart-accounts", "kpi-chart-elsewhere"] {
        harness.registry.render_response(id, &envelope(hourly_chart()), None).expect("chart");
    }
    harness.calls.borrow_mut().clear();

    let window = ZoomWindow::new(30.0, 70.0).expect("valid window");
    harness.registry.on_user_zoom("health-base-chart-events", window);

    assert_eq!(*harness.calls.borrow(), vec![Call::Zoom("health-base-chart-accounts".to_string(), window)]);
}

#[test]
fn modal_mirrors_the_source_chart() {
    let mut harness = Harness::new();
    assert!(!harness.registry.open_modal("kamino-liquidations"));

    harness.registry.render_response("kamino-liquidations", &envelope(hourly_chart()), None).expect("chart");
    assert!(harness.registry.open_modal("kamino-liquidations"));
    assert_eq!(harness.registry.modal_widget(), Some("kamino-liquidations"));
    assert_eq!(harness.last_option("modal"), harness.last_option("kamino-liquidations"));

    harness.registry.reflow(ReflowReason::Resize);
    assert_eq!(harness.calls_for("modal").last(), Some(&Call::Resize("modal".to_string())));

    harness.registry.close_modal();
    let modal_calls = harness.calls_for("modal").len();
    harness.registry.render_response("kamino-liquidations", &envelope(hourly_chart()), None).expect("again");
    assert_eq!(harness.calls_for("modal").len(), modal_calls);
}

#[test]
fn modal_without_container_stays_closed() {
    let mut harness = Harness::with_factory(Vec::new(), false);
    harness.registry.render_response("kamino-liquidations", &envelope(hourly_chart()), None).expect("chart");
    assert!(!harness.registry.open_modal("kamino-liquidations"));
    assert_eq!(harness.registry.modal_widget(), None);
}

#[test]
fn tables_render_with_empty_row_message() {
    let mut harness = Harness::new();
    let raw = envelope(json!({"kind": "table", "columns": [{"key": "a", "label": "A"}], "rows": []}));
    harness.registry.render_response("swaps-top-trades", &raw, None).expect("table");
    assert_eq!(harness.shown_for("swaps-top-trades")[0], "table message No rows returned");

    let raw = envelope(json!({
        "kind": "table-split",
        "columns": [{"key": "a"}],
        "left_title": "USX bids",
        "right_title": "USDC asks",
        "left_rows": [{"a": 1}],
        "right_rows": []
    }));
    harness.filters.borrow_mut().pair = "USDG-USDT".to_string();
    harness.registry.render_response("liquidity-split", &raw, None).expect("split");
    assert_eq!(harness.shown_for("liquidity-split")[0], "split USDG bids / USDT asks");
}
