//! Widget state registry: the dashboard context every host event goes
//! through. It owns the live chart instances with their last payloads,
//! the linked-group coordinator, the modal mirror and the on-demand table
//! services.

use super::coordinator::LinkedGroupCoordinator;
use super::detail_table::{DetailTableService, PageActionService};
use super::modal::ModalMirror;
use super::ports::{DisplaySink, RendererFactory, RendererHandle, SelectionSource, ThemeSource};
use super::requests::{RequestParams, RequestTicket};
use crate::config::DashboardConfig;
use crate::domain::{
    chart::{BuildContext, ZoomWindow, build_chart_option},
    errors::{AppResult, RenderError},
    filters::FilterState,
    logging::{LogComponent, LogLevel, TimeProvider, get_logger},
    widget::{ChartPayload, KpiText, SplitTableView, TableView, WidgetPayload, kpi_text},
};
use crate::infrastructure::http::DataFetcher;
use crate::time_utils::{format_clock_time, parse_iso_millis};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::Arc;
use strum::{AsRefStr, EnumIter, EnumString};

pub const LOADING_CAPTION: &str = "loading...";

/// Widget kind as declared by the host page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    Kpi,
    Table,
    TableSplit,
    Chart,
}

impl WidgetKind {
    /// Anything that is not a KPI or table is a chart.
    pub fn from_tag(tag: &str) -> Self {
        Self::from_str(tag).unwrap_or(WidgetKind::Chart)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflowReason {
    Resize,
    ThemeChanged,
}

/// A widget response ready to render
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderTrigger {
    pub widget_id: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub ticket: Option<RequestTicket>,
}

impl RenderTrigger {
    pub fn new(widget_id: &str, payload: Value) -> Self {
        Self { widget_id: widget_id.to_string(), payload, generated_at: None, ticket: None }
    }

    pub fn with_ticket(mut self, ticket: RequestTicket) -> Self {
        self.ticket = Some(ticket);
        self
    }

    /// Unwraps a raw `{status, data, metadata}` widget response.
    pub fn from_envelope(widget_id: &str, raw: &str, ticket: Option<RequestTicket>) -> Result<Self, RenderError> {
        if raw.trim().is_empty() {
            return Err(RenderError::Upstream("no response from API".to_string()));
        }
        let envelope: Value = serde_json::from_str(raw).map_err(|e| RenderError::Upstream(e.to_string()))?;
        if envelope.get("status").and_then(Value::as_str) != Some("success") {
            let detail = envelope
                .get("detail")
                .and_then(Value::as_str)
                .filter(|detail| !detail.is_empty())
                .unwrap_or("request failed");
            return Err(RenderError::Upstream(detail.to_string()));
        }
        Ok(Self {
            widget_id: widget_id.to_string(),
            payload: envelope.get("data").cloned().unwrap_or(Value::Null),
            generated_at: envelope
                .pointer("/metadata/generated_at")
                .and_then(Value::as_str)
                .map(str::to_string),
            ticket,
        })
    }
}

/// Live chart instance and the payload it was last built from
pub struct WidgetEntry {
    pub renderer: Box<dyn RendererHandle>,
    pub payload: ChartPayload,
}

/// Host-side collaborators the registry is wired to
pub struct DashboardPorts {
    pub renderers: Box<dyn RendererFactory>,
    pub display: Box<dyn DisplaySink>,
    pub theme: Box<dyn ThemeSource>,
    pub selection: Box<dyn SelectionSource>,
    pub fetcher: Rc<dyn DataFetcher>,
    pub clock: Arc<dyn TimeProvider>,
}

pub struct WidgetRegistry {
    config: DashboardConfig,
    entries: HashMap<String, WidgetEntry>,
    coordinator: LinkedGroupCoordinator,
    modal: ModalMirror,
    detail_tables: DetailTableService,
    page_actions: PageActionService,
    renderers: Box<dyn RendererFactory>,
    display: Box<dyn DisplaySink>,
    theme: Box<dyn ThemeSource>,
    selection: Box<dyn SelectionSource>,
    clock: Arc<dyn TimeProvider>,
    epoch: u64,
}

impl WidgetRegistry {
    pub fn new(config: DashboardConfig, ports: DashboardPorts) -> Self {
        let detail_tables = DetailTableService::new(
            ports.fetcher.clone(),
            &config.api_base_url,
            config.detail_table_ttl_ms,
            ports.clock.clone(),
        );
        let page_actions =
            PageActionService::new(ports.fetcher, &config.api_base_url, config.page_action_ttl_ms, ports.clock.clone());

        Self {
            coordinator: LinkedGroupCoordinator::new(config.linked_groups.clone()),
            config,
            entries: HashMap::new(),
            modal: ModalMirror::new(),
            detail_tables,
            page_actions,
            renderers: ports.renderers,
            display: ports.display,
            theme: ports.theme,
            selection: ports.selection,
            clock: ports.clock,
            epoch: 0,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn filters(&self) -> FilterState {
        self.selection.filters()
    }

    pub fn entry(&self, widget_id: &str) -> Option<&WidgetEntry> {
        self.entries.get(widget_id)
    }

    pub fn chart_count(&self) -> usize {
        self.entries.len()
    }

    pub fn modal_widget(&self) -> Option<&str> {
        self.modal.widget_id()
    }

    pub fn detail_tables(&self) -> DetailTableService {
        self.detail_tables.clone()
    }

    pub fn page_actions(&self) -> PageActionService {
        self.page_actions.clone()
    }

    /// Tags a request about to be issued. Background polling is skipped
    /// while the document is hidden.
    pub fn begin_request(&self, widget_id: &str, hidden: bool) -> Option<RequestTicket> {
        if hidden {
            get_logger().debug(
                LogComponent::Application("Registry"),
                &format!("💤 Skipping {} refresh: document hidden", widget_id),
            );
            return None;
        }
        Some(RequestTicket { epoch: self.epoch, filters: self.selection.filters() })
    }

    /// Query parameters for a widget request under the current filters.
    pub fn request_params(&self, widget_id: &str, modes: &Value) -> RequestParams {
        RequestParams::for_widget(widget_id, &self.selection.filters(), modes, &self.config)
    }

    /// Renders a raw widget response; envelope failures become the
    /// widget's error caption.
    pub fn render_response(&mut self, widget_id: &str, raw: &str, ticket: Option<RequestTicket>) -> AppResult<()> {
        match RenderTrigger::from_envelope(widget_id, raw, ticket) {
            Ok(trigger) => self.render(trigger),
            Err(error) => {
                self.report_error(widget_id, &error.to_string());
                Err(error.into())
            }
        }
    }

    pub fn render(&mut self, trigger: RenderTrigger) -> AppResult<()> {
        let widget_id = trigger.widget_id.as_str();
        let filters = self.selection.filters();

        if let Some(ticket) = &trigger.ticket {
            if !ticket.is_current(self.epoch, &filters) {
                get_logger().widget(
                    LogLevel::Info,
                    LogComponent::Application("Registry"),
                    widget_id,
                    &format!("🗑️ Dropping stale response (epoch {} vs {})", ticket.epoch, self.epoch),
                );
                return Err(RenderError::StaleResponse(widget_id.to_string()).into());
            }
        }

        let payload = match WidgetPayload::from_value(&trigger.payload) {
            Ok(payload) => payload,
            Err(error) => {
                get_logger().widget(
                    LogLevel::Error,
                    LogComponent::Application("Registry"),
                    widget_id,
                    &format!("❌ Payload rejected: {}", error),
                );
                self.report_error(widget_id, &error.to_string());
                return Err(error.into());
            }
        };

        match payload {
            WidgetPayload::Kpi(kpi) => self.display.show_kpi(widget_id, &kpi_text(widget_id, &kpi)),
            WidgetPayload::Table(table) => {
                self.display.show_table(widget_id, &TableView::from_table(widget_id, &table, &filters.pair))
            }
            WidgetPayload::TableSplit(table) => {
                self.display.show_split_table(widget_id, &SplitTableView::build(widget_id, &table, &filters.pair))
            }
            WidgetPayload::Chart(chart) => self.render_chart(widget_id, chart, &filters),
        }

        let updated_ms = trigger
            .generated_at
            .as_deref()
            .and_then(parse_iso_millis)
            .unwrap_or_else(|| self.clock.now_ms());
        self.display.show_status(widget_id, &format!("updated {}", format_clock_time(updated_ms)));
        Ok(())
    }

    fn build_option(&mut self, widget_id: &str, payload: &ChartPayload, filters: &FilterState) -> Value {
        let theme = self.theme.theme();
        let profile = self.config.profile_for(widget_id);
        let focus = self.coordinator.focus_window_for(widget_id, payload);
        let ctx = BuildContext {
            theme: &theme,
            pair: &filters.pair,
            last_window: &filters.last_window,
            now_ms: self.clock.now_ms(),
            profile: &profile,
            focus,
        };
        build_chart_option(widget_id, payload, &ctx).to_value()
    }

    fn render_chart(&mut self, widget_id: &str, payload: ChartPayload, filters: &FilterState) {
        if !self.entries.contains_key(widget_id) {
            let Some(renderer) = self.renderers.create(widget_id) else {
                get_logger().debug(
                    LogComponent::Application("Registry"),
                    &format!("🫥 No chart container for {}", widget_id),
                );
                return;
            };
            self.entries.insert(widget_id.to_string(), WidgetEntry { renderer, payload: payload.clone() });
        }

        let option = self.build_option(widget_id, &payload, filters);
        let focus = self.coordinator.current_focus(widget_id);
        let Some(entry) = self.entries.get_mut(widget_id) else {
            return;
        };
        entry.renderer.reset_bindings();
        entry.renderer.set_option(&option, true);
        self.coordinator.attach(widget_id, entry.renderer.as_mut(), focus);
        entry.renderer.bind_expand(widget_id);
        entry.payload = payload;
        self.modal.sync(widget_id, entry.renderer.as_ref());

        get_logger().debug(
            LogComponent::Application("Registry"),
            &format!("📊 Rendered {} ({} categories)", widget_id, entry.payload.x.len()),
        );
    }

    /// Inline error caption for one widget; other widgets are untouched.
    pub fn report_error(&self, widget_id: &str, message: &str) {
        self.display.show_error(widget_id, &format!("error: {}", message));
    }

    /// Filter change: every widget goes back to its loading state and
    /// responses issued before this call become stale.
    pub fn reset_all(&mut self, widgets: &[(String, WidgetKind)]) {
        self.epoch += 1;
        self.coordinator.reset();
        for entry in self.entries.values_mut() {
            entry.renderer.clear();
        }

        for (widget_id, kind) in widgets {
            self.display.show_status(widget_id, LOADING_CAPTION);
            match kind {
                WidgetKind::Kpi => self.display.show_kpi(widget_id, &KpiText::loading()),
                WidgetKind::Table => self.display.show_table(widget_id, &TableView::empty()),
                WidgetKind::TableSplit => self.display.show_split_table(widget_id, &SplitTableView::empty()),
                WidgetKind::Chart => {}
            }
        }

        get_logger().info(
            LogComponent::Application("Registry"),
            &format!("🔄 Reset {} widgets, epoch {}", widgets.len(), self.epoch),
        );
    }

    pub fn reflow(&mut self, reason: ReflowReason) {
        match reason {
            ReflowReason::Resize => {
                for entry in self.entries.values_mut() {
                    entry.renderer.resize();
                }
                self.modal.resize();
            }
            ReflowReason::ThemeChanged => {
                let filters = self.selection.filters();
                let widget_ids: Vec<String> = self.entries.keys().cloned().collect();
                for widget_id in &widget_ids {
                    let Some(payload) = self.entries.get(widget_id).map(|entry| entry.payload.clone()) else {
                        continue;
                    };
                    let option = self.build_option(widget_id, &payload, &filters);
                    if let Some(entry) = self.entries.get_mut(widget_id) {
                        entry.renderer.set_option(&option, true);
                    }
                }
                if let Some(widget_id) = self.modal.widget_id().map(str::to_string) {
                    if let Some(entry) = self.entries.get(&widget_id) {
                        self.modal.sync(&widget_id, entry.renderer.as_ref());
                    }
                }
                get_logger().debug(
                    LogComponent::Application("Registry"),
                    &format!("🎨 Rebuilt {} charts for theme change", widget_ids.len()),
                );
            }
        }
    }

    /// Mirrors a user pan/zoom on `widget_id` to the rest of its group.
    pub fn on_user_zoom(&mut self, widget_id: &str, window: ZoomWindow) {
        for peer in self.coordinator.peers(widget_id) {
            if let Some(entry) = self.entries.get_mut(&peer) {
                entry.renderer.dispatch_zoom(window);
            }
        }
    }

    /// Opens the expand modal on a rendered chart; `false` when the widget
    /// has no chart yet or the modal container is missing.
    pub fn open_modal(&mut self, widget_id: &str) -> bool {
        let Some(entry) = self.entries.get(widget_id) else {
            return false;
        };
        self.modal.open(widget_id, entry.renderer.as_ref(), self.renderers.as_ref())
    }

    pub fn close_modal(&mut self) {
        self.modal.close();
    }
}
