//! JS host objects adapted to the application ports.
//!
//! The page hands over one host object that owns the DOM and the chart
//! library. Options cross the boundary as plain JSON; callback tags of the
//! form `{"fn": ...}` are resolved by the host's `setOption` wrapper.

use crate::application::ports::{DisplaySink, RendererFactory, RendererHandle, SelectionSource, ThemeSource};
use crate::config::FilterDefaults;
use crate::domain::{
    chart::{Theme, ThemeMode, ZoomWindow},
    filters::FilterState,
    logging::{LogComponent, get_logger},
    widget::{KpiText, SplitTableView, TableView},
};
use gloo::utils::format::JsValueSerdeExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// Host page bridge: chart containers, text widgets, theme and filters
    #[derive(Clone, Debug)]
    pub type DashboardHost;

    #[wasm_bindgen(method, js_name = createChart)]
    fn create_chart(this: &DashboardHost, widget_id: &str) -> Option<ChartInstance>;

    #[wasm_bindgen(method, js_name = createModalChart)]
    fn create_modal_chart(this: &DashboardHost) -> Option<ChartInstance>;

    #[wasm_bindgen(method, js_name = showKpi)]
    fn show_kpi(this: &DashboardHost, widget_id: &str, text: JsValue);

    #[wasm_bindgen(method, js_name = showTable)]
    fn show_table(this: &DashboardHost, widget_id: &str, view: JsValue);

    #[wasm_bindgen(method, js_name = showSplitTable)]
    fn show_split_table(this: &DashboardHost, widget_id: &str, view: JsValue);

    #[wasm_bindgen(method, js_name = showStatus)]
    fn show_status(this: &DashboardHost, widget_id: &str, caption: &str);

    #[wasm_bindgen(method, js_name = showError)]
    fn show_error(this: &DashboardHost, widget_id: &str, caption: &str);

    #[wasm_bindgen(method, js_name = currentTheme)]
    fn current_theme(this: &DashboardHost) -> JsValue;

    #[wasm_bindgen(method, js_name = currentFilters)]
    fn current_filters(this: &DashboardHost) -> JsValue;

    /// One chart library instance
    #[derive(Clone, Debug)]
    pub type ChartInstance;

    #[wasm_bindgen(method, js_name = setOption)]
    fn set_option(this: &ChartInstance, option: JsValue, not_merge: bool);

    #[wasm_bindgen(method, js_name = getOption)]
    fn get_option(this: &ChartInstance) -> JsValue;

    #[wasm_bindgen(method)]
    fn clear(this: &ChartInstance);

    #[wasm_bindgen(method)]
    fn resize(this: &ChartInstance);

    #[wasm_bindgen(method, js_name = dispatchZoom)]
    fn dispatch_zoom(this: &ChartInstance, start: f64, end: f64);

    #[wasm_bindgen(method, js_name = joinGroup)]
    fn join_group(this: &ChartInstance, group_id: &str);

    #[wasm_bindgen(method, js_name = resetBindings)]
    fn reset_bindings(this: &ChartInstance);

    #[wasm_bindgen(method, js_name = bindExpand)]
    fn bind_expand(this: &ChartInstance, widget_id: &str);
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    JsValue::from_serde(value).unwrap_or_else(|e| {
        get_logger().error(LogComponent::Presentation("Host"), &format!("❌ Serialization failed: {}", e));
        JsValue::NULL
    })
}

pub struct JsChart {
    instance: ChartInstance,
}

impl RendererHandle for JsChart {
    fn set_option(&mut self, option: &Value, not_merge: bool) {
        self.instance.set_option(to_js(option), not_merge);
    }

    fn current_option(&self) -> Option<Value> {
        let option = self.instance.get_option();
        if option.is_null() || option.is_undefined() {
            return None;
        }
        option.into_serde().ok()
    }

    fn clear(&mut self) {
        self.instance.clear();
    }

    fn resize(&mut self) {
        self.instance.resize();
    }

    fn dispatch_zoom(&mut self, window: ZoomWindow) {
        self.instance.dispatch_zoom(window.start, window.end);
    }

    fn join_group(&mut self, group_id: &str) {
        self.instance.join_group(group_id);
    }

    fn reset_bindings(&mut self) {
        self.instance.reset_bindings();
    }

    fn bind_expand(&mut self, widget_id: &str) {
        self.instance.bind_expand(widget_id);
    }
}

pub struct JsRendererFactory {
    host: DashboardHost,
}

impl JsRendererFactory {
    pub fn new(host: DashboardHost) -> Self {
        Self { host }
    }
}

impl RendererFactory for JsRendererFactory {
    fn create(&self, widget_id: &str) -> Option<Box<dyn RendererHandle>> {
        let instance = self.host.create_chart(widget_id)?;
        Some(Box::new(JsChart { instance }))
    }

    fn create_modal(&self) -> Option<Box<dyn RendererHandle>> {
        let instance = self.host.create_modal_chart()?;
        Some(Box::new(JsChart { instance }))
    }
}

pub struct JsDisplaySink {
    host: DashboardHost,
}

impl JsDisplaySink {
    pub fn new(host: DashboardHost) -> Self {
        Self { host }
    }
}

impl DisplaySink for JsDisplaySink {
    fn show_kpi(&self, widget_id: &str, text: &KpiText) {
        self.host.show_kpi(widget_id, to_js(text));
    }

    fn show_table(&self, widget_id: &str, view: &TableView) {
        self.host.show_table(widget_id, to_js(view));
    }

    fn show_split_table(&self, widget_id: &str, view: &SplitTableView) {
        self.host.show_split_table(widget_id, to_js(view));
    }

    fn show_status(&self, widget_id: &str, caption: &str) {
        self.host.show_status(widget_id, caption);
    }

    fn show_error(&self, widget_id: &str, caption: &str) {
        self.host.show_error(widget_id, caption);
    }
}

/// Theme as the host reports it: mode plus resolved CSS tokens
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct HostTheme {
    mode: Option<ThemeMode>,
    text_color: Option<String>,
    grid_color: Option<String>,
}

pub struct JsThemeSource {
    host: DashboardHost,
}

impl JsThemeSource {
    pub fn new(host: DashboardHost) -> Self {
        Self { host }
    }
}

impl ThemeSource for JsThemeSource {
    fn theme(&self) -> Theme {
        let reported: HostTheme = self.host.current_theme().into_serde().unwrap_or_default();
        Theme::for_mode(reported.mode.unwrap_or(ThemeMode::Dark))
            .with_css_tokens(reported.text_color.as_deref(), reported.grid_color.as_deref())
    }
}

pub struct JsSelectionSource {
    host: DashboardHost,
    defaults: FilterDefaults,
}

impl JsSelectionSource {
    pub fn new(host: DashboardHost, defaults: FilterDefaults) -> Self {
        Self { host, defaults }
    }
}

impl SelectionSource for JsSelectionSource {
    /// Host selection; blank fields fall back to the configured defaults.
    fn filters(&self) -> FilterState {
        let mut filters: FilterState = self.host.current_filters().into_serde().unwrap_or_default();
        if filters.protocol.is_empty() {
            filters.protocol = self.defaults.protocol.clone();
        }
        if filters.pair.is_empty() {
            filters.pair = self.defaults.pair.clone();
        }
        if filters.last_window.is_empty() {
            filters.last_window = self.defaults.last_window.clone();
        }
        filters
    }
}
