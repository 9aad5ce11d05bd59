use super::host::{DashboardHost, JsDisplaySink, JsRendererFactory, JsSelectionSource, JsThemeSource};
use crate::application::{
    DashboardPorts, ReflowReason, RequestTicket, WidgetKind, WidgetRegistry, detail_title,
};
use crate::config::DashboardConfig;
use crate::domain::{
    chart::{ZoomWindow, option::profile_bar_height},
    errors::{AppError, RenderError},
    filters::PersistedFilters,
    formatting::LabelFormatter,
    logging::{LogComponent, get_logger},
};
use crate::infrastructure::{FilterStore, GlooFetcher, LocalStorageFilterStore, SystemClock};
use gloo::utils::format::JsValueSerdeExt;
use js_sys::Promise;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

/// Widget declared on the page, as passed to `resetAll`
#[derive(Debug, Deserialize)]
struct WidgetDecl {
    id: String,
    #[serde(default)]
    kind: String,
}

fn js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    JsValue::from_serde(value).map_err(js_error)
}

fn document_hidden() -> bool {
    web_sys::window().and_then(|window| window.document()).is_some_and(|document| document.hidden())
}

/// WASM API: тонкий мост между страницей и реестром виджетов
#[wasm_bindgen]
pub struct DashboardApi {
    registry: Rc<RefCell<WidgetRegistry>>,
    filter_store: LocalStorageFilterStore,
}

#[wasm_bindgen]
impl DashboardApi {
    /// `config_json` may be omitted; every missing field takes its default.
    #[wasm_bindgen(constructor)]
    pub fn new(host: DashboardHost, config_json: Option<String>) -> Result<DashboardApi, JsValue> {
        let config = match config_json.as_deref().map(str::trim).filter(|json| !json.is_empty()) {
            Some(json) => DashboardConfig::from_json(json).map_err(js_error)?,
            None => DashboardConfig::default(),
        };

        let ports = DashboardPorts {
            renderers: Box::new(JsRendererFactory::new(host.clone())),
            display: Box::new(JsDisplaySink::new(host.clone())),
            theme: Box::new(JsThemeSource::new(host.clone())),
            selection: Box::new(JsSelectionSource::new(host, config.default_filters.clone())),
            fetcher: Rc::new(GlooFetcher::new()),
            clock: Arc::new(SystemClock),
        };
        let filter_store = LocalStorageFilterStore::new(&config.filter_storage_key);

        get_logger().info(
            LogComponent::Presentation("DashboardApi"),
            &format!(
                "🚀 Dashboard ready: {} linked groups, {} widget profiles",
                config.linked_groups.all_groups().count(),
                config.widget_transforms.len()
            ),
        );

        Ok(Self { registry: Rc::new(RefCell::new(WidgetRegistry::new(config, ports))), filter_store })
    }

    /// Renders a raw widget response. `ticket` is the value returned by
    /// `beginRequest` (or undefined). Returns whether the response was
    /// applied; failures are already shown inline.
    #[wasm_bindgen]
    pub fn render(&self, widget_id: String, response_text: String, ticket: JsValue) -> bool {
        let ticket: Option<RequestTicket> = if ticket.is_null() || ticket.is_undefined() {
            None
        } else {
            ticket.into_serde().ok()
        };
        match self.registry.borrow_mut().render_response(&widget_id, &response_text, ticket) {
            Ok(()) => true,
            Err(AppError::Render(RenderError::StaleResponse(_))) => false,
            Err(error) => {
                get_logger().warn(
                    LogComponent::Presentation("DashboardApi"),
                    &format!("⚠️ Render of {} failed: {}", widget_id, error),
                );
                false
            }
        }
    }

    #[wasm_bindgen(js_name = reportError)]
    pub fn report_error(&self, widget_id: String, message: String) {
        self.registry.borrow().report_error(&widget_id, &message);
    }

    /// `widgets`: `[{id, kind}]` of every widget on the page.
    #[wasm_bindgen(js_name = resetAll)]
    pub fn reset_all(&self, widgets: JsValue) -> Result<(), JsValue> {
        let widgets: Vec<WidgetDecl> = widgets.into_serde().map_err(js_error)?;
        let widgets: Vec<(String, WidgetKind)> =
            widgets.into_iter().map(|widget| (widget.id, WidgetKind::from_tag(&widget.kind))).collect();
        self.registry.borrow_mut().reset_all(&widgets);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn resize(&self) {
        self.registry.borrow_mut().reflow(ReflowReason::Resize);
    }

    #[wasm_bindgen(js_name = themeChanged)]
    pub fn theme_changed(&self) {
        self.registry.borrow_mut().reflow(ReflowReason::ThemeChanged);
    }

    #[wasm_bindgen(js_name = openModal)]
    pub fn open_modal(&self, widget_id: String) -> bool {
        self.registry.borrow_mut().open_modal(&widget_id)
    }

    #[wasm_bindgen(js_name = closeModal)]
    pub fn close_modal(&self) {
        self.registry.borrow_mut().close_modal();
    }

    /// Ticket for a request about to be sent, or `null` when the request
    /// should be skipped because the document is hidden. `hidden` defaults
    /// to the page's own visibility.
    #[wasm_bindgen(js_name = beginRequest)]
    pub fn begin_request(&self, widget_id: String, hidden: Option<bool>) -> Result<JsValue, JsValue> {
        let hidden = hidden.unwrap_or_else(document_hidden);
        match self.registry.borrow().begin_request(&widget_id, hidden) {
            Some(ticket) => to_js(&ticket),
            None => Ok(JsValue::NULL),
        }
    }

    /// Ordered `[key, value]` query parameters for a widget request.
    #[wasm_bindgen(js_name = requestParams)]
    pub fn request_params(&self, widget_id: String, modes: JsValue) -> Result<JsValue, JsValue> {
        let modes: serde_json::Value = modes.into_serde().unwrap_or_default();
        let params = self.registry.borrow().request_params(&widget_id, &modes);
        to_js(&params.pairs())
    }

    #[wasm_bindgen(js_name = userZoom)]
    pub fn user_zoom(&self, widget_id: String, start: f64, end: f64) {
        let Some(window) = ZoomWindow::new(start, end) else {
            return;
        };
        self.registry.borrow_mut().on_user_zoom(&widget_id, window);
    }

    /// Resolves to a table view (`{headers, rows, message}`).
    #[wasm_bindgen(js_name = openDetailTable)]
    pub fn open_detail_table(&self, endpoint: String) -> Promise {
        let (service, filters) = {
            let registry = self.registry.borrow();
            (registry.detail_tables(), registry.filters())
        };
        future_to_promise(async move {
            let view = service.open(&endpoint, &filters).await;
            to_js(&view)
        })
    }

    #[wasm_bindgen(js_name = detailTitle)]
    pub fn detail_title(&self, widget_title: String) -> String {
        detail_title(&widget_title)
    }

    #[wasm_bindgen(js_name = openPageAction)]
    pub fn open_page_action(&self, endpoint: String) -> Promise {
        let (service, filters) = {
            let registry = self.registry.borrow();
            (registry.page_actions(), registry.filters())
        };
        future_to_promise(async move {
            let view = service.open(&endpoint, &filters).await;
            to_js(&view)
        })
    }

    /// Label text for an option's `{"fn": tag}` formatter.
    #[wasm_bindgen(js_name = formatLabel)]
    pub fn format_label(&self, tag: String, value: JsValue) -> String {
        let value: serde_json::Value = value.into_serde().unwrap_or_default();
        LabelFormatter::format_tagged(&tag, &value)
    }

    /// Pixel thickness of a `liquidity-profile` bar, given the option's
    /// `priceStep` and the on-screen height of one step.
    #[wasm_bindgen(js_name = profileBarHeight)]
    pub fn profile_bar_height(&self, price_step: f64, step_px: f64) -> f64 {
        profile_bar_height(price_step, step_px)
    }

    /// Stored `{protocol, pair, lastWindow}` or `null`.
    #[wasm_bindgen(js_name = loadFilters)]
    pub fn load_filters(&self) -> Result<JsValue, JsValue> {
        match self.filter_store.load() {
            Some(stored) => to_js(&stored),
            None => Ok(JsValue::NULL),
        }
    }

    /// Persists the host's current selection.
    #[wasm_bindgen(js_name = saveFilters)]
    pub fn save_filters(&self) {
        let stored: PersistedFilters = self.registry.borrow().filters().persisted();
        self.filter_store.save(&stored);
    }
}
