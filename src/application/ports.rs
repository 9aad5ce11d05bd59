//! Collaborator seams of the dashboard: the chart renderer, the display
//! surface for text widgets, theme and filter lookup.

use crate::domain::chart::{Theme, ZoomWindow};
use crate::domain::filters::FilterState;
use crate::domain::widget::{KpiText, SplitTableView, TableView};
use serde_json::Value;

/// One live chart instance owned by the renderer
pub trait RendererHandle {
    /// Replaces (`not_merge`) or merges the declarative option.
    fn set_option(&mut self, option: &Value, not_merge: bool);
    /// Option currently shown, as the renderer reports it.
    fn current_option(&self) -> Option<Value>;
    /// Empties the chart but keeps the instance.
    fn clear(&mut self);
    fn resize(&mut self);
    /// Applies a zoom window without emitting a user gesture.
    fn dispatch_zoom(&mut self, window: ZoomWindow);
    /// Connects the instance to a renderer-side sync group.
    fn join_group(&mut self, group_id: &str);
    /// Drops event handlers bound by a previous render.
    fn reset_bindings(&mut self);
    /// Opens the modal mirror when the chart is clicked.
    fn bind_expand(&mut self, widget_id: &str);
}

pub trait RendererFactory {
    /// `None` when the widget has no chart container.
    fn create(&self, widget_id: &str) -> Option<Box<dyn RendererHandle>>;
    /// `None` when the modal container is missing.
    fn create_modal(&self) -> Option<Box<dyn RendererHandle>>;
}

/// Text surfaces of KPI and table widgets plus status captions
pub trait DisplaySink {
    fn show_kpi(&self, widget_id: &str, text: &KpiText);
    fn show_table(&self, widget_id: &str, view: &TableView);
    fn show_split_table(&self, widget_id: &str, view: &SplitTableView);
    fn show_status(&self, widget_id: &str, caption: &str);
    fn show_error(&self, widget_id: &str, message: &str);
}

pub trait ThemeSource {
    fn theme(&self) -> Theme;
}

pub trait SelectionSource {
    fn filters(&self) -> FilterState;
}
