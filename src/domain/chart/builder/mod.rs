//! Payload → [`ChartOption`] pipeline.
//!
//! Stages run in a fixed order: payload preparation, the kind builder,
//! per-widget overrides, then linked-group zoom injection. Every stage is
//! a pure function of its inputs.

mod bar_horizontal;
mod candlestick;
mod dual_axis;
mod heatmap;
mod line_area;
mod line_bar;
pub mod mark_lines;
pub mod overrides;
mod pie;
mod timeline;

use super::option::{AxisIndex, ChartOption, DataZoom};
use super::value_objects::{Theme, ZoomWindow};
use crate::domain::formatting::pair_aware_label;
use crate::domain::widget::{ChartKind, ChartPayload};
use crate::log_trace;
use crate::domain::logging::LogComponent;

pub use overrides::{Transform, WidgetProfile};

/// Everything besides the payload that shapes an option
#[derive(Debug, Clone)]
pub struct BuildContext<'a> {
    pub theme: &'a Theme,
    /// Current pair filter, e.g. `USX-USDC`.
    pub pair: &'a str,
    /// Current `last_window` filter tag.
    pub last_window: &'a str,
    pub now_ms: i64,
    pub profile: &'a WidgetProfile,
    /// Focus window of the widget's fixed-focus group, if one was computed.
    pub focus: Option<ZoomWindow>,
}

impl BuildContext<'_> {
    pub fn label(&self, text: &str) -> String {
        pair_aware_label(text, self.pair)
    }

    pub fn opt_label(&self, text: Option<&str>) -> Option<String> {
        text.map(|text| self.label(text)).filter(|text| !text.is_empty())
    }

    pub fn text_color(&self) -> &str {
        &self.theme.text_color
    }

    pub fn grid_color(&self) -> &str {
        &self.theme.grid_color
    }
}

/// Which builder produced the option; overrides only apply to the base layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Base,
    Heatmap,
    Dedicated,
}

pub fn build_chart_option(widget_id: &str, payload: &ChartPayload, ctx: &BuildContext) -> ChartOption {
    let mut data = payload.clone();
    overrides::prepare(&mut data, ctx);

    let (mut option, layout) = match data.kind {
        ChartKind::CandlestickVolume => (candlestick::build(&data, ctx), Layout::Dedicated),
        ChartKind::BarLineDual => (dual_axis::build(&data, ctx), Layout::Dedicated),
        ChartKind::BarHorizontal => (bar_horizontal::build(&data, ctx), Layout::Dedicated),
        ChartKind::Heatmap => (heatmap::build(&data, ctx), Layout::Heatmap),
        ChartKind::LineArea if data.direction_arrows.is_some() => (line_area::build(&data, ctx), Layout::Dedicated),
        ChartKind::Pie => (pie::build(&data, ctx), Layout::Dedicated),
        ChartKind::Timeline => (timeline::build(&data, ctx), Layout::Dedicated),
        ChartKind::LineBar | ChartKind::LineArea => (line_bar::build(&data, ctx), Layout::Base),
    };

    if layout == Layout::Base {
        overrides::apply(&mut option, &mut data, ctx);
    }
    if ctx.profile.fixed_focus && layout != Layout::Dedicated {
        inject_focus_zoom(&mut option, ctx.focus.unwrap_or(ZoomWindow::FULL), layout == Layout::Heatmap, ctx);
    }

    log_trace!(
        LogComponent::Domain("ChartBuilder"),
        "🧩 {} built as {} with {} series",
        widget_id,
        data.kind,
        option.series.len()
    );
    option
}

/// Fixed-focus members open on the shared window; heatmaps get no slider.
fn inject_focus_zoom(option: &mut ChartOption, window: ZoomWindow, inside_only: bool, ctx: &BuildContext) {
    let mut zooms = vec![DataZoom::inside_x(AxisIndex::One(0)).with_window(window)];
    if !inside_only {
        zooms.push(DataZoom::slider_x(AxisIndex::One(0), ctx.grid_color()).with_window(window));
    }
    option.data_zoom = zooms;
}
