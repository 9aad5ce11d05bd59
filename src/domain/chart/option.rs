//! Typed declarative chart option.
//!
//! Serializes to the renderer's option object (camelCase keys, axes always
//! arrays). Behaviour that the renderer needs as a callback is carried as a
//! named tag (`{"fn": "..."}`) that the host bridge resolves.

use super::value_objects::{AxisBound, ZoomWindow};
use crate::domain::formatting::LabelFormatter;
use crate::domain::widget::{Category, HeatPoint};
use serde::Serialize;
use serde_json::Value;

/// Pixel count or CSS-style percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Dim {
    Px(f64),
    Pct(String),
}

impl Dim {
    pub fn pct(value: f64) -> Self {
        Dim::Pct(format!("{}%", value))
    }
}

impl From<f64> for Dim {
    fn from(value: f64) -> Self {
        Dim::Px(value)
    }
}

impl From<&str> for Dim {
    fn from(value: &str) -> Self {
        Dim::Pct(value.to_string())
    }
}

/// Label formatter: a named Rust-implemented formatter or a renderer template (`"{d}%"`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Formatter {
    Named {
        #[serde(rename = "fn")]
        name: LabelFormatter,
    },
    Template(String),
}

impl From<LabelFormatter> for Formatter {
    fn from(name: LabelFormatter) -> Self {
        Formatter::Named { name }
    }
}

impl Formatter {
    pub fn template(text: &str) -> Self {
        Formatter::Template(text.to_string())
    }

    pub fn named(&self) -> Option<LabelFormatter> {
        match self {
            Formatter::Named { name } => Some(*name),
            Formatter::Template(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
}

impl TextStyle {
    pub fn colored(color: &str) -> Self {
        Self { color: Some(color.to_string()), ..Default::default() }
    }

    pub fn sized(color: &str, font_size: f64) -> Self {
        Self { color: Some(color.to_string()), font_size: Some(font_size), font_weight: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub line_type: Option<LineType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl LineStyle {
    pub fn colored(color: &str) -> Self {
        Self { color: Some(color.to_string()), ..Default::default() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color0: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color0: Option<String>,
}

impl ItemStyle {
    pub fn colored(color: &str) -> Self {
        Self { color: Some(color.to_string()), ..Default::default() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaStyle {
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toggle {
    pub show: bool,
}

impl Toggle {
    pub const HIDDEN: Toggle = Toggle { show: false };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisLine {
    pub line_style: LineStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitLine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
}

impl SplitLine {
    pub fn colored(color: &str) -> Self {
        Self { show: None, line_style: Some(LineStyle::colored(color)) }
    }

    pub fn hidden() -> Self {
        Self { show: Some(false), line_style: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisLabel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<[f64; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inside: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_overlap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<Formatter>,
}

impl AxisLabel {
    pub fn colored(color: &str, font_size: f64) -> Self {
        Self { color: Some(color.to_string()), font_size: Some(font_size), ..Default::default() }
    }

    /// Fixed-width right-aligned labels so stacked charts line their plot areas up.
    pub fn fixed_width_right(mut self) -> Self {
        self.width = Some(62.0);
        self.align = Some("right".to_string());
        self.padding = Some([0.0, 8.0, 0.0, 0.0]);
        self
    }

    pub fn with_formatter(mut self, formatter: impl Into<Formatter>) -> Self {
        self.formatter = Some(formatter.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    Category,
    Value,
    Time,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(rename = "type")]
    pub axis_type: AxisType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_index: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Category>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_gap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_text_style: Option<TextStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary_gap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inverse: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<AxisBound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<AxisBound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_line: Option<AxisLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_line: Option<SplitLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_tick: Option<Toggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_label: Option<AxisLabel>,
}

impl Axis {
    fn bare(axis_type: AxisType) -> Self {
        Self {
            axis_type,
            grid_index: None,
            data: None,
            name: None,
            name_location: None,
            name_gap: None,
            name_text_style: None,
            position: None,
            boundary_gap: None,
            scale: None,
            inverse: None,
            show: None,
            split_number: None,
            min: None,
            max: None,
            axis_line: None,
            split_line: None,
            axis_tick: None,
            axis_label: None,
        }
    }

    pub fn category(data: Vec<Category>) -> Self {
        Self { data: Some(data), ..Self::bare(AxisType::Category) }
    }

    pub fn value() -> Self {
        Self::bare(AxisType::Value)
    }

    pub fn time() -> Self {
        Self::bare(AxisType::Time)
    }

    /// Axis title placed in the middle, with the given gap and font size.
    pub fn titled(mut self, name: Option<String>, gap: f64, text_color: &str, font_size: f64) -> Self {
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            self.name = Some(name);
            self.name_gap = Some(gap);
            self.name_text_style = Some(TextStyle::sized(text_color, font_size));
        }
        self.name_location = Some("middle".to_string());
        self
    }

    pub fn with_axis_line(mut self, color: &str) -> Self {
        self.axis_line = Some(AxisLine { line_style: LineStyle::colored(color) });
        self
    }

    pub fn with_label(mut self, label: AxisLabel) -> Self {
        self.axis_label = Some(label);
        self
    }

    pub fn label_mut(&mut self) -> &mut AxisLabel {
        self.axis_label.get_or_insert_with(AxisLabel::default)
    }

    pub fn category_len(&self) -> Option<usize> {
        match (self.axis_type, &self.data) {
            (AxisType::Category, Some(data)) => Some(data.len()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Dim>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Dim>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Dim>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Dim>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Dim>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contain_label: Option<bool>,
}

impl Grid {
    pub fn px(left: f64, right: f64, top: f64, bottom: f64, contain_label: bool) -> Self {
        Self {
            left: Some(Dim::Px(left)),
            right: Some(Dim::Px(right)),
            top: Some(Dim::Px(top)),
            bottom: Some(Dim::Px(bottom)),
            height: None,
            contain_label: Some(contain_label),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TooltipFormatter {
    /// Compact timestamp header, one `name: value` row per series.
    LinkedTimestamp,
    /// Like `LinkedTimestamp` but OHLC rows for candles.
    Candlestick,
    /// `name: value (pct%)`.
    PieSlice,
    /// Row label and `DD Mon YYYY → DD Mon YYYY`.
    TimelineSpan,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_pointer: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "tagged_fn")]
    pub formatter: Option<TooltipFormatter>,
}

impl Tooltip {
    pub fn axis() -> Self {
        Self { trigger: Some("axis".to_string()), ..Default::default() }
    }

    pub fn item(formatter: TooltipFormatter) -> Self {
        Self { trigger: Some("item".to_string()), formatter: Some(formatter), ..Default::default() }
    }

    pub fn hidden() -> Self {
        Self { show: Some(false), ..Default::default() }
    }
}

fn tagged_fn<S: serde::Serializer>(formatter: &Option<TooltipFormatter>, serializer: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Tagged<'a> {
        #[serde(rename = "fn")]
        name: &'a TooltipFormatter,
    }
    match formatter {
        Some(name) => Tagged { name }.serialize(serializer),
        None => serializer.serialize_none(),
    }
}

/// Legend entry: a plain name (blank for a spacer) or a styled one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LegendEntry {
    Plain(String),
    Named {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        #[serde(rename = "textStyle", skip_serializing_if = "Option::is_none")]
        text_style: Option<TextStyle>,
        #[serde(rename = "itemStyle", skip_serializing_if = "Option::is_none")]
        item_style: Option<ItemStyle>,
    },
}

impl LegendEntry {
    pub fn name(&self) -> &str {
        match self {
            LegendEntry::Plain(name) => name,
            LegendEntry::Named { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_style: Option<TextStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<LegendEntry>>,
}

impl Legend {
    pub fn bottom(text_color: &str) -> Self {
        Self { bottom: Some(2.0), text_style: Some(TextStyle::colored(text_color)), data: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AxisIndex {
    One(u8),
    Many(Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataZoomType {
    Inside,
    Slider,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataZoom {
    #[serde(rename = "type")]
    pub zoom_type: DataZoomType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis_index: Option<AxisIndex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_index: Option<AxisIndex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brush_select: Option<bool>,
}

impl DataZoom {
    /// Wheel/drag zoom on the given x axes.
    pub fn inside_x(index: AxisIndex) -> Self {
        Self {
            zoom_type: DataZoomType::Inside,
            x_axis_index: Some(index),
            y_axis_index: None,
            filter_mode: Some("none".to_string()),
            start: None,
            end: None,
            height: None,
            bottom: None,
            border_color: None,
            brush_select: None,
        }
    }

    pub fn inside_y(index: u8) -> Self {
        Self { x_axis_index: None, y_axis_index: Some(AxisIndex::One(index)), ..Self::inside_x(AxisIndex::One(0)) }
    }

    /// Thin slider under the plot.
    pub fn slider_x(index: AxisIndex, border_color: &str) -> Self {
        Self {
            zoom_type: DataZoomType::Slider,
            x_axis_index: Some(index),
            y_axis_index: None,
            filter_mode: None,
            start: None,
            end: None,
            height: Some(12.0),
            bottom: Some(28.0),
            border_color: Some(border_color.to_string()),
            brush_select: Some(false),
        }
    }

    pub fn with_window(mut self, window: ZoomWindow) -> Self {
        self.start = Some(window.start);
        self.end = Some(window.end);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InRange {
    pub color: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualMap {
    pub min: f64,
    pub max: f64,
    pub orient: String,
    pub left: String,
    pub bottom: f64,
    pub precision: u32,
    pub text: [String; 2],
    pub text_style: TextStyle,
    pub in_range: InRange,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicStyle {
    pub text: String,
    pub fill: String,
    pub font_size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// Free-floating text element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicText {
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Dim>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Dim>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    pub style: GraphicStyle,
}

impl GraphicText {
    pub fn new(style: GraphicStyle) -> Self {
        Self { element_type: "text".to_string(), left: None, right: None, top: None, bottom: None, style }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkLabel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<Formatter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
}

impl MarkLabel {
    pub fn hidden() -> Self {
        Self { show: Some(false), ..Default::default() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Peg,
    CurrentPrice,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkLineDatum {
    #[serde(skip)]
    pub reference: Option<ReferenceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Category index, or epoch milliseconds on a time axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<MarkLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Symbol {
    One(String),
    Pair([String; 2]),
}

impl Symbol {
    pub fn none() -> Self {
        Symbol::One("none".to_string())
    }

    pub fn none_pair() -> Self {
        Symbol::Pair(["none".to_string(), "none".to_string()])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkLine {
    pub silent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<Symbol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<MarkLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<u32>,
    pub data: Vec<MarkLineDatum>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieDatum {
    pub name: String,
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_style: Option<ItemStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineDatum {
    /// `[row_index, start_ms, end_ms]`
    pub value: [f64; 3],
    pub item_style: ItemStyle,
}

/// Series data in the shape each series type expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesData {
    Values(Vec<Option<f64>>),
    Candles(Vec<[Option<f64>; 4]>),
    Points(Vec<HeatPoint>),
    Pairs(Vec<[f64; 2]>),
    Slices(Vec<PieDatum>),
    Spans(Vec<TimelineDatum>),
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            SeriesData::Values(values) => values.len(),
            SeriesData::Candles(candles) => candles.len(),
            SeriesData::Points(points) => points.len(),
            SeriesData::Pairs(pairs) => pairs.len(),
            SeriesData::Slices(slices) => slices.len(),
            SeriesData::Spans(spans) => spans.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> &[Option<f64>] {
        match self {
            SeriesData::Values(values) => values,
            _ => &[],
        }
    }
}

/// Renderer-side drawing routine of a `custom` series
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CustomRenderer {
    /// Horizontal liquidity bars behind candles; thickness follows `price_step`.
    LiquidityProfile { price_step: f64 },
    /// One rectangle per row between start and end instants.
    TimelineBar,
}

impl CustomRenderer {
    pub fn tag(&self) -> Value {
        match self {
            CustomRenderer::LiquidityProfile { price_step } => serde_json::json!({
                "fn": "liquidity-profile",
                "priceStep": price_step,
            }),
            CustomRenderer::TimelineBar => serde_json::json!({ "fn": "timeline-bar" }),
        }
    }
}

/// Bar thickness of a liquidity-profile row in pixels.
pub fn profile_bar_height(price_step: f64, step_px: f64) -> f64 {
    if price_step > 0.0 && step_px.is_finite() && step_px > 0.0 {
        (step_px * 0.72).clamp(2.5, 12.0)
    } else {
        2.5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesType {
    Line,
    Bar,
    Scatter,
    Candlestick,
    Heatmap,
    Pie,
    Custom,
}

impl SeriesType {
    /// Payload series type; anything unrecognised falls back to `default`.
    pub fn parse_or(tag: Option<&str>, default: SeriesType) -> SeriesType {
        match tag {
            Some("line") => SeriesType::Line,
            Some("bar") => SeriesType::Bar,
            Some("scatter") => SeriesType::Scatter,
            _ => default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub series_type: SeriesType,
    pub data: SeriesData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis_index: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_index: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_symbol: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<Symbol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smooth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_width: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_max_width: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_nulls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_style: Option<ItemStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_style: Option<AreaStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_line: Option<MarkLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<MarkLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<[String; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<[String; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid_label_overlap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "renderer_tag")]
    pub render_item: Option<CustomRenderer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encode: Option<Value>,
}

fn renderer_tag<S: serde::Serializer>(renderer: &Option<CustomRenderer>, serializer: S) -> Result<S::Ok, S::Error> {
    match renderer {
        Some(renderer) => renderer.tag().serialize(serializer),
        None => serializer.serialize_none(),
    }
}

impl Series {
    pub fn new(series_type: SeriesType, data: SeriesData) -> Self {
        Self {
            name: None,
            series_type,
            data,
            x_axis_index: None,
            y_axis_index: None,
            show_symbol: None,
            symbol: None,
            symbol_size: None,
            smooth: None,
            stack: None,
            bar_width: None,
            bar_max_width: None,
            connect_nulls: None,
            silent: None,
            z: None,
            item_style: None,
            line_style: None,
            area_style: None,
            mark_line: None,
            tooltip: None,
            label: None,
            radius: None,
            center: None,
            avoid_label_overlap: None,
            emphasis: None,
            render_item: None,
            encode: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name_str(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Sets item and line colour together.
    pub fn paint(&mut self, color: &str) {
        self.item_style.get_or_insert_with(ItemStyle::default).color = Some(color.to_string());
        self.line_style.get_or_insert_with(LineStyle::default).color = Some(color.to_string());
    }
}

/// Renderer-ready declarative chart option
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOption {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub color: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grid: Vec<Grid>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub x_axis: Vec<Axis>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub y_axis: Vec<Axis>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data_zoom: Vec<DataZoom>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_map: Option<VisualMap>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub graphic: Vec<GraphicText>,
    pub series: Vec<Series>,
}

impl ChartOption {
    /// Length of the category axis: the first categorical x axis, else the
    /// first categorical y axis (horizontal bars, timelines).
    pub fn category_count(&self) -> usize {
        self.x_axis
            .iter()
            .find_map(Axis::category_len)
            .or_else(|| self.y_axis.iter().find_map(Axis::category_len))
            .unwrap_or(0)
    }

    pub fn primary_grid(&mut self) -> &mut Grid {
        if self.grid.is_empty() {
            self.grid.push(Grid::default());
        }
        &mut self.grid[0]
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formatters_serialize_as_tags_or_templates() {
        let named: Formatter = LabelFormatter::Price4dp.into();
        assert_eq!(serde_json::to_value(&named).unwrap(), json!({"fn": "price4dp"}));
        assert_eq!(serde_json::to_value(Formatter::template("{d}%")).unwrap(), json!("{d}%"));
    }

    #[test]
    fn category_count_prefers_x() {
        let mut option = ChartOption::default();
        option.y_axis.push(Axis::category(vec!["a".into(), "b".into()]));
        assert_eq!(option.category_count(), 2);
        option.x_axis.push(Axis::value());
        option.x_axis.push(Axis::category(vec!["x".into()]));
        assert_eq!(option.category_count(), 1);
    }

    #[test]
    fn profile_bar_height_is_clamped() {
        assert_eq!(profile_bar_height(0.0, 40.0), 2.5);
        assert_eq!(profile_bar_height(0.01, 1.0), 2.5);
        assert!((profile_bar_height(0.01, 10.0) - 7.2).abs() < 1e-9);
        assert_eq!(profile_bar_height(0.01, 100.0), 12.0);
    }

    #[test]
    fn renderer_tags() {
        let mut series = Series::new(SeriesType::Custom, SeriesData::Pairs(vec![[1.0, 0.5]]));
        series.render_item = Some(CustomRenderer::LiquidityProfile { price_step: 0.25 });
        let value = serde_json::to_value(&series).unwrap();
        assert_eq!(value["renderItem"], json!({"fn": "liquidity-profile", "priceStep": 0.25}));
    }
}
