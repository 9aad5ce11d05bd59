use crate::domain::errors::{PayloadError, PayloadResult};
use crate::domain::formatting::{finite_number, value_text};
use derive_more::Display;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::str::FromStr;
use strum::{AsRefStr, EnumIter, EnumString};

/// Value Object - chart sub-tag of a `chart` payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, AsRefStr)]
pub enum ChartKind {
    #[display(fmt = "Line/Bar")]
    #[strum(serialize = "line-bar", serialize = "default")]
    LineBar,
    #[display(fmt = "Candlestick + Volume")]
    #[strum(serialize = "candlestick-volume")]
    CandlestickVolume,
    #[display(fmt = "Bar + Line (dual axis)")]
    #[strum(serialize = "bar-line-dual")]
    BarLineDual,
    #[display(fmt = "Horizontal Bar")]
    #[strum(serialize = "bar-horizontal")]
    BarHorizontal,
    #[display(fmt = "Heatmap")]
    #[strum(serialize = "heatmap")]
    Heatmap,
    #[display(fmt = "Line Area")]
    #[strum(serialize = "line-area")]
    LineArea,
    #[display(fmt = "Pie")]
    #[strum(serialize = "pie")]
    Pie,
    #[display(fmt = "Timeline")]
    #[strum(serialize = "timeline")]
    Timeline,
}

impl ChartKind {
    /// Absent or unrecognised tags render as the default line/bar chart.
    pub fn from_tag(tag: Option<&str>) -> Self {
        tag.and_then(|tag| ChartKind::from_str(tag).ok())
            .unwrap_or(ChartKind::LineBar)
    }
}

/// One category on a chart axis. Numbers keep their JSON representation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Category {
    Number(Number),
    Text(String),
}

impl Category {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(number) => Category::Number(number.clone()),
            other => Category::Text(value_text(other)),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        let number = match self {
            Category::Number(number) => number.as_f64(),
            Category::Text(text) => text.trim().parse::<f64>().ok(),
        };
        number.filter(|number| number.is_finite())
    }

    pub fn text(&self) -> String {
        match self {
            Category::Number(number) => number.to_string(),
            Category::Text(text) => text.clone(),
        }
    }
}

impl From<&str> for Category {
    fn from(text: &str) -> Self {
        Category::Text(text.to_string())
    }
}

impl From<f64> for Category {
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(Category::Number)
            .unwrap_or_else(|| Category::Text(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPayload {
    pub name: String,
    pub series_type: Option<String>,
    pub data: Vec<Option<f64>>,
    pub y_axis_index: Option<u8>,
    pub stack: Option<String>,
    pub color: Option<String>,
    pub dashed: bool,
    pub area: bool,
    pub smooth: Option<bool>,
    pub show_symbol: Option<bool>,
    pub symbol_size: Option<f64>,
    pub bar_width: Option<Value>,
    pub bar_max_width: Option<Value>,
    pub connect_nulls: Option<bool>,
}

impl SeriesPayload {
    pub fn new(name: &str, data: Vec<Option<f64>>) -> Self {
        Self {
            name: name.to_string(),
            series_type: None,
            data,
            y_axis_index: None,
            stack: None,
            color: None,
            dashed: false,
            area: false,
            smooth: None,
            show_symbol: None,
            symbol_size: None,
            bar_width: None,
            bar_max_width: None,
            connect_nulls: None,
        }
    }

    fn from_value(value: &Value) -> Self {
        let empty = Map::new();
        let object = value.as_object().unwrap_or(&empty);
        Self {
            name: object.get("name").map(value_text).unwrap_or_default(),
            series_type: opt_string(object, "type"),
            data: numbers(object.get("data")),
            y_axis_index: object
                .get("yAxisIndex")
                .and_then(Value::as_u64)
                .and_then(|index| u8::try_from(index).ok()),
            stack: opt_string(object, "stack"),
            color: opt_string(object, "color"),
            dashed: object.get("lineStyle").and_then(Value::as_str) == Some("dashed"),
            area: truthy(object.get("area")),
            smooth: object.get("smooth").and_then(Value::as_bool),
            show_symbol: object.get("showSymbol").and_then(Value::as_bool),
            symbol_size: object.get("symbolSize").and_then(finite_number),
            bar_width: scalar(object, "barWidth"),
            bar_max_width: scalar(object, "barMaxWidth"),
            connect_nulls: object.get("connectNulls").map(|flag| truthy(Some(flag))),
        }
    }
}

/// Peg and current-price references for tick-axis widgets
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReferences {
    pub peg: Option<f64>,
    pub current_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkLineSpec {
    pub value: f64,
    pub label: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLineY {
    pub label: String,
    pub value: Option<f64>,
    pub color: Option<String>,
    pub y_axis_index: Option<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendGroup {
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRow {
    pub price: Option<f64>,
    pub liquidity: Option<f64>,
}

/// `[x_index, y_index, value]` cell of a heatmap, serialized as an array
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPoint(pub Option<f64>, pub Option<f64>, pub Option<f64>);

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionArrows {
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityLine {
    pub value: f64,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub name: String,
    pub value: Option<f64>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineBar {
    pub label: String,
    pub start: String,
    pub end: String,
    pub color: Option<String>,
}

/// Everything a chart builder may read. Fields a kind does not use stay empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPayload {
    pub kind: ChartKind,
    pub x: Vec<Category>,
    pub series: Vec<SeriesPayload>,

    pub x_axis_label: Option<String>,
    pub y_axis_label: Option<String>,
    pub y_right_axis_label: Option<String>,
    pub y_left_label: Option<String>,
    pub y_right_label: Option<String>,
    pub x_axis_format: Option<String>,
    pub y_axis_format: Option<String>,
    pub y_right_axis_format: Option<String>,
    pub y_axis_min: Option<Value>,
    pub y_axis_max: Option<Value>,
    pub mark_lines: Vec<MarkLineSpec>,

    pub candles: Vec<[Option<f64>; 4]>,
    pub volume: Vec<Option<f64>>,
    pub liquidity_profile: Vec<ProfileRow>,

    pub reference_lines: TickReferences,
    pub reference_lines_y: Option<Vec<ReferenceLineY>>,

    pub legend_groups: Vec<LegendGroup>,
    pub bar_width: Option<Value>,

    pub points: Vec<HeatPoint>,
    pub min: Option<f64>,
    pub max: Option<f64>,

    pub direction_arrows: Option<DirectionArrows>,
    pub volatility_lines: Vec<VolatilityLine>,

    pub slices: Vec<PieSlice>,
    pub title_extra: Option<String>,

    pub bars: Vec<TimelineBar>,
    pub now: Option<String>,
}

impl ChartPayload {
    pub fn new(kind: ChartKind, x: Vec<Category>) -> Self {
        Self {
            kind,
            x,
            series: Vec::new(),
            x_axis_label: None,
            y_axis_label: None,
            y_right_axis_label: None,
            y_left_label: None,
            y_right_label: None,
            x_axis_format: None,
            y_axis_format: None,
            y_right_axis_format: None,
            y_axis_min: None,
            y_axis_max: None,
            mark_lines: Vec::new(),
            candles: Vec::new(),
            volume: Vec::new(),
            liquidity_profile: Vec::new(),
            reference_lines: TickReferences::default(),
            reference_lines_y: None,
            legend_groups: Vec::new(),
            bar_width: None,
            points: Vec::new(),
            min: None,
            max: None,
            direction_arrows: None,
            volatility_lines: Vec::new(),
            slices: Vec::new(),
            title_extra: None,
            bars: Vec::new(),
            now: None,
        }
    }

    pub fn from_object(object: &Map<String, Value>) -> Self {
        let kind = ChartKind::from_tag(object.get("chart").and_then(Value::as_str));
        let x = items(object.get("x")).iter().map(Category::from_value).collect();
        let mut payload = ChartPayload::new(kind, x);

        payload.series = items(object.get("series")).iter().map(SeriesPayload::from_value).collect();
        payload.x_axis_label = opt_string(object, "xAxisLabel");
        payload.y_axis_label = opt_string(object, "yAxisLabel");
        payload.y_right_axis_label = opt_string(object, "yRightAxisLabel");
        payload.y_left_label = opt_string(object, "yLeftLabel");
        payload.y_right_label = opt_string(object, "yRightLabel");
        payload.x_axis_format = opt_string(object, "xAxisFormat");
        payload.y_axis_format = opt_string(object, "yAxisFormat");
        payload.y_right_axis_format = opt_string(object, "yRightAxisFormat");
        payload.y_axis_min = scalar(object, "yAxisMin");
        payload.y_axis_max = scalar(object, "yAxisMax");
        payload.mark_lines = items(object.get("mark_lines"))
            .iter()
            .filter_map(|line| {
                Some(MarkLineSpec {
                    value: line.get("value").and_then(finite_number)?,
                    label: line.get("label").map(value_text).unwrap_or_default(),
                    color: line.get("color").and_then(Value::as_str).map(str::to_string),
                })
            })
            .collect();

        payload.candles = items(object.get("candles"))
            .iter()
            .map(|candle| {
                let values = numbers(Some(candle));
                [0, 1, 2, 3].map(|i| values.get(i).copied().flatten())
            })
            .collect();
        payload.volume = numbers(object.get("volume"));
        payload.liquidity_profile = items(object.get("liquidity_profile"))
            .iter()
            .map(|row| ProfileRow {
                price: row.get("price").and_then(finite_number),
                liquidity: row.get("liquidity").and_then(finite_number),
            })
            .collect();

        if let Some(refs) = object.get("reference_lines").and_then(Value::as_object) {
            payload.reference_lines = TickReferences {
                peg: refs.get("peg").and_then(finite_number),
                current_price: refs.get("current_price").and_then(finite_number),
            };
        }
        payload.reference_lines_y = object.get("reference_lines_y").and_then(Value::as_array).map(|lines| {
            lines
                .iter()
                .map(|line| ReferenceLineY {
                    label: line.get("label").map(value_text).unwrap_or_default(),
                    value: line.get("value").and_then(finite_number),
                    color: line.get("color").and_then(Value::as_str).map(str::to_string),
                    y_axis_index: line
                        .get("yAxisIndex")
                        .and_then(Value::as_u64)
                        .and_then(|index| u8::try_from(index).ok()),
                })
                .collect()
        });

        payload.legend_groups = items(object.get("legend_groups"))
            .iter()
            .map(|group| LegendGroup {
                title: group.get("title").map(value_text).unwrap_or_default(),
                items: items(group.get("items")).iter().map(value_text).collect(),
            })
            .collect();
        payload.bar_width = scalar(object, "barWidth");

        payload.points = items(object.get("points"))
            .iter()
            .map(|point| {
                let values = numbers(Some(point));
                let at = |i: usize| values.get(i).copied().flatten();
                HeatPoint(at(0), at(1), at(2))
            })
            .collect();
        payload.min = object.get("min").and_then(finite_number);
        payload.max = object.get("max").and_then(finite_number);

        payload.direction_arrows = object
            .get("direction_arrows")
            .filter(|arrows| truthy(Some(arrows)))
            .map(|arrows| DirectionArrows {
                left: arrows.get("left").map(value_text).unwrap_or_default(),
                right: arrows.get("right").map(value_text).unwrap_or_default(),
            });
        payload.volatility_lines = items(object.get("volatility_lines"))
            .iter()
            .filter_map(|line| {
                Some(VolatilityLine {
                    value: line.get("value").and_then(finite_number)?,
                    color: line.get("color").and_then(Value::as_str).map(str::to_string),
                })
            })
            .collect();

        payload.slices = items(object.get("slices"))
            .iter()
            .map(|slice| PieSlice {
                name: slice.get("name").map(value_text).unwrap_or_default(),
                value: slice.get("value").and_then(finite_number),
                color: slice.get("color").and_then(Value::as_str).map(str::to_string),
            })
            .collect();
        payload.title_extra = opt_string(object, "title_extra");

        payload.bars = items(object.get("bars"))
            .iter()
            .map(|bar| TimelineBar {
                label: bar.get("label").map(value_text).unwrap_or_default(),
                start: bar.get("start").map(value_text).unwrap_or_default(),
                end: bar.get("end").map(value_text).unwrap_or_default(),
                color: bar.get("color").and_then(Value::as_str).map(str::to_string),
            })
            .collect();
        payload.now = opt_string(object, "now");

        payload
    }

    /// `"{len}|{first}|{last}"` of the category axis, empty when there are no categories.
    pub fn signature(&self) -> String {
        match (self.x.first(), self.x.last()) {
            (Some(first), Some(last)) => format!("{}|{}|{}", self.x.len(), first.text(), last.text()),
            _ => String::new(),
        }
    }

    pub fn has_right_axis(&self) -> bool {
        self.series.iter().any(|series| series.y_axis_index == Some(1))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiPayload {
    pub primary: Value,
    pub secondary: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableColumn {
    pub key: String,
    pub label: String,
}

pub type TableRow = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct TablePayload {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
    pub title_override: Option<String>,
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitTablePayload {
    pub columns: Vec<TableColumn>,
    pub left_title: String,
    pub right_title: String,
    pub left_rows: Vec<TableRow>,
    pub right_rows: Vec<TableRow>,
}

/// Server payload of one widget, keyed by its `kind`
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetPayload {
    Kpi(KpiPayload),
    Table(TablePayload),
    TableSplit(SplitTablePayload),
    Chart(ChartPayload),
}

impl WidgetPayload {
    /// Parse the `data` object of a widget response.
    ///
    /// Unknown kinds are charts (the renderer falls through to a chart for
    /// anything that is not a KPI or table).
    pub fn from_value(value: &Value) -> PayloadResult<Self> {
        let object = value.as_object().ok_or(PayloadError::NotAnObject)?;
        let kind = object
            .get("kind")
            .and_then(Value::as_str)
            .filter(|kind| !kind.is_empty())
            .ok_or(PayloadError::MissingKind)?;

        Ok(match kind {
            "kpi" => WidgetPayload::Kpi(KpiPayload {
                primary: object.get("primary").cloned().unwrap_or(Value::Null),
                secondary: object.get("secondary").cloned().unwrap_or(Value::Null),
            }),
            "table" => WidgetPayload::Table(TablePayload {
                columns: columns(object.get("columns")),
                rows: rows(object.get("rows")),
                title_override: opt_string(object, "title_override"),
                subtitle: opt_string(object, "subtitle"),
            }),
            "table-split" => WidgetPayload::TableSplit(SplitTablePayload {
                columns: columns(object.get("columns")),
                left_title: opt_string(object, "left_title").unwrap_or_else(|| "Left".to_string()),
                right_title: opt_string(object, "right_title").unwrap_or_else(|| "Right".to_string()),
                left_rows: rows(object.get("left_rows")),
                right_rows: rows(object.get("right_rows")),
            }),
            _ => WidgetPayload::Chart(ChartPayload::from_object(object)),
        })
    }

    pub fn from_json(text: &str) -> PayloadResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            WidgetPayload::Kpi(_) => "kpi",
            WidgetPayload::Table(_) => "table",
            WidgetPayload::TableSplit(_) => "table-split",
            WidgetPayload::Chart(_) => "chart",
        }
    }
}

pub fn columns(value: Option<&Value>) -> Vec<TableColumn> {
    items(value)
        .iter()
        .filter_map(|column| {
            let key = column.get("key").map(value_text)?;
            let label = column.get("label").map(value_text).unwrap_or_else(|| key.clone());
            Some(TableColumn { key, label })
        })
        .collect()
}

pub fn rows(value: Option<&Value>) -> Vec<TableRow> {
    items(value).iter().filter_map(Value::as_object).cloned().collect()
}

/// Array elements, or nothing when the field is missing or not an array.
fn items(value: Option<&Value>) -> &[Value] {
    value.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

fn numbers(value: Option<&Value>) -> Vec<Option<f64>> {
    items(value).iter().map(finite_number).collect()
}

fn opt_string(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .filter(|value| !value.is_null())
        .map(value_text)
        .filter(|text| !text.is_empty())
}

fn scalar(object: &Map<String, Value>, key: &str) -> Option<Value> {
    object
        .get(key)
        .filter(|value| value.is_number() || value.is_string())
        .cloned()
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(_) => true,
    }
}
