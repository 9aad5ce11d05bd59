use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Value Object - visible slice of a category axis, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomWindow {
    pub start: f64,
    pub end: f64,
}

impl ZoomWindow {
    pub const FULL: ZoomWindow = ZoomWindow { start: 0.0, end: 100.0 };
    /// Focus that would show (nearly) everything collapses to this.
    pub const COLLAPSED: ZoomWindow = ZoomWindow { start: 4.0, end: 96.0 };
    /// Default for an axis whose intensity sums to zero.
    pub const FLAT: ZoomWindow = ZoomWindow { start: 20.0, end: 80.0 };

    /// Checked constructor: `0 <= start < end <= 100`.
    pub fn new(start: f64, end: f64) -> Option<Self> {
        let valid = start.is_finite() && end.is_finite() && 0.0 <= start && start < end && end <= 100.0;
        valid.then_some(Self { start, end })
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

impl Default for ZoomWindow {
    fn default() -> Self {
        Self::FULL
    }
}

/// Value Object - colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[display(fmt = "dark")]
    #[strum(serialize = "dark")]
    Dark,
    #[display(fmt = "light")]
    #[strum(serialize = "light")]
    Light,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeStyle {
    pub background_color: String,
    pub border_color: String,
}

/// Resolved theme tokens a chart option is built with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub mode: ThemeMode,
    pub palette: Vec<String>,
    pub text_color: String,
    pub grid_color: String,
    pub badge: BadgeStyle,
    pub current_price_color: String,
    pub mark_label_background: String,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,
            palette: ["#4bb7ff", "#f8a94a", "#28c987", "#ae82ff", "#ff6e7a"]
                .map(String::from)
                .to_vec(),
            text_color: "#d7def0".to_string(),
            grid_color: "#20314d".to_string(),
            badge: BadgeStyle {
                background_color: "rgba(10, 16, 32, 0.65)".to_string(),
                border_color: "rgba(142, 161, 199, 0.45)".to_string(),
            },
            current_price_color: "#c186ff".to_string(),
            mark_label_background: "rgba(0,0,0,0.65)".to_string(),
        }
    }

    pub fn light() -> Self {
        Self {
            mode: ThemeMode::Light,
            palette: ["#0a78f0", "#f39a2d", "#12a57a", "#9a54ff", "#e24c4c"]
                .map(String::from)
                .to_vec(),
            text_color: "#1c2940".to_string(),
            grid_color: "#d3dbe8".to_string(),
            badge: BadgeStyle {
                background_color: "rgba(255, 255, 255, 0.9)".to_string(),
                border_color: "rgba(95, 115, 150, 0.55)".to_string(),
            },
            current_price_color: "#8f3dff".to_string(),
            mark_label_background: "rgba(255,255,255,0.85)".to_string(),
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Host-resolved CSS tokens win over the built-ins; blank values are ignored.
    pub fn with_css_tokens(mut self, text_color: Option<&str>, grid_color: Option<&str>) -> Self {
        if let Some(text) = text_color.map(str::trim).filter(|t| !t.is_empty()) {
            self.text_color = text.to_string();
        }
        if let Some(grid) = grid_color.map(str::trim).filter(|g| !g.is_empty()) {
            self.grid_color = grid.to_string();
        }
        self
    }

    pub fn primary_color(&self) -> &str {
        self.palette.first().map(String::as_str).unwrap_or("#4bb7ff")
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Axis extent computed by the renderer from the data extent of the axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "fn", rename_all = "kebab-case")]
pub enum BoundRule {
    /// `-max(|min|, |max|)`
    SymmetricMin,
    /// `max(|min|, |max|)`
    SymmetricMax,
    /// `min - span * ratio`, span floored at 0.0001
    SpanPaddedMin { ratio: f64 },
    /// `max + span * ratio`, span floored at 0.0001
    SpanPaddedMax { ratio: f64 },
}

impl BoundRule {
    pub fn resolve(&self, data_min: f64, data_max: f64) -> f64 {
        let min = if data_min.is_finite() { data_min } else { 0.0 };
        let max = if data_max.is_finite() { data_max } else { 0.0 };
        let abs_max = min.abs().max(max.abs());
        let span = (max - min).max(0.0001);
        match self {
            BoundRule::SymmetricMin => -abs_max,
            BoundRule::SymmetricMax => abs_max,
            BoundRule::SpanPaddedMin { ratio } => min - span * ratio,
            BoundRule::SpanPaddedMax { ratio } => max + span * ratio,
        }
    }
}

/// `min`/`max` of an axis: a number, a renderer keyword (`"dataMin"`), or a rule
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AxisBound {
    Value(f64),
    Keyword(String),
    Rule(BoundRule),
}

impl AxisBound {
    /// Payload-supplied bound; anything but a finite number or a string is dropped.
    pub fn from_payload(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(number) => number.as_f64().filter(|n| n.is_finite()).map(AxisBound::Value),
            serde_json::Value::String(text) => match text.trim().parse::<f64>() {
                Ok(number) if number.is_finite() => Some(AxisBound::Value(number)),
                _ => Some(AxisBound::Keyword(text.clone())),
            },
            _ => None,
        }
    }
}
