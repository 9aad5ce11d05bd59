//! Display-string conversions for axis labels, KPIs and tables.
//!
//! Every formatter is total: non-finite or non-numeric input falls back to
//! the raw value (or a `--` placeholder where a KPI needs one) instead of
//! failing.

use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;
use strum::{AsRefStr, EnumIter, EnumString};

pub const PLACEHOLDER: &str = "--";

/// Numeric coercion for loosely-typed payload values.
///
/// Numbers pass through, numeric strings are parsed, booleans map to 1/0.
/// `null`, blank strings, arrays and objects are not numbers.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Like [`coerce_number`] but only finite values survive.
pub fn finite_number(value: &Value) -> Option<f64> {
    coerce_number(value).filter(|number| number.is_finite())
}

/// Text of a JSON scalar the way a label would show it.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Half-up rounding (`-2.5` rounds to `-2`).
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Fixed-point text with exact ties rounded away from zero, so
/// `to_fixed(-1.25, 1)` is `"-1.3"` and `to_fixed(2.5, 0)` is `"3"`.
///
/// Values that only look like ties in decimal (`1.005` is stored just
/// below it) round the way their binary value does.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return plain_number(value);
    }
    const GUARD: usize = 40;
    let magnitude = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    let expanded = format!("{:.*}", digits + GUARD, magnitude);
    let (kept, tail) = expanded.split_at(expanded.len() - GUARD);
    let is_tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');
    if !is_tie {
        return format!("{}{:.*}", sign, digits, magnitude);
    }
    format!("{}{}", sign, increment_last_digit(kept.trim_end_matches('.')))
}

/// `"1.29"` → `"1.30"`, `"9.9"` → `"10.0"`.
fn increment_last_digit(decimal: &str) -> String {
    let mut digits: Vec<u8> = decimal.bytes().collect();
    let mut carry = true;
    for digit in digits.iter_mut().rev() {
        if !carry {
            break;
        }
        match *digit {
            b'.' => {}
            b'9' => *digit = b'0',
            _ => {
                *digit += 1;
                carry = false;
            }
        }
    }
    let mut out = String::with_capacity(digits.len() + 1);
    if carry {
        out.push('1');
    }
    out.extend(digits.into_iter().map(char::from));
    out
}

/// Shortest decimal text for a number (`12` not `12.0`).
pub fn plain_number(value: f64) -> String {
    format!("{}", value)
}

/// Thousands-grouped number with at most `max_fraction_digits` decimals,
/// trailing zeros trimmed: `1234.5 -> "1,234.5"`.
pub fn format_grouped(value: f64, max_fraction_digits: usize) -> String {
    if !value.is_finite() {
        return plain_number(value);
    }
    let fixed = to_fixed(value.abs(), max_fraction_digits);
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer.to_string(), fraction.trim_end_matches('0').to_string()),
        None => (fixed.clone(), String::new()),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let is_zero = integer.chars().all(|c| c == '0') && fraction.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    if fraction.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, fraction)
    }
}

/// General-purpose display with up to two decimals; `--` for `null`.
pub fn format_number(value: &Value) -> String {
    if value.is_null() {
        return PLACEHOLDER.to_string();
    }
    match finite_number(value) {
        Some(number) => format_grouped(number, 2),
        None => {
            let raw = value_text(value);
            if raw.is_empty() { PLACEHOLDER.to_string() } else { raw }
        }
    }
}

/// `+1.234 bps` style, `--` when absent.
pub fn format_signed(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(number) if !number.is_nan() => {
            let prefix = if number > 0.0 { "+" } else { "" };
            format!("{}{}{}", prefix, to_fixed(number, 3), suffix)
        }
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn format_price_4dp(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(number) if number.is_finite() => to_fixed(number, 4),
        _ => raw.to_string(),
    }
}

pub fn format_bps_2dp(value: Option<f64>) -> String {
    match value.filter(|number| number.is_finite()) {
        Some(number) => format!("{} bps", to_fixed(number, 2)),
        None => PLACEHOLDER.to_string(),
    }
}

/// Lower-case magnitude suffixes used by volume axes: `1.2m`, `15k`, `980`.
pub fn format_compact_magnitude(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let magnitude = value.abs();
    if magnitude >= 1_000_000_000.0 {
        format!("{}b", to_fixed(value / 1_000_000_000.0, 1))
    } else if magnitude >= 1_000_000.0 {
        format!("{}m", to_fixed(value / 1_000_000.0, 1))
    } else if magnitude >= 1_000.0 {
        format!("{}k", to_fixed(value / 1_000.0, 0))
    } else {
        plain_number(round_half_up(value))
    }
}

/// Upper-case compact form used by payload-selected axis formats: `1.2B`, `3.4M`, `5.6k`.
pub fn format_compact(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1e9 {
        format!("{}B", to_fixed(value / 1e9, 1))
    } else if magnitude >= 1e6 {
        format!("{}M", to_fixed(value / 1e6, 1))
    } else if magnitude >= 1e3 {
        format!("{}k", to_fixed(value / 1e3, 1))
    } else {
        to_fixed(value, 0)
    }
}

/// Dollar-prefixed compact form: `$1.2B`, `$3.4M`, `$56k`, `$12.5`.
pub fn format_compact_currency(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1e9 {
        format!("${}B", to_fixed(value / 1e9, 1))
    } else if magnitude >= 1e6 {
        format!("${}M", to_fixed(value / 1e6, 1))
    } else if magnitude >= 1e3 {
        format!("${}k", to_fixed(value / 1e3, 0))
    } else {
        format!("${}", plain_number(value))
    }
}

/// Named label formatter carried in the chart option.
///
/// The host resolves the tag through `formatLabel`, which lands in
/// [`LabelFormatter::format_tagged`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, AsRefStr, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LabelFormatter {
    Price4dp,
    Pct0,
    Pct1,
    Compact,
    CompactMagnitude,
    CompactCurrency,
    CompactTimestamp,
    SignedOffset,
    Round,
    Fixed1,
    Fixed2,
    Fixed3,
    Fixed4,
    Fixed6,
    Percent2,
}

impl LabelFormatter {
    /// Formatter named by a payload `xAxisFormat`/`yAxisFormat` field.
    pub fn from_payload_tag(tag: &str) -> Option<Self> {
        match tag {
            "pct0" => Some(Self::Pct0),
            "pct1" => Some(Self::Pct1),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }

    /// Resolve an option's `{"fn": tag}` label callback against `value`.
    ///
    /// Numbers go through [`Self::format_value`], anything else through
    /// [`Self::format_label`]; an unknown tag shows the value unchanged.
    pub fn format_tagged(tag: &str, value: &Value) -> String {
        let Ok(formatter) = Self::from_str(tag) else {
            return value_text(value);
        };
        match value.as_f64() {
            Some(number) => formatter.format_value(number),
            None => formatter.format_label(&value_text(value)),
        }
    }

    /// Format a raw axis value (category text or stringified number).
    pub fn format_label(&self, raw: &str) -> String {
        if *self == Self::CompactTimestamp {
            return crate::time_utils::format_compact_timestamp(raw);
        }
        match raw.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => self.format_finite(number),
            _ if *self == Self::CompactMagnitude => String::new(),
            _ => raw.to_string(),
        }
    }

    /// Format a numeric axis value; non-finite input yields its raw text.
    pub fn format_value(&self, value: f64) -> String {
        if !value.is_finite() {
            return self.format_label(&plain_number(value));
        }
        if *self == Self::CompactTimestamp {
            return crate::time_utils::format_compact_timestamp(&plain_number(value));
        }
        self.format_finite(value)
    }

    fn format_finite(&self, value: f64) -> String {
        match self {
            Self::Price4dp | Self::Fixed4 => to_fixed(value, 4),
            Self::Pct0 => format!("{}%", plain_number(round_half_up(value))),
            Self::Pct1 => format!("{}%", to_fixed(value, 1)),
            Self::Compact => format_compact(value),
            Self::CompactMagnitude => format_compact_magnitude(value),
            Self::CompactCurrency => format_compact_currency(value),
            Self::CompactTimestamp => plain_number(value),
            Self::SignedOffset => {
                let sign = if value >= 0.0 { "+" } else { "" };
                format!("{}{}", sign, to_fixed(value, 1))
            }
            Self::Round => plain_number(round_half_up(value)),
            Self::Fixed1 => to_fixed(value, 1),
            Self::Fixed2 => to_fixed(value, 2),
            Self::Fixed3 => to_fixed(value, 3),
            Self::Fixed6 => to_fixed(value, 6),
            Self::Percent2 => format!("{}%", to_fixed(value, 2)),
        }
    }
}

/// Replace the placeholder token names of the default pair with the
/// tokens of the currently selected pair (`USX` → token0, `USDC` → token1).
pub fn pair_aware_label(text: &str, pair: &str) -> String {
    let mut parts = pair.split('-');
    let token0 = parts.next().map(str::trim).filter(|t| !t.is_empty()).unwrap_or("T0");
    let token1 = parts.next().map(str::trim).filter(|t| !t.is_empty()).unwrap_or("T1");
    replace_word(&replace_word(text, "USX", token0), "USDC", token1)
}

fn replace_word(text: &str, word: &str, replacement: &str) -> String {
    let is_word_char = |c: char| c.is_ascii_alphanumeric() || c == '_';
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut prev: Option<char> = None;
    while let Some(pos) = rest.find(word) {
        let before = rest[..pos].chars().last().or(prev);
        let after = rest[pos + word.len()..].chars().next();
        out.push_str(&rest[..pos]);
        if before.is_some_and(is_word_char) || after.is_some_and(is_word_char) {
            out.push_str(word);
        } else {
            out.push_str(replacement);
        }
        prev = word.chars().last();
        rest = &rest[pos + word.len()..];
    }
    out.push_str(rest);
    out
}
