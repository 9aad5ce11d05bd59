//! Default focus windows and time-axis trimming.

use super::value_objects::ZoomWindow;
use crate::domain::widget::{Category, ChartKind, ChartPayload};
use crate::time_utils::parse_iso_millis;
use derive_more::Display;
use std::str::FromStr;
use strum::{AsRefStr, EnumIter, EnumString};

const MIN_FOCUS_CATEGORIES: usize = 8;
const MIN_FOCUS_WIDTH: f64 = 22.0;
const MAX_FOCUS_WIDTH: f64 = 92.0;
const LOWER_MASS: f64 = 0.02;
const UPPER_MASS: f64 = 0.98;

/// Per-category absolute intensity: heatmap cells by x index, otherwise
/// the sum over every series at that index.
fn intensity(payload: &ChartPayload) -> Vec<f64> {
    let n = payload.x.len();
    let mut intensity = vec![0.0; n];

    if payload.kind == ChartKind::Heatmap {
        for point in &payload.points {
            let (Some(index), Some(value)) = (point.0, point.2) else {
                continue;
            };
            if index.fract() != 0.0 || index < 0.0 || index >= n as f64 {
                continue;
            }
            intensity[index as usize] += value.abs();
        }
    } else {
        for series in &payload.series {
            for (slot, value) in intensity.iter_mut().zip(&series.data) {
                if let Some(value) = value.filter(|v| v.is_finite()) {
                    *slot += value.abs();
                }
            }
        }
    }
    intensity
}

/// First index at which the running sum reaches `target`.
fn mass_index(intensity: &[f64], target: f64, fallback: usize) -> usize {
    let mut cumulative = 0.0;
    for (i, value) in intensity.iter().enumerate() {
        cumulative += value;
        if cumulative >= target {
            return i;
        }
    }
    fallback
}

/// Default focus window of a category axis: the slice holding the central
/// 96% of the absolute intensity, padded, at least 22 points wide.
///
/// `None` below 8 categories. All-zero data yields [`ZoomWindow::FLAT`],
/// a focus wider than 92 points collapses to [`ZoomWindow::COLLAPSED`].
pub fn compute_focused_window(payload: &ChartPayload) -> Option<ZoomWindow> {
    let n = payload.x.len();
    if n < MIN_FOCUS_CATEGORIES {
        return None;
    }

    let intensity = intensity(payload);
    let total: f64 = intensity.iter().sum();
    if total <= 0.0 {
        return Some(ZoomWindow::FLAT);
    }

    let low = mass_index(&intensity, total * LOWER_MASS, 0);
    let high = mass_index(&intensity, total * UPPER_MASS, n - 1);

    let pad = ((n as f64 * 0.04).round() as usize).max(2);
    let low = low.saturating_sub(pad);
    let high = (high + pad).min(n - 1);

    let last = (n - 1) as f64;
    let mut start = low as f64 / last * 100.0;
    let mut end = high as f64 / last * 100.0;

    if end - start < MIN_FOCUS_WIDTH {
        let extra = (MIN_FOCUS_WIDTH - (end - start)) / 2.0;
        start -= extra;
        end += extra;
        // Shift whatever spilled past an edge onto the other side.
        if start < 0.0 {
            end -= start;
            start = 0.0;
        }
        if end > 100.0 {
            start = (start - (end - 100.0)).max(0.0);
            end = 100.0;
        }
    }

    if end - start > MAX_FOCUS_WIDTH {
        return Some(ZoomWindow::COLLAPSED);
    }
    ZoomWindow::new(start, end).or(Some(ZoomWindow::COLLAPSED))
}

/// Drop the newest bucket while it is still forming.
///
/// The bucket is incomplete when less than one interval (last minus
/// previous timestamp) has elapsed since it opened. Returns whether the
/// payload was trimmed.
pub fn trim_trailing_incomplete_bucket(payload: &mut ChartPayload, now_ms: i64) -> bool {
    let n = payload.x.len();
    if n < 3 {
        return false;
    }
    let (Some(last), Some(prev)) = (category_millis(&payload.x[n - 1]), category_millis(&payload.x[n - 2])) else {
        return false;
    };
    let interval = last - prev;
    if interval <= 0 || now_ms - last >= interval {
        return false;
    }

    payload.x.pop();
    for series in &mut payload.series {
        series.data.pop();
    }
    true
}

/// Trailing look-back selected by the global `last_window` filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum TrailingWindow {
    #[display(fmt = "1h")]
    #[strum(serialize = "1h")]
    Hour1,
    #[display(fmt = "4h")]
    #[strum(serialize = "4h")]
    Hour4,
    #[display(fmt = "6h")]
    #[strum(serialize = "6h")]
    Hour6,
    #[display(fmt = "24h")]
    #[strum(serialize = "24h")]
    Hour24,
    #[display(fmt = "7d")]
    #[strum(serialize = "7d")]
    Day7,
    #[display(fmt = "30d")]
    #[strum(serialize = "30d")]
    Day30,
    #[display(fmt = "90d")]
    #[strum(serialize = "90d")]
    Day90,
}

impl TrailingWindow {
    /// Unknown tags fall back to 24h.
    pub fn from_tag(tag: &str) -> Self {
        TrailingWindow::from_str(tag.trim()).unwrap_or(TrailingWindow::Hour24)
    }

    pub fn duration_ms(&self) -> i64 {
        const HOUR: i64 = 60 * 60 * 1000;
        match self {
            TrailingWindow::Hour1 => HOUR,
            TrailingWindow::Hour4 => 4 * HOUR,
            TrailingWindow::Hour6 => 6 * HOUR,
            TrailingWindow::Hour24 => 24 * HOUR,
            TrailingWindow::Day7 => 7 * 24 * HOUR,
            TrailingWindow::Day30 => 30 * 24 * HOUR,
            TrailingWindow::Day90 => 90 * 24 * HOUR,
        }
    }
}

/// Keep only the categories within `window` of the newest one; series,
/// candles and volume are cut at the same index. Returns the number of dropped leading
/// categories.
pub fn trim_to_trailing_window(payload: &mut ChartPayload, window: TrailingWindow) -> usize {
    let Some(last) = payload.x.last().and_then(category_millis) else {
        return 0;
    };
    let cutoff = last - window.duration_ms();
    let start = payload
        .x
        .iter()
        .position(|category| category_millis(category).is_some_and(|ms| ms >= cutoff))
        .unwrap_or(0);

    if start > 0 {
        payload.x.drain(..start);
        for series in &mut payload.series {
            series.data.drain(..start.min(series.data.len()));
        }
        payload.candles.drain(..start.min(payload.candles.len()));
        payload.volume.drain(..start.min(payload.volume.len()));
    }
    start
}

/// Index of the numerically closest category; `None` for a non-finite
/// target or an empty axis. Non-numeric categories are skipped.
pub fn nearest_category_index(categories: &[Category], target: f64) -> Option<usize> {
    if !target.is_finite() || categories.is_empty() {
        return None;
    }
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, category) in categories.iter().enumerate() {
        let Some(value) = category.as_f64() else {
            continue;
        };
        let distance = (value - target).abs();
        if distance < best_distance {
            best_distance = distance;
            best = i;
        }
    }
    Some(best)
}

fn category_millis(category: &Category) -> Option<i64> {
    match category {
        Category::Text(text) => parse_iso_millis(text),
        Category::Number(number) => number.as_i64(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::widget::SeriesPayload;

    fn numeric_axis(n: usize) -> Vec<Category> {
        (0..n).map(|i| Category::from(i as f64)).collect()
    }

    #[test]
    fn spike_focus_respects_min_width() {
        let mut payload = ChartPayload::new(ChartKind::LineBar, numeric_axis(50));
        let mut data = vec![Some(0.0); 50];
        data[25] = Some(100.0);
        payload.series.push(SeriesPayload::new("spike", data));

        let window = compute_focused_window(&payload).unwrap();
        assert!(window.width() >= 22.0 - 1e-9);
        assert!(window.start <= 25.0 / 49.0 * 100.0 && window.end >= 25.0 / 49.0 * 100.0);
    }

    #[test]
    fn edge_spike_keeps_min_width() {
        let mut payload = ChartPayload::new(ChartKind::LineBar, numeric_axis(100));
        let mut data = vec![Some(0.0); 100];
        data[0] = Some(5.0);
        payload.series.push(SeriesPayload::new("edge", data));

        let window = compute_focused_window(&payload).unwrap();
        assert_eq!(window.start, 0.0);
        assert!(window.width() >= 22.0 - 1e-9);
    }

    #[test]
    fn zero_data_is_flat_default() {
        let mut payload = ChartPayload::new(ChartKind::LineBar, numeric_axis(10));
        payload.series.push(SeriesPayload::new("zero", vec![Some(0.0); 10]));
        assert_eq!(compute_focused_window(&payload), Some(ZoomWindow::FLAT));
    }

    #[test]
    fn nearest_index_skips_text() {
        let axis = vec![Category::from("n/a"), Category::from(1.0), Category::from(2.0)];
        assert_eq!(nearest_category_index(&axis, 1.8), Some(2));
        assert_eq!(nearest_category_index(&axis, f64::NAN), None);
        assert_eq!(nearest_category_index(&[], 1.0), None);
    }

    #[test]
    fn window_tags_are_case_insensitive() {
        assert_eq!(TrailingWindow::from_tag("7D"), TrailingWindow::Day7);
        assert_eq!(TrailingWindow::from_tag("2w"), TrailingWindow::Hour24);
        assert_eq!(TrailingWindow::Day90.to_string(), "90d");
    }
}
