use risk_dashboard_wasm::domain::chart::windowing::{
    TrailingWindow, trim_to_trailing_window, trim_trailing_incomplete_bucket,
};
use risk_dashboard_wasm::domain::widget::{Category, ChartKind, ChartPayload, SeriesPayload};
use risk_dashboard_wasm::time_utils::parse_iso_millis;

const HOUR_MS: i64 = 3_600_000;
const BASE_MS: i64 = 1_767_225_600_000; // 2026-01-01T00:00:00Z

fn iso(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|date| date.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_default()
}

fn hourly_payload(buckets: usize) -> ChartPayload {
    let x = (0..buckets).map(|i| Category::from(iso(BASE_MS + i as i64 * HOUR_MS).as_str())).collect();
    let mut payload = ChartPayload::new(ChartKind::LineBar, x);
    payload.series.push(SeriesPayload::new("Buy", (0..buckets).map(|i| Some(i as f64)).collect()));
    payload.series.push(SeriesPayload::new("Sell", (0..buckets).map(|i| Some(-(i as f64))).collect()));
    payload
}

fn last_ms(payload: &ChartPayload) -> i64 {
    payload.x.last().and_then(|c| parse_iso_millis(&c.text())).unwrap_or_default()
}

#[test]
fn forming_bucket_is_dropped_from_every_array() {
    let mut payload = hourly_payload(10);
    let now = last_ms(&payload) + HOUR_MS / 2;

    assert!(trim_trailing_incomplete_bucket(&mut payload, now));
    assert_eq!(payload.x.len(), 9);
    assert!(payload.series.iter().all(|series| series.data.len() == 9));
    assert_eq!(payload.series[0].data.last(), Some(&Some(8.0)));
}

#[test]
fn closed_bucket_is_kept() {
    let mut payload = hourly_payload(10);
    let before = payload.clone();
    let now = last_ms(&payload) + HOUR_MS;

    assert!(!trim_trailing_incomplete_bucket(&mut payload, now));
    assert_eq!(payload, before);
}

#[test]
fn short_or_textual_axes_are_never_trimmed() {
    let mut short = hourly_payload(2);
    assert!(!trim_trailing_incomplete_bucket(&mut short, BASE_MS));

    let mut textual = ChartPayload::new(ChartKind::LineBar, vec!["a".into(), "b".into(), "c".into()]);
    assert!(!trim_trailing_incomplete_bucket(&mut textual, BASE_MS));
}

#[test]
fn one_hour_window_keeps_last_two_buckets() {
    let mut payload = hourly_payload(48);
    payload.candles = vec![[Some(1.0), Some(1.0), Some(1.0), Some(1.0)]; 48];
    payload.volume = vec![Some(5.0); 48];

    let dropped = trim_to_trailing_window(&mut payload, TrailingWindow::from_tag("1h"));

    assert_eq!(dropped, 46);
    assert_eq!(payload.x.len(), 2);
    assert_eq!(payload.candles.len(), 2);
    assert_eq!(payload.volume.len(), 2);
    assert_eq!(payload.x[1].text(), iso(BASE_MS + 47 * HOUR_MS));
}

#[test]
fn unknown_window_tag_falls_back_to_24h() {
    assert_eq!(TrailingWindow::from_tag("fortnight"), TrailingWindow::Hour24);

    let mut payload = hourly_payload(48);
    trim_to_trailing_window(&mut payload, TrailingWindow::from_tag("fortnight"));
    assert_eq!(payload.x.len(), 25);
}

#[test]
fn trailing_window_keeps_series_aligned_with_the_axis() {
    let mut payload = hourly_payload(48);

    trim_to_trailing_window(&mut payload, TrailingWindow::from_tag("4h"));

    assert_eq!(payload.x.len(), 5);
    assert!(payload.series.iter().all(|series| series.data.len() == 5));
    assert_eq!(payload.series[0].data.first(), Some(&Some(43.0)));
    assert_eq!(payload.series[1].data.last(), Some(&Some(-47.0)));
}
