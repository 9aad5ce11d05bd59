use quickcheck_macros::quickcheck;
use risk_dashboard_wasm::domain::chart::{ZoomWindow, compute_focused_window};
use risk_dashboard_wasm::domain::widget::{Category, ChartKind, ChartPayload, HeatPoint, SeriesPayload};

fn line_payload(values: Vec<f64>) -> ChartPayload {
    let x = (0..values.len()).map(|i| Category::from(0.95 + i as f64 * 0.001)).collect();
    let mut payload = ChartPayload::new(ChartKind::LineBar, x);
    payload.series.push(SeriesPayload::new("Liquidity", values.into_iter().map(Some).collect()));
    payload
}

#[quickcheck]
fn single_spike_window_is_at_least_22_wide(len: u8, position: u8, height: u16) -> bool {
    let n = 8 + len as usize % 200;
    let spike = position as usize % n;
    let mut values = vec![0.0; n];
    values[spike] = 1.0 + height as f64;

    match compute_focused_window(&line_payload(values)) {
        Some(window) => {
            window.width() >= 22.0 - 1e-9 && window.start >= 0.0 && window.end <= 100.0 && window.start < window.end
        }
        None => false,
    }
}

#[quickcheck]
fn fewer_than_eight_categories_have_no_focus(values: Vec<f64>) -> bool {
    let values: Vec<f64> = values.into_iter().take(7).collect();
    compute_focused_window(&line_payload(values)).is_none()
}

#[test]
fn uniform_intensity_collapses_to_default_window() {
    for n in [8, 20, 50, 400] {
        let window = compute_focused_window(&line_payload(vec![3.0; n]));
        assert_eq!(window, Some(ZoomWindow::COLLAPSED), "n = {}", n);
    }
}

#[test]
fn heatmap_intensity_comes_from_points() {
    let x = (0..40).map(|i| Category::from(1.0 + i as f64 * 0.0001)).collect();
    let mut payload = ChartPayload::new(ChartKind::Heatmap, x);
    payload.points = vec![
        HeatPoint(Some(30.0), Some(0.0), Some(-8.0)),
        HeatPoint(Some(31.0), Some(0.0), Some(4.0)),
        // out of range and fractional indices are ignored
        HeatPoint(Some(99.0), Some(0.0), Some(1000.0)),
        HeatPoint(Some(2.5), Some(0.0), Some(1000.0)),
    ];

    let window = compute_focused_window(&payload).expect("40 categories");
    let spike_pct = 30.0 / 39.0 * 100.0;
    assert!(window.start <= spike_pct && spike_pct <= window.end);
    assert!(window.width() >= 22.0);
}

#[test]
fn all_zero_series_use_flat_default() {
    assert_eq!(compute_focused_window(&line_payload(vec![0.0; 12])), Some(ZoomWindow::FLAT));
}
