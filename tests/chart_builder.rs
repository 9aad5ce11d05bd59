use risk_dashboard_wasm::application::LinkedGroupCoordinator;
use risk_dashboard_wasm::config::DashboardConfig;
use risk_dashboard_wasm::domain::chart::option::DataZoomType;
use risk_dashboard_wasm::domain::chart::{BuildContext, ChartOption, Theme, ZoomWindow, build_chart_option};
use risk_dashboard_wasm::domain::widget::{ChartPayload, WidgetPayload};
use serde_json::{Value, json};

const NOW_MS: i64 = 1_767_225_600_000; // 2026-01-01T00:00:00Z

fn chart(value: Value) -> ChartPayload {
    match WidgetPayload::from_value(&value) {
        Ok(WidgetPayload::Chart(chart)) => chart,
        other => panic!("expected a chart payload, got {:?}", other),
    }
}

fn build(widget_id: &str, payload: &ChartPayload, focus: Option<ZoomWindow>) -> ChartOption {
    let config = DashboardConfig::default();
    let theme = Theme::dark();
    let profile = config.profile_for(widget_id);
    let ctx = BuildContext {
        theme: &theme,
        pair: "USX-USDC",
        last_window: "7d",
        now_ms: NOW_MS,
        profile: &profile,
        focus,
    };
    build_chart_option(widget_id, payload, &ctx)
}

fn hourly_x(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            chrono::DateTime::from_timestamp_millis(NOW_MS - (count - i) as i64 * 3_600_000 + 1_800_000)
                .map(|date| date.to_rfc3339())
                .unwrap_or_default()
        })
        .collect()
}

#[test]
fn heatmap_in_fixed_focus_group_end_to_end() {
    let payload = chart(json!({
        "kind": "chart",
        "chart": "heatmap",
        "x": ["0.98", "0.99", "1.00", "1.01", "1.02"],
        "points": [[0, 0, -5], [2, 0, 3]],
        "min": -6,
        "max": 6
    }));

    let mut coordinator = LinkedGroupCoordinator::new(DashboardConfig::default().linked_groups);
    let focus = coordinator.focus_window_for("liquidity-change-heatmap", &payload);
    let option = build("liquidity-change-heatmap", &payload, focus);

    let visual_map = option.visual_map.as_ref().expect("heatmap has a visual map");
    insta::assert_json_snapshot!(visual_map.text, @r#"
    [
      "+6.00%",
      "-6.00%"
    ]
    "#);

    assert_eq!(option.data_zoom.len(), 1, "heatmaps get no slider");
    let zoom = &option.data_zoom[0];
    assert_eq!(zoom.zoom_type, DataZoomType::Inside);
    let (start, end) = (zoom.start.unwrap_or(-1.0), zoom.end.unwrap_or(-1.0));
    assert!((0.0..=100.0).contains(&start));
    assert!((0.0..=100.0).contains(&end));
    assert!(end - start >= 22.0);
    assert_eq!(option.category_count(), 5);
}

#[test]
fn fixed_focus_line_chart_gets_inside_zoom_and_slider() {
    let values: Vec<f64> = (0..40).map(|i| if i == 25 { 50.0 } else { 0.0 }).collect();
    let x: Vec<String> = (0..40).map(|i| format!("{:.4}", 0.98 + i as f64 * 0.001)).collect();
    let payload = chart(json!({
        "kind": "chart",
        "chart": "line-bar",
        "x": x,
        "series": [{"name": "USX Liquidity", "type": "bar", "data": values}]
    }));

    let mut coordinator = LinkedGroupCoordinator::new(DashboardConfig::default().linked_groups);
    let focus = coordinator.focus_window_for("liquidity-depth", &payload);
    let option = build("liquidity-depth", &payload, focus);

    let kinds: Vec<DataZoomType> = option.data_zoom.iter().map(|zoom| zoom.zoom_type).collect();
    assert_eq!(kinds, vec![DataZoomType::Inside, DataZoomType::Slider]);
    assert!(option.data_zoom.iter().all(|zoom| zoom.start == focus.map(|w| w.start)));
    assert_eq!(option.x_axis[0].boundary_gap, Some(false));
}

#[test]
fn category_count_matches_payload_after_trims() {
    let x = hourly_x(12);
    let series = json!([
        {"name": "Buy", "type": "bar", "data": [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]},
        {"name": "Sell", "type": "bar", "data": [-1, -2, -3, -4, -5, -6, -7, -8, -9, -10, -11, -12]}
    ]);

    let plain = chart(json!({"kind": "chart", "chart": "line-bar", "x": x, "series": series}));
    assert_eq!(build("kamino-liquidations", &plain, None).category_count(), 12);

    // the newest bucket opened 30 minutes ago and is still forming
    let flows = build("swaps-flows-toggle", &plain, None);
    assert_eq!(flows.category_count(), 11);
    assert!(flows.series.iter().all(|series| series.data.len() == 11));

    let dual = chart(json!({"kind": "chart", "chart": "bar-line-dual", "x": x, "series": series}));
    assert_eq!(build("usdc-pool-share-concentration", &dual, None).category_count(), 12);

    let horizontal = chart(json!({
        "kind": "chart",
        "chart": "bar-horizontal",
        "x": ["Raydium", "Orca", "Meteora"],
        "series": [{"name": "Volume", "data": [3, 2, 1]}]
    }));
    assert_eq!(build("swaps-top-pools", &horizontal, None).category_count(), 3);
}

#[test]
fn ohlcv_is_cut_to_the_selected_window() {
    let x = hourly_x(24 * 10);
    let candles: Vec<Value> = (0..x.len()).map(|i| json!([1.0, 1.01, 0.99, 1.0 + i as f64 * 1e-4])).collect();
    let volume: Vec<f64> = (0..x.len()).map(|i| i as f64).collect();
    let payload = chart(json!({
        "kind": "chart",
        "chart": "candlestick-volume",
        "x": x,
        "candles": candles,
        "volume": volume
    }));

    // 7d of hourly buckets, newest included
    assert_eq!(build("swaps-ohlcv", &payload, None).category_count(), 24 * 7 + 1);
    assert_eq!(build("kamino-utilization-timeseries", &payload, None).category_count(), 24 * 10);
}

#[test]
fn renderer_callbacks_serialize_as_tags() {
    let pie = chart(json!({
        "kind": "chart",
        "chart": "pie",
        "slices": [{"name": "USX", "value": 60}, {"name": "USDC", "value": 40}]
    }));
    let option = build("usdc-pool-share", &pie, None).to_value();
    assert_eq!(option["tooltip"]["formatter"], json!({"fn": "pie-slice"}));
    assert_eq!(option["series"][0]["data"].as_array().map(Vec::len), Some(2));

    let timeline = chart(json!({
        "kind": "chart",
        "chart": "timeline",
        "bars": [
            {"label": "Epoch 1", "start": "2025-12-01", "end": "2025-12-15"},
            {"label": "Epoch 2", "start": "2025-12-15", "end": "2026-01-10"}
        ]
    }));
    let option = build("exponent-timeline", &timeline, None).to_value();
    assert_eq!(option["series"][0]["renderItem"], json!({"fn": "timeline-bar"}));
    assert_eq!(option["tooltip"]["formatter"], json!({"fn": "timeline-span"}));
}

#[test]
fn malformed_series_degrade_instead_of_failing() {
    let payload = chart(json!({
        "kind": "chart",
        "x": [1, 2, 3],
        "series": [{"name": "Broken", "data": "not-an-array"}, {"name": "Mixed", "data": [1, "x", null]}]
    }));
    let option = build("kamino-liquidations", &payload, None);
    assert_eq!(option.series.len(), 2);
    assert!(option.series[0].data.is_empty());
    assert_eq!(option.series[1].data.values(), &[Some(1.0), None, None]);
}
