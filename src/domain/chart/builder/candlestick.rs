use super::BuildContext;
use crate::domain::chart::option::{
    Axis, AxisIndex, AxisLabel, ChartOption, CustomRenderer, DataZoom, Dim, Grid, ItemStyle, Legend, LegendEntry,
    Series, SeriesData, SeriesType, SplitLine, Toggle, Tooltip, TooltipFormatter,
};
use crate::domain::chart::value_objects::AxisBound;
use crate::domain::formatting::LabelFormatter;
use crate::domain::widget::ChartPayload;
use serde_json::json;

const UP_COLOR: &str = "#2fbf71";
const DOWN_COLOR: &str = "#e24c4c";
const VOLUME_COLOR: &str = "#4bb7ff";
const PROFILE_FILL: &str = "rgba(142, 161, 199, 0.16)";

/// `(liquidity, price)` rows with a finite price and positive liquidity.
fn profile_rows(data: &ChartPayload) -> Vec<[f64; 2]> {
    data.liquidity_profile
        .iter()
        .filter_map(|row| match (row.price, row.liquidity) {
            (Some(price), Some(liquidity)) if liquidity > 0.0 => Some([liquidity, price]),
            _ => None,
        })
        .collect()
}

/// Median positive gap between distinct sorted prices, 0 when undefined.
pub fn median_price_step(prices: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = prices.iter().copied().filter(|p| p.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    let mut diffs: Vec<f64> = sorted.windows(2).map(|pair| pair[1] - pair[0]).filter(|d| *d > 0.0).collect();
    if diffs.is_empty() {
        return 0.0;
    }
    diffs.sort_by(f64::total_cmp);
    diffs[diffs.len() / 2]
}

fn right_value_label(ctx: &BuildContext, formatter: LabelFormatter) -> AxisLabel {
    AxisLabel {
        color: Some(ctx.text_color().to_string()),
        width: Some(62.0),
        align: Some("left".to_string()),
        padding: Some([0.0, 0.0, 0.0, 8.0]),
        margin: Some(10.0),
        inside: Some(false),
        formatter: Some(formatter.into()),
        ..Default::default()
    }
}

/// Price candles over a volume strip sharing one time axis, with an
/// optional liquidity-by-price profile drawn behind the candles.
pub fn build(data: &ChartPayload, ctx: &BuildContext) -> ChartOption {
    let profile = profile_rows(data);
    let prices: Vec<f64> = profile.iter().map(|row| row[1]).collect();
    let price_step = median_price_step(&prices);
    let profile_max = profile.iter().fold(0.0_f64, |max, row| max.max(row[0]));

    let mut price_x = Axis::category(data.x.clone()).with_axis_line(ctx.grid_color());
    price_x.boundary_gap = Some(false);
    price_x.axis_label = Some(AxisLabel { show: Some(false), ..Default::default() });
    price_x.axis_tick = Some(Toggle::HIDDEN);

    let mut volume_x = Axis::category(data.x.clone()).with_axis_line(ctx.grid_color());
    volume_x.grid_index = Some(1);
    volume_x.boundary_gap = Some(false);
    let mut volume_x_label = AxisLabel::colored(ctx.text_color(), 11.0).with_formatter(LabelFormatter::CompactTimestamp);
    volume_x_label.hide_overlap = Some(true);
    volume_x.axis_label = Some(volume_x_label);
    volume_x.axis_tick = Some(Toggle::HIDDEN);

    let mut profile_x = Axis::value();
    profile_x.grid_index = Some(0);
    profile_x.min = Some(AxisBound::Value(0.0));
    profile_x.max = Some(AxisBound::Value(if profile_max > 0.0 { profile_max * 1.05 } else { 1.0 }));
    profile_x.inverse = Some(true);
    profile_x.show = Some(false);

    let mut price_y = Axis::value()
        .with_axis_line(ctx.grid_color())
        .with_label(right_value_label(ctx, LabelFormatter::Fixed4));
    price_y.scale = Some(true);
    price_y.position = Some("right".to_string());
    price_y.split_line = Some(SplitLine::colored(ctx.grid_color()));

    let mut volume_y = Axis::value()
        .with_axis_line(ctx.grid_color())
        .with_label(right_value_label(ctx, LabelFormatter::CompactMagnitude));
    volume_y.grid_index = Some(1);
    volume_y.scale = Some(true);
    volume_y.position = Some("right".to_string());
    volume_y.split_number = Some(3);
    volume_y.split_line = Some(SplitLine::hidden());
    volume_y.axis_tick = Some(Toggle::HIDDEN);

    let mut series = Vec::with_capacity(3);
    if !profile.is_empty() {
        let mut liquidity = Series::new(SeriesType::Custom, SeriesData::Pairs(profile)).named("Liquidity Profile");
        liquidity.x_axis_index = Some(2);
        liquidity.y_axis_index = Some(0);
        liquidity.silent = Some(true);
        liquidity.z = Some(1);
        liquidity.tooltip = Some(Tooltip::hidden());
        liquidity.item_style = Some(ItemStyle::colored(PROFILE_FILL));
        liquidity.render_item = Some(CustomRenderer::LiquidityProfile { price_step });
        series.push(liquidity);
    }

    let mut candles = Series::new(SeriesType::Candlestick, SeriesData::Candles(data.candles.clone())).named("OHLC");
    candles.z = Some(3);
    candles.item_style = Some(ItemStyle {
        color: Some(UP_COLOR.to_string()),
        color0: Some(DOWN_COLOR.to_string()),
        border_color: Some(UP_COLOR.to_string()),
        border_color0: Some(DOWN_COLOR.to_string()),
    });
    series.push(candles);

    let mut volume = Series::new(SeriesType::Bar, SeriesData::Values(data.volume.clone())).named("Volume");
    volume.x_axis_index = Some(1);
    volume.y_axis_index = Some(1);
    volume.item_style = Some(ItemStyle::colored(VOLUME_COLOR));
    volume.bar_max_width = Some(json!(8));
    volume.z = Some(2);
    series.push(volume);

    let mut legend = Legend::bottom(ctx.text_color());
    legend.data = Some(vec![LegendEntry::Plain("OHLC".to_string()), LegendEntry::Plain("Volume".to_string())]);

    ChartOption {
        color: ctx.theme.palette.clone(),
        tooltip: Some(Tooltip {
            trigger: Some("axis".to_string()),
            axis_pointer: Some(json!({"type": "cross"})),
            formatter: Some(TooltipFormatter::Candlestick),
            ..Default::default()
        }),
        legend: Some(legend),
        grid: vec![
            Grid {
                left: Some(Dim::Px(82.0)),
                right: Some(Dim::Px(88.0)),
                top: Some(Dim::Px(14.0)),
                height: Some(Dim::from("56%")),
                contain_label: Some(false),
                ..Default::default()
            },
            Grid {
                left: Some(Dim::Px(82.0)),
                right: Some(Dim::Px(88.0)),
                top: Some(Dim::from("74%")),
                height: Some(Dim::from("12%")),
                contain_label: Some(false),
                ..Default::default()
            },
        ],
        x_axis: vec![price_x, volume_x, profile_x],
        y_axis: vec![price_y, volume_y],
        data_zoom: vec![
            DataZoom::inside_x(AxisIndex::Many(vec![0, 1])),
            DataZoom::slider_x(AxisIndex::Many(vec![0, 1]), ctx.grid_color()),
            DataZoom::inside_y(0),
        ],
        series,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_step_ignores_duplicates() {
        assert_eq!(median_price_step(&[1.0, 1.0, 1.5, 2.0, 3.0]), 0.5);
        assert_eq!(median_price_step(&[2.0]), 0.0);
        assert_eq!(median_price_step(&[]), 0.0);
    }
}
