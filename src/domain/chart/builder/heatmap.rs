use super::{BuildContext, mark_lines};
use crate::domain::chart::option::{
    Axis, AxisLabel, ChartOption, Grid, InRange, Series, SeriesData, SeriesType, TextStyle, Tooltip, VisualMap,
};
use crate::domain::formatting::{LabelFormatter, to_fixed};
use crate::domain::widget::{Category, ChartPayload};

pub const HEATMAP_ROW: &str = "Liquidity Delta";

/// Diverging ramp: deep red → transparent near zero → deep green.
const RAMP: [&str; 5] = [
    "rgba(143, 0, 14, 0.95)",
    "rgba(226, 76, 76, 0.7)",
    "rgba(255, 255, 255, 0.02)",
    "rgba(36, 179, 107, 0.7)",
    "rgba(4, 109, 67, 0.95)",
];

/// `[right, left]` legend captions of the colour scale.
pub fn legend_text(min: f64, max: f64) -> [String; 2] {
    let sign = if max >= 0.0 { "+" } else { "" };
    [format!("{}{}%", sign, to_fixed(max, 2)), format!("{}%", to_fixed(min, 2))]
}

/// Single-row heatmap over a tick-price axis.
pub fn build(data: &ChartPayload, ctx: &BuildContext) -> ChartOption {
    let min = data.min.unwrap_or(-1.0);
    let max = data.max.unwrap_or(1.0);
    let x_label = ctx.opt_label(data.x_axis_label.as_deref());

    let mut x_label_style = AxisLabel::colored(ctx.text_color(), 11.0).with_formatter(LabelFormatter::Price4dp);
    x_label_style.margin = Some(8.0);
    x_label_style.hide_overlap = Some(true);
    let mut x_axis = Axis::category(data.x.clone())
        .titled(x_label.clone(), 36.0, ctx.text_color(), 11.0)
        .with_axis_line(ctx.grid_color())
        .with_label(x_label_style);
    x_axis.boundary_gap = Some(false);

    let y_axis = Axis::category(vec![Category::from(HEATMAP_ROW)])
        .with_label(AxisLabel { color: Some(ctx.text_color().to_string()), ..Default::default() }.fixed_width_right());

    let mut series = Series::new(SeriesType::Heatmap, SeriesData::Points(data.points.clone()));
    if ctx.profile.tick_reference() {
        series.mark_line = mark_lines::tick_reference_mark_line(data, ctx);
    }

    ChartOption {
        color: ctx.theme.palette.clone(),
        tooltip: Some(Tooltip { position: Some("top".to_string()), ..Default::default() }),
        grid: vec![Grid::px(82.0, 18.0, 16.0, if x_label.is_some() { 68.0 } else { 58.0 }, false)],
        x_axis: vec![x_axis],
        y_axis: vec![y_axis],
        visual_map: Some(VisualMap {
            min,
            max,
            orient: "horizontal".to_string(),
            left: "center".to_string(),
            bottom: 8.0,
            precision: 3,
            text: legend_text(min, max),
            text_style: TextStyle::colored(ctx.text_color()),
            in_range: InRange { color: RAMP.map(String::from).to_vec() },
        }),
        series: vec![series],
        ..Default::default()
    }
}
