use super::BuildContext;
use crate::domain::chart::option::{
    Axis, AxisLabel, ChartOption, Grid, ItemStyle, Legend, LineStyle, LineType, Series, SeriesData, SeriesType,
    SplitLine, Symbol, Tooltip,
};
use crate::domain::chart::value_objects::AxisBound;
use crate::domain::formatting::LabelFormatter;
use crate::domain::widget::ChartPayload;

const REFERENCE_COLOR: &str = "#ef4444";

/// Upper bound of the right axis when reference lines are drawn:
/// at least 2, with 5% head-room over the largest right-axis value.
pub fn right_axis_max(data: &ChartPayload) -> f64 {
    let largest = data
        .series
        .iter()
        .filter(|series| series.y_axis_index == Some(1))
        .flat_map(|series| series.data.iter().flatten().copied())
        .fold(2.0_f64, f64::max);
    (largest * 1.05).max(2.0)
}

/// Bars against a left currency axis with lines on a right ratio axis;
/// `reference_lines_y` become flat dashed series.
pub fn build(data: &ChartPayload, ctx: &BuildContext) -> ChartOption {
    let mut x_axis = Axis::category(data.x.clone()).with_axis_line(ctx.grid_color());
    x_axis.axis_label = Some(AxisLabel { show: Some(false), ..Default::default() });

    let mut left = Axis::value()
        .titled(Some(ctx.label(data.y_left_label.as_deref().unwrap_or(""))), 50.0, ctx.text_color(), 11.0)
        .with_axis_line(ctx.grid_color())
        .with_label(AxisLabel::colored(ctx.text_color(), 11.0).with_formatter(LabelFormatter::CompactCurrency));
    left.split_line = Some(SplitLine::colored(ctx.grid_color()));

    let mut right = Axis::value()
        .titled(Some(ctx.label(data.y_right_label.as_deref().unwrap_or(""))), 30.0, ctx.text_color(), 11.0)
        .with_axis_line(ctx.grid_color())
        .with_label(AxisLabel::colored(ctx.text_color(), 11.0).with_formatter(LabelFormatter::Fixed1));
    right.split_line = Some(SplitLine::hidden());

    let mut series: Vec<Series> = data
        .series
        .iter()
        .map(|source| {
            let series_type = SeriesType::parse_or(source.series_type.as_deref(), SeriesType::Bar);
            let mut series = Series::new(series_type, SeriesData::Values(source.data.clone())).named(source.name.clone());
            series.y_axis_index = Some(source.y_axis_index.unwrap_or(0));
            series.show_symbol = Some(source.show_symbol.unwrap_or(false));
            series.smooth = Some(source.smooth.unwrap_or(false));
            if let Some(color) = &source.color {
                series.item_style = Some(ItemStyle::colored(color));
                if series_type == SeriesType::Line {
                    series.line_style = Some(LineStyle { width: Some(2.0), ..LineStyle::colored(color) });
                }
            }
            series
        })
        .collect();

    if let Some(reference_lines) = &data.reference_lines_y {
        right.max = Some(AxisBound::Value(right_axis_max(data)));
        for line in reference_lines {
            let color = line.color.as_deref().unwrap_or(REFERENCE_COLOR);
            let mut reference = Series::new(SeriesType::Line, SeriesData::Values(vec![line.value; data.x.len()]))
                .named(line.label.clone());
            reference.y_axis_index = Some(line.y_axis_index.unwrap_or(1));
            reference.line_style = Some(LineStyle {
                color: Some(color.to_string()),
                line_type: Some(LineType::Dashed),
                width: Some(2.0),
                opacity: None,
            });
            reference.item_style = Some(ItemStyle::colored(color));
            reference.symbol = Some(Symbol::none());
            reference.tooltip = Some(Tooltip::hidden());
            series.push(reference);
        }
    }

    ChartOption {
        color: ctx.theme.palette.clone(),
        tooltip: Some(Tooltip::axis()),
        legend: Some(Legend::bottom(ctx.text_color())),
        grid: vec![Grid::px(60.0, 40.0, 22.0, 60.0, true)],
        x_axis: vec![x_axis],
        y_axis: vec![left, right],
        series,
        ..Default::default()
    }
}
