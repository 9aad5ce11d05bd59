use super::BuildContext;
use super::mark_lines;
use crate::domain::chart::option::{
    AreaStyle, Axis, AxisLabel, ChartOption, Grid, ItemStyle, Legend, LineStyle, LineType, Series, SeriesData,
    SeriesType, SplitLine, Tooltip,
};
use crate::domain::chart::value_objects::AxisBound;
use crate::domain::formatting::LabelFormatter;
use crate::domain::widget::{ChartPayload, SeriesPayload};

fn axis_format(tag: Option<&str>) -> Option<LabelFormatter> {
    tag.and_then(LabelFormatter::from_payload_tag)
}

/// Default category chart: lines/bars over a category x axis with an
/// optional right axis for series on `yAxisIndex` 1.
pub fn build(data: &ChartPayload, ctx: &BuildContext) -> ChartOption {
    let x_label = ctx.opt_label(data.x_axis_label.as_deref());
    let y_label = ctx.opt_label(data.y_axis_label.as_deref());
    let y_right_label = ctx.opt_label(data.y_right_axis_label.as_deref());
    let dual = data.has_right_axis();
    let right_pad = match (dual, y_right_label.is_some()) {
        (true, true) => 60.0,
        (true, false) => 50.0,
        (false, _) => 18.0,
    };

    let x_formatter = axis_format(data.x_axis_format.as_deref()).unwrap_or(LabelFormatter::Price4dp);
    let mut x_label_style = AxisLabel::colored(ctx.text_color(), 11.0).with_formatter(x_formatter);
    x_label_style.margin = Some(8.0);
    x_label_style.hide_overlap = Some(true);
    let x_axis = Axis::category(data.x.clone())
        .titled(x_label.clone(), 36.0, ctx.text_color(), 12.0)
        .with_axis_line(ctx.grid_color())
        .with_label(x_label_style);

    let mut left = value_axis(y_label.clone(), 42.0, axis_format(data.y_axis_format.as_deref()), ctx);
    left.split_line = Some(SplitLine::colored(ctx.grid_color()));
    let mut y_axis = vec![left];
    if dual {
        let mut right = value_axis(y_right_label, 36.0, axis_format(data.y_right_axis_format.as_deref()), ctx);
        right.split_line = Some(SplitLine::hidden());
        y_axis.push(right);
    }

    if let Some(min) = data.y_axis_min.as_ref().and_then(AxisBound::from_payload) {
        y_axis[0].min = Some(min);
    }
    if let Some(max) = data.y_axis_max.as_ref().and_then(AxisBound::from_payload) {
        y_axis[0].max = Some(max);
    }

    let mut series: Vec<Series> = data.series.iter().map(|s| map_series(s, ctx)).collect();
    if let Some(first) = series.first_mut() {
        first.mark_line = mark_lines::payload_mark_lines(data, ctx);
    }

    ChartOption {
        color: ctx.theme.palette.clone(),
        tooltip: Some(Tooltip::axis()),
        legend: Some(Legend::bottom(ctx.text_color())),
        grid: vec![Grid::px(
            if y_label.is_some() { 55.0 } else { 40.0 },
            right_pad,
            22.0,
            if x_label.is_some() { 72.0 } else { 60.0 },
            true,
        )],
        x_axis: vec![x_axis],
        y_axis,
        series,
        ..Default::default()
    }
}

fn value_axis(name: Option<String>, gap: f64, formatter: Option<LabelFormatter>, ctx: &BuildContext) -> Axis {
    let mut label = AxisLabel::colored(ctx.text_color(), 11.0);
    label.formatter = formatter.map(Into::into);
    Axis::value()
        .titled(name, gap, ctx.text_color(), 12.0)
        .with_axis_line(ctx.grid_color())
        .with_label(label)
}

fn map_series(source: &SeriesPayload, ctx: &BuildContext) -> Series {
    let mut series = Series::new(
        SeriesType::parse_or(source.series_type.as_deref(), SeriesType::Line),
        SeriesData::Values(source.data.clone()),
    )
    .named(ctx.label(&source.name));
    series.show_symbol = Some(source.show_symbol.unwrap_or(false));
    series.smooth = Some(source.smooth.unwrap_or(false));
    series.symbol_size = source.symbol_size;
    series.y_axis_index = source.y_axis_index;
    series.stack = source.stack.clone();
    series.bar_width = source.bar_width.clone();
    series.bar_max_width = source.bar_max_width.clone();
    series.connect_nulls = source.connect_nulls;
    if let Some(color) = &source.color {
        series.item_style = Some(ItemStyle::colored(color));
        series.line_style = Some(LineStyle::colored(color));
    }
    if source.dashed {
        series.line_style.get_or_insert_with(LineStyle::default).line_type = Some(LineType::Dashed);
    }
    if source.area {
        series.area_style = Some(AreaStyle { opacity: 0.2, color: None });
    }
    series
}
