use super::{BuildContext, mark_lines};
use crate::domain::chart::option::{
    AreaStyle, Axis, AxisLabel, ChartOption, Dim, GraphicStyle, GraphicText, Grid, ItemStyle, Legend, LineStyle,
    Series, SeriesData, SeriesType, SplitLine, Tooltip,
};
use crate::domain::formatting::LabelFormatter;
use crate::domain::widget::{ChartPayload, DirectionArrows};

const DEFAULT_Y_LABEL: &str = "Debt Value ($)";

/// Horizontal position (percent) of the zero category; 50 without one.
pub fn zero_fraction(data: &ChartPayload) -> f64 {
    let last = data.x.len().saturating_sub(1).max(1) as f64;
    data.x
        .iter()
        .position(|category| category.as_f64() == Some(0.0))
        .map(|index| index as f64 / last * 100.0)
        .unwrap_or(50.0)
}

fn arrow_glyphs(arrows: &DirectionArrows, zero: f64, text_color: &str) -> Vec<GraphicText> {
    let text = |text: &str, font_size: f64, bold: bool| GraphicStyle {
        text: text.to_string(),
        fill: text_color.to_string(),
        font_size,
        font_weight: bold.then(|| "bold".to_string()),
        ..Default::default()
    };
    let at = |left: Option<Dim>, right: Option<Dim>, top: f64, style: GraphicStyle| GraphicText {
        left,
        right,
        top: Some(top),
        ..GraphicText::new(style)
    };

    let mut zero_label = text("0", 14.0, true);
    zero_label.text_align = Some("center".to_string());
    vec![
        at(Some(Dim::from("8%")), None, 8.0, text(&arrows.left, 12.0, false)),
        at(Some(Dim::pct(zero - 4.0)), None, 8.0, text("\u{2190}\u{2190}", 13.0, true)),
        at(Some(Dim::pct(zero)), None, 6.0, zero_label),
        at(Some(Dim::pct(zero + 3.0)), None, 8.0, text("\u{2192}\u{2192}", 13.0, true)),
        at(None, Some(Dim::from("4%")), 8.0, text(&arrows.right, 12.0, false)),
    ]
}

/// Stacked areas over a signed offset axis with direction captions
/// around the zero category.
pub fn build(data: &ChartPayload, ctx: &BuildContext) -> ChartOption {
    let y_label = ctx.opt_label(data.y_axis_label.as_deref()).unwrap_or_else(|| DEFAULT_Y_LABEL.to_string());
    let x_label = ctx.opt_label(data.x_axis_label.as_deref());

    let mut x_label_style = AxisLabel::colored(ctx.text_color(), 11.0).with_formatter(LabelFormatter::SignedOffset);
    x_label_style.hide_overlap = Some(true);
    let mut x_axis = Axis::category(data.x.clone())
        .titled(x_label.clone(), 36.0, ctx.text_color(), 12.0)
        .with_axis_line(ctx.grid_color())
        .with_label(x_label_style);
    x_axis.boundary_gap = Some(false);

    let y_formatter = data
        .y_axis_format
        .as_deref()
        .and_then(LabelFormatter::from_payload_tag)
        .unwrap_or(LabelFormatter::CompactCurrency);
    let mut y_axis = Axis::value()
        .titled(Some(y_label), 45.0, ctx.text_color(), 11.0)
        .with_axis_line(ctx.grid_color())
        .with_label(AxisLabel::colored(ctx.text_color(), 11.0).with_formatter(y_formatter));
    y_axis.split_line = Some(SplitLine::colored(ctx.grid_color()));

    let mut series: Vec<Series> = data
        .series
        .iter()
        .map(|source| {
            let series_type = SeriesType::parse_or(source.series_type.as_deref(), SeriesType::Line);
            let mut series = Series::new(series_type, SeriesData::Values(source.data.clone())).named(source.name.clone());
            series.show_symbol = Some(false);
            series.smooth = Some(source.smooth.unwrap_or(false));
            series.stack = source.stack.clone().filter(|stack| !stack.is_empty());
            if source.area {
                series.area_style = Some(AreaStyle { opacity: 0.85, color: source.color.clone() });
            }
            if let Some(color) = &source.color {
                series.item_style = Some(ItemStyle::colored(color));
                series.line_style = Some(LineStyle { width: Some(1.0), ..LineStyle::colored(color) });
            }
            series
        })
        .collect();

    if let Some(mark_line) = mark_lines::volatility_mark_lines(data) {
        let target = series.iter().position(|s| !s.data.is_empty()).unwrap_or(0);
        if let Some(series) = series.get_mut(target) {
            series.mark_line = Some(mark_line);
        }
    }

    let graphic = data
        .direction_arrows
        .as_ref()
        .map(|arrows| arrow_glyphs(arrows, zero_fraction(data), ctx.text_color()))
        .unwrap_or_default();

    ChartOption {
        color: ctx.theme.palette.clone(),
        tooltip: Some(Tooltip::axis()),
        legend: Some(Legend::bottom(ctx.text_color())),
        grid: vec![Grid::px(55.0, 18.0, 40.0, if x_label.is_some() { 72.0 } else { 60.0 }, true)],
        x_axis: vec![x_axis],
        y_axis: vec![y_axis],
        graphic,
        series,
        ..Default::default()
    }
}
