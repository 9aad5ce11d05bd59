use super::BuildContext;
use crate::domain::chart::option::{
    Axis, AxisLabel, ChartOption, CustomRenderer, Formatter, Grid, ItemStyle, LineStyle, LineType, MarkLabel, MarkLine,
    MarkLineDatum, Series, SeriesData, SeriesType, SplitLine, Symbol, TimelineDatum, Toggle, Tooltip,
    TooltipFormatter,
};
use crate::domain::chart::value_objects::AxisBound;
use crate::domain::widget::{Category, ChartPayload};
use crate::time_utils::parse_iso_millis;
use serde_json::json;

const DEFAULT_BAR_COLOR: &str = "#4bb7ff";
const NOW_COLOR: &str = "#ef4444";
const DAY_MS: f64 = 86_400_000.0;

/// Padded time domain `(min, max)` over every bar endpoint; `None` without bars.
pub fn padded_domain(data: &ChartPayload) -> Option<(f64, f64)> {
    let times: Vec<f64> = data
        .bars
        .iter()
        .flat_map(|bar| [parse_iso_millis(&bar.start), parse_iso_millis(&bar.end)])
        .flatten()
        .map(|ms| ms as f64)
        .collect();
    let min = times.iter().copied().reduce(f64::min)?;
    let max = times.iter().copied().reduce(f64::max)?;
    let pad = match (max - min) * 0.05 {
        pad if pad > 0.0 => pad,
        _ => DAY_MS,
    };
    Some((min - pad, max + pad))
}

fn now_marker(data: &ChartPayload, domain: Option<(f64, f64)>) -> Option<MarkLine> {
    let (min, max) = domain?;
    let now = data.now.as_deref().and_then(parse_iso_millis)?;
    if (now as f64) < min || (now as f64) > max {
        return None;
    }
    Some(MarkLine {
        silent: true,
        symbol: Some(Symbol::none()),
        data: vec![MarkLineDatum {
            x_axis: Some(now),
            line_style: Some(LineStyle {
                color: Some(NOW_COLOR.to_string()),
                line_type: Some(LineType::Dashed),
                width: Some(2.0),
                opacity: None,
            }),
            label: Some(MarkLabel {
                show: Some(true),
                formatter: Some(Formatter::template("Now")),
                color: Some(NOW_COLOR.to_string()),
                font_size: Some(12.0),
                font_weight: Some("bold".to_string()),
                position: Some("start".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }],
        ..Default::default()
    })
}

/// Gantt-style rows, one rectangle per bar on a time axis.
pub fn build(data: &ChartPayload, ctx: &BuildContext) -> ChartOption {
    let domain = padded_domain(data);

    let spans = data
        .bars
        .iter()
        .enumerate()
        .map(|(row, bar)| {
            let start = parse_iso_millis(&bar.start).map_or(f64::NAN, |ms| ms as f64);
            let end = parse_iso_millis(&bar.end).map_or(f64::NAN, |ms| ms as f64);
            TimelineDatum {
                value: [row as f64, start, end],
                item_style: ItemStyle::colored(bar.color.as_deref().unwrap_or(DEFAULT_BAR_COLOR)),
            }
        })
        .collect();

    let mut x_label = AxisLabel::colored(ctx.text_color(), 11.0);
    x_label.hide_overlap = Some(true);
    let mut x_axis = Axis::time().with_axis_line(ctx.grid_color()).with_label(x_label);
    x_axis.split_line = Some(SplitLine::hidden());
    if let Some((min, max)) = domain {
        x_axis.min = Some(AxisBound::Value(min));
        x_axis.max = Some(AxisBound::Value(max));
    }

    let mut y_label = AxisLabel::colored(ctx.text_color(), 12.0);
    y_label.font_weight = Some("500".to_string());
    let rows = data.bars.iter().map(|bar| Category::from(bar.label.as_str())).collect();
    let mut y_axis = Axis::category(rows).with_axis_line(ctx.grid_color()).with_label(y_label);
    y_axis.inverse = Some(true);
    y_axis.axis_tick = Some(Toggle::HIDDEN);

    let mut bars = Series::new(SeriesType::Custom, SeriesData::Spans(spans));
    bars.render_item = Some(CustomRenderer::TimelineBar);
    bars.encode = Some(json!({"x": [1, 2], "y": 0}));
    bars.mark_line = now_marker(data, domain);

    ChartOption {
        tooltip: Some(Tooltip::item(TooltipFormatter::TimelineSpan)),
        grid: vec![Grid {
            contain_label: None,
            ..Grid::px(140.0, 24.0, 28.0, 32.0, false)
        }],
        x_axis: vec![x_axis],
        y_axis: vec![y_axis],
        series: vec![bars],
        ..Default::default()
    }
}
