use super::BuildContext;
use crate::domain::chart::option::{
    Formatter, LineStyle, LineType, MarkLabel, MarkLine, MarkLineDatum, ReferenceKind, Symbol,
};
use crate::domain::chart::windowing::nearest_category_index;
use crate::domain::formatting::format_price_4dp;
use crate::domain::widget::ChartPayload;

pub const PEG_COLOR: &str = "#ffe45c";
const MARK_FALLBACK_COLOR: &str = "#aaa";
const VOLATILITY_COLOR: &str = "#28c987";
/// Peg and current-price labels closer than this many categories are split apart.
const CLOSE_LABEL_DISTANCE: usize = 4;

fn nearest_index(data: &ChartPayload, target: f64) -> i64 {
    nearest_category_index(&data.x, target).unwrap_or(0) as i64
}

/// Labelled dashed lines requested by the payload (`mark_lines`).
pub fn payload_mark_lines(data: &ChartPayload, ctx: &BuildContext) -> Option<MarkLine> {
    if data.mark_lines.is_empty() {
        return None;
    }
    let lines = data
        .mark_lines
        .iter()
        .map(|line| {
            let color = line.color.as_deref().unwrap_or(MARK_FALLBACK_COLOR);
            MarkLineDatum {
                x_axis: Some(nearest_index(data, line.value)),
                line_style: Some(LineStyle {
                    color: Some(color.to_string()),
                    line_type: Some(LineType::Dashed),
                    width: Some(2.0),
                    opacity: None,
                }),
                label: Some(MarkLabel {
                    show: Some(true),
                    formatter: Some(Formatter::template(&line.label)),
                    position: Some("end".to_string()),
                    color: Some(color.to_string()),
                    font_size: Some(12.0),
                    font_weight: Some("bold".to_string()),
                    background_color: Some(ctx.theme.mark_label_background.clone()),
                    padding: Some(vec![3.0, 6.0]),
                    border_radius: Some(3.0),
                    ..Default::default()
                }),
                ..Default::default()
            }
        })
        .collect();
    Some(MarkLine { silent: true, symbol: Some(Symbol::none()), data: lines, ..Default::default() })
}

/// Unlabelled dashed volatility markers for line-area charts.
pub fn volatility_mark_lines(data: &ChartPayload) -> Option<MarkLine> {
    if data.volatility_lines.is_empty() {
        return None;
    }
    let lines = data
        .volatility_lines
        .iter()
        .map(|line| MarkLineDatum {
            x_axis: Some(nearest_index(data, line.value)),
            line_style: Some(LineStyle {
                color: Some(line.color.clone().unwrap_or_else(|| VOLATILITY_COLOR.to_string())),
                line_type: Some(LineType::Dashed),
                width: Some(2.0),
                opacity: None,
            }),
            label: Some(MarkLabel::hidden()),
            ..Default::default()
        })
        .collect();
    Some(MarkLine { silent: true, symbol: Some(Symbol::none()), data: lines, ..Default::default() })
}

fn badge_label(ctx: &BuildContext) -> MarkLabel {
    MarkLabel {
        show: Some(true),
        position: Some("end".to_string()),
        rotate: Some(0.0),
        vertical_align: Some("top".to_string()),
        color: Some(ctx.text_color().to_string()),
        font_size: Some(11.0),
        background_color: Some(ctx.theme.badge.background_color.clone()),
        border_color: Some(ctx.theme.badge.border_color.clone()),
        border_width: Some(1.0),
        padding: Some(vec![1.0, 4.0]),
        border_radius: Some(3.0),
        ..Default::default()
    }
}

/// Peg (yellow, dotted) and current-price (theme violet) reference lines
/// on a tick axis. `None` without categories or without any finite reference.
pub fn tick_reference_mark_line(data: &ChartPayload, ctx: &BuildContext) -> Option<MarkLine> {
    if data.x.is_empty() {
        return None;
    }
    let refs = data.reference_lines;
    let peg_index = refs.peg.and_then(|peg| nearest_category_index(&data.x, peg));
    let current_index = refs.current_price.and_then(|price| nearest_category_index(&data.x, price));

    let mut lines = Vec::new();
    if let Some(index) = peg_index {
        lines.push(MarkLineDatum {
            reference: Some(ReferenceKind::Peg),
            name: Some("Peg".to_string()),
            x_axis: Some(index as i64),
            line_style: Some(LineStyle {
                color: Some(PEG_COLOR.to_string()),
                line_type: Some(LineType::Dotted),
                width: Some(2.0),
                opacity: Some(0.98),
            }),
            label: None,
        });
    }
    if let (Some(index), Some(price)) = (current_index, refs.current_price) {
        lines.push(MarkLineDatum {
            reference: Some(ReferenceKind::CurrentPrice),
            name: Some(format_price_4dp(&price.to_string())),
            x_axis: Some(index as i64),
            line_style: Some(LineStyle {
                color: Some(ctx.theme.current_price_color.clone()),
                line_type: Some(LineType::Dotted),
                width: Some(2.0),
                opacity: Some(0.95),
            }),
            label: None,
        });
    }
    if lines.is_empty() {
        return None;
    }

    if let (Some(peg), Some(current)) = (peg_index, current_index) {
        if peg.abs_diff(current) <= CLOSE_LABEL_DISTANCE {
            let peg_on_right = peg > current;
            for line in &mut lines {
                let place_right = match line.reference {
                    Some(ReferenceKind::Peg) => peg_on_right,
                    _ => !peg_on_right,
                };
                let mut label = badge_label(ctx);
                label.align = Some(if place_right { "left" } else { "right" }.to_string());
                label.offset = Some(if place_right { [8.0, 2.0] } else { [-8.0, 2.0] });
                line.label = Some(label);
            }
        }
    }

    let mut default_label = badge_label(ctx);
    default_label.formatter = Some(Formatter::template("{b}"));
    default_label.align = Some("center".to_string());
    default_label.offset = Some([0.0, 2.0]);

    Some(MarkLine {
        silent: true,
        animation: Some(false),
        symbol: Some(Symbol::none_pair()),
        label: Some(default_label),
        z: Some(20),
        data: lines,
    })
}
