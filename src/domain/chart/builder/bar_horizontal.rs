use super::BuildContext;
use crate::domain::chart::option::{
    Axis, AxisLabel, ChartOption, Grid, ItemStyle, Legend, LegendEntry, Series, SeriesData, SeriesType, SplitLine,
    TextStyle, Tooltip,
};
use crate::domain::formatting::LabelFormatter;
use crate::domain::widget::ChartPayload;
use std::collections::HashMap;

const PLACEHOLDER_STACK: &str = "__legend_placeholder__";

/// Grouped legend: blank spacer between groups, a bold icon-less title,
/// then the member entries coloured like their series.
fn grouped_legend(data: &ChartPayload, ctx: &BuildContext) -> Vec<LegendEntry> {
    let colors: HashMap<&str, &str> = data
        .series
        .iter()
        .filter_map(|series| series.color.as_deref().map(|color| (series.name.as_str(), color)))
        .collect();

    let mut entries = Vec::new();
    for (i, group) in data.legend_groups.iter().enumerate() {
        if i > 0 {
            entries.push(LegendEntry::Plain(String::new()));
        }
        entries.push(LegendEntry::Named {
            name: group.title.clone(),
            icon: Some("none".to_string()),
            text_style: Some(TextStyle {
                color: Some(ctx.text_color().to_string()),
                font_size: None,
                font_weight: Some("bold".to_string()),
            }),
            item_style: None,
        });
        for item in &group.items {
            entries.push(LegendEntry::Named {
                name: item.clone(),
                icon: None,
                text_style: None,
                item_style: colors.get(item.as_str()).map(|color| ItemStyle::colored(color)),
            });
        }
    }
    entries
}

/// Stacked horizontal bars: currency value axis, category rows on y.
pub fn build(data: &ChartPayload, ctx: &BuildContext) -> ChartOption {
    let grouped = !data.legend_groups.is_empty();

    let mut x_axis = Axis::value()
        .with_axis_line(ctx.grid_color())
        .with_label(AxisLabel::colored(ctx.text_color(), 11.0).with_formatter(LabelFormatter::CompactCurrency));
    x_axis.split_line = Some(SplitLine::colored(ctx.grid_color()));

    let mut y_label = AxisLabel::colored(ctx.text_color(), 12.0);
    y_label.font_weight = Some("bold".to_string());
    let y_axis = Axis::category(data.x.clone()).with_axis_line(ctx.grid_color()).with_label(y_label);

    let mut series: Vec<Series> = data
        .series
        .iter()
        .map(|source| {
            let mut series = Series::new(SeriesType::Bar, SeriesData::Values(source.data.clone()))
                .named(ctx.label(&source.name));
            series.stack = source.stack.clone();
            series.bar_width = data.bar_width.clone();
            series.item_style = source.color.as_deref().map(ItemStyle::colored);
            series
        })
        .collect();

    let mut legend = Legend::bottom(ctx.text_color());
    if grouped {
        legend.data = Some(grouped_legend(data, ctx));
        for group in &data.legend_groups {
            let mut placeholder = Series::new(SeriesType::Bar, SeriesData::Values(Vec::new())).named(group.title.clone());
            placeholder.stack = Some(PLACEHOLDER_STACK.to_string());
            placeholder.silent = Some(true);
            placeholder.item_style = Some(ItemStyle::colored("transparent"));
            placeholder.tooltip = Some(Tooltip::hidden());
            series.push(placeholder);
        }
    }

    ChartOption {
        color: ctx.theme.palette.clone(),
        tooltip: Some(Tooltip::axis()),
        legend: Some(legend),
        grid: vec![Grid::px(10.0, 24.0, 18.0, if grouped { 80.0 } else { 60.0 }, true)],
        x_axis: vec![x_axis],
        y_axis: vec![y_axis],
        series,
        ..Default::default()
    }
}
