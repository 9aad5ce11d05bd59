use super::BuildContext;
use crate::domain::chart::option::{
    ChartOption, Formatter, GraphicStyle, GraphicText, ItemStyle, Legend, LegendEntry, MarkLabel, PieDatum, Series,
    SeriesData, SeriesType, Tooltip, TooltipFormatter,
};
use crate::domain::widget::ChartPayload;
use serde_json::json;

/// Donut with percentage labels inside the slices.
pub fn build(data: &ChartPayload, ctx: &BuildContext) -> ChartOption {
    let slices = data
        .slices
        .iter()
        .map(|slice| PieDatum {
            name: slice.name.clone(),
            value: slice.value,
            item_style: slice.color.as_deref().map(ItemStyle::colored),
        })
        .collect();

    let mut donut = Series::new(SeriesType::Pie, SeriesData::Slices(slices));
    donut.radius = Some(["25%".to_string(), "65%".to_string()]);
    donut.center = Some(["50%".to_string(), "45%".to_string()]);
    donut.avoid_label_overlap = Some(true);
    donut.label = Some(MarkLabel {
        show: Some(true),
        formatter: Some(Formatter::template("{d}%")),
        color: Some("#fff".to_string()),
        font_size: Some(13.0),
        font_weight: Some("bold".to_string()),
        position: Some("inside".to_string()),
        ..Default::default()
    });
    donut.emphasis = Some(json!({
        "itemStyle": {"shadowBlur": 10, "shadowOffsetX": 0, "shadowColor": "rgba(0,0,0,0.5)"}
    }));

    let mut legend = Legend::bottom(ctx.text_color());
    legend.data = Some(data.slices.iter().map(|slice| LegendEntry::Plain(slice.name.clone())).collect());

    let graphic = data
        .title_extra
        .as_ref()
        .map(|caption| {
            vec![GraphicText {
                left: Some("center".into()),
                bottom: Some(30.0),
                ..GraphicText::new(GraphicStyle {
                    text: caption.clone(),
                    fill: ctx.text_color().to_string(),
                    font_size: 11.0,
                    opacity: Some(0.7),
                    ..Default::default()
                })
            }]
        })
        .unwrap_or_default();

    ChartOption {
        tooltip: Some(Tooltip::item(TooltipFormatter::PieSlice)),
        legend: Some(legend),
        graphic,
        series: vec![donut],
        ..Default::default()
    }
}
