//! Per-widget option transforms.
//!
//! A widget profile names the transforms that apply to it. Preparation
//! steps rewrite the payload before the kind builder runs; the rest
//! rewrite the built base option. Both run in `Transform` order, so a
//! profile's list order never matters.

use super::{BuildContext, mark_lines};
use crate::domain::chart::option::{
    Axis, AxisIndex, AxisLabel, ChartOption, DataZoom, Dim, SeriesData, SplitLine, Tooltip, TooltipFormatter,
};
use crate::domain::chart::value_objects::{AxisBound, BoundRule};
use crate::domain::chart::windowing::{TrailingWindow, trim_to_trailing_window, trim_trailing_incomplete_bucket};
use crate::domain::formatting::LabelFormatter;
use crate::domain::logging::LogComponent;
use crate::domain::widget::ChartPayload;
use crate::log_debug;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

const DISTRIBUTION_STACK: &str = "active-tick-liquidity";
const TOKEN0_LIQUIDITY: &str = "USX Liquidity";
const TOKEN1_LIQUIDITY: &str = "USDC Liquidity";
const TOKEN0_COLOR: &str = "#f8a94a";
const TOKEN1_COLOR: &str = "#4bb7ff";
const LP_NET_RESERVE: &str = "LP Net % Reserve";
const SPREAD_PADDING: f64 = 0.15;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Transform {
    // payload preparation
    TrimTrailingBucket,
    TrimToTrailingWindow,
    // option overrides
    DepthZeroFill,
    ComparableLiquidityLayout,
    DistributionStacking,
    LinkedTimeseriesFormat,
    TickReferenceMarks,
    LpFlowSymmetricAxes,
    SwapsFlowAxes,
    PriceImpactAxis,
    SpreadVolatilityAxes,
    DistributionAxes,
}

impl Transform {
    pub fn is_preparation(&self) -> bool {
        matches!(self, Transform::TrimTrailingBucket | Transform::TrimToTrailingWindow)
    }
}

/// Resolved per-widget behaviour: ordered transforms plus fixed-focus membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetProfile {
    transforms: Vec<Transform>,
    pub fixed_focus: bool,
}

impl WidgetProfile {
    pub fn new(mut transforms: Vec<Transform>, fixed_focus: bool) -> Self {
        transforms.sort();
        transforms.dedup();
        Self { transforms, fixed_focus }
    }

    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    pub fn has(&self, transform: Transform) -> bool {
        self.transforms.contains(&transform)
    }

    pub fn tick_reference(&self) -> bool {
        self.has(Transform::TickReferenceMarks)
    }
}

/// Runs the profile's preparation steps on the payload.
pub fn prepare(data: &mut ChartPayload, ctx: &BuildContext) {
    for transform in ctx.profile.transforms().iter().filter(|t| t.is_preparation()) {
        match transform {
            Transform::TrimTrailingBucket => {
                if trim_trailing_incomplete_bucket(data, ctx.now_ms) {
                    log_debug!(LogComponent::Domain("Overrides"), "✂️ dropped incomplete trailing bucket");
                }
            }
            Transform::TrimToTrailingWindow => {
                let window = TrailingWindow::from_tag(ctx.last_window);
                let dropped = trim_to_trailing_window(data, window);
                log_debug!(LogComponent::Domain("Overrides"), "✂️ trailing {} window dropped {} buckets", window, dropped);
            }
            _ => {}
        }
    }
}

/// Applies the profile's overrides to a base-layout option.
pub fn apply(option: &mut ChartOption, data: &mut ChartPayload, ctx: &BuildContext) {
    let transforms = ctx.profile.transforms();
    let before_gap = transforms.iter().take_while(|t| **t <= Transform::ComparableLiquidityLayout);
    let after_gap = transforms.iter().skip_while(|t| **t <= Transform::ComparableLiquidityLayout);

    for transform in before_gap.filter(|t| !t.is_preparation()) {
        apply_one(*transform, option, data, ctx);
    }
    if let Some(x_axis) = option.x_axis.first_mut() {
        x_axis.boundary_gap = Some(false);
    }
    for transform in after_gap {
        apply_one(*transform, option, data, ctx);
    }
}

fn apply_one(transform: Transform, option: &mut ChartOption, data: &mut ChartPayload, ctx: &BuildContext) {
    match transform {
        Transform::TrimTrailingBucket | Transform::TrimToTrailingWindow => {}
        Transform::DepthZeroFill => depth_zero_fill(option),
        Transform::ComparableLiquidityLayout => comparable_liquidity_layout(option, data, ctx),
        Transform::DistributionStacking => distribution_stacking(option, data, ctx),
        Transform::LinkedTimeseriesFormat => linked_timeseries_format(option, ctx),
        Transform::TickReferenceMarks => {
            if let Some(mark_line) = mark_lines::tick_reference_mark_line(data, ctx) {
                if let Some(first) = option.series.first_mut() {
                    first.mark_line = Some(mark_line);
                }
            }
        }
        Transform::LpFlowSymmetricAxes => lp_flow_symmetric_axes(option, ctx),
        Transform::SwapsFlowAxes => {
            option.y_axis = vec![
                left_axis(ctx, None),
                right_axis(ctx, plain_label(ctx).with_formatter(LabelFormatter::Round)),
            ];
        }
        Transform::PriceImpactAxis => {
            option.y_axis = vec![left_axis(ctx, Some(LabelFormatter::Fixed3))];
        }
        Transform::SpreadVolatilityAxes => spread_volatility_axes(option, ctx),
        Transform::DistributionAxes => distribution_axes(option, ctx),
    }
}

fn plain_label(ctx: &BuildContext) -> AxisLabel {
    AxisLabel { color: Some(ctx.text_color().to_string()), ..Default::default() }
}

/// Gridded left value axis with fixed-width labels.
fn left_axis(ctx: &BuildContext, formatter: Option<LabelFormatter>) -> Axis {
    let mut label = plain_label(ctx).fixed_width_right();
    label.formatter = formatter.map(Into::into);
    let mut axis = Axis::value().with_axis_line(ctx.grid_color()).with_label(label);
    axis.split_line = Some(SplitLine::colored(ctx.grid_color()));
    axis
}

fn right_axis(ctx: &BuildContext, label: AxisLabel) -> Axis {
    let mut axis = Axis::value().with_axis_line(ctx.grid_color()).with_label(label);
    axis.position = Some("right".to_string());
    axis.split_line = Some(SplitLine::hidden());
    axis
}

fn depth_zero_fill(option: &mut ChartOption) {
    for series in &mut option.series {
        if let SeriesData::Values(values) = &mut series.data {
            for value in values.iter_mut() {
                *value = Some(value.filter(|v| v.is_finite()).unwrap_or(0.0));
            }
        }
        series.connect_nulls = Some(true);
    }
}

fn comparable_liquidity_layout(option: &mut ChartOption, data: &ChartPayload, ctx: &BuildContext) {
    let has_x_label = ctx.opt_label(data.x_axis_label.as_deref()).is_some();
    let grid = option.primary_grid();
    grid.left = Some(Dim::Px(82.0));
    grid.right = Some(Dim::Px(18.0));
    grid.bottom = Some(Dim::Px(if has_x_label { 72.0 } else { 60.0 }));
    grid.contain_label = Some(false);

    if let Some(y_axis) = option.y_axis.first_mut() {
        let label = y_axis.label_mut();
        *label = std::mem::take(label).fixed_width_right();
    }
    if let Some(x_axis) = option.x_axis.first_mut() {
        let label = x_axis.label_mut();
        label.formatter = Some(LabelFormatter::Price4dp.into());
        label.margin = Some(8.0);
        label.hide_overlap = Some(true);
    }
}

/// Puts both token liquidity series on one stack and snaps the current
/// price reference to the tick where both tokens hold liquidity.
fn distribution_stacking(option: &mut ChartOption, data: &mut ChartPayload, ctx: &BuildContext) {
    let has_x_label = ctx.opt_label(data.x_axis_label.as_deref()).is_some();
    option.primary_grid().bottom = Some(Dim::Px(if has_x_label { 72.0 } else { 60.0 }));
    if option.series.len() < 2 {
        return;
    }

    let token0 = ctx.label(TOKEN0_LIQUIDITY);
    let token1 = ctx.label(TOKEN1_LIQUIDITY);
    let rank = |name: &str| match name {
        name if name == token0 => 0,
        name if name == token1 => 1,
        _ => 2,
    };
    // stable: equal ranks keep payload order
    option.series.sort_by_key(|series| rank(series.name_str()));
    for series in &mut option.series {
        series.stack = Some(DISTRIBUTION_STACK.to_string());
        match rank(series.name_str()) {
            0 => series.paint(TOKEN0_COLOR),
            1 => series.paint(TOKEN1_COLOR),
            _ => {}
        }
    }

    let Some(raw_current) = data.reference_lines.current_price.filter(|price| price.is_finite()) else {
        return;
    };
    if data.x.is_empty() {
        return;
    }
    let first = option.series[0].data.values();
    let second = option.series[1].data.values();
    let overlap_len = data.x.len().min(first.len()).min(second.len());
    let distance = |index: usize| data.x[index].as_f64().map_or(f64::NAN, |x| (x - raw_current).abs());

    let mut best: Option<usize> = None;
    for index in 0..overlap_len {
        let left = first[index].unwrap_or(0.0);
        let right = second[index].unwrap_or(0.0);
        if left > 0.0 && right > 0.0 {
            best = match best {
                Some(current) if distance(index) < distance(current) => Some(index),
                Some(current) => Some(current),
                None => Some(index),
            };
        }
    }
    if let Some(index) = best {
        data.reference_lines.current_price = data.x[index].as_f64();
    }
}

fn linked_timeseries_format(option: &mut ChartOption, ctx: &BuildContext) {
    let has_right_axis = option.y_axis.len() > 1;
    let has_right_label = has_right_axis && option.y_axis[1].name.is_some();
    let right = match (has_right_axis, has_right_label) {
        (true, true) => 76.0,
        (true, false) => 64.0,
        (false, _) => 24.0,
    };
    let grid = option.primary_grid();
    grid.left = Some(Dim::Px(82.0));
    grid.right = Some(Dim::Px(right));
    grid.bottom = Some(Dim::Px(60.0));
    grid.contain_label = Some(false);

    if let Some(x_axis) = option.x_axis.first_mut() {
        x_axis.label_mut().formatter = Some(LabelFormatter::CompactTimestamp.into());
    }
    if let Some(y_axis) = option.y_axis.first_mut() {
        let label = y_axis.label_mut();
        *label = std::mem::take(label).fixed_width_right();
    }

    option.data_zoom = vec![
        DataZoom::inside_x(AxisIndex::One(0)),
        DataZoom::slider_x(AxisIndex::One(0), ctx.grid_color()),
    ];
    option.tooltip = Some(Tooltip { formatter: Some(TooltipFormatter::LinkedTimestamp), ..Tooltip::axis() });
}

fn lp_flow_symmetric_axes(option: &mut ChartOption, ctx: &BuildContext) {
    let symmetric = |mut axis: Axis| {
        axis.min = Some(AxisBound::Rule(BoundRule::SymmetricMin));
        axis.max = Some(AxisBound::Rule(BoundRule::SymmetricMax));
        axis
    };
    option.y_axis = vec![
        symmetric(left_axis(ctx, None)),
        symmetric(right_axis(ctx, plain_label(ctx).with_formatter(LabelFormatter::Percent2))),
    ];

    let lp_color = ctx.theme.primary_color().to_string();
    for series in option.series.iter_mut().filter(|s| s.name_str() == LP_NET_RESERVE) {
        series.y_axis_index = Some(1);
        series.paint(&lp_color);
    }
}

fn spread_volatility_axes(option: &mut ChartOption, ctx: &BuildContext) {
    let padded = |mut axis: Axis| {
        axis.min = Some(AxisBound::Rule(BoundRule::SpanPaddedMin { ratio: SPREAD_PADDING }));
        axis.max = Some(AxisBound::Rule(BoundRule::SpanPaddedMax { ratio: SPREAD_PADDING }));
        axis
    };
    option.y_axis = vec![
        padded(left_axis(ctx, Some(LabelFormatter::Fixed2))),
        padded(right_axis(ctx, plain_label(ctx).with_formatter(LabelFormatter::Fixed6))),
    ];
}

fn distribution_axes(option: &mut ChartOption, ctx: &BuildContext) {
    if let Some(x_axis) = option.x_axis.first_mut() {
        x_axis.boundary_gap = Some(true);
    }
    let grid = option.primary_grid();
    grid.left = Some(Dim::Px(72.0));
    grid.right = Some(Dim::Px(52.0));

    let mut left = Axis::value()
        .with_axis_line(ctx.grid_color())
        .with_label(plain_label(ctx).with_formatter(LabelFormatter::Round));
    left.split_line = Some(SplitLine::colored(ctx.grid_color()));
    option.y_axis = vec![left, right_axis(ctx, plain_label(ctx).with_formatter(LabelFormatter::Fixed2))];
}
