//! Top-N group rankings and the cost breakdown pie

use costboard_types::{
    BreakdownKind, BreakdownSlice, MetricKey, MetricValue, RawReport, ReportPeriod, TopItem,
    TopItems,
};

use super::aggregate::aggregate_series;
use crate::error::AggregateError;

/// Label of the remainder bucket in a top-N list
pub const OTHERS_LABEL: &str = "Others";

fn share_of(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        value / total
    }
}

/// Rank the groups of a report and keep the first `limit`
///
/// Shares are computed against `meta.total` for the metric when the
/// backend reports a non-zero total (it spans every page), otherwise
/// against the sum of all groups in this report.
pub(crate) fn top_items(
    report: &RawReport,
    metric: MetricKey,
    group_key: &str,
    limit: usize,
    default_units: &str,
) -> Result<TopItems, AggregateError> {
    let series = aggregate_series(
        report,
        metric,
        Some(group_key),
        ReportPeriod::Current,
        default_units,
    )?;

    let total = report
        .meta
        .total
        .metric(metric)
        .map(|t| t.value)
        .filter(|v| *v != 0.0)
        .unwrap_or_else(|| series.total());

    let items: Vec<TopItem> = series
        .points
        .iter()
        .take(limit)
        .map(|p| TopItem {
            label: p.key.clone(),
            value: p.y,
            units: p.units.clone(),
            share: share_of(p.y, total),
        })
        .collect();

    let others = if series.len() > limit {
        let rest: f64 = series.points.iter().skip(limit).map(|p| p.y).sum();
        Some(TopItem {
            label: OTHERS_LABEL.to_string(),
            value: rest,
            units: series.units.clone(),
            share: share_of(rest, total),
        })
    } else {
        None
    };

    Ok(TopItems {
        metric,
        group_key: group_key.to_string(),
        total,
        units: series.units,
        items,
        others,
    })
}

/// Markup, raw and usage slices of the report's cost total
///
/// Any missing part is reported as zero in `default_units`.
pub(crate) fn cost_breakdown(report: &RawReport, default_units: &str) -> [BreakdownSlice; 3] {
    let cost = report.meta.total.cost.as_ref();

    let slice = |kind: BreakdownKind, part: Option<&MetricValue>| match part {
        Some(v) => BreakdownSlice {
            kind,
            value: v.value,
            units: if v.has_units() {
                v.units.clone()
            } else {
                default_units.to_string()
            },
        },
        None => BreakdownSlice {
            kind,
            value: 0.0,
            units: default_units.to_string(),
        },
    };

    [
        slice(BreakdownKind::Markup, cost.and_then(|c| c.markup.as_ref())),
        slice(BreakdownKind::Raw, cost.and_then(|c| c.raw.as_ref())),
        slice(BreakdownKind::Usage, cost.and_then(|c| c.usage.as_ref())),
    ]
}
