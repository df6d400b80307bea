//! Report normalization into date- or group-keyed series
//!
//! Rows sharing an x-axis key are summed so the output holds exactly one
//! point per distinct key. Rows missing the requested metric contribute
//! zero instead of being dropped, which keeps date series dense.

use chrono::{DateTime, NaiveDate};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use costboard_types::{AxisValue, MetricKey, RawReport, ReportPeriod, Series, SeriesPoint};

use crate::error::AggregateError;

/// Parse a report row date
///
/// Accepts daily (`2024-03-05`), monthly (`2024-03`, mapped to the first
/// of the month) and RFC 3339 timestamps.
pub fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Resolve the single units label of a series
///
/// First non-empty units among the rows wins, then the report total for
/// the metric, then `default_units`. Mixed units are kept, not rejected.
pub(crate) fn resolve_units(report: &RawReport, metric: MetricKey, default_units: &str) -> String {
    let seen: Vec<&str> = report
        .data
        .iter()
        .filter_map(|row| row.value(metric))
        .filter(|v| v.has_units())
        .map(|v| v.units.as_str())
        .collect();

    if let Some(first) = seen.first() {
        let distinct: BTreeSet<&str> = seen.iter().copied().collect();
        if distinct.len() > 1 {
            tracing::warn!(
                metric = %metric,
                kept = %first,
                found = ?distinct,
                "Mixed units in report, keeping first"
            );
        }
        return (*first).to_string();
    }

    report
        .meta
        .total
        .metric(metric)
        .filter(|t| t.has_units())
        .map(|t| t.units)
        .unwrap_or_else(|| default_units.to_string())
}

/// Aggregate one metric of a report
pub(crate) fn aggregate_series(
    report: &RawReport,
    metric: MetricKey,
    group_key: Option<&str>,
    period: ReportPeriod,
    default_units: &str,
) -> Result<Series, AggregateError> {
    let units = resolve_units(report, metric, default_units);

    if report.data.is_empty() {
        return Ok(Series::empty(metric, period, units));
    }

    let points = match group_key {
        Some(key) => group_keyed(report, metric, key, &units)?,
        None => date_keyed(report, metric, &units),
    };

    Ok(Series {
        metric,
        period,
        units,
        points,
    })
}

/// Ascending by calendar date
fn date_keyed(report: &RawReport, metric: MetricKey, units: &str) -> Vec<SeriesPoint> {
    let mut buckets: BTreeMap<NaiveDate, (String, f64)> = BTreeMap::new();

    for row in &report.data {
        let Some(date) = parse_report_date(&row.date) else {
            tracing::warn!("Report row date {:?} is not a valid date, skipping", row.date);
            continue;
        };

        let value = row.value(metric).map(|v| v.value).unwrap_or(0.0);
        let bucket = buckets
            .entry(date)
            .or_insert_with(|| (row.date.trim().to_string(), 0.0));
        bucket.1 += value;
    }

    buckets
        .into_iter()
        .map(|(date, (key, y))| SeriesPoint {
            key,
            x: AxisValue::Date(date),
            y,
            units: units.to_string(),
        })
        .collect()
}

/// Descending by value, ties by ascending label
fn group_keyed(
    report: &RawReport,
    metric: MetricKey,
    group_key: &str,
    units: &str,
) -> Result<Vec<SeriesPoint>, AggregateError> {
    let mut buckets: HashMap<&str, f64> = HashMap::new();
    let mut skipped = 0usize;

    for row in &report.data {
        let Some(label) = row.group_value(group_key) else {
            skipped += 1;
            continue;
        };
        let value = row.value(metric).map(|v| v.value).unwrap_or(0.0);
        *buckets.entry(label).or_insert(0.0) += value;
    }

    if buckets.is_empty() {
        return Err(AggregateError::EmptyGroupKey {
            group_key: group_key.to_string(),
        });
    }

    if skipped > 0 {
        tracing::debug!(
            group_key,
            skipped,
            "Rows without the group dimension left out of series"
        );
    }

    let mut points: Vec<SeriesPoint> = buckets
        .into_iter()
        .map(|(label, y)| SeriesPoint {
            key: label.to_string(),
            x: AxisValue::Label(label.to_string()),
            y,
            units: units.to_string(),
        })
        .collect();

    points.sort_by(|a, b| b.y.total_cmp(&a.y).then_with(|| a.key.cmp(&b.key)));

    Ok(points)
}
