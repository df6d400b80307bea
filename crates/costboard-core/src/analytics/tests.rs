//! Unit tests for analytics module

use super::*;
use chrono::NaiveDate;
use costboard_types::{AxisValue, CostTotal, MetricValue, ReportRow};

/// Daily cost report for one month: `(day, value)` pairs
fn daily_report(year: i32, month: u32, days: &[(u32, f64)]) -> RawReport {
    RawReport::from_rows(
        days.iter()
            .map(|(day, value)| {
                ReportRow::new(format!("{year:04}-{month:02}-{day:02}"))
                    .with_value(MetricKey::Cost, *value, "USD")
            })
            .collect(),
    )
}

/// Cluster-grouped report: `(cluster, value)` pairs, one row each
fn grouped_report(groups: &[(&str, f64)]) -> RawReport {
    RawReport::from_rows(
        groups
            .iter()
            .map(|(cluster, value)| {
                ReportRow::new("2024-03-01")
                    .with_group("cluster", *cluster)
                    .with_value(MetricKey::Cost, *value, "USD")
            })
            .collect(),
    )
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Aggregate Tests
// ============================================================================

#[test]
fn test_aggregate_empty_report() {
    let report = RawReport::default();

    let by_date = aggregate(&report, "cost", None, ReportPeriod::Current).unwrap();
    assert!(by_date.is_empty());

    // No rows means no EmptyGroupKey either
    let by_group = aggregate(&report, "usage", Some("cluster"), ReportPeriod::Current).unwrap();
    assert!(by_group.is_empty());
    assert_eq!(by_group.units, "USD");
}

#[test]
fn test_aggregate_unknown_metric() {
    let report = daily_report(2024, 3, &[(1, 1.0)]);
    let err = aggregate(&report, "unknown_metric", None, ReportPeriod::Current).unwrap_err();

    assert_eq!(
        err,
        AggregateError::InvalidMetric {
            metric: "unknown_metric".to_string()
        }
    );
}

#[test]
fn test_aggregate_unknown_metric_on_empty_report() {
    let err = aggregate(&RawReport::default(), "bogus", None, ReportPeriod::Current).unwrap_err();
    assert!(matches!(err, AggregateError::InvalidMetric { .. }));
}

#[test]
fn test_aggregate_one_point_per_distinct_date() {
    let report = RawReport::from_rows(vec![
        ReportRow::new("2024-03-02")
            .with_group("cluster", "a")
            .with_value(MetricKey::Cost, 2.0, "USD"),
        ReportRow::new("2024-03-02")
            .with_group("cluster", "b")
            .with_value(MetricKey::Cost, 3.0, "USD"),
        ReportRow::new("2024-03-01").with_value(MetricKey::Cost, 1.0, "USD"),
        // No cost on this day: still gets a zero point
        ReportRow::new("2024-03-03").with_value(MetricKey::Usage, 9.0, "Hrs"),
    ]);

    let series = aggregate(&report, "cost", None, ReportPeriod::Current).unwrap();

    assert_eq!(series.len(), 3, "one point per distinct date");
    assert_eq!(series.keys(), vec!["2024-03-01", "2024-03-02", "2024-03-03"]);
    assert_eq!(series.points[1].y, 5.0, "rows sharing a date are summed");
    assert_eq!(series.points[2].y, 0.0, "missing metric defaults to zero");
    assert_eq!(series.points[2].units, "USD");
}

#[test]
fn test_aggregate_date_keyed_ascending() {
    let report = daily_report(2024, 3, &[(9, 1.0), (2, 5.0), (30, 2.0), (1, 7.0)]);
    let series = aggregate(&report, "cost", None, ReportPeriod::Current).unwrap();

    let dates: Vec<NaiveDate> = series.iter().filter_map(|p| p.x.as_date()).collect();
    assert_eq!(dates.len(), 4);
    assert!(dates.windows(2).all(|w| w[0] <= w[1]), "dates must be ascending");
    assert_eq!(series.points[0].x, AxisValue::Date(date(2024, 3, 1)));
}

#[test]
fn test_aggregate_date_keyed_across_months() {
    let report = RawReport::from_rows(vec![
        ReportRow::new("2024-04-01").with_value(MetricKey::Cost, 1.0, "USD"),
        ReportRow::new("2024-03-31").with_value(MetricKey::Cost, 1.0, "USD"),
    ]);
    let series = aggregate(&report, "cost", None, ReportPeriod::Current).unwrap();
    assert_eq!(series.keys(), vec!["2024-03-31", "2024-04-01"]);
}

#[test]
fn test_aggregate_skips_invalid_dates() {
    let report = RawReport::from_rows(vec![
        ReportRow::new("not-a-date").with_value(MetricKey::Cost, 100.0, "USD"),
        ReportRow::new("2024-03-01").with_value(MetricKey::Cost, 1.0, "USD"),
    ]);
    let series = aggregate(&report, "cost", None, ReportPeriod::Current).unwrap();

    assert_eq!(series.len(), 1);
    assert_eq!(series.total(), 1.0);
}

#[test]
fn test_aggregate_group_keyed_descending_with_ties() {
    let report = grouped_report(&[("beta", 5.0), ("alpha", 5.0), ("gamma", 9.0), ("delta", 1.0)]);
    let series = aggregate(&report, "cost", Some("cluster"), ReportPeriod::Current).unwrap();

    assert_eq!(series.keys(), vec!["gamma", "alpha", "beta", "delta"]);
    assert!(series.points.windows(2).all(|w| w[0].y >= w[1].y));
    assert_eq!(series.points[0].x, AxisValue::Label("gamma".to_string()));
}

#[test]
fn test_aggregate_group_keyed_sums_across_dates() {
    let report = RawReport::from_rows(vec![
        ReportRow::new("2024-03-01")
            .with_group("project", "web")
            .with_value(MetricKey::Usage, 2.0, "Core-Hours"),
        ReportRow::new("2024-03-02")
            .with_group("project", "web")
            .with_value(MetricKey::Usage, 3.0, "Core-Hours"),
        ReportRow::new("2024-03-02")
            .with_group("project", "db")
            .with_value(MetricKey::Usage, 4.0, "Core-Hours"),
    ]);
    let series = aggregate(&report, "usage", Some("project"), ReportPeriod::Current).unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series.points[0].key, "web");
    assert_eq!(series.points[0].y, 5.0);
    assert_eq!(series.units, "Core-Hours");
}

#[test]
fn test_aggregate_empty_group_key() {
    let report = grouped_report(&[("a", 1.0)]);
    let err = aggregate(&report, "cost", Some("node"), ReportPeriod::Current).unwrap_err();

    assert_eq!(
        err,
        AggregateError::EmptyGroupKey {
            group_key: "node".to_string()
        }
    );
}

#[test]
fn test_aggregate_carries_period() {
    let report = daily_report(2024, 2, &[(1, 1.0)]);
    let series = aggregate(&report, "cost", None, ReportPeriod::Previous).unwrap();
    assert_eq!(series.period, ReportPeriod::Previous);
    assert_eq!(series.metric, MetricKey::Cost);
}

// ============================================================================
// Units Tests
// ============================================================================

#[test]
fn test_units_first_non_empty_wins() {
    let report = RawReport::from_rows(vec![
        ReportRow::new("2024-03-01").with_value(MetricKey::Cost, 1.0, ""),
        ReportRow::new("2024-03-02").with_value(MetricKey::Cost, 1.0, "EUR"),
        ReportRow::new("2024-03-03").with_value(MetricKey::Cost, 1.0, "USD"),
    ]);
    let series = aggregate(&report, "cost", None, ReportPeriod::Current).unwrap();

    assert_eq!(series.units, "EUR");
    assert!(series.iter().all(|p| p.units == "EUR"));
}

#[test]
fn test_units_fall_back_to_report_total() {
    let mut report = RawReport::from_rows(vec![ReportRow::new("2024-03-01")]);
    report.meta.total.usage = Some(MetricValue::new(0.0, "GB-Mo"));

    let series = aggregate(&report, "usage", None, ReportPeriod::Current).unwrap();
    assert_eq!(series.units, "GB-Mo");
    assert_eq!(series.points[0].y, 0.0);
}

#[test]
fn test_units_fall_back_to_configured_default() {
    let report = RawReport::from_rows(vec![ReportRow::new("2024-03-01")]);

    let series = ReportAggregator::with_default_units("EUR")
        .aggregate(&report, "markup", None, ReportPeriod::Current)
        .unwrap();
    assert_eq!(series.units, "EUR");

    let series = aggregate(&report, "markup", None, ReportPeriod::Current).unwrap();
    assert_eq!(series.units, "USD");
}

// ============================================================================
// Trend Tests
// ============================================================================

#[test]
fn test_trend_aligns_by_day_offset() {
    let current = daily_report(2024, 3, &[(4, 3.0), (5, 10.0)]);
    let previous = daily_report(2024, 2, &[(4, 2.0), (5, 8.0)]);

    let trend = ReportAggregator::new()
        .merge_periods(&current, &previous, MetricKey::Cost, ChartType::Daily)
        .unwrap();

    let day5 = trend.iter().find(|p| p.offset == 5).unwrap();
    assert_eq!(day5.current, Some(10.0));
    assert_eq!(day5.previous, Some(8.0));
    assert_eq!(day5.current_date, Some(date(2024, 3, 5)));
    assert_eq!(day5.previous_date, Some(date(2024, 2, 5)));
}

#[test]
fn test_trend_drops_offsets_beyond_shorter_month() {
    let current = daily_report(2023, 3, &[(28, 1.0), (29, 1.0), (30, 1.0), (31, 1.0)]);
    let previous = daily_report(2023, 2, &[(27, 1.0), (28, 1.0)]);

    let trend = ReportAggregator::new()
        .merge_periods(&current, &previous, MetricKey::Cost, ChartType::Daily)
        .unwrap();

    let offsets: Vec<u32> = trend.iter().map(|p| p.offset).collect();
    assert_eq!(offsets, vec![27, 28]);
    assert_eq!(trend[0].current, None, "no padding for missing days");
    assert_eq!(trend[0].previous, Some(1.0));
}

#[test]
fn test_trend_partial_current_month() {
    let current = daily_report(2024, 3, &[(1, 1.0), (2, 1.0)]);
    let previous = daily_report(2024, 2, &[(1, 2.0), (2, 2.0), (3, 2.0)]);

    let trend = ReportAggregator::new()
        .merge_periods(&current, &previous, MetricKey::Cost, ChartType::Daily)
        .unwrap();

    assert_eq!(trend.len(), 3);
    assert_eq!(trend[2].current, None);
    assert_eq!(trend[2].previous, Some(2.0));
}

#[test]
fn test_trend_rolling_accumulates_each_side() {
    let current = daily_report(2024, 3, &[(1, 1.0), (2, 2.0), (3, 3.0)]);
    let previous = daily_report(2024, 2, &[(1, 5.0), (2, 5.0), (3, 5.0)]);

    let trend = ReportAggregator::new()
        .merge_periods(&current, &previous, MetricKey::Cost, ChartType::Rolling)
        .unwrap();

    let current_values: Vec<f64> = trend.iter().filter_map(|p| p.current).collect();
    let previous_values: Vec<f64> = trend.iter().filter_map(|p| p.previous).collect();
    assert_eq!(current_values, vec![1.0, 3.0, 6.0]);
    assert_eq!(previous_values, vec![5.0, 10.0, 15.0]);
}

#[test]
fn test_trend_both_empty() {
    let trend = ReportAggregator::new()
        .merge_periods(
            &RawReport::default(),
            &RawReport::default(),
            MetricKey::Cost,
            ChartType::Daily,
        )
        .unwrap();
    assert!(trend.is_empty());
}

// ============================================================================
// Top Items / Breakdown Tests
// ============================================================================

#[test]
fn test_top_items_limit_and_others() {
    let mut report = grouped_report(&[("a", 50.0), ("b", 30.0), ("c", 15.0), ("d", 5.0)]);
    report.meta.total.cost = Some(CostTotal {
        value: 200.0,
        units: "USD".to_string(),
        ..Default::default()
    });

    let top = ReportAggregator::new()
        .top_items(&report, MetricKey::Cost, "cluster", 2)
        .unwrap();

    assert_eq!(top.items.len(), 2);
    assert_eq!(top.items[0].label, "a");
    assert_eq!(top.total, 200.0, "meta total spans every page");
    assert!((top.items[0].share - 0.25).abs() < 1e-9);

    let others = top.others.unwrap();
    assert_eq!(others.label, OTHERS_LABEL);
    assert_eq!(others.value, 20.0);
}

#[test]
fn test_top_items_share_without_meta_total() {
    let report = grouped_report(&[("a", 3.0), ("b", 1.0)]);
    let top = ReportAggregator::new()
        .top_items(&report, MetricKey::Cost, "cluster", 5)
        .unwrap();

    assert_eq!(top.total, 4.0);
    assert!((top.items[0].share - 0.75).abs() < 1e-9);
    assert!(top.others.is_none());
}

#[test]
fn test_cost_breakdown_defaults() {
    let mut report = RawReport::default();
    report.meta.total.cost = Some(CostTotal {
        value: 10.0,
        units: "USD".to_string(),
        markup: Some(MetricValue::new(1.5, "USD")),
        raw: None,
        usage: Some(MetricValue::new(3.0, "")),
    });

    let [markup, raw, usage] = ReportAggregator::with_default_units("CAD").cost_breakdown(&report);

    assert_eq!(markup.value, 1.5);
    assert_eq!(markup.units, "USD");
    assert_eq!(raw.value, 0.0);
    assert_eq!(raw.units, "CAD");
    assert_eq!(usage.value, 3.0);
    assert_eq!(usage.units, "CAD");
}

#[test]
fn test_cost_breakdown_without_cost_total() {
    let slices = ReportAggregator::new().cost_breakdown(&RawReport::default());
    assert!(slices.iter().all(|s| s.value == 0.0 && s.units == "USD"));
}
