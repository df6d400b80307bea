//! Report aggregation pipeline
//!
//! Turns paginated, provider-tagged report payloads into chart-ready
//! series, trend comparisons, top-N rankings and cost breakdowns.
//! Everything here is a pure function of its inputs; the aggregator only
//! holds the units label used when a report carries none.

use costboard_types::{
    BreakdownSlice, ChartType, MetricKey, RawReport, ReportPeriod, Series, TopItems, TrendPoint,
    DEFAULT_UNITS,
};

use crate::error::AggregateError;

pub mod aggregate;
pub mod breakdown;
pub mod pages;
pub mod trends;

#[cfg(test)]
mod tests;

pub use aggregate::parse_report_date;
pub use breakdown::OTHERS_LABEL;
pub use pages::merge_pages;
pub use trends::{accumulate, align_by_day, apply_chart_type, days_in_month};

/// Stateless report aggregator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportAggregator {
    default_units: String,
}

impl Default for ReportAggregator {
    fn default() -> Self {
        Self {
            default_units: DEFAULT_UNITS.to_string(),
        }
    }
}

impl ReportAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Units label used when neither rows nor totals carry one
    pub fn with_default_units(units: impl Into<String>) -> Self {
        Self {
            default_units: units.into(),
        }
    }

    pub fn default_units(&self) -> &str {
        &self.default_units
    }

    /// Aggregate a metric given by name
    ///
    /// # Errors
    /// - `InvalidMetric` if `metric` is not one of the five known names
    /// - `EmptyGroupKey` if `group_key` is set but no row carries it
    pub fn aggregate(
        &self,
        report: &RawReport,
        metric: &str,
        group_key: Option<&str>,
        period: ReportPeriod,
    ) -> Result<Series, AggregateError> {
        let metric = metric
            .parse::<MetricKey>()
            .map_err(|e| AggregateError::InvalidMetric { metric: e.value })?;
        self.aggregate_metric(report, metric, group_key, period)
    }

    /// Aggregate a typed metric
    pub fn aggregate_metric(
        &self,
        report: &RawReport,
        metric: MetricKey,
        group_key: Option<&str>,
        period: ReportPeriod,
    ) -> Result<Series, AggregateError> {
        aggregate::aggregate_series(report, metric, group_key, period, &self.default_units)
    }

    /// Merge a current and a previous report into a day-aligned trend
    ///
    /// Both reports are aggregated by date; with `ChartType::Rolling` each
    /// side is accumulated before alignment.
    pub fn merge_periods(
        &self,
        current: &RawReport,
        previous: &RawReport,
        metric: MetricKey,
        chart: ChartType,
    ) -> Result<Vec<TrendPoint>, AggregateError> {
        let current = self.aggregate_metric(current, metric, None, ReportPeriod::Current)?;
        let previous = self.aggregate_metric(previous, metric, None, ReportPeriod::Previous)?;

        let current = apply_chart_type(current, chart);
        let previous = apply_chart_type(previous, chart);

        Ok(align_by_day(&current, &previous))
    }

    /// Top `limit` groups by metric value with their share of the total
    pub fn top_items(
        &self,
        report: &RawReport,
        metric: MetricKey,
        group_key: &str,
        limit: usize,
    ) -> Result<TopItems, AggregateError> {
        breakdown::top_items(report, metric, group_key, limit, &self.default_units)
    }

    /// Markup / raw / usage slices of the report cost total
    pub fn cost_breakdown(&self, report: &RawReport) -> [BreakdownSlice; 3] {
        breakdown::cost_breakdown(report, &self.default_units)
    }
}

/// Aggregate with the default units label
///
/// See [`ReportAggregator::aggregate`].
pub fn aggregate(
    report: &RawReport,
    metric: &str,
    group_key: Option<&str>,
    period: ReportPeriod,
) -> Result<Series, AggregateError> {
    ReportAggregator::default().aggregate(report, metric, group_key, period)
}
