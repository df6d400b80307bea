//! Chart-ready view-models produced by the report aggregator

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{MetricKey, UnknownVariant};

/// Which side of a trend comparison a series belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    #[default]
    Current,
    Previous,
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportPeriod::Current => f.write_str("current"),
            ReportPeriod::Previous => f.write_str("previous"),
        }
    }
}

impl FromStr for ReportPeriod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(ReportPeriod::Current),
            "previous" => Ok(ReportPeriod::Previous),
            _ => Err(UnknownVariant::new("period", s)),
        }
    }
}

/// How a date series is plotted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    /// One value per day
    #[default]
    Daily,
    /// Running month-to-date total
    Rolling,
}

/// X-axis position of a point: a calendar date or a group label
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Date(NaiveDate),
    Label(String),
}

impl AxisValue {
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            AxisValue::Date(d) => Some(*d),
            AxisValue::Label(_) => None,
        }
    }
}

impl fmt::Display for AxisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            AxisValue::Label(l) => f.write_str(l),
        }
    }
}

/// One normalized data point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Date string or group label the point was keyed on
    pub key: String,
    pub x: AxisValue,
    pub y: f64,
    pub units: String,
}

/// Output of one aggregation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub metric: MetricKey,
    pub period: ReportPeriod,
    /// Single units label shared by every point
    pub units: String,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn empty(metric: MetricKey, period: ReportPeriod, units: impl Into<String>) -> Self {
        Self {
            metric,
            period,
            units: units.into(),
            points: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SeriesPoint> {
        self.points.iter()
    }

    /// Sum of all point values
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.y).sum()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.key.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a SeriesPoint;
    type IntoIter = std::slice::Iter<'a, SeriesPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Current vs previous period values at one day-of-month offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Day of month, starting at 1
    pub offset: u32,
    pub current: Option<f64>,
    pub previous: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_date: Option<NaiveDate>,
}

impl TrendPoint {
    /// `current - previous` when both sides are present
    pub fn delta(&self) -> Option<f64> {
        Some(self.current? - self.previous?)
    }

    /// Percentage change from previous to current (None on a zero base)
    pub fn percent_change(&self) -> Option<f64> {
        let previous = self.previous?;
        if previous == 0.0 {
            return None;
        }
        Some((self.current? - previous) / previous * 100.0)
    }
}

/// One ranked group in a "top N" list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopItem {
    pub label: String,
    pub value: f64,
    pub units: String,
    /// Fraction of the report total (0.0-1.0)
    pub share: f64,
}

/// Ranked groups plus the remainder folded into "others"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopItems {
    pub metric: MetricKey,
    pub group_key: String,
    pub total: f64,
    pub units: String,
    pub items: Vec<TopItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub others: Option<TopItem>,
}

/// Slice of the cost breakdown pie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakdownKind {
    Markup,
    Raw,
    Usage,
}

impl BreakdownKind {
    pub fn label(&self) -> &'static str {
        match self {
            BreakdownKind::Markup => "Markup",
            BreakdownKind::Raw => "Raw cost",
            BreakdownKind::Usage => "Usage cost",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownSlice {
    pub kind: BreakdownKind,
    pub value: f64,
    pub units: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_value_serializes_as_plain_string() {
        let date = AxisValue::Date(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2024-03-05\"");

        let label = AxisValue::Label("prod".to_string());
        assert_eq!(serde_json::to_string(&label).unwrap(), "\"prod\"");
    }

    #[test]
    fn test_trend_point_delta() {
        let point = TrendPoint {
            offset: 5,
            current: Some(10.0),
            previous: Some(8.0),
            current_date: None,
            previous_date: None,
        };
        assert_eq!(point.delta(), Some(2.0));
        assert_eq!(point.percent_change(), Some(25.0));

        let missing = TrendPoint {
            previous: None,
            ..point
        };
        assert_eq!(missing.delta(), None);
        assert_eq!(missing.percent_change(), None);
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("Previous".parse::<ReportPeriod>().unwrap(), ReportPeriod::Previous);
        assert!("last".parse::<ReportPeriod>().is_err());
    }
}
