//! Report payloads from `reports/{provider}/{metricGroup}/`
//!
//! A report is one page of rows plus a `meta` block carrying totals and
//! pagination. Every field is defaulted so partial payloads still parse.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::UnknownVariant;

/// Units label used when a report carries none
pub const DEFAULT_UNITS: &str = "USD";

/// A numeric metric with its units label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub units: String,
}

impl MetricValue {
    pub fn new(value: f64, units: impl Into<String>) -> Self {
        Self {
            value,
            units: units.into(),
        }
    }

    pub fn has_units(&self) -> bool {
        !self.units.trim().is_empty()
    }
}

/// The five metrics a report row can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    Cost,
    Usage,
    InfrastructureCost,
    Markup,
    Request,
}

impl MetricKey {
    pub const ALL: [MetricKey; 5] = [
        MetricKey::Cost,
        MetricKey::Usage,
        MetricKey::InfrastructureCost,
        MetricKey::Markup,
        MetricKey::Request,
    ];

    /// Key of this metric in a row's `values` object
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::Cost => "cost",
            MetricKey::Usage => "usage",
            MetricKey::InfrastructureCost => "infrastructure_cost",
            MetricKey::Markup => "markup",
            MetricKey::Request => "request",
        }
    }

    pub fn is_monetary(&self) -> bool {
        matches!(
            self,
            MetricKey::Cost | MetricKey::InfrastructureCost | MetricKey::Markup
        )
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricKey::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("metric", s))
    }
}

/// One row of report data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// ISO date (`YYYY-MM-DD`) or month (`YYYY-MM`)
    pub date: String,
    /// Group-by dimensions, e.g. `{"cluster": "prod-1"}`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub group: BTreeMap<String, String>,
    /// Metrics keyed by name (`cost`, `usage`, ...)
    #[serde(default)]
    pub values: BTreeMap<String, MetricValue>,
}

impl ReportRow {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Default::default()
        }
    }

    pub fn with_group(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.group.insert(key.into(), value.into());
        self
    }

    pub fn with_value(mut self, metric: MetricKey, value: f64, units: impl Into<String>) -> Self {
        self.values
            .insert(metric.as_str().to_string(), MetricValue::new(value, units));
        self
    }

    pub fn value(&self, metric: MetricKey) -> Option<&MetricValue> {
        self.values.get(metric.as_str())
    }

    pub fn group_value(&self, key: &str) -> Option<&str> {
        self.group.get(key).map(String::as_str)
    }
}

/// Cost total with its markup/raw/usage breakdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostTotal {
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub units: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<MetricValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<MetricValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<MetricValue>,
}

/// Report-wide totals from `meta.total`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportTotal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<CostTotal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<MetricValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infrastructure_cost: Option<MetricValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<MetricValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<MetricValue>,
}

impl ReportTotal {
    /// Total for one metric, if the backend reported it
    pub fn metric(&self, metric: MetricKey) -> Option<MetricValue> {
        match metric {
            MetricKey::Cost => self
                .cost
                .as_ref()
                .map(|c| MetricValue::new(c.value, c.units.clone())),
            MetricKey::Usage => self.usage.clone(),
            MetricKey::InfrastructureCost => self.infrastructure_cost.clone(),
            MetricKey::Markup => self.markup.clone(),
            MetricKey::Request => self.request.clone(),
        }
    }
}

/// Pagination links for a paged report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

/// `meta` block of a report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    #[serde(default)]
    pub total: ReportTotal,
    /// Row count across all pages
    #[serde(default)]
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// One page of a cost/usage report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReport {
    #[serde(default)]
    pub meta: ReportMeta,
    #[serde(default)]
    pub data: Vec<ReportRow>,
}

impl RawReport {
    pub fn from_rows(data: Vec<ReportRow>) -> Self {
        Self {
            meta: ReportMeta {
                count: data.len() as u64,
                ..Default::default()
            },
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn has_next_page(&self) -> bool {
        self.meta
            .pagination
            .as_ref()
            .is_some_and(|p| p.next.is_some())
    }
}
