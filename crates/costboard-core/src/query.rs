//! Report query strings and API paths
//!
//! Queries are flat bracketed keys (`filter[resolution]=daily`,
//! `group_by[cluster]=*`). Keys render in a fixed order so the same query
//! always produces the same string, which callers use as a cache key.

use chrono::NaiveDate;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use costboard_types::{AccessType, ProviderType, ReportPeriod, ReportType};

/// Value for an unrestricted group-by
pub const GROUP_BY_ALL: &str = "*";

/// Sort direction for `order_by[...]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Builder for a report query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub filter: BTreeMap<String, String>,
    pub group_by: BTreeMap<String, String>,
    pub order_by: BTreeMap<String, SortOrder>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl ReportQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group by `key`, all values
    pub fn group_by(mut self, key: impl Into<String>) -> Self {
        self.group_by.insert(key.into(), GROUP_BY_ALL.to_string());
        self
    }

    /// Group by `key`, restricted to `value`
    pub fn group_by_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.group_by.insert(key.into(), value.into());
        self
    }

    pub fn order_by(mut self, key: impl Into<String>, order: SortOrder) -> Self {
        self.order_by.insert(key.into(), order);
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter.insert(key.into(), value.into());
        self
    }

    /// Daily resolution
    pub fn daily(self) -> Self {
        self.filter("resolution", "daily")
    }

    /// Monthly resolution
    pub fn monthly(self) -> Self {
        self.filter("resolution", "monthly")
    }

    /// Daily data for the current (`-1`) or previous (`-2`) month
    pub fn for_period(self, period: ReportPeriod) -> Self {
        let value = match period {
            ReportPeriod::Current => "-1",
            ReportPeriod::Previous => "-2",
        };
        self.filter("time_scope_units", "month")
            .filter("time_scope_value", value)
            .daily()
    }

    /// Explicit date window, inclusive on both ends
    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Render as a query string (no leading `?`)
    ///
    /// Order: `filter`, `group_by`, `order_by`, dates, `limit`, `offset`;
    /// bracketed keys sorted within their family.
    pub fn to_query_string(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        for (key, value) in &self.filter {
            parts.push(format!("filter[{}]={}", encode(key), encode(value)));
        }
        for (key, value) in &self.group_by {
            parts.push(format!("group_by[{}]={}", encode(key), encode(value)));
        }
        for (key, order) in &self.order_by {
            parts.push(format!("order_by[{}]={}", encode(key), order.as_str()));
        }
        if let Some(start) = self.start_date {
            parts.push(format!("start_date={}", start.format("%Y-%m-%d")));
        }
        if let Some(end) = self.end_date {
            parts.push(format!("end_date={}", end.format("%Y-%m-%d")));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("limit={limit}"));
        }
        if let Some(offset) = self.offset {
            parts.push(format!("offset={offset}"));
        }

        parts.join("&")
    }
}

impl fmt::Display for ReportQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Percent-encode a bracket key or value; the group-by wildcard stays bare
fn encode(raw: &str) -> Cow<'_, str> {
    if raw == GROUP_BY_ALL {
        Cow::Borrowed(GROUP_BY_ALL)
    } else {
        urlencoding::encode(raw)
    }
}

fn with_query(base: String, query: &str) -> String {
    if query.is_empty() {
        base
    } else {
        format!("{base}?{query}")
    }
}

/// `reports/{provider}/{metricGroup}/?{query}`
pub fn report_path(provider: ProviderType, report_type: ReportType, query: &str) -> String {
    with_query(
        format!(
            "reports/{}/{}/",
            provider.api_segment(),
            report_type.path_segment()
        ),
        query,
    )
}

/// `tags/{provider}/?{query}`
pub fn tag_path(provider: ProviderType, query: &str) -> String {
    with_query(format!("tags/{}/", provider.api_segment()), query)
}

/// Query for one user-access lookup, e.g. `type=gcp&beta=true`
pub fn user_access_query(kind: AccessType, beta: bool) -> String {
    if beta {
        format!("type={kind}&beta=true")
    } else {
        format!("type={kind}")
    }
}

/// `user-access/?{query}`
pub fn user_access_path(query: &str) -> String {
    with_query("user-access/".to_string(), query)
}
