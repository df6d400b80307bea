//! Data models for costboard

pub mod access;
pub mod provider;
pub mod report;

use thiserror::Error;

pub use access::{AccessDecision, EntitlementRecord, EntitlementStatus, UserAccess, UserAccessData};
pub use provider::{AccessType, ProviderType, ReportType};
pub use report::{
    CostTotal, MetricKey, MetricValue, Pagination, RawReport, ReportMeta, ReportRow, ReportTotal,
    DEFAULT_UNITS,
};

/// Returned when a string does not name a known enum variant
/// (metric, provider, access type, report type, period).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
