//! costboard-types - Shared data types for costboard
//!
//! This crate contains pure data structures without heavy dependencies.
//! No tokio, no async runtime - just serde-serializable types.
//!
//! Used by:
//! - costboard-core (aggregation and access decisions)
//! - costboard (command-line front end)
//! - any rendering layer that consumes the view-models

pub mod analytics;
pub mod models;

// Re-export analytics types
pub use analytics::{
    AxisValue, BreakdownKind, BreakdownSlice, ChartType, ReportPeriod, Series, SeriesPoint,
    TopItem, TopItems, TrendPoint,
};

// Re-export model types
pub use models::{
    AccessDecision, AccessType, CostTotal, EntitlementRecord, EntitlementStatus, MetricKey,
    MetricValue, Pagination, ProviderType, RawReport, ReportMeta, ReportRow, ReportTotal,
    ReportType, UnknownVariant, UserAccess, UserAccessData, DEFAULT_UNITS,
};
