//! costboard-core - Core library for costboard
//!
//! Report aggregation, the route access gate, report query builders and
//! the fetch traits the dashboard's transport implements.

pub mod access;
pub mod analytics;
pub mod error;
pub mod fetch;
pub mod query;
pub mod settings;

pub use access::{AccessGate, RouteRule, RouteTable};
pub use analytics::{aggregate, merge_pages, ReportAggregator};
pub use error::{AggregateError, CoreError, RouteTableError};
pub use fetch::{fetch_report_pages, load_entitlements, EntitlementFetcher, ReportFetcher};
pub use query::{report_path, tag_path, user_access_path, user_access_query, ReportQuery, SortOrder};
pub use settings::Settings;
