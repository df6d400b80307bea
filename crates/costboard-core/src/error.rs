//! Error types for costboard-core
//!
//! Every failure here is a typed value the caller branches on; none of
//! them is fatal to the process. An access denial is a decision, not an
//! error, and lives in [`costboard_types::AccessDecision`].

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the report aggregation pipeline
///
/// Both variants are recoverable: the rendering layer shows an empty or
/// fallback state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Invalid metric: {metric}")]
    InvalidMetric { metric: String },

    #[error("No report row carries group key: {group_key}")]
    EmptyGroupKey { group_key: String },
}

/// Rejections raised while building a route rule table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("Route prefix must start with '/': {prefix}")]
    InvalidPrefix { prefix: String },

    #[error("Duplicate route prefix: {prefix}")]
    DuplicatePrefix { prefix: String },

    #[error("Route {prefix} lists no required entitlements")]
    NoRequirements { prefix: String },
}

/// Core error type for settings and table loading
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // IO Errors
    // ===================
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ===================
    // Parse Errors
    // ===================
    #[error("Failed to parse TOML in {path}: {message}")]
    TomlParse {
        path: PathBuf,
        message: String,
        #[source]
        source: toml::de::Error,
    },

    // ===================
    // Config Errors
    // ===================
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error(transparent)]
    RouteTable(#[from] RouteTableError),
}
