//! Permission gate for dashboard views
//!
//! Decides whether the page at a pathname is visible given the user's
//! entitlement snapshot. Unmatched routes are denied.

use once_cell::sync::Lazy;

use costboard_types::{AccessDecision, EntitlementRecord, EntitlementStatus};

pub mod routes;

pub use routes::{default_rules, normalize_path, RouteRule, RouteTable};

/// Route-aware access decision function
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessGate {
    routes: RouteTable,
}

impl AccessGate {
    pub fn new(routes: RouteTable) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Evaluate a settled entitlement snapshot
    ///
    /// `Granted` when any entitlement required by the matching rule is
    /// held; `Denied` otherwise, including when no rule matches.
    pub fn evaluate(&self, pathname: &str, entitlements: &[EntitlementRecord]) -> AccessDecision {
        let Some(rule) = self.routes.find(pathname) else {
            tracing::debug!(pathname, "No route rule matches, denying");
            return AccessDecision::Denied;
        };

        let granted = rule
            .required
            .iter()
            .any(|required| entitlements.iter().any(|e| e.grants(*required)));

        tracing::debug!(
            pathname,
            rule = %rule.path_prefix,
            granted,
            "Evaluated route access"
        );

        if granted {
            AccessDecision::Granted
        } else {
            AccessDecision::Denied
        }
    }

    /// Decide for any loading state
    ///
    /// A pending fetch is never read as a denial.
    pub fn decide(&self, pathname: &str, status: &EntitlementStatus) -> AccessDecision {
        match status {
            EntitlementStatus::Pending => AccessDecision::Pending,
            EntitlementStatus::Unavailable => AccessDecision::Unavailable,
            EntitlementStatus::Loaded(entitlements) => self.evaluate(pathname, entitlements),
        }
    }
}

static DEFAULT_GATE: Lazy<AccessGate> = Lazy::new(AccessGate::default);

/// Evaluate against the built-in route table
pub fn evaluate(pathname: &str, entitlements: &[EntitlementRecord]) -> AccessDecision {
    DEFAULT_GATE.evaluate(pathname, entitlements)
}

/// Decide against the built-in route table
pub fn decide(pathname: &str, status: &EntitlementStatus) -> AccessDecision {
    DEFAULT_GATE.decide(pathname, status)
}
