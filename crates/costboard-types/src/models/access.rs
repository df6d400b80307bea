//! User-access entitlements and access decisions

use serde::{Deserialize, Serialize};

use super::provider::AccessType;

/// A single entitlement as returned by the user-access API
///
/// The API speaks two shapes: structured `{type, access}` rows from the
/// combined query, and a bare boolean from the per-provider query of
/// boolean-style providers (gcp, ibm).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntitlementRecord {
    Record {
        #[serde(rename = "type")]
        kind: AccessType,
        access: bool,
    },
    Flag(bool),
}

impl EntitlementRecord {
    pub fn record(kind: AccessType, access: bool) -> Self {
        EntitlementRecord::Record { kind, access }
    }

    pub fn flag(access: bool) -> Self {
        EntitlementRecord::Flag(access)
    }

    /// Whether this record grants `required`
    ///
    /// A record grants only its own type; a bare flag only grants
    /// boolean-style providers.
    pub fn grants(&self, required: AccessType) -> bool {
        match *self {
            EntitlementRecord::Record { kind, access } => {
                access && kind == required
            }
            EntitlementRecord::Flag(access) => access && required.is_boolean_flagged(),
        }
    }
}

/// `data` of a user-access response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserAccessData {
    Records(Vec<EntitlementRecord>),
    Flag(bool),
}

/// A user-access response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccess {
    pub data: UserAccessData,
}

/// Loading state of the entitlement snapshot handed to the gate
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EntitlementStatus {
    /// Fetch has not settled yet
    #[default]
    Pending,
    /// Upstream fetch failed
    Unavailable,
    /// Fetch settled; the list may legitimately be empty
    Loaded(Vec<EntitlementRecord>),
}

/// Outcome of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessDecision {
    Granted,
    Denied,
    Pending,
    Unavailable,
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessDecision::Granted => "granted",
            AccessDecision::Denied => "denied",
            AccessDecision::Pending => "pending",
            AccessDecision::Unavailable => "unavailable",
        }
    }
}
