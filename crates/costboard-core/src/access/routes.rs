//! Declarative route rule table
//!
//! Each rule maps a path prefix to the entitlements that unlock it. The
//! longest segment-aware prefix wins; prefixes are unique, so at most one
//! rule ever matches a normalized path.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use costboard_types::AccessType;

use crate::error::RouteTableError;

static UUID_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("UUID segment regex is valid")
});

/// Normalize a pathname for rule matching
///
/// Drops the query string and fragment, collapses repeated and trailing
/// slashes, and strips UUID segments and `:param` template segments so a
/// detail page maps back onto its parent route.
///
/// # Examples
///
/// ```
/// use costboard_core::access::normalize_path;
///
/// assert_eq!(
///     normalize_path("/cost-models/123e4567-e89b-12d3-a456-426614174000"),
///     "/cost-models"
/// );
/// assert_eq!(normalize_path("/aws/details/?group_by[account]=*"), "/aws/details");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(pathname: &str) -> String {
    let path = pathname
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    let segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .filter(|s| !s.starts_with(':') && !UUID_SEGMENT.is_match(s))
        .collect();

    format!("/{}", segments.join("/"))
}

fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return path == "/";
    }
    path == prefix
        || (path.starts_with(prefix) && path.as_bytes().get(prefix.len()) == Some(&b'/'))
}

/// A path prefix and the entitlements (any of) that unlock it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    #[serde(alias = "pathPrefix")]
    pub path_prefix: String,
    #[serde(alias = "requiredEntitlements")]
    pub required: Vec<AccessType>,
}

impl RouteRule {
    pub fn new(path_prefix: impl Into<String>, required: impl IntoIterator<Item = AccessType>) -> Self {
        Self {
            path_prefix: path_prefix.into(),
            required: required.into_iter().collect(),
        }
    }

    fn depth(&self) -> usize {
        self.path_prefix.split('/').filter(|s| !s.is_empty()).count()
    }
}

/// Pages any entitled user may see
const ANY_ENTITLEMENT: [AccessType; 6] = [
    AccessType::Aws,
    AccessType::Azure,
    AccessType::Gcp,
    AccessType::Ibm,
    AccessType::Ocp,
    AccessType::CostModel,
];

/// The dashboard's built-in routes
pub fn default_rules() -> Vec<RouteRule> {
    let mut rules = vec![
        RouteRule::new("/", ANY_ENTITLEMENT),
        RouteRule::new("/explorer", ANY_ENTITLEMENT),
        RouteRule::new("/cost-models", [AccessType::CostModel]),
    ];

    for (provider, access) in [
        ("aws", AccessType::Aws),
        ("azure", AccessType::Azure),
        ("gcp", AccessType::Gcp),
        ("ibm", AccessType::Ibm),
        ("ocp", AccessType::Ocp),
    ] {
        rules.push(RouteRule::new(format!("/{provider}/details"), [access]));
        rules.push(RouteRule::new(format!("/{provider}/details/breakdown"), [access]));
    }

    rules
}

/// Validated, immutable rule table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    /// Deepest prefixes first
    rules: Vec<RouteRule>,
}

impl RouteTable {
    /// Build a table, normalizing every prefix
    ///
    /// # Errors
    /// - `InvalidPrefix` for a prefix not starting with `/`
    /// - `DuplicatePrefix` when two prefixes normalize to the same path
    /// - `NoRequirements` for a rule that could never grant access
    pub fn new(rules: Vec<RouteRule>) -> Result<Self, RouteTableError> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(rules.len());

        for rule in rules {
            if !rule.path_prefix.starts_with('/') {
                return Err(RouteTableError::InvalidPrefix {
                    prefix: rule.path_prefix,
                });
            }
            if rule.required.is_empty() {
                return Err(RouteTableError::NoRequirements {
                    prefix: rule.path_prefix,
                });
            }

            let prefix = normalize_path(&rule.path_prefix);
            if !seen.insert(prefix.clone()) {
                return Err(RouteTableError::DuplicatePrefix { prefix });
            }

            normalized.push(RouteRule {
                path_prefix: prefix,
                required: rule.required,
            });
        }

        normalized.sort_by(|a, b| {
            b.depth()
                .cmp(&a.depth())
                .then_with(|| a.path_prefix.cmp(&b.path_prefix))
        });

        Ok(Self { rules: normalized })
    }

    /// Rule governing `pathname`, if any
    pub fn find(&self, pathname: &str) -> Option<&RouteRule> {
        let path = normalize_path(pathname);
        self.rules
            .iter()
            .find(|rule| prefix_matches(&rule.path_prefix, &path))
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        // The built-in rules are unique, rooted and non-empty
        Self::new(default_rules()).unwrap_or(Self { rules: Vec::new() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("//aws//details/"), "/aws/details");
        assert_eq!(normalize_path("/aws/details#top"), "/aws/details");
        assert_eq!(
            normalize_path("/aws/details/123e4567-e89b-12d3-a456-426614174000/breakdown"),
            "/aws/details/breakdown"
        );
        assert_eq!(normalize_path("/cost-models/:uuid"), "/cost-models");
        // Not a UUID: kept
        assert_eq!(normalize_path("/aws/details/123e4567"), "/aws/details/123e4567");
    }

    #[test]
    fn test_prefix_matches_on_segment_boundary() {
        assert!(prefix_matches("/aws/details", "/aws/details"));
        assert!(prefix_matches("/aws/details", "/aws/details/extra"));
        assert!(!prefix_matches("/aws/details", "/aws/detailsx"));
        assert!(!prefix_matches("/aws/details", "/aws"));
        assert!(prefix_matches("/", "/"));
        assert!(!prefix_matches("/", "/unknown/path"));
    }

    #[test]
    fn test_default_table_is_valid() {
        let table = RouteTable::new(default_rules()).unwrap();
        assert_eq!(table.len(), default_rules().len());
        assert_eq!(RouteTable::default(), table);
    }

    #[test]
    fn test_longest_prefix_wins() {
        let table = RouteTable::new(vec![
            RouteRule::new("/ocp", [AccessType::Ocp]),
            RouteRule::new("/ocp/details/breakdown", [AccessType::CostModel]),
        ])
        .unwrap();

        let rule = table.find("/ocp/details/breakdown?x=1").unwrap();
        assert_eq!(rule.path_prefix, "/ocp/details/breakdown");

        let rule = table.find("/ocp/details").unwrap();
        assert_eq!(rule.path_prefix, "/ocp");
    }

    #[test]
    fn test_rejects_duplicate_after_normalization() {
        let err = RouteTable::new(vec![
            RouteRule::new("/cost-models", [AccessType::CostModel]),
            RouteRule::new("/cost-models/:uuid", [AccessType::CostModel]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            RouteTableError::DuplicatePrefix {
                prefix: "/cost-models".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_relative_and_empty_rules() {
        let err = RouteTable::new(vec![RouteRule::new("aws", [AccessType::Aws])]).unwrap_err();
        assert!(matches!(err, RouteTableError::InvalidPrefix { .. }));

        let err = RouteTable::new(vec![RouteRule::new("/aws", [])]).unwrap_err();
        assert!(matches!(err, RouteTableError::NoRequirements { .. }));
    }

    #[test]
    fn test_rule_deserializes_from_camel_case() {
        let rule: RouteRule = serde_json::from_str(
            r#"{"pathPrefix": "/explorer", "requiredEntitlements": ["aws", "cost_model"]}"#,
        )
        .unwrap();
        assert_eq!(rule.required, vec![AccessType::Aws, AccessType::CostModel]);
    }
}
