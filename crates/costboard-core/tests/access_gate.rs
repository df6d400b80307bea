//! Entitlement loading through to route decisions

use anyhow::Result;
use costboard_core::access::{decide, evaluate};
use costboard_core::{load_entitlements, EntitlementFetcher, Settings};
use costboard_types::{AccessDecision, AccessType, EntitlementStatus, UserAccess};
use std::path::Path;

const UUID: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";

/// Serves canned JSON bodies per access type
struct JsonAccess {
    all: &'static str,
    gcp: &'static str,
    ibm: Option<&'static str>,
}

impl EntitlementFetcher for JsonAccess {
    async fn fetch_user_access(&self, kind: AccessType, _query: &str) -> Result<UserAccess> {
        let body = match kind {
            AccessType::Gcp => self.gcp,
            AccessType::Ibm => self
                .ibm
                .ok_or_else(|| anyhow::anyhow!("503 Service Unavailable"))?,
            _ => self.all,
        };
        Ok(serde_json::from_str(body)?)
    }
}

fn fetcher() -> JsonAccess {
    JsonAccess {
        all: r#"{"data": [
            {"type": "aws", "access": true},
            {"type": "azure", "access": false},
            {"type": "ocp", "access": true},
            {"type": "cost_model", "access": false}
        ]}"#,
        gcp: r#"{"data": true}"#,
        ibm: None,
    }
}

#[tokio::test]
async fn test_loaded_entitlements_drive_decisions() {
    let status = load_entitlements(&fetcher()).await;
    assert!(matches!(status, EntitlementStatus::Loaded(_)));

    let cases = [
        (format!("/aws/details/{UUID}"), AccessDecision::Granted),
        ("/ocp/details/breakdown?group_by[project]=*".to_string(), AccessDecision::Granted),
        ("/gcp/details".to_string(), AccessDecision::Granted),
        ("/azure/details".to_string(), AccessDecision::Denied),
        ("/ibm/details".to_string(), AccessDecision::Denied),
        (format!("/cost-models/{UUID}"), AccessDecision::Denied),
        ("/".to_string(), AccessDecision::Granted),
        ("/unknown/path".to_string(), AccessDecision::Denied),
    ];

    for (path, expected) in cases {
        assert_eq!(decide(&path, &status), expected, "path {path}");
    }
}

#[tokio::test]
async fn test_malformed_combined_payload_is_unavailable() {
    let mut access = fetcher();
    access.all = r#"{"data": "nope"}"#;

    let status = load_entitlements(&access).await;

    assert_eq!(status, EntitlementStatus::Unavailable);
    assert_eq!(decide("/aws/details", &status), AccessDecision::Unavailable);
}

#[test]
fn test_pending_is_not_denied() {
    assert_eq!(
        decide("/aws/details", &EntitlementStatus::Pending),
        AccessDecision::Pending
    );
}

#[test]
fn test_empty_entitlements_deny_everything() {
    for path in ["/", "/explorer", "/aws/details", "/cost-models"] {
        assert_eq!(evaluate(path, &[]), AccessDecision::Denied);
    }
}

#[test]
fn test_configured_routes_gate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[[routes]]
pathPrefix = "/"
requiredEntitlements = ["all"]

[[routes]]
path_prefix = "/ocp"
required = ["ocp"]
"#,
    )
    .unwrap();

    let settings = Settings::load(Path::new(&path)).unwrap();
    let gate = settings.access_gate().unwrap();
    let ocp = [costboard_types::EntitlementRecord::record(AccessType::Ocp, true)];

    assert_eq!(gate.evaluate("/ocp/details", &ocp), AccessDecision::Granted);
    assert_eq!(gate.evaluate("/", &ocp), AccessDecision::Denied);
}
