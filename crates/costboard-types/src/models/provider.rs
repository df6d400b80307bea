//! Cost providers, entitlement kinds and report families

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::report::MetricKey;
use super::UnknownVariant;

/// A cloud or on-prem cost data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Aws,
    Azure,
    Gcp,
    Ibm,
    Ocp,
}

impl ProviderType {
    pub const ALL: [ProviderType; 5] = [
        ProviderType::Aws,
        ProviderType::Azure,
        ProviderType::Gcp,
        ProviderType::Ibm,
        ProviderType::Ocp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Aws => "aws",
            ProviderType::Azure => "azure",
            ProviderType::Gcp => "gcp",
            ProviderType::Ibm => "ibm",
            ProviderType::Ocp => "ocp",
        }
    }

    /// Path segment used by the reports and tags API.
    ///
    /// OpenShift is served under `openshift`, everything else under its
    /// short name.
    pub fn api_segment(&self) -> &'static str {
        match self {
            ProviderType::Ocp => "openshift",
            other => other.as_str(),
        }
    }

    /// Providers whose user-access endpoint answers with a bare boolean
    /// instead of a list of `{type, access}` records.
    pub fn is_boolean_flagged(&self) -> bool {
        matches!(self, ProviderType::Gcp | ProviderType::Ibm)
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" => Ok(ProviderType::Aws),
            "azure" => Ok(ProviderType::Azure),
            "gcp" => Ok(ProviderType::Gcp),
            "ibm" => Ok(ProviderType::Ibm),
            "ocp" | "openshift" => Ok(ProviderType::Ocp),
            _ => Err(UnknownVariant::new("provider", s)),
        }
    }
}

/// Kind of a user-access entitlement
///
/// Every provider has a matching kind; `cost_model` gates the cost model
/// pages and `all` names the combined user-access query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    Aws,
    Azure,
    Gcp,
    Ibm,
    Ocp,
    CostModel,
    All,
}

impl AccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessType::Aws => "aws",
            AccessType::Azure => "azure",
            AccessType::Gcp => "gcp",
            AccessType::Ibm => "ibm",
            AccessType::Ocp => "ocp",
            AccessType::CostModel => "cost_model",
            AccessType::All => "all",
        }
    }

    pub fn provider(&self) -> Option<ProviderType> {
        match self {
            AccessType::Aws => Some(ProviderType::Aws),
            AccessType::Azure => Some(ProviderType::Azure),
            AccessType::Gcp => Some(ProviderType::Gcp),
            AccessType::Ibm => Some(ProviderType::Ibm),
            AccessType::Ocp => Some(ProviderType::Ocp),
            AccessType::CostModel | AccessType::All => None,
        }
    }

    pub fn is_boolean_flagged(&self) -> bool {
        self.provider().is_some_and(|p| p.is_boolean_flagged())
    }
}

impl From<ProviderType> for AccessType {
    fn from(provider: ProviderType) -> Self {
        match provider {
            ProviderType::Aws => AccessType::Aws,
            ProviderType::Azure => AccessType::Azure,
            ProviderType::Gcp => AccessType::Gcp,
            ProviderType::Ibm => AccessType::Ibm,
            ProviderType::Ocp => AccessType::Ocp,
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cost_model" | "cost-model" => Ok(AccessType::CostModel),
            "all" => Ok(AccessType::All),
            other => other
                .parse::<ProviderType>()
                .map(AccessType::from)
                .map_err(|_| UnknownVariant::new("access type", s)),
        }
    }
}

/// Report family, i.e. the `{metricGroup}` segment of a report path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Cost,
    Storage,
    InstanceType,
    Database,
    Network,
    Cpu,
    Memory,
    Volume,
}

impl ReportType {
    pub fn path_segment(&self) -> &'static str {
        match self {
            // Database and network reports are cost reports filtered by service
            ReportType::Cost | ReportType::Database | ReportType::Network => "costs",
            ReportType::Storage => "storage",
            ReportType::InstanceType => "instance-types",
            ReportType::Cpu => "compute",
            ReportType::Memory => "memory",
            ReportType::Volume => "volumes",
        }
    }

    /// Whether the dashboard charts this report by cost rather than usage
    pub fn is_cost_report(&self) -> bool {
        matches!(
            self,
            ReportType::Cost | ReportType::Database | ReportType::Network
        )
    }

    /// Metric plotted by default for this report family
    pub fn default_metric(&self) -> MetricKey {
        if self.is_cost_report() {
            MetricKey::Cost
        } else {
            MetricKey::Usage
        }
    }
}

impl FromStr for ReportType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "cost" | "costs" => Ok(ReportType::Cost),
            "storage" => Ok(ReportType::Storage),
            "instance_type" | "instance_types" => Ok(ReportType::InstanceType),
            "database" => Ok(ReportType::Database),
            "network" => Ok(ReportType::Network),
            "cpu" | "compute" => Ok(ReportType::Cpu),
            "memory" => Ok(ReportType::Memory),
            "volume" | "volumes" => Ok(ReportType::Volume),
            _ => Err(UnknownVariant::new("report type", s)),
        }
    }
}
