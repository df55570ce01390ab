// symphony-config - Environment configuration for synthesis
//
// Each deployment environment in the closed set (dev, staging, prod) maps
// to an embedded TOML document describing resource naming, removal
// policies, the lambda execution profile and the API CORS policy. The
// loader is deterministic: the same environment name always yields the
// same structured result for a given build, and unknown names are
// rejected before any construction starts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

mod error;
mod loader;
mod tags;
mod validation;

pub use error::ConfigError;
pub use loader::{load_config, KNOWN_ENVIRONMENTS};
pub use tags::{tags_for, Tags};

/// Resolved configuration for one deployment environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Prefix for resource naming and export qualification
    pub prefix: String,

    pub env: EnvSettings,

    pub compute: ComputeEnv,

    pub persistence: PersistenceEnv,

    #[serde(default)]
    pub network: NetworkEnv,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    pub stage: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeEnv {
    pub lambda: LambdaEnv,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambdaEnv {
    pub profile: LambdaProfile,
    pub timeout_secs: u64,
}

impl LambdaEnv {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceEnv {
    pub table: TableEnv,
    pub bucket: BucketEnv,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableEnv {
    pub name: String,
    pub removal_policy: RemovalPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketEnv {
    pub name: String,
    pub removal_policy: RemovalPolicy,
    #[serde(default)]
    pub auto_delete_objects: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkEnv {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apigw: Option<ApiGwEnv>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiGwEnv {
    pub cors_preflight: CorsPreflight,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsPreflight {
    pub allow_origins: Vec<String>,
    pub allow_headers: Vec<String>,
    pub allow_methods: Vec<String>,
}

/// Lambda execution profile: custom LLRT runtime for speed, or the
/// standard managed Node.js runtime for compatibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LambdaProfile {
    Performance,
    Compatibility,
}

impl fmt::Display for LambdaProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LambdaProfile::Performance => write!(f, "performance"),
            LambdaProfile::Compatibility => write!(f, "compatibility"),
        }
    }
}

/// Retention behavior when a storage declaration is removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalPolicy {
    Destroy,
    Retain,
}

impl fmt::Display for RemovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalPolicy::Destroy => write!(f, "destroy"),
            RemovalPolicy::Retain => write!(f, "retain"),
        }
    }
}
