//! Deployment target configuration
//!
//! Values are resolved once per invocation (flag, then environment, then the
//! defaults below) and never change afterwards.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PROJECT_ID: &str = "microservices-demo-project";
pub const DEFAULT_REGION: &str = "us-central1";
pub const DEFAULT_CLUSTER_NAME: &str = "microservices-cluster";
pub const DEFAULT_MANIFEST_DIR: &str = "k8s";
pub const DEFAULT_NUM_NODES: u32 = 1;
pub const DEFAULT_MACHINE_TYPE: &str = "e2-standard-2";
pub const DEFAULT_ENTRY_SERVICE: &str = "frontend";

pub const ENV_PROJECT_ID: &str = "GKE_DEPLOY_PROJECT_ID";
pub const ENV_REGION: &str = "GKE_DEPLOY_REGION";
pub const ENV_CLUSTER_NAME: &str = "GKE_DEPLOY_CLUSTER_NAME";
pub const ENV_MANIFEST_DIR: &str = "GKE_DEPLOY_MANIFEST_DIR";
pub const ENV_NUM_NODES: &str = "GKE_DEPLOY_NUM_NODES";
pub const ENV_MACHINE_TYPE: &str = "GKE_DEPLOY_MACHINE_TYPE";
pub const ENV_ENTRY_SERVICE: &str = "GKE_DEPLOY_ENTRY_SERVICE";

/// Cloud APIs the cluster needs on the project
pub const REQUIRED_APIS: &[&str] = &["compute.googleapis.com", "container.googleapis.com"];

/// Manifests applied in order; the JWT secret must exist before the workloads that mount it
pub const MANIFESTS: &[&str] = &[
    "jwt-secret.yaml",
    "database.yaml",
    "backend.yaml",
    "frontend.yaml",
];

/// Readiness poll budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            attempts: 60,
            interval: Duration::from_secs(5),
        }
    }
}

/// Everything a run needs to know about where and what to deploy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    pub project_id: String,
    pub region: String,
    pub cluster_name: String,
    pub manifest_dir: PathBuf,
    pub num_nodes: u32,
    pub machine_type: String,
    pub entry_service: String,
    pub poll: PollSettings,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            project_id: DEFAULT_PROJECT_ID.to_string(),
            region: DEFAULT_REGION.to_string(),
            cluster_name: DEFAULT_CLUSTER_NAME.to_string(),
            manifest_dir: PathBuf::from(DEFAULT_MANIFEST_DIR),
            num_nodes: DEFAULT_NUM_NODES,
            machine_type: DEFAULT_MACHINE_TYPE.to_string(),
            entry_service: DEFAULT_ENTRY_SERVICE.to_string(),
            poll: PollSettings::default(),
        }
    }
}

impl DeployConfig {
    /// Paths of the manifests in apply order
    pub fn manifest_paths(&self) -> Vec<PathBuf> {
        MANIFESTS.iter().map(|m| self.manifest_dir.join(m)).collect()
    }
}

/// Load `.env` from the working directory into the process environment, if present
pub fn load_dotenv() {
    if let Ok(path) = dotenv::dotenv() {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }
}
