// CLI types for gke-deploy

use crate::config::{self, DeployConfig, PollSettings};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gke-deploy", version)]
#[command(
    about = "Provision a GKE cluster and deploy the application manifests to it",
    long_about = None
)]
pub struct Cli {
    /// Action to perform
    #[arg(short = 'a', long, value_enum)]
    pub action: Action,
    /// Google Cloud project ID
    #[arg(short = 'p', long = "project", env = config::ENV_PROJECT_ID, default_value = config::DEFAULT_PROJECT_ID)]
    pub project_id: String,
    /// Region for the cluster
    #[arg(short = 'r', long, env = config::ENV_REGION, default_value = config::DEFAULT_REGION)]
    pub region: String,
    /// Cluster name
    #[arg(short = 'c', long = "cluster", env = config::ENV_CLUSTER_NAME, default_value = config::DEFAULT_CLUSTER_NAME)]
    pub cluster_name: String,
    /// Directory holding the Kubernetes manifests
    #[arg(long, env = config::ENV_MANIFEST_DIR, default_value = config::DEFAULT_MANIFEST_DIR)]
    pub manifest_dir: PathBuf,
    /// Nodes per zone when creating the cluster
    #[arg(long, env = config::ENV_NUM_NODES, default_value_t = config::DEFAULT_NUM_NODES)]
    pub num_nodes: u32,
    /// Machine type for cluster nodes
    #[arg(long, env = config::ENV_MACHINE_TYPE, default_value = config::DEFAULT_MACHINE_TYPE)]
    pub machine_type: String,
    /// Service whose external address is reported
    #[arg(long, env = config::ENV_ENTRY_SERVICE, default_value = config::DEFAULT_ENTRY_SERVICE)]
    pub entry_service: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create the project, enable APIs and create the cluster
    Setup,
    /// Apply manifests, wait for pods and show status
    Deploy,
    /// Show pods, services and the external address
    Status,
    /// Delete the cluster
    Destroy,
    /// Setup followed by deploy
    All,
}

impl Cli {
    pub fn deploy_config(&self) -> DeployConfig {
        DeployConfig {
            project_id: self.project_id.clone(),
            region: self.region.clone(),
            cluster_name: self.cluster_name.clone(),
            manifest_dir: self.manifest_dir.clone(),
            num_nodes: self.num_nodes,
            machine_type: self.machine_type.clone(),
            entry_service: self.entry_service.clone(),
            poll: PollSettings::default(),
        }
    }
}
