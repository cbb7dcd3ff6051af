// gke-deploy library
// Provisions a GKE cluster and deploys the application manifests to it

pub mod cli;
pub mod commands;
pub mod config;
pub mod exec;
pub mod services;

pub use cli::{Action, Cli};
pub use commands::{Step, run_action, steps};
pub use config::DeployConfig;
pub use exec::{CommandExecutor, LocalExecutor};
