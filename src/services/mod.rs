//! Deployment services
//!
//! Each module wraps one step of a deployment. All cloud and cluster access
//! goes through the `gcloud` and `kubectl` wrappers.

pub mod cluster;
pub mod ensure;
pub mod gcloud;
pub mod kubectl;
pub mod manifests;
pub mod prereq;
pub mod project;
pub mod readiness;
pub mod status;

pub use cluster::{
    confirm_destroy, connect_existing_cluster, delete_cluster, fetch_credentials, provision_cluster,
};
pub use ensure::{EnsureOutcome, ensure_exists};
pub use manifests::apply_manifests;
pub use prereq::check_prerequisites;
pub use project::{enable_apis, provision_project};
pub use readiness::{PollOutcome, wait_for_pods};
pub use status::{Endpoint, show_status};
