//! Managed cluster lifecycle: ensure, credentials, delete

use crate::config::DeployConfig;
use crate::exec::CommandExecutor;
use crate::services::ensure::{EnsureOutcome, ensure_exists};
use crate::services::gcloud::Gcloud;
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

/// Ensure the cluster exists, then fetch kubeconfig credentials for it
pub fn provision_cluster<E: CommandExecutor>(
    exec: &E,
    config: &DeployConfig,
) -> Result<EnsureOutcome> {
    let gcloud = Gcloud::new(exec);

    let outcome = ensure_exists(
        "Cluster",
        &config.cluster_name,
        || gcloud.cluster_exists(config),
        || {
            println!(
                "  region {}, {} node(s) per zone, {} (this takes several minutes)",
                config.region, config.num_nodes, config.machine_type
            );
            gcloud.create_cluster(config)
        },
    )?;

    fetch_credentials(exec, config)?;
    Ok(outcome)
}

/// Write kubeconfig credentials for the cluster
pub fn fetch_credentials<E: CommandExecutor>(exec: &E, config: &DeployConfig) -> Result<()> {
    println!("Fetching credentials for cluster {}...", config.cluster_name);
    Gcloud::new(exec)
        .get_credentials(config)
        .with_context(|| format!("Failed to fetch credentials for {}", config.cluster_name))?;
    println!("✓ kubectl configured for {}", config.cluster_name);
    Ok(())
}

/// Credentials for a cluster that setup should already have created
pub fn connect_existing_cluster<E: CommandExecutor>(
    exec: &E,
    config: &DeployConfig,
) -> Result<()> {
    fetch_credentials(exec, config).with_context(|| {
        format!(
            "Cluster '{}' not found in {} (project {}).\n\nCreate it first:\n  gke-deploy -a setup -p {} -r {} -c {}",
            config.cluster_name,
            config.region,
            config.project_id,
            config.project_id,
            config.region,
            config.cluster_name
        )
    })
}

/// Ask for `[y/N]` confirmation on `input`; only `y` or `Y` proceeds
pub fn confirm_destroy<R: BufRead>(config: &DeployConfig, input: &mut R) -> Result<bool> {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Destroy Cluster");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    print!(
        "This will delete cluster '{}' in {} (project {}) and every workload on it. Continue? [y/N]: ",
        config.cluster_name, config.region, config.project_id
    );
    io::stdout().flush()?;

    // Raw bytes so undecodable input declines instead of failing
    let mut answer = Vec::new();
    input.read_until(b'\n', &mut answer)?;
    if !answer.trim_ascii().eq_ignore_ascii_case(b"y") {
        println!("Aborted.");
        return Ok(false);
    }
    Ok(true)
}

pub fn delete_cluster<E: CommandExecutor>(exec: &E, config: &DeployConfig) -> Result<()> {
    println!("Deleting cluster {}...", config.cluster_name);
    Gcloud::new(exec).delete_cluster(config)?;
    println!("✓ Cluster {} deleted", config.cluster_name);
    Ok(())
}
