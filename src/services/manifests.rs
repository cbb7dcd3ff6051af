//! Applies the application's manifests to the current kubectl context

use crate::config::DeployConfig;
use crate::exec::CommandExecutor;
use crate::services::kubectl::Kubectl;
use anyhow::Result;
use std::path::PathBuf;

/// Manifests from the configured set that are not on disk
pub fn missing_manifests(config: &DeployConfig) -> Vec<PathBuf> {
    config
        .manifest_paths()
        .into_iter()
        .filter(|p| !p.is_file())
        .collect()
}

/// Apply every manifest in order. Nothing is applied if any file is missing.
pub fn apply_manifests<E: CommandExecutor>(exec: &E, config: &DeployConfig) -> Result<()> {
    let missing = missing_manifests(config);
    if !missing.is_empty() {
        let list: Vec<String> = missing
            .iter()
            .map(|p| format!("  {}", p.display()))
            .collect();
        anyhow::bail!(
            "Manifest files not found in {}:\n{}",
            config.manifest_dir.display(),
            list.join("\n")
        );
    }

    let kubectl = Kubectl::new(exec);
    for path in config.manifest_paths() {
        println!("Applying {}...", path.display());
        kubectl.apply(&path)?;
    }
    println!("✓ Manifests applied");
    Ok(())
}
