//! Project provisioning and API enablement

use crate::config::{DeployConfig, REQUIRED_APIS};
use crate::exec::CommandExecutor;
use crate::services::ensure::{EnsureOutcome, ensure_exists};
use crate::services::gcloud::Gcloud;
use anyhow::Result;

/// Ensure the project exists with billing linked, then make it the active gcloud project
pub fn provision_project<E: CommandExecutor>(
    exec: &E,
    config: &DeployConfig,
) -> Result<EnsureOutcome> {
    let gcloud = Gcloud::new(exec);
    let project_id = config.project_id.as_str();

    let outcome = ensure_exists(
        "Project",
        project_id,
        || gcloud.project_exists(project_id),
        || {
            // Billing has to be linkable before anything is created
            let Some(account) = gcloud.open_billing_account()? else {
                anyhow::bail!(
                    "No billing account found.\n\n\
                     Creating project '{}' requires an open billing account.\n\
                     Create one at https://console.cloud.google.com/billing\n\
                     then confirm it is visible with:\n  gcloud billing accounts list",
                    project_id
                );
            };
            gcloud.create_project(project_id)?;
            println!("Linking billing account {}...", account);
            gcloud.link_billing(project_id, &account)
        },
    )?;

    gcloud.set_active_project(project_id)?;
    println!("✓ Active project set to {}", project_id);
    Ok(outcome)
}

/// Enable the APIs the cluster needs, skipping those already on
pub fn enable_apis<E: CommandExecutor>(exec: &E, config: &DeployConfig) -> Result<()> {
    let gcloud = Gcloud::new(exec);
    let enabled = gcloud.enabled_services(&config.project_id)?;

    let pending: Vec<&str> = REQUIRED_APIS
        .iter()
        .copied()
        .filter(|api| {
            let on = enabled.iter().any(|e| e == api);
            if on {
                println!("✓ {} already enabled", api);
            }
            !on
        })
        .collect();

    if pending.is_empty() {
        return Ok(());
    }

    println!("Enabling {}...", pending.join(", "));
    gcloud.enable_services(&config.project_id, &pending)?;
    println!("✓ APIs enabled");
    Ok(())
}
