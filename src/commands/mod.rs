// Action routing
//
// Each action is a fixed list of steps. To change what an action does,
// edit its list in `steps`; to add a step, add a `Step` variant and its arm
// in `run_step`.

use crate::cli::Action;
use crate::config::DeployConfig;
use crate::exec::CommandExecutor;
use crate::services;
use anyhow::Result;
use std::io::BufRead;
use tracing::debug;

/// One unit of work in an action's sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CheckTools,
    ProvisionProject,
    EnableApis,
    ProvisionCluster,
    FetchCredentials,
    ApplyManifests,
    AwaitReadiness,
    ReportStatus,
    ConfirmDestroy,
    DeleteCluster,
}

enum Flow {
    Continue,
    Stop,
}

/// Ordered steps for an action
pub fn steps(action: Action) -> &'static [Step] {
    use Step::*;
    match action {
        Action::Setup => &[CheckTools, ProvisionProject, EnableApis, ProvisionCluster],
        Action::Deploy => &[
            CheckTools,
            FetchCredentials,
            ApplyManifests,
            AwaitReadiness,
            ReportStatus,
        ],
        Action::Status => &[CheckTools, FetchCredentials, ReportStatus],
        Action::Destroy => &[CheckTools, ConfirmDestroy, DeleteCluster],
        // ProvisionCluster already fetched credentials
        Action::All => &[
            CheckTools,
            ProvisionProject,
            EnableApis,
            ProvisionCluster,
            ApplyManifests,
            AwaitReadiness,
            ReportStatus,
        ],
    }
}

/// Run an action's steps in order, stopping at the first error.
///
/// `input` answers the destroy confirmation.
pub fn run_action<E: CommandExecutor, R: BufRead>(
    action: Action,
    config: &DeployConfig,
    exec: &E,
    input: &mut R,
) -> Result<()> {
    println!(
        "Target: project {}, region {}, cluster {}",
        config.project_id, config.region, config.cluster_name
    );
    println!();

    for &step in steps(action) {
        debug!(?action, ?step, "running step");
        if let Flow::Stop = run_step(step, action, config, exec, input)? {
            debug!(?step, "sequence stopped");
            return Ok(());
        }
    }

    println!();
    println!("✓ {} complete", action_name(action));
    Ok(())
}

fn run_step<E: CommandExecutor, R: BufRead>(
    step: Step,
    action: Action,
    config: &DeployConfig,
    exec: &E,
    input: &mut R,
) -> Result<Flow> {
    match step {
        Step::CheckTools => services::check_prerequisites(exec, action)?,
        Step::ProvisionProject => {
            services::provision_project(exec, config)?;
        }
        Step::EnableApis => services::enable_apis(exec, config)?,
        Step::ProvisionCluster => {
            services::provision_cluster(exec, config)?;
        }
        Step::FetchCredentials => services::connect_existing_cluster(exec, config)?,
        Step::ApplyManifests => services::apply_manifests(exec, config)?,
        Step::AwaitReadiness => {
            // A timeout has already been reported as a warning; status still runs
            services::wait_for_pods(exec, &config.poll);
        }
        Step::ReportStatus => {
            services::show_status(exec, config)?;
        }
        Step::ConfirmDestroy => {
            if !services::confirm_destroy(config, input)? {
                return Ok(Flow::Stop);
            }
        }
        Step::DeleteCluster => services::delete_cluster(exec, config)?,
    }
    Ok(Flow::Continue)
}

fn action_name(action: Action) -> &'static str {
    match action {
        Action::Setup => "Setup",
        Action::Deploy => "Deploy",
        Action::Status => "Status",
        Action::Destroy => "Destroy",
        Action::All => "Setup and deploy",
    }
}
