//! Typed wrapper over the `gcloud` CLI

use crate::config::DeployConfig;
use crate::exec::{CommandExecutor, CommandOutput, render};
use anyhow::{Context, Result};

pub struct Gcloud<'a, E: CommandExecutor> {
    exec: &'a E,
}

impl<'a, E: CommandExecutor> Gcloud<'a, E> {
    pub fn new(exec: &'a E) -> Self {
        Self { exec }
    }

    fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        self.exec.execute("gcloud", args)
    }

    /// Run a mutating command and fail with its stderr if it exits non-zero
    fn run_checked(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = self.run(args)?;
        if !output.success {
            anyhow::bail!(
                "'{}' failed: {}",
                render("gcloud", args),
                output.failure_reason()
            );
        }
        Ok(output)
    }

    /// Account currently authenticated with gcloud, if any
    pub fn active_account(&self) -> Result<Option<String>> {
        let output = self.run(&[
            "auth",
            "list",
            "--filter=status:ACTIVE",
            "--format=value(account)",
        ])?;
        if !output.success {
            return Ok(None);
        }
        Ok(first_line(&output.stdout))
    }

    pub fn project_exists(&self, project_id: &str) -> Result<bool> {
        let output = self.run(&["projects", "describe", project_id, "--format=value(projectId)"])?;
        Ok(output.success)
    }

    pub fn create_project(&self, project_id: &str) -> Result<()> {
        self.exec
            .execute_interactive("gcloud", &["projects", "create", project_id])
            .with_context(|| format!("Failed to create project {}", project_id))
    }

    /// First open billing account, e.g. `billingAccounts/0X0X0X-0X0X0X-0X0X0X`
    pub fn open_billing_account(&self) -> Result<Option<String>> {
        let output = self.run(&[
            "billing",
            "accounts",
            "list",
            "--filter=open=true",
            "--format=value(name)",
        ])?;
        if !output.success {
            return Ok(None);
        }
        Ok(first_line(&output.stdout))
    }

    pub fn link_billing(&self, project_id: &str, billing_account: &str) -> Result<()> {
        let account_id = billing_account
            .strip_prefix("billingAccounts/")
            .unwrap_or(billing_account);
        let flag = format!("--billing-account={}", account_id);
        self.run_checked(&["billing", "projects", "link", project_id, flag.as_str()])
            .with_context(|| format!("Failed to link billing account to {}", project_id))?;
        Ok(())
    }

    pub fn set_active_project(&self, project_id: &str) -> Result<()> {
        self.run_checked(&["config", "set", "project", project_id])?;
        Ok(())
    }

    /// Names of the services already enabled on the project
    pub fn enabled_services(&self, project_id: &str) -> Result<Vec<String>> {
        let project = format!("--project={}", project_id);
        let output = self.run(&[
            "services",
            "list",
            "--enabled",
            project.as_str(),
            "--format=value(config.name)",
        ])?;
        if !output.success {
            // An unreadable list just means everything gets enabled again
            tracing::warn!(reason = %output.failure_reason(), "could not list enabled services");
            return Ok(Vec::new());
        }
        Ok(output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    pub fn enable_services(&self, project_id: &str, services: &[&str]) -> Result<()> {
        let project = format!("--project={}", project_id);
        let mut args = vec!["services", "enable"];
        args.extend_from_slice(services);
        args.push(project.as_str());
        self.exec
            .execute_interactive("gcloud", &args)
            .with_context(|| format!("Failed to enable APIs: {}", services.join(", ")))
    }

    pub fn cluster_exists(&self, config: &DeployConfig) -> Result<bool> {
        let (region, project) = location_flags(config);
        let output = self.run(&[
            "container",
            "clusters",
            "describe",
            config.cluster_name.as_str(),
            region.as_str(),
            project.as_str(),
            "--format=value(name)",
        ])?;
        Ok(output.success)
    }

    pub fn create_cluster(&self, config: &DeployConfig) -> Result<()> {
        let (region, project) = location_flags(config);
        let nodes = format!("--num-nodes={}", config.num_nodes);
        let machine = format!("--machine-type={}", config.machine_type);
        self.exec
            .execute_interactive(
                "gcloud",
                &[
                    "container",
                    "clusters",
                    "create",
                    config.cluster_name.as_str(),
                    region.as_str(),
                    project.as_str(),
                    nodes.as_str(),
                    machine.as_str(),
                ],
            )
            .with_context(|| format!("Failed to create cluster {}", config.cluster_name))
    }

    /// Write kubeconfig credentials for the cluster
    pub fn get_credentials(&self, config: &DeployConfig) -> Result<()> {
        let (region, project) = location_flags(config);
        self.run_checked(&[
            "container",
            "clusters",
            "get-credentials",
            config.cluster_name.as_str(),
            region.as_str(),
            project.as_str(),
        ])?;
        Ok(())
    }

    pub fn delete_cluster(&self, config: &DeployConfig) -> Result<()> {
        let (region, project) = location_flags(config);
        self.exec
            .execute_interactive(
                "gcloud",
                &[
                    "container",
                    "clusters",
                    "delete",
                    config.cluster_name.as_str(),
                    region.as_str(),
                    project.as_str(),
                    "--quiet",
                ],
            )
            .with_context(|| format!("Failed to delete cluster {}", config.cluster_name))
    }
}

fn location_flags(config: &DeployConfig) -> (String, String) {
    (
        format!("--region={}", config.region),
        format!("--project={}", config.project_id),
    )
}

fn first_line(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}
