//! Typed wrapper over the `kubectl` CLI

use crate::exec::{CommandExecutor, render};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct PodList {
    #[serde(default)]
    items: Vec<Pod>,
}

#[derive(Debug, Deserialize)]
struct Pod {
    metadata: Metadata,
    #[serde(default)]
    status: PodStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Metadata {
    name: String,
    deletion_timestamp: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PodStatus {
    phase: Option<String>,
    reason: Option<String>,
    #[serde(default)]
    container_statuses: Vec<ContainerStatus>,
}

#[derive(Debug, Deserialize)]
struct ContainerStatus {
    #[serde(default)]
    state: ContainerState,
}

#[derive(Debug, Default, Deserialize)]
struct ContainerState {
    waiting: Option<StateReason>,
    running: Option<serde_json::Value>,
    terminated: Option<StateReason>,
}

#[derive(Debug, Deserialize)]
struct StateReason {
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Service {
    #[serde(default)]
    status: ServiceStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceStatus {
    #[serde(default)]
    load_balancer: LoadBalancerStatus,
}

#[derive(Debug, Default, Deserialize)]
struct LoadBalancerStatus {
    #[serde(default)]
    ingress: Vec<Ingress>,
}

#[derive(Debug, Deserialize)]
struct Ingress {
    ip: Option<String>,
    hostname: Option<String>,
}

/// A pod reduced to the STATUS column `kubectl get pods` would print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodSummary {
    pub name: String,
    pub status: String,
}

impl PodSummary {
    /// Running with every container up, or finished successfully
    pub fn is_terminal_success(&self) -> bool {
        self.status == "Running" || self.status == "Completed"
    }
}

impl From<Pod> for PodSummary {
    fn from(pod: Pod) -> Self {
        // kubectl shows Terminating whatever the phase once deletion has started
        let status = match pod.metadata.deletion_timestamp {
            Some(_) => "Terminating".to_string(),
            None => display_status(&pod.status),
        };
        Self {
            name: pod.metadata.name,
            status,
        }
    }
}

fn display_status(status: &PodStatus) -> String {
    let phase = status.phase.as_deref().unwrap_or("Unknown");
    if phase == "Succeeded" {
        return "Completed".to_string();
    }
    if let Some(reason) = &status.reason {
        return reason.clone();
    }
    for container in &status.container_statuses {
        if let Some(reason) = container.state.waiting.as_ref().and_then(|w| w.reason.clone()) {
            return reason;
        }
        if let Some(terminated) = &container.state.terminated {
            return terminated
                .reason
                .clone()
                .unwrap_or_else(|| "Terminated".to_string());
        }
    }
    if phase == "Running"
        && status
            .container_statuses
            .iter()
            .any(|c| c.state.running.is_none())
    {
        return "NotReady".to_string();
    }
    phase.to_string()
}

/// Parse `kubectl get pods -o json` output
pub fn parse_pods(json: &str) -> Result<Vec<PodSummary>> {
    let list: PodList = serde_json::from_str(json).context("Failed to parse pod list")?;
    Ok(list.items.into_iter().map(PodSummary::from).collect())
}

/// Parse `kubectl get service NAME -o json` output into its external address
pub fn parse_external_address(json: &str) -> Result<Option<String>> {
    let service: Service = serde_json::from_str(json).context("Failed to parse service")?;
    Ok(service
        .status
        .load_balancer
        .ingress
        .into_iter()
        .find_map(|i| i.ip.or(i.hostname))
        .filter(|a| !a.is_empty()))
}

pub struct Kubectl<'a, E: CommandExecutor> {
    exec: &'a E,
}

impl<'a, E: CommandExecutor> Kubectl<'a, E> {
    pub fn new(exec: &'a E) -> Self {
        Self { exec }
    }

    pub fn apply(&self, manifest: &Path) -> Result<()> {
        let path = manifest.to_string_lossy().into_owned();
        let args = ["apply", "-f", path.as_str()];
        let output = self.exec.execute("kubectl", &args)?;
        if !output.success {
            anyhow::bail!(
                "'{}' failed: {}",
                render("kubectl", &args),
                output.failure_reason()
            );
        }
        for line in output.stdout.lines().filter(|l| !l.trim().is_empty()) {
            println!("  {}", line.trim());
        }
        Ok(())
    }

    pub fn pods(&self) -> Result<Vec<PodSummary>> {
        let output = self.exec.execute("kubectl", &["get", "pods", "-o", "json"])?;
        if !output.success {
            anyhow::bail!("Unable to list pods: {}", output.failure_reason());
        }
        parse_pods(&output.stdout)
    }

    /// Print `kubectl get pods` straight to the terminal
    pub fn print_pods(&self) -> Result<()> {
        self.exec.execute_interactive("kubectl", &["get", "pods"])
    }

    /// Print `kubectl get services` straight to the terminal
    pub fn print_services(&self) -> Result<()> {
        self.exec.execute_interactive("kubectl", &["get", "services"])
    }

    /// External address of a service; `None` while the load balancer is still provisioning
    pub fn external_address(&self, service: &str) -> Result<Option<String>> {
        let output = self
            .exec
            .execute("kubectl", &["get", "service", service, "-o", "json"])?;
        if !output.success {
            tracing::debug!(service, reason = %output.failure_reason(), "service lookup failed");
            return Ok(None);
        }
        if output.stdout_trimmed().is_empty() {
            return Ok(None);
        }
        match parse_external_address(&output.stdout) {
            Ok(address) => Ok(address),
            Err(err) => {
                tracing::warn!(service, error = %format!("{:#}", err), "unreadable service status");
                Ok(None)
            }
        }
    }
}
