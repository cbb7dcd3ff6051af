//! Pod/service status and connection details

use crate::config::DeployConfig;
use crate::exec::CommandExecutor;
use crate::services::kubectl::Kubectl;
use anyhow::Result;

/// External address of the entry service, or "pending" while unassigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Assigned(String),
    Pending,
}

/// Print pods, services and the entry service's external address
pub fn show_status<E: CommandExecutor>(exec: &E, config: &DeployConfig) -> Result<Endpoint> {
    let kubectl = Kubectl::new(exec);

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Deployment Status");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    println!("Pods:");
    kubectl.print_pods()?;
    println!();

    println!("Services:");
    kubectl.print_services()?;
    println!();

    let endpoint = match kubectl.external_address(&config.entry_service)? {
        Some(address) => Endpoint::Assigned(address),
        None => Endpoint::Pending,
    };

    println!("Project: {}", config.project_id);
    println!("Region:  {}", config.region);
    println!("Cluster: {}", config.cluster_name);
    match &endpoint {
        Endpoint::Assigned(address) => {
            println!("✓ {} external address: {}", config.entry_service, address);
            println!("  http://{}", address);
        }
        Endpoint::Pending => {
            println!(
                "⚠ {} external address: pending (the load balancer may take a few minutes)",
                config.entry_service
            );
            println!("  Re-check with: gke-deploy -a status");
        }
    }

    Ok(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::fake::{FakeExecutor, fail, ok};

    #[test]
    fn test_assigned_address_is_reported() {
        let exec = FakeExecutor::new();
        exec.respond(
            "kubectl get service frontend",
            ok(r#"{"status": {"loadBalancer": {"ingress": [{"ip": "34.120.0.7"}]}}}"#),
        );

        let endpoint = show_status(&exec, &DeployConfig::default()).unwrap();

        assert_eq!(endpoint, Endpoint::Assigned("34.120.0.7".to_string()));
        assert_eq!(
            exec.calls(),
            vec![
                "kubectl get pods",
                "kubectl get services",
                "kubectl get service frontend -o json",
            ]
        );
    }

    #[test]
    fn test_unassigned_address_is_pending_not_error() {
        let exec = FakeExecutor::new();
        exec.respond(
            "kubectl get service frontend",
            ok(r#"{"status": {"loadBalancer": {}}}"#),
        );
        assert_eq!(
            show_status(&exec, &DeployConfig::default()).unwrap(),
            Endpoint::Pending
        );
    }

    #[test]
    fn test_missing_service_is_pending() {
        let exec = FakeExecutor::new();
        exec.respond(
            "kubectl get service frontend",
            fail("Error from server (NotFound): services \"frontend\" not found"),
        );
        assert_eq!(
            show_status(&exec, &DeployConfig::default()).unwrap(),
            Endpoint::Pending
        );
    }

    #[test]
    fn test_entry_service_is_configurable() {
        let exec = FakeExecutor::new();
        let config = DeployConfig {
            entry_service: "gateway".into(),
            ..DeployConfig::default()
        };
        exec.respond(
            "kubectl get service gateway",
            ok(r#"{"status": {"loadBalancer": {"ingress": [{"hostname": "gw.example.com"}]}}}"#),
        );
        assert_eq!(
            show_status(&exec, &config).unwrap(),
            Endpoint::Assigned("gw.example.com".to_string())
        );
    }
}
