//! Waits for the deployed pods to settle

use crate::config::PollSettings;
use crate::exec::CommandExecutor;
use crate::services::kubectl::{Kubectl, PodSummary};
use std::thread;
use tracing::warn;

/// Result of a readiness wait; neither outcome is an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Every pod reached a terminal-success state on this attempt
    Ready { attempts: u32 },
    /// The budget ran out; carries the pods that were not ready on the last successful query
    TimedOut {
        attempts: u32,
        not_ready: Vec<PodSummary>,
    },
}

/// Ready only once pods exist and none are still settling
pub fn all_ready(pods: &[PodSummary]) -> bool {
    !pods.is_empty() && pods.iter().all(PodSummary::is_terminal_success)
}

/// Query pod status up to `settings.attempts` times, `settings.interval` apart
pub fn wait_for_pods<E: CommandExecutor>(exec: &E, settings: &PollSettings) -> PollOutcome {
    let kubectl = Kubectl::new(exec);
    let mut not_ready = Vec::new();

    println!("Waiting for pods to become ready...");
    for attempt in 1..=settings.attempts {
        match kubectl.pods() {
            Ok(pods) => {
                let ready = pods.iter().filter(|p| p.is_terminal_success()).count();
                println!(
                    "  attempt {}/{}: {}/{} pods ready",
                    attempt,
                    settings.attempts,
                    ready,
                    pods.len()
                );
                if all_ready(&pods) {
                    println!("✓ All pods are ready");
                    return PollOutcome::Ready { attempts: attempt };
                }
                not_ready = pods
                    .into_iter()
                    .filter(|p| !p.is_terminal_success())
                    .collect();
            }
            Err(err) => {
                warn!(attempt, error = %format!("{:#}", err), "pod status query failed");
                println!(
                    "  attempt {}/{}: unable to query pods",
                    attempt, settings.attempts
                );
            }
        }

        if attempt < settings.attempts {
            thread::sleep(settings.interval);
        }
    }

    println!(
        "⚠ Pods not ready after {} attempts; continuing",
        settings.attempts
    );
    for pod in &not_ready {
        println!("    {} ({})", pod.name, pod.status);
    }
    PollOutcome::TimedOut {
        attempts: settings.attempts,
        not_ready,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::fake::{FakeExecutor, fail, ok};
    use std::time::Duration;

    const EMPTY: &str = r#"{"items": []}"#;
    const PENDING: &str = r#"{"items": [
        {"metadata": {"name": "api-1"}, "status": {"phase": "Running"}},
        {"metadata": {"name": "web-1"}, "status": {"phase": "Pending"}}
    ]}"#;
    const READY: &str = r#"{"items": [
        {"metadata": {"name": "api-1"}, "status": {"phase": "Running"}},
        {"metadata": {"name": "seed-1"}, "status": {"phase": "Succeeded"}}
    ]}"#;

    const ROLLING: &str = r#"{"items": [
        {"metadata": {"name": "api-2"}, "status": {"phase": "Running"}},
        {"metadata": {"name": "api-1", "deletionTimestamp": "2024-01-01T00:05:00Z"},
         "status": {"phase": "Running"}}
    ]}"#;

    fn fast(attempts: u32) -> PollSettings {
        PollSettings {
            attempts,
            interval: Duration::ZERO,
        }
    }

    fn pod_queries(exec: &FakeExecutor) -> usize {
        exec.calls_starting_with("kubectl get pods").len()
    }

    #[test]
    fn test_no_pods_is_not_ready() {
        assert!(!all_ready(&[]));
    }

    #[test]
    fn test_ready_on_first_all_terminal_query() {
        let exec = FakeExecutor::new();
        exec.respond_seq(
            "kubectl get pods",
            vec![ok(EMPTY), ok(PENDING), ok(READY)],
        );

        let outcome = wait_for_pods(&exec, &fast(60));

        assert_eq!(outcome, PollOutcome::Ready { attempts: 3 });
        assert_eq!(pod_queries(&exec), 3);
    }

    #[test]
    fn test_times_out_after_exactly_the_budget() {
        let exec = FakeExecutor::new();
        exec.respond("kubectl get pods", ok(PENDING));

        let outcome = wait_for_pods(&exec, &fast(60));

        match outcome {
            PollOutcome::TimedOut {
                attempts,
                not_ready,
            } => {
                assert_eq!(attempts, 60);
                assert_eq!(not_ready.len(), 1);
                assert_eq!(not_ready[0].name, "web-1");
            }
            other => panic!("expected timeout, got {:?}", other),
        }
        assert_eq!(pod_queries(&exec), 60);
    }

    #[test]
    fn test_empty_cluster_never_reports_ready() {
        let exec = FakeExecutor::new();
        exec.respond("kubectl get pods", ok(EMPTY));

        let outcome = wait_for_pods(&exec, &fast(5));

        assert!(matches!(outcome, PollOutcome::TimedOut { attempts: 5, .. }));
        assert_eq!(pod_queries(&exec), 5);
    }

    #[test]
    fn test_query_failures_count_as_attempts() {
        let exec = FakeExecutor::new();
        exec.respond_seq(
            "kubectl get pods",
            vec![fail("connection refused"), ok("garbage"), ok(READY)],
        );

        let outcome = wait_for_pods(&exec, &fast(60));

        assert_eq!(outcome, PollOutcome::Ready { attempts: 3 });
    }

    #[test]
    fn test_waits_for_replaced_pods_to_terminate() {
        let exec = FakeExecutor::new();
        exec.respond_seq("kubectl get pods", vec![ok(ROLLING), ok(ROLLING), ok(READY)]);

        let outcome = wait_for_pods(&exec, &fast(60));

        assert_eq!(outcome, PollOutcome::Ready { attempts: 3 });
    }
}
