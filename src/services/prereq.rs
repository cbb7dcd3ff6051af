//! Prerequisite checks run before any action touches the cloud

use crate::cli::Action;
use crate::exec::CommandExecutor;
use crate::services::gcloud::Gcloud;
use anyhow::Result;

/// External tools an action calls
pub fn required_tools(action: Action) -> &'static [&'static str] {
    match action {
        Action::Setup | Action::Destroy => &["gcloud"],
        Action::Deploy | Action::Status | Action::All => &["gcloud", "kubectl"],
    }
}

/// Fail if a required tool is missing from PATH or gcloud has no active account
pub fn check_prerequisites<E: CommandExecutor>(exec: &E, action: Action) -> Result<()> {
    let missing: Vec<&str> = required_tools(action)
        .iter()
        .copied()
        .filter(|tool| !exec.check_command_exists(tool))
        .collect();

    if !missing.is_empty() {
        let mut message = format!("Required tools not found: {}\n", missing.join(", "));
        for tool in &missing {
            message.push_str(&format!("  {}: {}\n", tool, install_hint(tool)));
        }
        anyhow::bail!(message.trim_end().to_string());
    }

    match Gcloud::new(exec).active_account()? {
        Some(account) => {
            println!("✓ gcloud authenticated as {}", account);
            Ok(())
        }
        None => anyhow::bail!(
            "No active gcloud account.\n\nAuthenticate first:\n  gcloud auth login"
        ),
    }
}

fn install_hint(tool: &str) -> &'static str {
    match tool {
        "gcloud" => "install the Google Cloud SDK: https://cloud.google.com/sdk/docs/install",
        "kubectl" => "gcloud components install kubectl",
        _ => "install it and make sure it is on PATH",
    }
}
