use anyhow::Result;
use clap::Parser;
use gke_deploy::{Cli, LocalExecutor, config, run_action};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Before parsing so .env values act as flag defaults
    config::load_dotenv();

    let cli = Cli::parse();
    let config = cli.deploy_config();
    let stdin = std::io::stdin();
    run_action(cli.action, &config, &LocalExecutor, &mut stdin.lock())
}
