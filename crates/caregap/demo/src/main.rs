#![deny(unsafe_code)]
//! Care gap workflow demo.
//!
//! Drives a handful of gaps through identification, outreach planning,
//! contact logging and closure verification against the in-memory
//! registry, then prints what a read-only dashboard would see.

mod scenario;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use caregap_engine::{EngineConfig, GapWorkflowEngine};

/// Care gap workflow demo CLI
#[derive(Parser)]
#[command(name = "caregap-demo")]
#[command(about = "Walk scripted care gaps through the closure workflow", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CAREGAP_CONFIG")]
    config: Option<String>,

    /// Log level (overrides the configuration file)
    #[arg(long, env = "CAREGAP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "CAREGAP_LOG_JSON")]
    json: bool,

    /// Print the final workflow snapshots as JSON
    #[arg(long)]
    dump: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = EngineConfig::load(cli.config.as_deref())?;

    // Initialize tracing
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    if cli.json || config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    println!(
        "\n  Care Gap Workflow Demo\n  Version: {}\n",
        env!("CARGO_PKG_VERSION")
    );

    let engine = GapWorkflowEngine::new(config);
    let report = scenario::run(&engine).await?;

    scenario::print_dashboard(&engine).await?;

    if cli.dump {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
