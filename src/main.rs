use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::{
    cmd_demo, cmd_methods, cmd_metrics, DemoArgs, MethodsArgs, MetricsArgs, OutputFormat,
};

/// hostlog - graft a logger onto an app as live methods
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Plugin options file (JSON, or YAML by extension)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    /// Enable debug mode
    #[arg(short, long, global = true)]
    debug: bool,

    /// Emit diagnostics as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install the logger on an app and call one of its methods
    Demo(DemoArgs),

    /// List the methods the logger installs on an app
    Methods(MethodsArgs),

    /// Print plugin counters in Prometheus text format
    Metrics(MetricsArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.debug, cli.json_logs)?;
    debug!("Starting hostlog v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Demo(args) => cmd_demo(args, config, cli.output),
        Commands::Methods(args) => cmd_methods(args, config, cli.output),
        Commands::Metrics(args) => cmd_metrics(args, config),
    };

    if let Err(err) = &result {
        error!("Command failed: {err:#}");
    }
    result
}

fn init_logging(level: &str, debug: bool, json: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));
    let registry = tracing_subscriber::registry().with(filter);

    // Diagnostics go to stderr so stdout stays reserved for command output.
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}
