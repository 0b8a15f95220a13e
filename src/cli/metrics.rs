use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use hostlog::metrics;

use super::build_app;

#[derive(Args, Clone, Debug)]
pub struct MetricsArgs {
    /// Number of apps to install the logger on before rendering
    #[arg(long, default_value_t = 1)]
    pub apps: usize,
}

/// Installs the logger on throwaway apps and prints the resulting counters.
pub fn cmd_metrics(args: MetricsArgs, config: Option<&Path>) -> Result<()> {
    let registry = metrics::global_registry();
    metrics::register_metrics(registry);

    for index in 0..args.apps {
        let name = format!("metrics-{index}");
        let (app, _) = build_app(&name, config, true)?;
        app.call("info", &[json!("warming up")])
            .with_context(|| format!("calling info on {name}"))?;
    }

    let text = metrics::render(registry).context("rendering metrics")?;
    print!("{text}");
    Ok(())
}
