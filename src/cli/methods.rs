use std::path::Path;

use anyhow::{bail, Result};
use clap::Args;
use serde_json::json;

use hostlog::plugin::LOGGER_PROPERTY;

use super::{build_app, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct MethodsArgs {
    /// Name of the app to inspect
    #[arg(long, default_value = "demo")]
    pub app: String,
}

pub fn cmd_methods(args: MethodsArgs, config: Option<&Path>, output: OutputFormat) -> Result<()> {
    let (app, applied) = build_app(&args.app, config, true)?;
    let Some(logger) = applied.logger() else {
        bail!("logger plugin not applied to {}", args.app);
    };

    let rows: Vec<(String, &'static str)> = app
        .keys()
        .into_iter()
        .map(|name| {
            let category = if name == LOGGER_PROPERTY {
                "logger"
            } else {
                logger
                    .method(&name)
                    .and_then(|method| method.category())
                    .map(|category| category.as_str())
                    .unwrap_or("custom")
            };
            (name, category)
        })
        .collect();

    match output {
        OutputFormat::Human => {
            println!("Methods on {}", args.app);
            for (name, category) in &rows {
                println!("  {name:<12} {category}");
            }
        }
        OutputFormat::Json => {
            let items: Vec<_> = rows
                .iter()
                .map(|(name, category)| json!({"name": name, "category": category}))
                .collect();
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
    }
    Ok(())
}
