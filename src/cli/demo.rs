use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use serde_json::Value;
use tracing::info;

use super::{build_app, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct DemoArgs {
    /// Name of the demo app
    #[arg(long, default_value = "demo")]
    pub app: String,

    /// Logger method to invoke (an emitter or a style)
    #[arg(short, long, default_value = "info")]
    pub emitter: String,

    /// Modes to chain before the emitter, in order
    #[arg(short, long = "mode", value_name = "MODE")]
    pub modes: Vec<String>,

    /// Do not forward log events to the app's formatter
    #[arg(long)]
    pub no_default_listener: bool,

    /// Message words
    #[arg(required = true)]
    pub message: Vec<String>,
}

pub fn cmd_demo(args: DemoArgs, config: Option<&Path>, output: OutputFormat) -> Result<()> {
    let (app, applied) = build_app(&args.app, config, args.no_default_listener)?;
    if let Some(reason) = applied.skip_reason() {
        bail!("logger plugin not applied to {}: {}", args.app, reason.as_str());
    }
    if output == OutputFormat::Json {
        // Console lines would interleave with the JSON document.
        app.on_format(|_| Ok(()));
    }

    let mut chain = args.modes.iter().chain(std::iter::once(&args.emitter));
    let first = chain
        .next()
        .ok_or_else(|| anyhow!("no method to invoke"))?;
    let mut member = app
        .get(first)
        .ok_or_else(|| anyhow!("app {} has no method {first}", args.app))?;
    for name in chain {
        member = member
            .member(name)
            .ok_or_else(|| anyhow!("{name} cannot be chained here"))?;
    }

    let words: Vec<Value> = args.message.into_iter().map(Value::String).collect();
    let result = member
        .call(&words)
        .with_context(|| format!("calling {}", args.emitter))?;
    info!(app = %args.app, method = %args.emitter, "demo call finished");

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Human => {
            // Emitters print through the listener; styles only return text.
            if let Value::String(text) = result {
                println!("{text}");
            }
        }
    }
    Ok(())
}
