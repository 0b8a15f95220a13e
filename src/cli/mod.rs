pub mod demo;
pub mod methods;
pub mod metrics;
pub mod output;

pub use demo::{cmd_demo, DemoArgs};
pub use methods::{cmd_methods, MethodsArgs};
pub use metrics::{cmd_metrics, MetricsArgs};
pub use output::OutputFormat;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;

use hostlog::config::load_plugin_options;
use hostlog::plugin::DEFAULT_LISTENER_KEY;
use hostlog::{Applied, App, LoggerPlugin};

/// Builds an app named `name` and applies the logger plugin to it.
///
/// The loaded options become both the app's options and the plugin's
/// caller options.
pub(crate) fn build_app(
    name: &str,
    config: Option<&Path>,
    no_default_listener: bool,
) -> Result<(Arc<App>, Applied)> {
    let mut options = load_plugin_options(config).context("loading plugin options")?;
    if no_default_listener {
        if let Value::Object(map) = &mut options {
            map.insert(DEFAULT_LISTENER_KEY.to_string(), Value::Bool(false));
        }
    }

    let app = App::new(name);
    app.set_options(options.clone());
    let applied = app
        .use_plugin(&LoggerPlugin::new(Some(&options)))
        .with_context(|| format!("installing logger on app {name}"))?;
    Ok((app, applied))
}
