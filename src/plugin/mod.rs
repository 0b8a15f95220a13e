//! The logger plugin: installs a logger's methods on a host.
//!
//! ```no_run
//! use hostlog::{App, LoggerPlugin};
//! use serde_json::json;
//!
//! let app = App::new("demo");
//! app.use_plugin(&LoggerPlugin::new(None)).unwrap();
//! app.call("info", &[json!("ready")]).unwrap();
//! ```

pub mod binding;
pub mod options;

use std::fmt;
use std::sync::Arc;

use tracing::info;

use hostlog_core_types::HostlogResult;
use hostlog_logger::Logger;
use serde_json::Value;

use crate::host::{Host, Plugin};
use crate::metrics;

pub use binding::{InstallOutcome, LOGGER_PROPERTY};
pub use options::{resolve, LoggerOptions, DEFAULT_LISTENER_KEY};

/// Identifier recorded in the host's plugin registry.
pub const PLUGIN_ID: &str = "hostlog-logger";

/// Feature flag the host can switch off to opt out.
pub const FEATURE: &str = "logger";

type LoggerFactory = Arc<dyn Fn() -> Logger + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    AlreadyRegistered,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Disabled => "disabled",
            SkipReason::AlreadyRegistered => "already_registered",
        }
    }
}

/// What a successful installation produced.
#[derive(Debug, Clone)]
pub struct Installation {
    pub logger: Logger,
    /// Names defined on the host during the initial pass.
    pub installed: Vec<String>,
    /// Names the host already owned.
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum Applied {
    Installed(Installation),
    Skipped(SkipReason),
}

impl Applied {
    pub fn logger(&self) -> Option<&Logger> {
        match self {
            Applied::Installed(installation) => Some(&installation.logger),
            Applied::Skipped(_) => None,
        }
    }

    pub fn installation(&self) -> Option<&Installation> {
        match self {
            Applied::Installed(installation) => Some(installation),
            Applied::Skipped(_) => None,
        }
    }

    pub fn is_installed(&self) -> bool {
        matches!(self, Applied::Installed(_))
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Applied::Skipped(reason) => Some(*reason),
            Applied::Installed(_) => None,
        }
    }
}

/// Plugin grafting a fresh [`Logger`] onto each host it is applied to.
#[derive(Clone)]
pub struct LoggerPlugin {
    options: LoggerOptions,
    factory: LoggerFactory,
}

impl LoggerPlugin {
    pub fn new(caller: Option<&Value>) -> Self {
        Self::with_options(resolve(caller))
    }

    pub fn with_options(options: LoggerOptions) -> Self {
        Self {
            options,
            factory: Arc::new(Logger::new),
        }
    }

    /// Builds loggers with `factory` instead of [`Logger::new`].
    pub fn with_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Logger + Send + Sync + 'static,
    {
        self.factory = Arc::new(factory);
        self
    }

    pub fn options(&self) -> &LoggerOptions {
        &self.options
    }

    /// Installs the logger on `host`.
    ///
    /// Returns `Skipped` without touching the host when the `logger` feature
    /// is disabled or the plugin is already registered. Errors leave whatever
    /// was installed before the failure in place.
    pub fn apply<H>(&self, host: &Arc<H>) -> HostlogResult<Applied>
    where
        H: Host + ?Sized + 'static,
    {
        if !host.enabled(FEATURE) {
            return Ok(self.skip(host.as_ref(), SkipReason::Disabled));
        }
        if host.is_registered(PLUGIN_ID) {
            return Ok(self.skip(host.as_ref(), SkipReason::AlreadyRegistered));
        }
        host.register(PLUGIN_ID);

        let logger = (self.factory)();
        binding::link_options(host, &logger);
        binding::define_logger_accessor(host.as_ref(), &logger)?;
        let (installed, skipped) = binding::install_all(host.as_ref(), &logger)?;
        binding::subscribe_retrofit(host, &logger);
        if self.options.default_listener {
            binding::subscribe_default_listener(host, &logger);
        }

        info!(
            host = %host.name(),
            installed = installed.len(),
            skipped = skipped.len(),
            default_listener = self.options.default_listener,
            "logger plugin applied"
        );
        metrics::record_application("installed");
        Ok(Applied::Installed(Installation {
            logger,
            installed,
            skipped,
        }))
    }

    fn skip<H>(&self, host: &H, reason: SkipReason) -> Applied
    where
        H: Host + ?Sized,
    {
        info!(host = %host.name(), reason = reason.as_str(), "logger plugin not applied");
        metrics::record_application(reason.as_str());
        Applied::Skipped(reason)
    }
}

impl Default for LoggerPlugin {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for LoggerPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerPlugin")
            .field("options", &self.options)
            .finish()
    }
}

impl<H> Plugin<H> for LoggerPlugin
where
    H: Host + ?Sized + 'static,
{
    type Output = Applied;

    fn apply(&self, host: &Arc<H>) -> HostlogResult<Applied> {
        LoggerPlugin::apply(self, host)
    }
}
