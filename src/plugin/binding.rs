use std::sync::{Arc, Weak};

use serde_json::Value;
use tracing::{debug, warn};

use hostlog_core_types::{HostlogError, HostlogResult, MethodCategory};
use hostlog_logger::Logger;

use crate::handle::{bind, LoggerHandle};
use crate::host::{Host, Member, PropertyDescriptor};
use crate::metrics;

/// Name of the reserved accessor returning the logger itself.
pub const LOGGER_PROPERTY: &str = "logger";

/// Categories installed during the initial pass, in order.
pub const INSTALL_ORDER: [MethodCategory; 3] = [
    MethodCategory::Emitter,
    MethodCategory::Mode,
    MethodCategory::Style,
];

/// Categories whose late registrations are retrofitted onto the host.
/// Styles added after installation stay on the logger only.
pub const RETROFIT_CATEGORIES: [MethodCategory; 2] = [MethodCategory::Emitter, MethodCategory::Mode];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Defined,
    Skipped,
}

/// Installs one lazy accessor for `name`.
///
/// An owned name is skipped during the initial pass (`init`) and is a
/// collision afterwards.
pub fn install_method<H>(
    host: &H,
    logger: &Logger,
    category: MethodCategory,
    name: &str,
    init: bool,
) -> HostlogResult<InstallOutcome>
where
    H: Host + ?Sized,
{
    if host.has_own(name) {
        if init {
            debug!(host = %host.name(), name, %category, "host already owns name, skipping");
            metrics::record_skipped();
            return Ok(InstallOutcome::Skipped);
        }
        let err = HostlogError::collision(host.name(), name);
        warn!(host = %host.name(), name, %category, "logger method collides with host property");
        metrics::record_collision();
        return Err(err);
    }

    let logger = logger.clone();
    let key = name.to_string();
    host.define(
        name,
        PropertyDescriptor::getter(move || resolve(&logger, &key)),
    )?;
    debug!(host = %host.name(), name, %category, "installed logger method");
    metrics::record_installed(category);
    Ok(InstallOutcome::Defined)
}

// Looks the name up on every read so replaced methods show through.
fn resolve(logger: &Logger, name: &str) -> Member {
    bind(logger, name, Vec::new()).unwrap_or(Member::Value(Value::Null))
}

/// Defines the reserved `logger` accessor.
pub fn define_logger_accessor<H>(host: &H, logger: &Logger) -> HostlogResult<()>
where
    H: Host + ?Sized,
{
    if host.has_own(LOGGER_PROPERTY) {
        warn!(host = %host.name(), "host already owns a logger property");
        metrics::record_collision();
        return Err(HostlogError::collision(host.name(), LOGGER_PROPERTY));
    }
    let logger = logger.clone();
    host.define(
        LOGGER_PROPERTY,
        PropertyDescriptor::getter(move || Member::callable(LoggerHandle::new(logger.clone()))),
    )
}

/// Initial pass over every name the logger currently exposes.
pub fn install_all<H>(host: &H, logger: &Logger) -> HostlogResult<(Vec<String>, Vec<String>)>
where
    H: Host + ?Sized,
{
    let mut installed = Vec::new();
    let mut skipped = Vec::new();
    for category in INSTALL_ORDER {
        for name in logger.keys(category) {
            match install_method(host, logger, category, &name, true)? {
                InstallOutcome::Defined => installed.push(name),
                InstallOutcome::Skipped => skipped.push(name),
            }
        }
    }
    Ok((installed, skipped))
}

/// Subscribes to late method registrations so they reach the host too.
pub fn subscribe_retrofit<H>(host: &Arc<H>, logger: &Logger)
where
    H: Host + ?Sized + 'static,
{
    for category in RETROFIT_CATEGORIES {
        let host: Weak<H> = Arc::downgrade(host);
        let weak_logger = logger.downgrade();
        logger.on_method_added(category, move |name| {
            let (Some(host), Some(logger)) = (host.upgrade(), weak_logger.upgrade()) else {
                return Ok(());
            };
            install_method(host.as_ref(), &logger, category, name, false).map(|_| ())
        });
    }
}

/// Forwards every log emission to the host's `format` hook.
pub fn subscribe_default_listener<H>(host: &Arc<H>, logger: &Logger)
where
    H: Host + ?Sized + 'static,
{
    let host: Weak<H> = Arc::downgrade(host);
    logger.on_log(move |_event, stats| match host.upgrade() {
        Some(host) => {
            metrics::record_forwarded();
            host.format(stats)
        }
        None => Ok(()),
    });
}

/// Points the logger's options at the host's current options.
pub fn link_options<H>(host: &Arc<H>, logger: &Logger)
where
    H: Host + ?Sized + 'static,
{
    let host: Weak<H> = Arc::downgrade(host);
    logger.link_options(move || {
        host.upgrade()
            .map(|host| host.options())
            .unwrap_or(Value::Null)
    });
}
