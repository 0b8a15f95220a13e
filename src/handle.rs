//! Callable wrappers handed out by installed accessors.

use std::ops::Deref;

use serde_json::Value;

use hostlog_core_types::HostlogResult;
use hostlog_logger::{Logger, LoggerMethod};

use crate::host::{Callable, Member};

/// Value of the host's `logger` property.
///
/// Calling it runs the logger's primary `log` operation; member access
/// delegates to the wrapped logger, so both `logger(..)` and `logger.info(..)`
/// work. Dereferences to [`Logger`] for typed access.
#[derive(Clone, Debug)]
pub struct LoggerHandle {
    logger: Logger,
}

impl LoggerHandle {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl Deref for LoggerHandle {
    type Target = Logger;

    fn deref(&self) -> &Logger {
        &self.logger
    }
}

impl Callable for LoggerHandle {
    fn call(&self, args: &[Value]) -> HostlogResult<Value> {
        self.logger.log(args)
    }

    fn member(&self, name: &str) -> Option<Member> {
        if name == "options" {
            return Some(Member::Value(self.logger.options()));
        }
        bind(&self.logger, name, Vec::new())
    }
}

/// A logger method captured together with the logger that runs it.
#[derive(Clone, Debug)]
pub struct BoundMethod {
    logger: Logger,
    name: String,
    method: LoggerMethod,
    modes: Vec<String>,
}

impl Callable for BoundMethod {
    fn call(&self, args: &[Value]) -> HostlogResult<Value> {
        self.logger
            .invoke(&self.name, &self.method, &self.modes, args)
    }

    /// Modes chain: `verbose.info(..)` emits `info` tagged with `verbose`.
    fn member(&self, name: &str) -> Option<Member> {
        match self.method {
            LoggerMethod::Mode => {
                let mut modes = self.modes.clone();
                modes.push(self.name.clone());
                bind(&self.logger, name, modes)
            }
            _ => None,
        }
    }
}

/// Resolves `name` on `logger` right now.
pub(crate) fn bind(logger: &Logger, name: &str, modes: Vec<String>) -> Option<Member> {
    let method = logger.method(name)?;
    Some(Member::callable(BoundMethod {
        logger: logger.clone(),
        name: name.to_string(),
        method,
        modes,
    }))
}
