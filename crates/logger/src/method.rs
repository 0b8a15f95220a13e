use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use hostlog_core_types::{HostlogResult, MethodCategory};

use crate::style::Style;
use crate::Logger;

pub type CustomFn = Arc<dyn Fn(&Logger, &[Value]) -> HostlogResult<Value> + Send + Sync>;

/// A named operation stored on a [`Logger`].
#[derive(Clone)]
pub enum LoggerMethod {
    /// Emits a log event under the method name; `style` names a built-in
    /// style used when rendering the name.
    Emitter { style: Option<String> },
    /// Tags the next emission with the method name.
    Mode,
    /// Returns its arguments wrapped in the style.
    Style(Style),
    /// Caller supplied replacement.
    Custom(CustomFn),
}

impl LoggerMethod {
    pub fn emitter(style: Option<&str>) -> Self {
        Self::Emitter {
            style: style.map(str::to_string),
        }
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Logger, &[Value]) -> HostlogResult<Value> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Category the method was registered under, if it is a built-in kind.
    pub fn category(&self) -> Option<MethodCategory> {
        match self {
            LoggerMethod::Emitter { .. } => Some(MethodCategory::Emitter),
            LoggerMethod::Mode => Some(MethodCategory::Mode),
            LoggerMethod::Style(_) => Some(MethodCategory::Style),
            LoggerMethod::Custom(_) => None,
        }
    }
}

impl fmt::Debug for LoggerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggerMethod::Emitter { style } => f
                .debug_struct("Emitter")
                .field("style", style)
                .finish(),
            LoggerMethod::Mode => f.write_str("Mode"),
            LoggerMethod::Style(style) => f.debug_tuple("Style").field(style).finish(),
            LoggerMethod::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
