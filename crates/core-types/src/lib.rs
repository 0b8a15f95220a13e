use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Shared error type for the hostlog crates.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HostlogError {
    #[error("App \"{host}\" already has a method \"{method}\". Unable to add logger method \"{method}\".")]
    Collision { host: String, method: String },
    #[error("unknown method: {0}")]
    UnknownMethod(String),
    #[error("property is not callable: {0}")]
    NotCallable(String),
    #[error("property is not configurable: {0}")]
    NotConfigurable(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("{message}")]
    Message { message: String },
}

impl HostlogError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    pub fn collision(host: impl Into<String>, method: impl Into<String>) -> Self {
        Self::Collision {
            host: host.into(),
            method: method.into(),
        }
    }

    pub fn is_collision(&self) -> bool {
        matches!(self, Self::Collision { .. })
    }
}

impl From<std::io::Error> for HostlogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

pub type HostlogResult<T> = Result<T, HostlogError>;

/// The three name sets a logger exposes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodCategory {
    Emitter,
    Mode,
    Style,
}

impl MethodCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodCategory::Emitter => "emitter",
            MethodCategory::Mode => "mode",
            MethodCategory::Style => "style",
        }
    }
}

impl fmt::Display for MethodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload carried by every log emission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub modes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Stats {
    pub fn new(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            args,
            modes: Vec::new(),
            style: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_modes(mut self, modes: Vec<String>) -> Self {
        self.modes = modes;
        self
    }

    pub fn with_style(mut self, style: Option<String>) -> Self {
        self.style = style;
        self
    }

    pub fn has_mode(&self, mode: &str) -> bool {
        self.modes.iter().any(|m| m == mode)
    }

    /// Arguments joined the way a console line shows them.
    pub fn message(&self) -> String {
        join_args(&self.args)
    }
}

/// Joins log arguments with spaces; strings are taken verbatim, other values
/// use their JSON form.
pub fn join_args(args: &[Value]) -> String {
    args.iter()
        .map(|arg| match arg {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Events published on a logger's bus.
#[derive(Clone, Debug, PartialEq)]
pub enum LoggerEvent {
    MethodAdded {
        category: MethodCategory,
        name: String,
    },
    LogEmitted {
        event: String,
        stats: Stats,
    },
}

impl LoggerEvent {
    pub fn method_added(category: MethodCategory, name: impl Into<String>) -> Self {
        Self::MethodAdded {
            category,
            name: name.into(),
        }
    }

    /// Topic name used for named subscriptions. Method registrations publish
    /// on their category name, emissions on the emitter name.
    pub fn topic(&self) -> &str {
        match self {
            LoggerEvent::MethodAdded { category, .. } => category.as_str(),
            LoggerEvent::LogEmitted { event, .. } => event,
        }
    }
}
