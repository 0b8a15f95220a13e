//! hostlog library
//!
//! Grafts a logger's emitter, mode and style methods onto an extensible
//! host object as live, collision-checked accessors.

pub mod app;
pub mod config;
pub mod handle;
pub mod host;
pub mod metrics;
pub mod plugin;

// Re-export commonly used types for external use
pub use app::App;
pub use handle::{BoundMethod, LoggerHandle};
pub use host::{Callable, Host, Member, Plugin, PropertyDescriptor};
pub use hostlog_core_types::{HostlogError, HostlogResult, LoggerEvent, MethodCategory, Stats};
pub use hostlog_event_bus::{Subscription, SubscriptionId};
pub use hostlog_logger::{Logger, LoggerMethod, Style};
pub use plugin::{Applied, Installation, LoggerOptions, LoggerPlugin, SkipReason};
