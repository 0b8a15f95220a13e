//! Event-driven logger engine.
//!
//! A [`Logger`] owns three insertion-ordered name sets (emitters, modes and
//! styles), a table resolving each name to a [`LoggerMethod`], and a
//! synchronous bus publishing [`LoggerEvent`]s. Registering a method at
//! runtime publishes `MethodAdded`; every emission publishes `LogEmitted`.

pub mod format;
pub mod method;
pub mod style;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

pub use hostlog_core_types::{
    join_args, HostlogError, HostlogResult, LoggerEvent, MethodCategory, Stats,
};
use hostlog_event_bus::{EventBus, InMemoryBus, Subscription, SubscriptionId};

pub use method::{CustomFn, LoggerMethod};
pub use style::Style;

/// Name of the primary emitter invoked by [`Logger::log`].
pub const PRIMARY_EMITTER: &str = "log";

const DEFAULT_EMITTERS: &[(&str, Option<&str>)] = &[
    (PRIMARY_EMITTER, None),
    ("info", Some("cyan")),
    ("warn", Some("yellow")),
    ("error", Some("red")),
    ("success", Some("green")),
];

const DEFAULT_MODES: &[&str] = &["verbose", "debug"];

type OptionsFn = Arc<dyn Fn() -> Value + Send + Sync>;

enum OptionsSource {
    Value(Value),
    Linked(OptionsFn),
}

#[derive(Default)]
struct Keys {
    emitters: Vec<String>,
    modes: Vec<String>,
    styles: Vec<String>,
}

impl Keys {
    fn list(&self, category: MethodCategory) -> &Vec<String> {
        match category {
            MethodCategory::Emitter => &self.emitters,
            MethodCategory::Mode => &self.modes,
            MethodCategory::Style => &self.styles,
        }
    }

    fn push(&mut self, category: MethodCategory, name: &str) {
        let list = match category {
            MethodCategory::Emitter => &mut self.emitters,
            MethodCategory::Mode => &mut self.modes,
            MethodCategory::Style => &mut self.styles,
        };
        if !list.iter().any(|existing| existing == name) {
            list.push(name.to_string());
        }
    }
}

struct LoggerInner {
    methods: RwLock<HashMap<String, LoggerMethod>>,
    keys: RwLock<Keys>,
    bus: Arc<InMemoryBus<LoggerEvent>>,
    options: RwLock<OptionsSource>,
}

/// Shared handle to a logger instance; clones refer to the same instance.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    /// Logger with only the primary `log` emitter.
    pub fn bare() -> Self {
        let logger = Self {
            inner: Arc::new(LoggerInner {
                methods: RwLock::new(HashMap::new()),
                keys: RwLock::new(Keys::default()),
                bus: InMemoryBus::new(),
                options: RwLock::new(OptionsSource::Value(Value::Object(Default::default()))),
            }),
        };
        logger.register(
            MethodCategory::Emitter,
            PRIMARY_EMITTER,
            LoggerMethod::emitter(None),
        );
        logger
    }

    /// Logger preloaded with the default emitters, modes and styles.
    pub fn new() -> Self {
        let logger = Self::bare();
        for (name, style) in DEFAULT_EMITTERS {
            logger.register(MethodCategory::Emitter, name, LoggerMethod::emitter(*style));
        }
        for name in DEFAULT_MODES {
            logger.register(MethodCategory::Mode, name, LoggerMethod::Mode);
        }
        for (name, style) in style::builtin_styles() {
            logger.register(MethodCategory::Style, name, LoggerMethod::Style(style));
        }
        logger
    }

    fn register(&self, category: MethodCategory, name: &str, method: LoggerMethod) {
        self.inner.methods.write().insert(name.to_string(), method);
        self.inner.keys.write().push(category, name);
    }

    fn add(&self, category: MethodCategory, name: &str, method: LoggerMethod) -> HostlogResult<()> {
        self.register(category, name, method);
        debug!(%category, name, "logger method added");
        self.inner
            .bus
            .publish(LoggerEvent::method_added(category, name))
    }

    /// Registers an emitter and announces it. Errors raised by subscribers
    /// are returned to the caller; the emitter stays registered.
    pub fn add_emitter(&self, name: &str, style: Option<&str>) -> HostlogResult<()> {
        self.add(MethodCategory::Emitter, name, LoggerMethod::emitter(style))
    }

    pub fn add_mode(&self, name: &str) -> HostlogResult<()> {
        self.add(MethodCategory::Mode, name, LoggerMethod::Mode)
    }

    pub fn add_style(&self, name: &str, style: Style) -> HostlogResult<()> {
        self.add(MethodCategory::Style, name, LoggerMethod::Style(style))
    }

    pub fn keys(&self, category: MethodCategory) -> Vec<String> {
        self.inner.keys.read().list(category).clone()
    }

    pub fn emitter_keys(&self) -> Vec<String> {
        self.keys(MethodCategory::Emitter)
    }

    pub fn mode_keys(&self) -> Vec<String> {
        self.keys(MethodCategory::Mode)
    }

    pub fn style_keys(&self) -> Vec<String> {
        self.keys(MethodCategory::Style)
    }

    /// Current method stored under `name`.
    pub fn method(&self, name: &str) -> Option<LoggerMethod> {
        self.inner.methods.read().get(name).cloned()
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.inner.methods.read().contains_key(name)
    }

    /// Replaces the method stored under `name` without announcing it.
    pub fn set_method(&self, name: &str, method: LoggerMethod) -> Option<LoggerMethod> {
        self.inner.methods.write().insert(name.to_string(), method)
    }

    pub fn call(&self, name: &str, args: &[Value]) -> HostlogResult<Value> {
        self.call_with_modes(name, &[], args)
    }

    pub fn call_with_modes(
        &self,
        name: &str,
        modes: &[String],
        args: &[Value],
    ) -> HostlogResult<Value> {
        let method = self
            .method(name)
            .ok_or_else(|| HostlogError::UnknownMethod(name.to_string()))?;
        self.invoke(name, &method, modes, args)
    }

    /// Runs `method` as if it were stored under `name`.
    pub fn invoke(
        &self,
        name: &str,
        method: &LoggerMethod,
        modes: &[String],
        args: &[Value],
    ) -> HostlogResult<Value> {
        match method {
            LoggerMethod::Emitter { style } => {
                let stats = self.publish_stats(name, modes.to_vec(), style.clone(), args.to_vec())?;
                serde_json::to_value(&stats).map_err(|err| HostlogError::new(err.to_string()))
            }
            // Publishes the primary emission itself, never via the `log` entry.
            LoggerMethod::Mode => {
                let mut modes = modes.to_vec();
                modes.push(name.to_string());
                let stats = self.publish_stats(PRIMARY_EMITTER, modes, None, args.to_vec())?;
                serde_json::to_value(&stats).map_err(|err| HostlogError::new(err.to_string()))
            }
            LoggerMethod::Style(style) => Ok(Value::String(style.paint(&join_args(args)))),
            LoggerMethod::Custom(f) => f(self, args),
        }
    }

    /// Primary log operation.
    pub fn log(&self, args: &[Value]) -> HostlogResult<Value> {
        self.call(PRIMARY_EMITTER, args)
    }

    /// Publishes a `LogEmitted` event for `name`, using the emitter's style
    /// when `name` is a registered emitter.
    pub fn emit(&self, name: &str, args: Vec<Value>) -> HostlogResult<Stats> {
        let style = match self.method(name) {
            Some(LoggerMethod::Emitter { style }) => style,
            _ => None,
        };
        self.publish_stats(name, Vec::new(), style, args)
    }

    fn publish_stats(
        &self,
        name: &str,
        modes: Vec<String>,
        style: Option<String>,
        args: Vec<Value>,
    ) -> HostlogResult<Stats> {
        let stats = Stats::new(name, args).with_modes(modes).with_style(style);
        self.inner.bus.publish(LoggerEvent::LogEmitted {
            event: name.to_string(),
            stats: stats.clone(),
        })?;
        Ok(stats)
    }

    /// Subscribes to events published under `topic`.
    pub fn on<F>(&self, topic: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&LoggerEvent) -> HostlogResult<()> + Send + Sync + 'static,
    {
        self.inner
            .bus
            .subscribe(Subscription::topic(topic), Arc::new(handler))
    }

    /// Subscribes to every event.
    pub fn on_any<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&LoggerEvent) -> HostlogResult<()> + Send + Sync + 'static,
    {
        self.inner.bus.subscribe(Subscription::All, Arc::new(handler))
    }

    /// Subscribes to registrations of new methods in `category`.
    pub fn on_method_added<F>(&self, category: MethodCategory, handler: F) -> SubscriptionId
    where
        F: Fn(&str) -> HostlogResult<()> + Send + Sync + 'static,
    {
        self.on_any(move |event| match event {
            LoggerEvent::MethodAdded {
                category: added,
                name,
            } if *added == category => handler(name),
            _ => Ok(()),
        })
    }

    /// Subscribes to every emission regardless of its name.
    pub fn on_log<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &Stats) -> HostlogResult<()> + Send + Sync + 'static,
    {
        self.on_any(move |event| match event {
            LoggerEvent::LogEmitted { event, stats } => handler(event, stats),
            LoggerEvent::MethodAdded { .. } => Ok(()),
        })
    }

    pub fn off(&self, id: SubscriptionId) -> bool {
        self.inner.bus.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.bus.subscriber_count()
    }

    /// Current options. A linked source is read on every call.
    pub fn options(&self) -> Value {
        let source = match &*self.inner.options.read() {
            OptionsSource::Value(value) => return value.clone(),
            OptionsSource::Linked(source) => Arc::clone(source),
        };
        source()
    }

    /// Stores a plain value, dropping any live link.
    pub fn set_options(&self, options: Value) {
        *self.inner.options.write() = OptionsSource::Value(options);
    }

    /// Makes [`Logger::options`] read through `source`.
    pub fn link_options<F>(&self, source: F)
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        *self.inner.options.write() = OptionsSource::Linked(Arc::new(source));
    }

    pub fn options_linked(&self) -> bool {
        matches!(&*self.inner.options.read(), OptionsSource::Linked(_))
    }

    pub fn ptr_eq(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Non-owning handle for subscribers stored on this logger's own bus.
    pub fn downgrade(&self) -> WeakLogger {
        WeakLogger {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

#[derive(Clone)]
pub struct WeakLogger {
    inner: Weak<LoggerInner>,
}

impl WeakLogger {
    pub fn upgrade(&self) -> Option<Logger> {
        self.inner.upgrade().map(|inner| Logger { inner })
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys = self.inner.keys.read();
        f.debug_struct("Logger")
            .field("emitters", &keys.emitters)
            .field("modes", &keys.modes)
            .field("styles", &keys.styles)
            .finish()
    }
}
