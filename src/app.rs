//! Concrete extensible host.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::debug;

use hostlog_core_types::{HostlogError, HostlogResult, Stats};
use hostlog_logger::format;

use crate::host::{Host, Member, Plugin, PropertyDescriptor};

pub type Formatter = Arc<dyn Fn(&Stats) -> HostlogResult<()> + Send + Sync>;

/// An application object that plugins extend with named properties.
pub struct App {
    name: String,
    properties: DashMap<String, PropertyDescriptor>,
    registered: RwLock<HashSet<String>>,
    options: RwLock<Value>,
    formatter: RwLock<Option<Formatter>>,
}

impl App {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            properties: DashMap::new(),
            registered: RwLock::new(HashSet::new()),
            options: RwLock::new(Value::Object(Map::new())),
            formatter: RwLock::new(None),
        })
    }

    /// Applies `plugin` to this app.
    pub fn use_plugin<P>(self: &Arc<Self>, plugin: &P) -> HostlogResult<P::Output>
    where
        P: Plugin<App>,
    {
        plugin.apply(self)
    }

    /// Defines a plain value property.
    pub fn set(&self, name: &str, value: Value) -> HostlogResult<()> {
        self.define(name, PropertyDescriptor::value(Member::Value(value)))
    }

    /// Reads a property, running its getter if it has one.
    pub fn get(&self, name: &str) -> Option<Member> {
        // Clone out first; getters may read the app again.
        let descriptor = self.descriptor(name)?;
        Some(descriptor.resolve())
    }

    pub fn call(&self, name: &str, args: &[Value]) -> HostlogResult<Value> {
        let member = self
            .get(name)
            .ok_or_else(|| HostlogError::UnknownMethod(name.to_string()))?;
        match member {
            Member::Callable(callable) => callable.call(args),
            Member::Value(_) => Err(HostlogError::NotCallable(name.to_string())),
        }
    }

    pub fn descriptor(&self, name: &str) -> Option<PropertyDescriptor> {
        self.properties.get(name).map(|entry| entry.value().clone())
    }

    /// Enumerable property names, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .properties
            .iter()
            .filter(|entry| entry.value().enumerable)
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Replaces the options object.
    pub fn set_options(&self, options: Value) {
        *self.options.write() = options;
    }

    pub fn option(&self, key: &str) -> Option<Value> {
        self.options.read().get(key).cloned()
    }

    /// Sets a single option key, turning the options into an object if needed.
    pub fn set_option(&self, key: &str, value: Value) {
        let mut guard = self.options.write();
        if !guard.is_object() {
            *guard = Value::Object(Map::new());
        }
        if let Value::Object(map) = &mut *guard {
            map.insert(key.to_string(), value);
        }
    }

    pub fn enable(&self, feature: &str) {
        self.set_option(feature, Value::Bool(true));
    }

    pub fn disable(&self, feature: &str) {
        self.set_option(feature, Value::Bool(false));
    }

    /// Routes [`Host::format`] through `formatter` instead of stdout.
    pub fn on_format<F>(&self, formatter: F)
    where
        F: Fn(&Stats) -> HostlogResult<()> + Send + Sync + 'static,
    {
        *self.formatter.write() = Some(Arc::new(formatter));
    }

    pub fn registered(&self) -> Vec<String> {
        let mut plugins: Vec<String> = self.registered.read().iter().cloned().collect();
        plugins.sort();
        plugins
    }
}

impl Host for App {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn define(&self, name: &str, descriptor: PropertyDescriptor) -> HostlogResult<()> {
        if let Some(existing) = self.properties.get(name) {
            if !existing.configurable {
                return Err(HostlogError::NotConfigurable(name.to_string()));
            }
        }
        debug!(app = %self.name, property = name, accessor = descriptor.is_accessor(), "define");
        self.properties.insert(name.to_string(), descriptor);
        Ok(())
    }

    fn has_own(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    fn is_registered(&self, plugin: &str) -> bool {
        self.registered.read().contains(plugin)
    }

    fn register(&self, plugin: &str) {
        self.registered.write().insert(plugin.to_string());
    }

    fn enabled(&self, feature: &str) -> bool {
        self.options.read().get(feature) != Some(&Value::Bool(false))
    }

    fn options(&self) -> Value {
        self.options.read().clone()
    }

    fn format(&self, stats: &Stats) -> HostlogResult<()> {
        let formatter = self.formatter.read().clone();
        match formatter {
            Some(formatter) => formatter(stats),
            None => format::print_stats(stats),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;

    #[test]
    fn define_and_read_value() {
        let app = App::new("demo");
        app.set("version", json!("1.0")).unwrap();

        assert!(app.has_own("version"));
        assert_eq!(app.get("version").unwrap().as_value(), Some(&json!("1.0")));
        assert_eq!(app.keys(), vec!["version"]);
    }

    #[test]
    fn frozen_property_cannot_be_redefined() {
        let app = App::new("demo");
        app.define(
            "id",
            PropertyDescriptor::value(Member::Value(json!(1))).frozen(),
        )
        .unwrap();

        let err = app.set("id", json!(2)).unwrap_err();
        assert_eq!(err, HostlogError::NotConfigurable("id".into()));
    }

    #[test]
    fn hidden_properties_are_not_listed() {
        let app = App::new("demo");
        app.define(
            "secret",
            PropertyDescriptor::value(Member::Value(json!(true))).hidden(),
        )
        .unwrap();
        assert!(app.has_own("secret"));
        assert!(app.keys().is_empty());
    }

    #[test]
    fn calling_a_value_fails() {
        let app = App::new("demo");
        app.set("info", json!("mine")).unwrap();
        assert_eq!(
            app.call("info", &[]).unwrap_err(),
            HostlogError::NotCallable("info".into())
        );
        assert_eq!(
            app.call("missing", &[]).unwrap_err(),
            HostlogError::UnknownMethod("missing".into())
        );
    }

    #[test]
    fn features_are_enabled_until_disabled() {
        let app = App::new("demo");
        assert!(app.enabled("logger"));
        app.disable("logger");
        assert!(!app.enabled("logger"));
        app.enable("logger");
        assert!(app.enabled("logger"));
    }

    #[test]
    fn registration_is_tracked_per_app() {
        let app = App::new("demo");
        let other = App::new("other");
        app.register("plugin-a");

        assert!(app.is_registered("plugin-a"));
        assert!(!other.is_registered("plugin-a"));
        assert_eq!(app.registered(), vec!["plugin-a"]);
    }

    #[test]
    fn format_uses_installed_formatter() {
        let app = App::new("demo");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        app.on_format(move |stats| {
            sink.lock().push(stats.name.clone());
            Ok(())
        });

        app.format(&Stats::new("info", vec![json!("x")])).unwrap();
        assert_eq!(*seen.lock(), vec!["info".to_string()]);
    }

    #[test]
    fn set_option_recovers_from_non_object_options() {
        let app = App::new("demo");
        app.set_options(json!(null));
        app.set_option("foo", json!(1));
        assert_eq!(app.options(), json!({"foo": 1}));
    }
}
