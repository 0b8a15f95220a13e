use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_LISTENER_KEY: &str = "defaultListener";

/// Effective plugin options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggerOptions {
    #[serde(rename = "defaultListener")]
    pub default_listener: bool,
    /// Keys the plugin does not interpret, kept as given.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        resolve(None)
    }
}

impl LoggerOptions {
    pub fn to_value(&self) -> Value {
        let mut map = self.extra.clone();
        map.insert(
            DEFAULT_LISTENER_KEY.to_string(),
            Value::Bool(self.default_listener),
        );
        Value::Object(map)
    }
}

fn defaults() -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(DEFAULT_LISTENER_KEY.to_string(), Value::Bool(true));
    map
}

/// Shallow-merges `caller` over the defaults. Anything that is not an object
/// is ignored. The listener is only enabled by a literal `true`.
pub fn resolve(caller: Option<&Value>) -> LoggerOptions {
    let mut merged = defaults();
    if let Some(Value::Object(overrides)) = caller {
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
    }
    let default_listener = merged.remove(DEFAULT_LISTENER_KEY) == Some(Value::Bool(true));
    LoggerOptions {
        default_listener,
        extra: merged,
    }
}
