//! Host-side capability interface.
//!
//! A host is an extensible object holding named properties. Properties are
//! either stored [`Member`]s or getters re-evaluated on every read; getters
//! are how logger methods stay live on the host.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use hostlog_core_types::{HostlogError, HostlogResult, Stats};

/// Something a host property can be invoked as.
pub trait Callable: Send + Sync {
    fn call(&self, args: &[Value]) -> HostlogResult<Value>;

    /// Attribute access on the callable (`logger.info`, `verbose.info`).
    fn member(&self, _name: &str) -> Option<Member> {
        None
    }
}

/// The value a host property resolves to.
#[derive(Clone)]
pub enum Member {
    Value(Value),
    Callable(Arc<dyn Callable>),
}

impl Member {
    pub fn callable<C: Callable + 'static>(callable: C) -> Self {
        Self::Callable(Arc::new(callable))
    }

    pub fn call(&self, args: &[Value]) -> HostlogResult<Value> {
        match self {
            Member::Callable(callable) => callable.call(args),
            Member::Value(value) => Err(HostlogError::NotCallable(value.to_string())),
        }
    }

    pub fn member(&self, name: &str) -> Option<Member> {
        match self {
            Member::Callable(callable) => callable.member(name),
            Member::Value(value) => value.get(name).cloned().map(Member::Value),
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Member::Value(value) => Some(value),
            Member::Callable(_) => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Member::Callable(_))
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Member::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

pub type Getter = Arc<dyn Fn() -> Member + Send + Sync>;

#[derive(Clone)]
pub enum PropertyKind {
    Value(Member),
    Accessor(Getter),
}

/// Property definition accepted by [`Host::define`].
#[derive(Clone)]
pub struct PropertyDescriptor {
    pub kind: PropertyKind,
    pub enumerable: bool,
    pub configurable: bool,
}

impl PropertyDescriptor {
    pub fn value(member: Member) -> Self {
        Self {
            kind: PropertyKind::Value(member),
            enumerable: true,
            configurable: true,
        }
    }

    pub fn getter<F>(getter: F) -> Self
    where
        F: Fn() -> Member + Send + Sync + 'static,
    {
        Self {
            kind: PropertyKind::Accessor(Arc::new(getter)),
            enumerable: true,
            configurable: true,
        }
    }

    pub fn frozen(mut self) -> Self {
        self.configurable = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.enumerable = false;
        self
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self.kind, PropertyKind::Accessor(_))
    }

    /// Reads the property. Accessors run their getter each time.
    pub fn resolve(&self) -> Member {
        match &self.kind {
            PropertyKind::Value(member) => member.clone(),
            PropertyKind::Accessor(getter) => getter(),
        }
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            PropertyKind::Value(_) => "value",
            PropertyKind::Accessor(_) => "accessor",
        };
        f.debug_struct("PropertyDescriptor")
            .field("kind", &kind)
            .field("enumerable", &self.enumerable)
            .field("configurable", &self.configurable)
            .finish()
    }
}

/// Capabilities a plugin needs from the object it extends.
pub trait Host: Send + Sync {
    /// Identifying name used in error messages.
    fn name(&self) -> String;

    fn define(&self, name: &str, descriptor: PropertyDescriptor) -> HostlogResult<()>;

    /// Whether `name` is an own property of the host.
    fn has_own(&self, name: &str) -> bool;

    fn is_registered(&self, plugin: &str) -> bool;

    fn register(&self, plugin: &str);

    /// Opt-out switch checked before a plugin installs anything.
    fn enabled(&self, feature: &str) -> bool;

    fn options(&self) -> Value;

    /// Handles one log emission forwarded by the default listener.
    fn format(&self, stats: &Stats) -> HostlogResult<()>;
}

/// Something that can be applied to a host, `app.use(plugin)` style.
pub trait Plugin<H: Host + ?Sized> {
    type Output;

    fn apply(&self, host: &Arc<H>) -> HostlogResult<Self::Output>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;

    struct Echo;

    impl Callable for Echo {
        fn call(&self, args: &[Value]) -> HostlogResult<Value> {
            Ok(Value::Array(args.to_vec()))
        }
    }

    #[test]
    fn value_members_are_not_callable() {
        let member = Member::Value(json!("text"));
        assert!(matches!(
            member.call(&[]),
            Err(HostlogError::NotCallable(_))
        ));
    }

    #[test]
    fn value_members_expose_object_fields() {
        let member = Member::Value(json!({"level": "info"}));
        let field = member.member("level").unwrap();
        assert_eq!(field.as_value(), Some(&json!("info")));
    }

    #[test]
    fn accessor_runs_getter_on_each_resolve() {
        let counter = Arc::new(Mutex::new(0));
        let reads = Arc::clone(&counter);
        let descriptor = PropertyDescriptor::getter(move || {
            *reads.lock() += 1;
            Member::callable(Echo)
        });

        assert!(descriptor.is_accessor());
        descriptor.resolve();
        let member = descriptor.resolve();
        assert_eq!(*counter.lock(), 2);
        assert_eq!(member.call(&[json!(1)]).unwrap(), json!([1]));
    }

    #[test]
    fn descriptor_flags() {
        let descriptor = PropertyDescriptor::value(Member::Value(json!(1)))
            .frozen()
            .hidden();
        assert!(!descriptor.configurable);
        assert!(!descriptor.enumerable);
    }
}
