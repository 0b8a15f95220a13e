use lazy_static::lazy_static;
use prometheus::{core::Collector, opts, IntCounter, IntCounterVec, Registry};
use tracing::error;

use hostlog_core_types::MethodCategory;

lazy_static! {
    static ref GLOBAL_REGISTRY: Registry = Registry::new();
    static ref METHODS_INSTALLED: IntCounterVec = IntCounterVec::new(
        opts!(
            "hostlog_methods_installed_total",
            "Logger methods installed on hosts grouped by category"
        ),
        &["category"]
    )
    .unwrap();
    static ref METHODS_SKIPPED: IntCounter = IntCounter::new(
        "hostlog_methods_skipped_total",
        "Logger methods skipped during the initial pass because the host owned the name",
    )
    .unwrap();
    static ref COLLISIONS: IntCounter = IntCounter::new(
        "hostlog_collisions_total",
        "Late logger methods rejected because the host owned the name",
    )
    .unwrap();
    static ref APPLICATIONS: IntCounterVec = IntCounterVec::new(
        opts!(
            "hostlog_plugin_applications_total",
            "Plugin applications grouped by outcome"
        ),
        &["outcome"]
    )
    .unwrap();
    static ref EVENTS_FORWARDED: IntCounter = IntCounter::new(
        "hostlog_events_forwarded_total",
        "Log events forwarded to a host format hook",
    )
    .unwrap();
}

fn register<C>(registry: &Registry, collector: C)
where
    C: Collector + Clone + Send + Sync + 'static,
{
    if let Err(err) = registry.register(Box::new(collector.clone())) {
        if !matches!(err, prometheus::Error::AlreadyReg) {
            error!(?err, "failed to register hostlog metric");
        }
    }
}

pub fn register_metrics(registry: &Registry) {
    register(registry, METHODS_INSTALLED.clone());
    register(registry, METHODS_SKIPPED.clone());
    register(registry, COLLISIONS.clone());
    register(registry, APPLICATIONS.clone());
    register(registry, EVENTS_FORWARDED.clone());
}

pub fn global_registry() -> &'static Registry {
    &GLOBAL_REGISTRY
}

/// Text exposition of every metric registered on `registry`.
pub fn render(registry: &Registry) -> Result<String, prometheus::Error> {
    use prometheus::{Encoder, TextEncoder};

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|err| prometheus::Error::Msg(err.to_string()))
}

pub fn record_installed(category: MethodCategory) {
    METHODS_INSTALLED
        .with_label_values(&[category.as_str()])
        .inc();
}

pub fn record_skipped() {
    METHODS_SKIPPED.inc();
}

pub fn record_collision() {
    COLLISIONS.inc();
}

pub fn record_application(outcome: &str) {
    APPLICATIONS.with_label_values(&[outcome]).inc();
}

pub fn record_forwarded() {
    EVENTS_FORWARDED.inc();
}
