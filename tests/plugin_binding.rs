use std::sync::Arc;

use hostlog::{App, HostlogError, LoggerMethod, LoggerPlugin, SkipReason, Stats};
use parking_lot::Mutex;
use serde_json::{json, Value};

fn capture(app: &App) -> Arc<Mutex<Vec<Stats>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    app.on_format(move |stats| {
        sink.lock().push(stats.clone());
        Ok(())
    });
    seen
}

#[test]
fn applying_twice_keeps_the_first_logger() {
    let app = App::new("twice");
    let plugin = LoggerPlugin::default();

    let first = app.use_plugin(&plugin).unwrap();
    let second = app.use_plugin(&plugin).unwrap();

    assert!(first.is_installed());
    assert_eq!(second.skip_reason(), Some(SkipReason::AlreadyRegistered));

    let seen = capture(&app);
    app.call("info", &[json!("once")]).unwrap();
    assert_eq!(seen.lock().len(), 1, "second apply must not add listeners");
}

#[test]
fn late_mode_colliding_with_host_method_fails_and_leaves_others() {
    let app = App::new("collide");
    app.set("info", json!("host info")).unwrap();

    let applied = app
        .use_plugin(&LoggerPlugin::new(Some(&json!({"defaultListener": false}))))
        .unwrap();
    let logger = applied.logger().unwrap();

    let err = logger.add_mode("info").unwrap_err();
    assert!(err.is_collision());
    assert_eq!(
        err.to_string(),
        "App \"collide\" already has a method \"info\". Unable to add logger method \"info\"."
    );

    assert_eq!(app.get("info").unwrap().as_value(), Some(&json!("host info")));
    assert!(app.get("warn").unwrap().is_callable());
    assert!(app.get("verbose").unwrap().is_callable());
}

#[test]
fn replaced_methods_show_through_installed_accessors() {
    let app = App::new("live");
    let applied = app
        .use_plugin(&LoggerPlugin::new(Some(&json!({"defaultListener": false}))))
        .unwrap();
    let logger = applied.logger().unwrap();

    let before = app.call("warn", &[json!("x")]).unwrap();
    assert_eq!(before["name"], json!("warn"));

    logger.set_method(
        "warn",
        LoggerMethod::custom(|_, args| Ok(json!({"replaced": args.len()}))),
    );
    assert_eq!(
        app.call("warn", &[json!("a"), json!("b")]).unwrap(),
        json!({"replaced": 2})
    );
}

#[test]
fn default_listener_can_be_switched_off() {
    let on = App::new("on");
    let on_seen = capture(&on);
    on.use_plugin(&LoggerPlugin::new(Some(&json!({"defaultListener": true}))))
        .unwrap();

    let off = App::new("off");
    let off_seen = capture(&off);
    off.use_plugin(&LoggerPlugin::new(Some(&json!({"defaultListener": false}))))
        .unwrap();

    for app in [&on, &off] {
        app.call("info", &[json!("one")]).unwrap();
        app.call("error", &[json!("two")]).unwrap();
        app.call("log", &[json!("three")]).unwrap();
    }

    assert_eq!(on_seen.lock().len(), 3);
    assert!(off_seen.lock().is_empty());
}

#[test]
fn chained_modes_reach_the_formatter() {
    let app = App::new("modes");
    let seen = capture(&app);
    app.use_plugin(&LoggerPlugin::default()).unwrap();

    let info = app
        .get("verbose")
        .and_then(|verbose| verbose.member("debug"))
        .and_then(|debug| debug.member("info"))
        .unwrap();
    info.call(&[json!("deep")]).unwrap();

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].name, "info");
    assert_eq!(seen[0].modes, vec!["verbose", "debug"]);
    assert_eq!(seen[0].message(), "deep");
}

#[test]
fn logger_options_follow_the_app() {
    let app = App::new("opts");
    app.set_option("level", json!("quiet"));

    let applied = app.use_plugin(&LoggerPlugin::default()).unwrap();
    let logger = applied.logger().unwrap();
    assert_eq!(logger.options()["level"], json!("quiet"));

    app.set_option("level", json!("loud"));
    assert_eq!(logger.options()["level"], json!("loud"));

    let through_handle = app
        .get("logger")
        .and_then(|handle| handle.member("options"))
        .unwrap();
    assert_eq!(through_handle.as_value().unwrap()["level"], json!("loud"));
}

#[test]
fn replaced_app_options_reach_the_logger() {
    let app = App::new("swap");
    app.set_options(json!({"foo": 1}));

    let applied = app.use_plugin(&LoggerPlugin::default()).unwrap();
    let logger = applied.logger().unwrap();
    assert_eq!(logger.options(), json!({"foo": 1}));

    app.set_options(json!({"bar": 2}));
    assert_eq!(logger.options(), json!({"bar": 2}));

    app.set_options(json!({"foo": 1}));
    assert_eq!(logger.options(), json!({"foo": 1}));
}

#[test]
fn mode_named_log_keeps_the_app_usable() {
    let app = App::new("loop");
    let seen = capture(&app);
    let applied = app.use_plugin(&LoggerPlugin::default()).unwrap();

    let err = applied.logger().unwrap().add_mode("log").unwrap_err();
    assert!(err.is_collision());

    app.call("verbose", &[json!("still fine")]).unwrap();
    assert_eq!(seen.lock()[0].message(), "still fine");
}

#[test]
fn disabled_app_gets_nothing() {
    let app = App::new("off");
    app.set_options(json!({"logger": false}));

    let applied = app.use_plugin(&LoggerPlugin::default()).unwrap();

    assert_eq!(applied.skip_reason(), Some(SkipReason::Disabled));
    assert!(app.get("logger").is_none());
    assert!(app.get("info").is_none());
    assert!(app.registered().is_empty());
}

#[test]
fn logger_handle_logs_through_the_primary_emitter() {
    let app = App::new("handle");
    let seen = capture(&app);
    app.use_plugin(&LoggerPlugin::default()).unwrap();

    let handle = app.get("logger").unwrap();
    handle.call(&[json!("plain"), json!(3)]).unwrap();

    let seen = seen.lock();
    assert_eq!(seen[0].name, "log");
    assert_eq!(seen[0].message(), "plain 3");
}

#[test]
fn styles_return_painted_text() {
    let app = App::new("styles");
    app.use_plugin(&LoggerPlugin::default()).unwrap();

    let painted = app.call("bold", &[json!("loud")]).unwrap();
    assert_eq!(painted, Value::String("\u{1b}[1mloud\u{1b}[22m".into()));
}

#[test]
fn calling_a_missing_method_is_an_error() {
    let app = App::new("missing");
    app.use_plugin(&LoggerPlugin::default()).unwrap();

    let err = app.call("shout", &[]).unwrap_err();
    assert!(matches!(err, HostlogError::UnknownMethod(_)));
}
