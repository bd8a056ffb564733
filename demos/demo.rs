//! Walkthrough of the console handler: levels, scoping, value kinds and the
//! error hook, first through the handler API and then through `tracing`.
//!
//! Run with: `cargo run --example demo`

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing_console_color::handler::ConsoleHandler;
use tracing_console_color::record::{Level, LogRecord};
use tracing_console_color::sink::SharedSink;
use tracing_console_color::value::{Attr, Value};

#[derive(Serialize, Debug)]
struct ServerConfig {
    host: String,
    port: u16,
    tls: bool,
}

fn record(level: Level, msg: &str, attrs: Vec<Attr>) -> LogRecord {
    let mut r = LogRecord::new(Utc::now(), level, msg);
    r.add_attrs(attrs);
    r
}

fn main() {
    let root = ConsoleHandler::new(SharedSink::stdout());

    // All four levels plus the fallback tag.
    root.dispatch(&record(
        Level::DEBUG,
        "loading configuration",
        vec![Attr::new("path", "/etc/app/config.yaml")],
    ))
    .unwrap();
    root.dispatch(&record(
        Level::INFO,
        "server started",
        vec![Attr::new("port", 8080i64), Attr::new("env", "production")],
    ))
    .unwrap();
    root.dispatch(&record(
        Level::WARN,
        "high disk usage",
        vec![Attr::new("percent", 91.4), Attr::new("mount", "/data")],
    ))
    .unwrap();
    root.dispatch(&record(Level(42), "level nobody defined", vec![]))
        .unwrap();

    // Scoped derivation: groups prefix the message, bound attributes ride
    // along on every line.
    let http = root
        .with_group("http")
        .with_attrs(vec![Attr::new("service", "api")]);
    http.dispatch(&record(
        Level::WARN,
        "slow request",
        vec![Attr::new("ms", Value::from(Duration::from_millis(512)))],
    ))
    .unwrap();

    // Value kinds: nested group, raw JSON, structured data, errors.
    root.dispatch(&record(
        Level::INFO,
        "user signed in",
        vec![Attr::new(
            "user",
            Value::group(vec![Attr::new("name", "Alice"), Attr::new("id", 7i64)]),
        )],
    ))
    .unwrap();
    root.dispatch(&record(
        Level::INFO,
        "upstream replied",
        vec![Attr::new("body", Value::any(&r#"{"status":"ok"}"#))],
    ))
    .unwrap();
    root.dispatch(&record(
        Level::INFO,
        "config loaded",
        vec![Attr::new(
            "config",
            Value::any(&ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                tls: true,
            }),
        )],
    ))
    .unwrap();

    // Error hook: fires for ERROR and above, before the line is written.
    let mut alerting = root.clone();
    alerting.set_error_hook(Some(Arc::new(|r: &LogRecord| {
        eprintln!("(hook) would page on-call about: {}", r.message);
    })));
    let db_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
    alerting
        .dispatch(&record(
            Level::ERROR,
            "database unreachable",
            vec![
                Attr::new("host", "db.local"),
                Attr::new("err", Value::error(&db_err)),
            ],
        ))
        .unwrap();

    // The same handler wired into tracing: spans become groups.
    tracing_console_color::init::init_with(ConsoleHandler::new(SharedSink::stdout()));
    let span = tracing::info_span!("checkout");
    let _guard = span.enter();
    tracing::info!(order = 1042i64, total = 99.95, "order placed");
}
