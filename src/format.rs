use std::time::Duration;

use chrono::SecondsFormat;

use crate::theme::Theme;
use crate::value::{AnyValue, Attr, Value};

/// Render a single value to its display text.
///
/// The mapping is deterministic per kind and total: every variant produces
/// some text, serialization problems included (see [`AnyValue`]).
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Int(i) => i.to_string(),
        Value::Uint(u) => u.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Duration(d) => format_duration(*d),
        Value::Time(t) => t.to_rfc3339_opts(SecondsFormat::Secs, true),
        // Groups are expanded by the attribute renderer, never as a scalar.
        Value::Group(_) => String::new(),
        Value::Any(any) => format_any(any),
    }
}

fn format_any(any: &AnyValue) -> String {
    match any {
        AnyValue::Error(msg) => msg.clone(),
        AnyValue::Text(s) => s.clone(),
        AnyValue::Json(json) => serde_json::to_string_pretty(json)
            .unwrap_or_else(|_| json.to_string()),
    }
}

/// True when `s` is a complete, well-formed JSON document: object, array,
/// quoted string, number or literal. Trailing garbage fails the check.
pub fn is_json(s: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(s).is_ok()
}

/// Compact unit-suffixed duration, `5s` / `250ms` / `1m30s` / `1h2m3s` style.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let nanos = d.subsec_nanos();
    if secs == 0 && nanos == 0 {
        return "0s".to_string();
    }
    if secs == 0 {
        return if nanos < 1_000 {
            format!("{nanos}ns")
        } else if nanos < 1_000_000 {
            format!("{}µs", trim_fraction(f64::from(nanos) / 1e3))
        } else {
            format!("{}ms", trim_fraction(f64::from(nanos) / 1e6))
        };
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = trim_fraction((secs % 60) as f64 + f64::from(nanos) / 1e9);
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

fn trim_fraction(v: f64) -> String {
    let s = format!("{v:.9}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Append every attribute, in input order, to the line being assembled.
pub fn append_attrs(buf: &mut String, theme: &Theme, attrs: &[Attr]) {
    for attr in attrs {
        append_attr(buf, theme, attr);
    }
}

/// Append one attribute as ` key=value`, key and value styled separately.
///
/// A group value contributes only its children: the group's own key is never
/// emitted as a `key=` token and the children keys print unprefixed, in the
/// group's order.
pub fn append_attr(buf: &mut String, theme: &Theme, attr: &Attr) {
    if let Value::Group(children) = &attr.value {
        for child in children {
            append_attr(buf, theme, child);
        }
        return;
    }
    buf.push_str(&theme.key(&format!(" {}=", attr.key)));
    buf.push_str(&theme.value(&format_value(&attr.value)));
}
