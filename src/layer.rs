use chrono::Utc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::handler::ConsoleHandler;
use crate::record::LogRecord;
use crate::value::{Attr, Value};

/// `tracing_subscriber` layer that renders every event through a
/// [`ConsoleHandler`].
///
/// The event's span scope becomes the handler's group path (root span
/// first), the `message` field becomes the line's message and the remaining
/// fields become record attributes in recording order. No level filtering
/// happens here; compose with a filter layer upstream if one is wanted.
pub struct ConsoleLayer {
    handler: ConsoleHandler,
}

impl ConsoleLayer {
    pub fn new(handler: ConsoleHandler) -> Self {
        ConsoleLayer { handler }
    }
}

impl<S> Layer<S> for ConsoleLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut attrs = Vec::new();
        let mut message = None;
        let mut visitor = FieldVisitor {
            attrs: &mut attrs,
            message: &mut message,
        };
        event.record(&mut visitor);

        let mut handler = self.handler.clone();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                handler = handler.with_group(span.name());
            }
        }

        let mut record = LogRecord::new(
            Utc::now(),
            (*event.metadata().level()).into(),
            message.unwrap_or_default(),
        );
        record.add_attrs(attrs);

        // A broken sink must not take the instrumented code down with it.
        if let Err(e) = handler.dispatch(&record) {
            eprintln!("console handler write failed: {e}");
        }
    }
}

/// Collects an event's fields into [`Attr`]s, pulling `message` aside.
pub struct FieldVisitor<'a> {
    pub attrs: &'a mut Vec<Attr>,
    pub message: &'a mut Option<String>,
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.attrs.push(Attr::new(field.name(), value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.attrs.push(Attr::new(field.name(), value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.attrs.push(Attr::new(field.name(), value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.attrs.push(Attr::new(field.name(), value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.attrs.push(Attr::new(field.name(), value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.attrs.push(Attr::new(field.name(), Value::error(value)));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        // The event message arrives here as `fmt::Arguments`.
        if field.name() == "message" {
            *self.message = Some(format!("{value:?}"));
        } else {
            self.attrs.push(Attr::new(field.name(), format!("{value:?}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer_sink::BufferSink;
    use crate::sink::SharedSink;
    use crate::theme::Theme;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    fn capture() -> (impl tracing::Subscriber, BufferSink) {
        let buf = BufferSink::new();
        let handler =
            ConsoleHandler::new(SharedSink::new(buf.clone())).with_theme(Theme::plain());
        let subscriber = Registry::default().with(ConsoleLayer::new(handler));
        (subscriber, buf)
    }

    #[test]
    fn events_render_message_and_fields() {
        let (subscriber, buf) = capture();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(user = "test", "hello world");
        });

        let out = buf.contents();
        assert!(out.contains("INF "), "{out}");
        assert!(out.contains("hello world"), "{out}");
        assert!(out.contains(" user=test"), "{out}");
        assert!(out.ends_with('\n'), "{out}");
    }

    #[test]
    fn span_scope_becomes_group_prefix() {
        let (subscriber, buf) = capture();
        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("http");
            let _guard = span.enter();
            tracing::warn!(ms = 500i64, path = "/api", "slow request");
        });

        let out = buf.contents();
        assert!(out.contains("WRN http.slow request"), "{out}");
        assert!(out.contains(" ms=500"), "{out}");
        assert!(out.contains(" path=/api"), "{out}");
    }

    #[test]
    fn nested_spans_prefix_root_first() {
        let (subscriber, buf) = capture();
        tracing::subscriber::with_default(subscriber, || {
            let outer = tracing::info_span!("server");
            let _outer = outer.enter();
            let inner = tracing::info_span!("request");
            let _inner = inner.enter();
            tracing::info!("handled");
        });

        assert!(
            buf.contents().contains("INF server.request.handled"),
            "{}",
            buf.contents()
        );
    }

    #[test]
    fn error_level_events_keep_their_tag() {
        let (subscriber, buf) = capture();
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(code = 500i64, "db down");
        });

        let out = buf.contents();
        assert!(out.contains("ERR db down code=500"), "{out}");
    }
}
