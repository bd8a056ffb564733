use std::io;
use std::sync::Arc;

use crate::format::append_attrs;
use crate::record::{Level, LogRecord};
use crate::sink::SharedSink;
use crate::theme::Theme;
use crate::value::Attr;

/// Side-channel callback fired for records at `ERROR` level and above,
/// before the record is formatted or written.
pub type ErrorHook = Arc<dyn Fn(&LogRecord) + Send + Sync>;

/// Colorized single-line console handler with composable scoping.
///
/// A handler is an immutable value: [`with_group`](ConsoleHandler::with_group)
/// and [`with_attrs`](ConsoleHandler::with_attrs) return new instances and
/// never touch the receiver, so two handlers derived from the same root can
/// be used from different threads without coordination. All handlers cloned
/// or derived from one root share the sink and its write lock.
#[derive(Clone)]
pub struct ConsoleHandler {
    sink: SharedSink,
    theme: Theme,
    groups: Vec<String>,
    attrs: Vec<Attr>,
    hook: Option<ErrorHook>,
}

impl ConsoleHandler {
    /// Handler with an empty group path, no bound attributes and no hook.
    pub fn new(sink: SharedSink) -> Self {
        ConsoleHandler {
            sink,
            theme: Theme::default(),
            groups: Vec::new(),
            attrs: Vec::new(),
            hook: None,
        }
    }

    /// Replace the styling configuration. Pass [`Theme::plain`] for
    /// deterministic uncolored output.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Always true: level filtering is the facade's job, this handler
    /// renders every record it is given.
    pub fn enabled(&self, _level: Level) -> bool {
        true
    }

    /// Active group path, outermost first.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Attributes accumulated via [`with_attrs`](ConsoleHandler::with_attrs),
    /// in call order.
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// New handler whose group path is the receiver's with `name` appended.
    ///
    /// The vectors are fully copied before the append, so the receiver and
    /// any sibling derivation stay isolated from each other.
    pub fn with_group(&self, name: impl Into<String>) -> Self {
        let mut groups = self.groups.clone();
        groups.push(name.into());
        ConsoleHandler {
            sink: self.sink.clone(),
            theme: self.theme,
            groups,
            attrs: self.attrs.clone(),
            hook: self.hook.clone(),
        }
    }

    /// New handler whose bound attributes are the receiver's with `attrs`
    /// appended. Same isolation guarantee as
    /// [`with_group`](ConsoleHandler::with_group).
    pub fn with_attrs(&self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        let mut bound = self.attrs.clone();
        bound.extend(attrs);
        ConsoleHandler {
            sink: self.sink.clone(),
            theme: self.theme,
            groups: self.groups.clone(),
            attrs: bound,
            hook: self.hook.clone(),
        }
    }

    /// Install or clear the error hook on this instance.
    ///
    /// The hook runs synchronously inside [`dispatch`](ConsoleHandler::dispatch)
    /// for every record at `ERROR` or above; a panicking hook propagates to
    /// the caller and aborts the write. Taking `&mut self` means the hook
    /// cannot change under a concurrent dispatch on the same instance;
    /// handlers derived earlier keep the hook they were derived with.
    pub fn set_error_hook(&mut self, hook: Option<ErrorHook>) {
        self.hook = hook;
    }

    /// Render `record` as one line and write it to the sink.
    ///
    /// The line carries, in order: the record's `[HH:MM:SS]` clock, the
    /// 3-character level tag, the group path as `name.` segments, the
    /// message, the bound attributes and finally the record's attributes.
    /// The finished line is written as one unit under the sink lock; the
    /// sink's error, if any, is returned verbatim.
    pub fn dispatch(&self, record: &LogRecord) -> io::Result<()> {
        if let Some(hook) = &self.hook {
            if record.level >= Level::ERROR {
                hook(record);
            }
        }

        let mut line = String::new();
        let clock = record.timestamp.format("%H:%M:%S");
        line.push_str(&self.theme.timestamp(&format!("[{clock}] ")));
        line.push_str(
            &self
                .theme
                .level(record.level, &format!("{:<3} ", record.level.tag())),
        );
        for group in &self.groups {
            line.push_str(&self.theme.group(&format!("{group}.")));
        }
        line.push_str(&self.theme.message(record.level, &record.message));
        append_attrs(&mut line, &self.theme, &self.attrs);
        append_attrs(&mut line, &self.theme, &record.attrs);
        line.push('\n');

        self.sink.write_line(line.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer_sink::BufferSink;
    use chrono::{TimeZone, Utc};

    fn test_handler() -> (ConsoleHandler, BufferSink) {
        let buf = BufferSink::new();
        let handler =
            ConsoleHandler::new(SharedSink::new(buf.clone())).with_theme(Theme::plain());
        (handler, buf)
    }

    fn record(level: Level, msg: &str) -> LogRecord {
        let at = Utc.with_ymd_and_hms(2026, 2, 8, 12, 30, 45).unwrap();
        LogRecord::new(at, level, msg)
    }

    #[test]
    fn new_handler_is_empty() {
        let (handler, _) = test_handler();
        assert!(handler.groups().is_empty());
        assert!(handler.attrs().is_empty());
    }

    #[test]
    fn enabled_accepts_every_level() {
        let (handler, _) = test_handler();
        for level in [Level::DEBUG, Level::INFO, Level::WARN, Level::ERROR, Level(42)] {
            assert!(handler.enabled(level));
        }
    }

    #[test]
    fn golden_info_line() {
        let (handler, buf) = test_handler();
        let mut r = record(Level::INFO, "server started");
        r.add_attrs([Attr::new("port", 8080i64)]);
        handler.dispatch(&r).unwrap();
        assert_eq!(buf.contents(), "[12:30:45] INF server started port=8080\n");
    }

    #[test]
    fn golden_warn_line_with_group() {
        let (handler, buf) = test_handler();
        let handler = handler.with_group("http");
        let mut r = record(Level::WARN, "slow request");
        r.add_attrs([Attr::new("ms", 500i64)]);
        handler.dispatch(&r).unwrap();
        assert_eq!(buf.contents(), "[12:30:45] WRN http.slow request ms=500\n");
    }

    #[test]
    fn unknown_level_renders_fallback_tag() {
        let (handler, buf) = test_handler();
        handler.dispatch(&record(Level(42), "unknown level")).unwrap();
        handler.dispatch(&record(Level(-100), "below debug")).unwrap();
        let out = buf.contents();
        assert_eq!(out.matches("??? ").count(), 2, "{out}");
    }

    #[test]
    fn group_path_concatenates_in_order() {
        let (handler, buf) = test_handler();
        let handler = handler.with_group("a").with_group("b").with_group("c");
        handler.dispatch(&record(Level::INFO, "deep")).unwrap();
        assert_eq!(buf.contents(), "[12:30:45] INF a.b.c.deep\n");
    }

    #[test]
    fn derivation_leaves_receiver_untouched() {
        let (handler, buf) = test_handler();
        let _scoped = handler.with_group("grp");
        let _bound = handler.with_attrs([Attr::new("extra", "val")]);
        handler.dispatch(&record(Level::INFO, "original")).unwrap();
        assert_eq!(buf.contents(), "[12:30:45] INF original\n");
    }

    #[test]
    fn sibling_derivations_are_independent() {
        let (handler, buf) = test_handler();
        let left = handler.with_group("left");
        let right = handler.with_group("right");
        left.dispatch(&record(Level::INFO, "l")).unwrap();
        right.dispatch(&record(Level::INFO, "r")).unwrap();
        assert_eq!(
            buf.contents(),
            "[12:30:45] INF left.l\n[12:30:45] INF right.r\n"
        );
    }

    #[test]
    fn bound_attrs_precede_record_attrs() {
        let (handler, buf) = test_handler();
        let handler = handler
            .with_attrs([Attr::new("service", "api")])
            .with_attrs([Attr::new("env", "staging")]);
        let mut r = record(Level::DEBUG, "starting");
        r.add_attrs([Attr::new("pid", 1234i64)]);
        handler.dispatch(&r).unwrap();
        assert_eq!(
            buf.contents(),
            "[12:30:45] DBG starting service=api env=staging pid=1234\n"
        );
    }

    #[test]
    fn nested_group_attr_emits_children_only() {
        let (handler, buf) = test_handler();
        let mut r = record(Level::INFO, "nested group");
        r.add_attrs([Attr::new(
            "user",
            crate::value::Value::group([
                Attr::new("name", "Alice"),
                Attr::new("id", 7i64),
            ]),
        )]);
        handler.dispatch(&r).unwrap();
        let out = buf.contents();
        assert_eq!(out, "[12:30:45] INF nested group name=Alice id=7\n");
        assert!(!out.contains("user="), "{out}");
    }

    #[test]
    fn hook_fires_at_error_and_above() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let (mut handler, _) = test_handler();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        handler.set_error_hook(Some(Arc::new(move |r: &LogRecord| {
            assert_eq!(r.message, "something broke");
            seen.fetch_add(1, Ordering::SeqCst);
        })));

        for level in [Level::DEBUG, Level::INFO, Level::WARN] {
            handler.dispatch(&record(level, "low level")).unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        handler.dispatch(&record(Level::ERROR, "something broke")).unwrap();
        handler.dispatch(&record(Level(9), "something broke")).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn missing_hook_is_fine() {
        let (handler, buf) = test_handler();
        handler.dispatch(&record(Level::ERROR, "no hook")).unwrap();
        assert_eq!(buf.contents(), "[12:30:45] ERR no hook\n");
    }

    #[test]
    fn clearing_the_hook_disables_it() {
        let (mut handler, _) = test_handler();
        handler.set_error_hook(Some(Arc::new(|_: &LogRecord| {
            panic!("hook should be cleared");
        })));
        handler.set_error_hook(None);
        handler.dispatch(&record(Level::ERROR, "quiet")).unwrap();
    }

    #[test]
    fn write_errors_surface_to_the_caller() {
        struct Broken;
        impl std::io::Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::WriteZero, "gone"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let handler =
            ConsoleHandler::new(SharedSink::new(Broken)).with_theme(Theme::plain());
        let err = handler.dispatch(&record(Level::INFO, "msg")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn concurrent_dispatch_keeps_lines_whole() {
        let (handler, buf) = test_handler();
        let threads = 50;

        let handles: Vec<_> = (0..threads)
            .map(|n| {
                let handler = handler.clone();
                std::thread::spawn(move || {
                    handler
                        .dispatch(&record(Level::INFO, &format!("msg-{n}")))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let out = buf.contents();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), threads);
        for line in lines {
            assert!(line.starts_with("[12:30:45] INF msg-"), "torn line: {line}");
        }
    }
}
