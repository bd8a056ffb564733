use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Destination for rendered lines, shared between every handler derived from
/// one root.
///
/// The mutex is the write lock from the concurrency contract: it travels
/// with the sink, so concurrent `dispatch` calls on handlers sharing a sink
/// interleave at line granularity only. The sink never closes the underlying
/// writer; dropping the last clone drops the writer with it.
#[derive(Clone)]
pub struct SharedSink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl SharedSink {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        SharedSink {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        SharedSink::new(io::stdout())
    }

    pub fn stderr() -> Self {
        SharedSink::new(io::stderr())
    }

    /// Write one fully assembled line as a single unit under the lock.
    ///
    /// The writer's error is returned verbatim; the lock is released either
    /// way. A lock poisoned by a panicking writer is recovered rather than
    /// propagated, a logging sink must keep accepting lines afterwards.
    pub fn write_line(&self, line: &[u8]) -> io::Result<()> {
        let mut writer = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(line)
    }
}

impl std::fmt::Debug for SharedSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSink").finish_non_exhaustive()
    }
}
