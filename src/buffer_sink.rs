use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// An in-memory writer that keeps everything it receives.
///
/// Useful for asserting on rendered output in tests and for measuring the
/// handler's overhead without terminal I/O. Clones share the same buffer, so
/// one clone can be handed to a [`crate::sink::SharedSink`] while another is
/// kept around to inspect the capture.
#[derive(Clone, Default)]
pub struct BufferSink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        BufferSink::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Write for BufferSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_see_each_others_writes() {
        let sink = BufferSink::new();
        let mut clone = sink.clone();
        clone.write_all(b"hello").unwrap();
        assert_eq!(sink.contents(), "hello");
    }
}
