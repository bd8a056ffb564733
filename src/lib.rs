//! Colorized single-line console rendering for structured log records,
//! with immutable group/attribute scoping and a `tracing` layer adapter.

pub mod record;
pub mod value;
pub mod format;
pub mod theme;
pub mod sink;
pub mod buffer_sink;
pub mod handler;
pub mod layer;
pub mod init;
