use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use crate::handler::ConsoleHandler;
use crate::layer::ConsoleLayer;
use crate::sink::SharedSink;

/// Error returned when the global subscriber cannot be installed.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("failed to install global subscriber: {0}")]
    SetGlobal(#[from] SetGlobalDefaultError),
}

/// Install a [`ConsoleLayer`] over the given handler as the global default
/// subscriber.
///
/// Fails if some other subscriber was installed first, which is the usual
/// reason this can go wrong in tests or embedded setups.
pub fn try_init_with(handler: ConsoleHandler) -> Result<(), InitError> {
    let subscriber = Registry::default().with(ConsoleLayer::new(handler));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Like [`try_init_with`] but panics on failure. Intended for `main`.
pub fn init_with(handler: ConsoleHandler) {
    try_init_with(handler).expect("set global subscriber");
}

/// Colorized logging to stdout with defaults. The recommended entrypoint
/// for binaries.
pub fn init() {
    init_with(ConsoleHandler::new(SharedSink::stdout()));
}
