//! The error kinds of §7: argument errors are raised locally before any
//! driver call; driver errors are passed through from `fred` unchanged.

use thiserror::Error;

/// Errors surfaced by the adapter.
///
/// `Argument`-shaped variants (`WrongArity`, `InvalidKey`, `UnknownToken`,
/// `MissingScript`) are raised locally, before any driver call. `Driver`
/// wraps whatever the native driver returned, message intact, per the
/// "never silently converts an error into a successful return" policy in §7.
#[derive(Debug, Error)]
pub enum Error {
    #[error("wrong number of arguments for '{0}'")]
    WrongArity(String),
    #[error("invalid key")]
    InvalidKey,
    #[error("unknown token `{token}` for '{command}'")]
    UnknownToken { command: String, token: String },
    #[error(transparent)]
    Driver(#[from] fred::error::Error),
    #[error("transaction aborted")]
    TransactionAborted,
    #[error("subscriber client closed")]
    Closed,
    #[error("defineCommand: script body must be provided")]
    MissingScript,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The heuristic of §4.5 / §9: detect an optimistic-concurrency abort
    /// from a driver error's message. Acknowledged open question — a
    /// reliable signal from the driver should replace this if one becomes
    /// available (see DESIGN.md).
    pub fn looks_like_watch_abort(&self) -> bool {
        let Error::Driver(e) = self else { return false };
        let msg = e.to_string().to_ascii_lowercase();
        ["watch", "transaction", "multi", "exec"]
            .iter()
            .any(|needle| msg.contains(needle))
    }
}
