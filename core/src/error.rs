//! Error taxonomy for the session core
//!
//! Recoverable conditions (save slot misuse, invalid handle queries) are
//! reported as sentinel values at the ABI surface and never reach this
//! type; `CoreError` covers the conditions a host must branch on. Only
//! [`CoreError::Trap`] ends a session - everything else is fatal to the
//! call, not the session.

use thiserror::Error;

/// Errors produced by the session core and console cores built on it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An init-only setting was mutated out of phase
    #[error("configuration: {0}")]
    Configuration(String),

    /// An init-only resource operation was called after steady state began
    #[error("{op}: can only be called during init()")]
    OutOfPhase { op: &'static str },

    /// A handle resolved to nothing in its class
    #[error("invalid {class} handle {handle}")]
    InvalidHandle { class: &'static str, handle: u32 },

    /// An allocation limit was reached
    #[error("{what} exhausted (limit {limit})")]
    ResourceExhausted { what: &'static str, limit: u32 },

    /// Caller-supplied data violates a format contract
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Unrecoverable fault; the host must terminate the session
    #[error("trap: {0}")]
    Trap(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// True if this error must end the session rather than the call.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Trap(_))
    }
}
