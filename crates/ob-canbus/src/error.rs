//! CAN bus error types.

use thiserror::Error;

/// Errors that can occur during CAN bus operations.
#[derive(Debug, Error)]
pub enum CanError {
    #[error("CAN interface error: {0}")]
    Interface(String),

    #[error("CAN send failed: {0}")]
    Send(String),

    #[error("CAN receive failed: {0}")]
    Receive(String),

    #[error("PID decode error: unknown PID 0x{pid:02X}")]
    UnknownPid { pid: u8 },

    #[error("Frame decode error: {0}")]
    Decode(String),
}

/// Convenience alias for CAN bus results.
pub type CanResult<T> = Result<T, CanError>;

/// Why a diagnostic request could not be put on the bus.
#[derive(Debug, Error)]
pub enum IssueError {
    /// A query for `pending_pid` is still awaiting its reply.
    #[error("query for PID 0x{pending_pid:02X} still pending")]
    Busy { pending_pid: u8 },

    #[error("transport failure")]
    TransportFailure(#[source] CanError),
}
