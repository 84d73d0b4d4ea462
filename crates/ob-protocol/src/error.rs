//! Host protocol error types.

use thiserror::Error;

/// Errors raised while interpreting host text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("invalid diagnostic request: {0:?}")]
    InvalidRequest(String),
}
