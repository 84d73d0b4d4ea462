//! Host-facing line protocol shared by the bus layer and the bridge.

pub mod commands;
pub mod error;
pub mod messages;
pub mod request;

pub use commands::HostCommand;
pub use error::ProtocolError;
pub use request::{DiagnosticRequest, MODE_CURRENT_DATA};
