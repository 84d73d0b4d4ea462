//! OBD-II over CAN for the bridge: frame codec, bus gateways and the
//! single-query request/response tracker.

pub mod codec;
pub mod error;
pub mod interface;
pub mod mock;
pub mod pid;
pub mod simulator;
pub mod tracker;
pub mod types;

pub use error::{CanError, CanResult, IssueError};
pub use interface::BusGateway;
#[cfg(target_os = "linux")]
pub use interface::SocketCanGateway;
pub use mock::MockCanInterface;
pub use simulator::SimulatedEcu;
pub use tracker::{DEFAULT_TIMEOUT, PendingQuery, QueryState, QueryTracker};
pub use types::{CanFrame, DiagnosticOutcome, DiagnosticReply};
