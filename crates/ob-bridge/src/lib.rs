//! OBD bridge: library crate for the host-to-CAN diagnostic bridge.
//!
//! Re-exports all modules so external crates (e.g. `ob-e2e-tests`) can
//! drive the `Dispatcher` and control loop against mock gateways.

pub mod bridge;
pub mod config;
pub mod dispatcher;
pub mod indicator;
