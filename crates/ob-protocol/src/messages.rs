//! Text lines written back to the host.
//!
//! ```text
//! PID: <A> [<B> ]<PP>        matched reply
//! No response - timeout       no reply within the window
//! CAN send failed             transmit rejected by the bus
//! LED turned ON / LED turned OFF / PONG / Echo: <TEXT>
//! ```

// ─── Fixed notices ───

pub const NO_RESPONSE: &str = "No response - timeout";
pub const SEND_FAILED: &str = "CAN send failed";
pub const LED_ON: &str = "LED turned ON";
pub const LED_OFF: &str = "LED turned OFF";
pub const PONG: &str = "PONG";

// ─── Bring-up banner ───

pub const READY: &str = "OBD bridge ready";
pub const BUS_READY: &str = "CAN bus initialized";
pub const BUS_FAILED: &str = "CAN bus init failed";

/// PIDs whose reply line always carries the B byte, whatever the frame length.
/// Engine RPM (0x0C) and run time since start (0x1F).
pub const ALWAYS_TWO_BYTE_PIDS: [u8; 2] = [0x0C, 0x1F];

pub fn echo(text: &str) -> String {
    format!("Echo: {text}")
}

/// Format a matched reply. `has_b` comes from the frame; the special-case PID
/// set is checked independently.
pub fn pid_reply(pid: u8, data_a: u8, data_b: u8, has_b: bool) -> String {
    if has_b || ALWAYS_TWO_BYTE_PIDS.contains(&pid) {
        format!("PID: {data_a:X} {data_b:X} {pid:02X}")
    } else {
        format!("PID: {data_a:X} {pid:02X}")
    }
}
