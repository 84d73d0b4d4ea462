//! Diagnostic request value type and its `"MM PP"` text form.

use std::fmt;
use std::str::FromStr;

use crate::error::ProtocolError;

/// Mode 01: show current data. The only query class the bridge is built around.
pub const MODE_CURRENT_DATA: u8 = 0x01;

/// A single OBD-II query: mode byte plus parameter identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticRequest {
    mode: u8,
    pid: u8,
}

impl DiagnosticRequest {
    pub const fn new(mode: u8, pid: u8) -> Self {
        Self { mode, pid }
    }

    /// Query class (e.g. `0x01` for current data).
    pub const fn mode(&self) -> u8 {
        self.mode
    }

    /// Parameter identifier being requested.
    pub const fn pid(&self) -> u8 {
        self.pid
    }
}

impl FromStr for DiagnosticRequest {
    type Err = ProtocolError;

    /// Parses the host form: two hex pairs separated by exactly one space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ProtocolError::InvalidRequest(s.to_string());

        let (mode, pid) = s.split_once(' ').ok_or_else(invalid)?;
        let mode = parse_hex_pair(mode).ok_or_else(invalid)?;
        let pid = parse_hex_pair(pid).ok_or_else(invalid)?;
        Ok(Self::new(mode, pid))
    }
}

impl fmt::Display for DiagnosticRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X}", self.mode, self.pid)
    }
}

/// Exactly two ASCII hex digits, either case.
fn parse_hex_pair(token: &str) -> Option<u8> {
    if token.len() != 2 || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(token, 16).ok()
}
