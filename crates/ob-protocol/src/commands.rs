//! Classification of incoming host lines.

use crate::request::DiagnosticRequest;

/// Lines at least this long that are not a simple command are treated as
/// diagnostic requests, even without a space.
const DIAGNOSTIC_MIN_LEN: usize = 5;

/// One parsed host line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// Blank line. Produces no output.
    Empty,
    /// Switch the indicator on.
    LedOn,
    /// Switch the indicator off.
    LedOff,
    /// Liveness check, answered with `PONG`.
    Ping,
    /// A valid `"MM PP"` query.
    Diagnostic(DiagnosticRequest),
    /// Looked like a diagnostic request but failed validation. Dropped silently.
    Ignored,
    /// Any other short text, echoed back uppercased.
    Echo(String),
}

impl HostCommand {
    /// Classify a raw host line. Surrounding whitespace is trimmed and
    /// matching is case-insensitive.
    pub fn parse(line: &str) -> Self {
        let command = line.trim().to_ascii_uppercase();

        match command.as_str() {
            "" => Self::Empty,
            "LED_ON" => Self::LedOn,
            "LED_OFF" => Self::LedOff,
            "PING" => Self::Ping,
            text if text.contains(' ') || text.len() >= DIAGNOSTIC_MIN_LEN => text
                .parse()
                .map(Self::Diagnostic)
                .unwrap_or(Self::Ignored),
            _ => Self::Echo(command),
        }
    }
}
