//! Core CAN bus types and OBD-II constants.

// ── OBD-II CAN IDs ──────────────────────────────────────────────

/// Standard OBD-II broadcast request CAN ID.
pub const OBD_REQUEST_ID: u32 = 0x7DF;

/// Engine ECU response CAN ID. The only responder the bridge listens to.
pub const OBD_RESPONSE_ID: u32 = 0x7E8;

/// Offset added to request mode to get the response mode byte.
pub const RESPONSE_SID_OFFSET: u8 = 0x40;

/// Protocol length byte of a single-PID request: mode + PID.
pub const REQUEST_LENGTH_BYTE: u8 = 0x02;

// ── CAN Frame ───────────────────────────────────────────────────

/// A raw CAN 2.0A frame (standard 11-bit ID).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanFrame {
    /// CAN arbitration ID (11-bit standard).
    pub id: u32,
    /// Data payload (0–8 bytes for standard CAN). Its length is the DLC.
    pub data: Vec<u8>,
}

impl CanFrame {
    pub fn new(id: u32, data: Vec<u8>) -> Self {
        Self { id, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// ── Decoded replies ─────────────────────────────────────────────

/// A mode-01 style reply pulled out of a response frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticReply {
    /// Request mode + 0x40. Not checked against the request.
    pub response_mode: u8,
    pub pid: u8,
    /// First data byte, 0 when the frame carries none.
    pub data_a: u8,
    /// Second data byte, 0 when the frame carries none.
    pub data_b: u8,
    /// Whether the frame actually carried a second data byte.
    pub has_b: bool,
}

/// Terminal result of one request/response exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticOutcome {
    Matched {
        pid: u8,
        data_a: u8,
        data_b: u8,
        has_b: bool,
    },
    TimedOut,
}
