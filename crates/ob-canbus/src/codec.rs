//! OBD-II single-frame codec: request builder and reply decoder.
//!
//! Request layout on `0x7DF`: `[0x02, mode, pid]`.
//! Reply layout on `0x7E8`:   `[len, mode + 0x40, pid, A?, B?, ...]`.

use ob_protocol::DiagnosticRequest;

use crate::types::{
    CanFrame, DiagnosticReply, OBD_REQUEST_ID, OBD_RESPONSE_ID, REQUEST_LENGTH_BYTE,
};

/// Smallest reply that still carries a PID echo.
const MIN_REPLY_LEN: usize = 3;

/// Build the broadcast request frame for `req`. The leading `0x02` is the
/// OBD length byte, not the CAN DLC.
pub fn encode_request(req: &DiagnosticRequest) -> CanFrame {
    CanFrame::new(
        OBD_REQUEST_ID,
        vec![REQUEST_LENGTH_BYTE, req.mode(), req.pid()],
    )
}

/// Decode an engine ECU reply. Returns `None` for frames from any other ID
/// or too short to hold a PID.
pub fn decode_reply(frame: &CanFrame) -> Option<DiagnosticReply> {
    if frame.id != OBD_RESPONSE_ID || frame.len() < MIN_REPLY_LEN {
        return None;
    }

    let data = &frame.data;
    Some(DiagnosticReply {
        response_mode: data[1],
        pid: data[2],
        data_a: data.get(3).copied().unwrap_or(0),
        data_b: data.get(4).copied().unwrap_or(0),
        has_b: data.len() > 4,
    })
}
