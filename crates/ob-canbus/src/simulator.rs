//! Simulated engine ECU.
//!
//! Lets the bridge run end to end without a vehicle: every mode 01 request
//! sent to `0x7DF` for a PID in the table below gets a single-frame reply on
//! `0x7E8`, queued for the next `poll_receive`. Other requests go unanswered,
//! which the bridge reports as a timeout.

use std::collections::VecDeque;
use std::sync::Mutex;

use ob_protocol::MODE_CURRENT_DATA;

use crate::error::{CanError, CanResult};
use crate::interface::BusGateway;
use crate::types::{
    CanFrame, OBD_REQUEST_ID, OBD_RESPONSE_ID, REQUEST_LENGTH_BYTE, RESPONSE_SID_OFFSET,
};

/// Canned sensor readings: (PID, data bytes).
const READINGS: &[(u8, &[u8])] = &[
    (0x04, &[0x7F]),       // engine load ~50 %
    (0x05, &[0x82]),       // coolant 90 °C
    (0x0B, &[0x21]),       // MAP 33 kPa
    (0x0C, &[0x1A, 0xF8]), // 1726 rpm
    (0x0D, &[0x3C]),       // 60 km/h
    (0x0F, &[0x41]),       // intake air 25 °C
    (0x10, &[0x01, 0xF4]), // MAF 5 g/s
    (0x11, &[0x33]),       // throttle 20 %
    (0x1F, &[0x00, 0x78]), // 120 s since start
    (0x2F, &[0x80]),       // fuel ~50 %
    (0x42, &[0x36, 0xB0]), // 14.0 V
    (0x46, &[0x3C]),       // ambient 20 °C
];

/// A gateway that answers its own requests from [`READINGS`].
#[derive(Default)]
pub struct SimulatedEcu {
    inbox: Mutex<VecDeque<CanFrame>>,
}

impl SimulatedEcu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned data bytes for `pid`, if the simulator answers it.
    pub fn reading(pid: u8) -> Option<&'static [u8]> {
        READINGS
            .iter()
            .find(|(p, _)| *p == pid)
            .map(|(_, data)| *data)
    }

    fn reply_to(frame: &CanFrame) -> Option<CanFrame> {
        let [len, mode, pid, ..] = frame.data[..] else {
            return None;
        };
        if frame.id != OBD_REQUEST_ID || len != REQUEST_LENGTH_BYTE || mode != MODE_CURRENT_DATA {
            return None;
        }

        let reading = Self::reading(pid)?;
        let mut data = Vec::with_capacity(3 + reading.len());
        data.push(2 + reading.len() as u8);
        data.push(mode + RESPONSE_SID_OFFSET);
        data.push(pid);
        data.extend_from_slice(reading);
        Some(CanFrame::new(OBD_RESPONSE_ID, data))
    }
}

impl BusGateway for SimulatedEcu {
    fn send(&self, frame: &CanFrame) -> CanResult<()> {
        let mut inbox = self
            .inbox
            .lock()
            .map_err(|_| CanError::Send("simulator state poisoned".into()))?;

        match Self::reply_to(frame) {
            Some(reply) => {
                tracing::trace!(id = reply.id, data = ?reply.data, "simulated ECU reply");
                inbox.push_back(reply);
            }
            None => tracing::trace!(data = ?frame.data, "simulated ECU ignoring request"),
        }
        Ok(())
    }

    fn poll_receive(&self) -> CanResult<Option<CanFrame>> {
        let mut inbox = self
            .inbox
            .lock()
            .map_err(|_| CanError::Receive("simulator state poisoned".into()))?;
        Ok(inbox.pop_front())
    }
}
