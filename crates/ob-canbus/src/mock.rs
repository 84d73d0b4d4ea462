//! Mock CAN gateway for testing.
//!
//! Supports scripted inbound frames, frame recording and send/receive
//! failure injection. All tests use this instead of real CAN hardware so the suite
//! runs in CI on any platform.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{CanError, CanResult};
use crate::interface::BusGateway;
use crate::types::CanFrame;

/// Mock CAN gateway with scripted inbound frames and frame recording.
pub struct MockCanInterface {
    /// Frames handed out by `poll_receive` (FIFO order).
    responses: Mutex<VecDeque<CanFrame>>,
    /// All frames accepted by `send` (for test assertions).
    sent_frames: Mutex<Vec<CanFrame>>,
    /// When set, `send` rejects every frame.
    fail_sends: AtomicBool,
    /// When set, `poll_receive` reports a receive error.
    fail_receives: AtomicBool,
}

impl MockCanInterface {
    /// Create a new mock with no queued frames.
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    /// Create a mock pre-loaded with inbound frames.
    pub fn with_responses(responses: Vec<CanFrame>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            sent_frames: Mutex::new(Vec::new()),
            fail_sends: AtomicBool::new(false),
            fail_receives: AtomicBool::new(false),
        }
    }

    /// Queue an additional inbound frame.
    pub fn queue_response(&self, frame: CanFrame) {
        self.responses.lock().unwrap().push_back(frame);
    }

    /// Make subsequent sends fail (`true`) or succeed again (`false`).
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent polls fail (`true`) or succeed again (`false`).
    /// Queued frames stay queued while receives fail.
    pub fn set_fail_receives(&self, fail: bool) {
        self.fail_receives.store(fail, Ordering::SeqCst);
    }

    /// Get copies of all frames that were sent.
    pub fn sent_frames(&self) -> Vec<CanFrame> {
        self.sent_frames.lock().unwrap().clone()
    }

    /// Get the last sent frame, if any.
    pub fn last_sent(&self) -> Option<CanFrame> {
        self.sent_frames.lock().unwrap().last().cloned()
    }

    /// Inbound frames not yet polled.
    pub fn pending_responses(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

impl Default for MockCanInterface {
    fn default() -> Self {
        Self::new()
    }
}

impl BusGateway for MockCanInterface {
    fn send(&self, frame: &CanFrame) -> CanResult<()> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(CanError::Send("mock TX buffer full".into()));
        }
        self.sent_frames.lock().unwrap().push(frame.clone());
        Ok(())
    }

    fn poll_receive(&self) -> CanResult<Option<CanFrame>> {
        if self.fail_receives.load(Ordering::SeqCst) {
            return Err(CanError::Receive("mock RX error".into()));
        }
        Ok(self.responses.lock().unwrap().pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OBD_REQUEST_ID, OBD_RESPONSE_ID};

    #[test]
    fn records_sent_frames() {
        let mock = MockCanInterface::new();
        let frame = CanFrame::new(OBD_REQUEST_ID, vec![0x02, 0x01, 0x0C]);
        mock.send(&frame).unwrap();

        let sent = mock.sent_frames();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].id, OBD_REQUEST_ID);
        assert_eq!(mock.last_sent(), Some(frame));
    }

    #[test]
    fn returns_queued_frames_in_order() {
        let first = CanFrame::new(OBD_RESPONSE_ID, vec![0x04, 0x41, 0x0C, 0x1B, 0x58]);
        let second = CanFrame::new(OBD_RESPONSE_ID, vec![0x03, 0x41, 0x0D, 0x3C]);
        let mock = MockCanInterface::with_responses(vec![first.clone()]);
        mock.queue_response(second.clone());

        assert_eq!(mock.poll_receive().unwrap(), Some(first));
        assert_eq!(mock.poll_receive().unwrap(), Some(second));
        assert_eq!(mock.pending_responses(), 0);
    }

    #[test]
    fn nothing_when_empty() {
        let mock = MockCanInterface::new();
        assert_eq!(mock.poll_receive().unwrap(), None);
    }

    #[test]
    fn injected_send_failure() {
        let mock = MockCanInterface::new();
        mock.set_fail_sends(true);
        let frame = CanFrame::new(OBD_REQUEST_ID, vec![0x02, 0x01, 0x0C]);
        assert!(matches!(mock.send(&frame), Err(CanError::Send(_))));
        assert!(mock.sent_frames().is_empty());

        mock.set_fail_sends(false);
        mock.send(&frame).unwrap();
        assert_eq!(mock.sent_frames().len(), 1);
    }

    #[test]
    fn injected_receive_failure() {
        let frame = CanFrame::new(OBD_RESPONSE_ID, vec![0x03, 0x41, 0x05, 0x5A]);
        let mock = MockCanInterface::with_responses(vec![frame.clone()]);
        mock.set_fail_receives(true);
        assert!(matches!(mock.poll_receive(), Err(CanError::Receive(_))));
        assert_eq!(mock.pending_responses(), 1);

        mock.set_fail_receives(false);
        assert_eq!(mock.poll_receive().unwrap(), Some(frame));
    }
}
