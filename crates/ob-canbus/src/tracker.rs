//! Request/response correlation for a single in-flight OBD-II query.
//!
//! `QueryTracker` owns the pending-query slot. It moves between two states:
//!
//! ```text
//! Idle ──issue (sent)──▶ Awaiting ──matching reply──▶ Idle
//!                           │
//!                           └──tick past timeout──▶ Idle
//! ```
//!
//! A failed send never leaves `Idle`. A new request while `Awaiting` is
//! rejected with [`IssueError::Busy`] so a late reply can't be attributed to
//! the wrong query.
//!
//! Replies are matched on PID only; the response mode byte is not compared to
//! the request mode.

use std::time::{Duration, Instant};

use ob_protocol::DiagnosticRequest;

use crate::codec;
use crate::error::IssueError;
use crate::interface::BusGateway;
use crate::types::{CanFrame, DiagnosticOutcome};

/// Default time to wait for an ECU reply.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// The query currently on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingQuery {
    pub request: DiagnosticRequest,
    pub issued_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Idle,
    Awaiting(PendingQuery),
}

/// Single-slot request/response state machine.
#[derive(Debug)]
pub struct QueryTracker {
    state: QueryState,
    timeout: Duration,
}

impl QueryTracker {
    pub fn new(timeout: Duration) -> Self {
        Self {
            state: QueryState::Idle,
            timeout,
        }
    }

    pub fn state(&self) -> QueryState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, QueryState::Idle)
    }

    pub fn pending(&self) -> Option<&PendingQuery> {
        match &self.state {
            QueryState::Awaiting(pending) => Some(pending),
            QueryState::Idle => None,
        }
    }

    /// Encode `request` and put it on the bus. The pending slot is only
    /// filled once the gateway accepts the frame.
    pub fn issue<G>(
        &mut self,
        gateway: &G,
        request: DiagnosticRequest,
        now: Instant,
    ) -> Result<(), IssueError>
    where
        G: BusGateway + ?Sized,
    {
        if let Some(pending) = self.pending() {
            return Err(IssueError::Busy {
                pending_pid: pending.request.pid(),
            });
        }

        let frame = codec::encode_request(&request);
        gateway
            .send(&frame)
            .map_err(IssueError::TransportFailure)?;

        tracing::debug!(
            mode = request.mode(),
            pid = request.pid(),
            timeout_ms = self.timeout.as_millis() as u64,
            "diagnostic request sent"
        );
        self.state = QueryState::Awaiting(PendingQuery {
            request,
            issued_at: now,
        });
        Ok(())
    }

    /// Offer an inbound frame. Returns `Matched` only for an engine ECU reply
    /// carrying the pending PID; everything else is ignored.
    pub fn on_frame_received(
        &mut self,
        frame: &CanFrame,
        now: Instant,
    ) -> Option<DiagnosticOutcome> {
        let pending = *self.pending()?;
        let reply = codec::decode_reply(frame)?;

        if reply.pid != pending.request.pid() {
            tracing::trace!(
                expected = pending.request.pid(),
                got = reply.pid,
                "ignoring reply for another PID"
            );
            return None;
        }

        tracing::debug!(
            pid = reply.pid,
            response_mode = reply.response_mode,
            latency_ms = now.saturating_duration_since(pending.issued_at).as_millis() as u64,
            "reply matched"
        );
        self.state = QueryState::Idle;
        Some(DiagnosticOutcome::Matched {
            pid: reply.pid,
            data_a: reply.data_a,
            data_b: reply.data_b,
            has_b: reply.has_b,
        })
    }

    /// Expire the pending query once more than `timeout` has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<DiagnosticOutcome> {
        let pending = *self.pending()?;
        if now.saturating_duration_since(pending.issued_at) <= self.timeout {
            return None;
        }

        tracing::debug!(pid = pending.request.pid(), "diagnostic request timed out");
        self.state = QueryState::Idle;
        Some(DiagnosticOutcome::TimedOut)
    }
}

impl Default for QueryTracker {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}
