//! Command dispatcher: turns host lines into bus queries and bus outcomes
//! back into host lines.
//!
//! Bridges between the host line protocol (`HostCommand`) and:
//! - `QueryTracker` for diagnostic requests and their replies/timeouts
//! - the `Indicator` for `LED_ON` / `LED_OFF`
//! - direct replies for `PING` and echo

use std::time::{Duration, Instant};

use ob_canbus::{BusGateway, DiagnosticOutcome, IssueError, QueryTracker, pid};
use ob_protocol::{HostCommand, messages};

use crate::indicator::Indicator;

/// Upper bound on frames drained per bus poll, so a chatty bus can't starve
/// the host channel.
const MAX_FRAMES_PER_POLL: usize = 64;

/// Owns the query tracker and routes traffic between host and bus.
///
/// Generic over gateway and indicator for testability.
pub struct Dispatcher<G, I> {
    gateway: G,
    indicator: I,
    tracker: QueryTracker,
}

impl<G: BusGateway, I: Indicator> Dispatcher<G, I> {
    pub fn new(gateway: G, indicator: I, timeout: Duration) -> Self {
        Self {
            gateway,
            indicator,
            tracker: QueryTracker::new(timeout),
        }
    }

    pub fn tracker(&self) -> &QueryTracker {
        &self.tracker
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    /// Handle one host line. Returns the line to send back, if any.
    pub fn handle_line(&mut self, line: &str, now: Instant) -> Option<String> {
        match HostCommand::parse(line) {
            HostCommand::Empty => None,
            HostCommand::Ignored => {
                tracing::debug!(line, "ignoring malformed diagnostic request");
                None
            }
            HostCommand::Ping => Some(messages::PONG.to_string()),
            HostCommand::Echo(text) => Some(messages::echo(&text)),
            HostCommand::LedOn => Some(self.set_indicator(true)),
            HostCommand::LedOff => Some(self.set_indicator(false)),
            HostCommand::Diagnostic(request) => {
                match self.tracker.issue(&self.gateway, request, now) {
                    Ok(()) => None,
                    Err(IssueError::Busy { pending_pid }) => {
                        tracing::warn!(
                            requested = %request,
                            pending_pid,
                            "request dropped, previous query still pending"
                        );
                        None
                    }
                    Err(IssueError::TransportFailure(e)) => {
                        tracing::warn!(requested = %request, error = %e, "CAN send failed");
                        Some(messages::SEND_FAILED.to_string())
                    }
                }
            }
        }
    }

    /// Drain available frames from the bus and offer them to the tracker.
    /// Returns the reply line when one of them completes the pending query.
    pub fn poll_bus(&mut self, now: Instant) -> Option<String> {
        let mut reply = None;
        for _ in 0..MAX_FRAMES_PER_POLL {
            let frame = match self.gateway.poll_receive() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "CAN receive error");
                    break;
                }
            };
            if let Some(outcome) = self.tracker.on_frame_received(&frame, now) {
                reply = Some(format_outcome(outcome));
            }
        }
        reply
    }

    /// Expire the pending query if its window has passed.
    pub fn tick(&mut self, now: Instant) -> Option<String> {
        self.tracker.tick(now).map(format_outcome)
    }

    fn set_indicator(&mut self, on: bool) -> String {
        if let Err(e) = self.indicator.set(on) {
            tracing::warn!(on, error = %e, "failed to drive indicator");
        }
        if on {
            messages::LED_ON.to_string()
        } else {
            messages::LED_OFF.to_string()
        }
    }
}

/// Render an outcome as a host line.
pub fn format_outcome(outcome: DiagnosticOutcome) -> String {
    match outcome {
        DiagnosticOutcome::Matched {
            pid,
            data_a,
            data_b,
            has_b,
        } => {
            log_decoded(pid, data_a, data_b, has_b);
            messages::pid_reply(pid, data_a, data_b, has_b)
        }
        DiagnosticOutcome::TimedOut => {
            tracing::info!("no response before timeout");
            messages::NO_RESPONSE.to_string()
        }
    }
}

fn log_decoded(pid: u8, data_a: u8, data_b: u8, has_b: bool) {
    let data: &[u8] = if has_b { &[data_a, data_b] } else { &[data_a] };
    match pid::decode_pid(pid, data) {
        Ok(v) => tracing::info!(
            pid,
            name = v.name,
            value = v.value,
            unit = v.unit,
            "PID reply"
        ),
        Err(e) => tracing::debug!(pid, error = %e, "PID reply not decoded"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::LogIndicator;
    use ob_canbus::MockCanInterface;
    use ob_canbus::types::{CanFrame, OBD_RESPONSE_ID};

    fn dispatcher(mock: &MockCanInterface) -> Dispatcher<&MockCanInterface, LogIndicator> {
        Dispatcher::new(mock, LogIndicator::default(), Duration::from_millis(1000))
    }

    #[test]
    fn rpm_scenario() {
        let mock = MockCanInterface::new();
        let mut d = dispatcher(&mock);
        let t0 = Instant::now();

        assert_eq!(d.handle_line("01 0C", t0), None);
        assert_eq!(mock.last_sent().unwrap().data, vec![0x02, 0x01, 0x0C]);

        mock.queue_response(CanFrame::new(OBD_RESPONSE_ID, vec![0x04, 0x41, 0x0C, 0x1A, 0x2B]));
        assert_eq!(d.poll_bus(t0 + Duration::from_millis(30)).as_deref(), Some("PID: 1A 2B 0C"));
        assert!(d.tracker().is_idle());
    }

    #[test]
    fn coolant_scenario() {
        let mock = MockCanInterface::new();
        let mut d = dispatcher(&mock);
        let t0 = Instant::now();

        d.handle_line("01 05", t0);
        mock.queue_response(CanFrame::new(OBD_RESPONSE_ID, vec![0x03, 0x41, 0x05, 0x5A]));
        assert_eq!(d.poll_bus(t0).as_deref(), Some("PID: 5A 05"));
    }

    #[test]
    fn rpm_short_frame_still_reports_b() {
        let mock = MockCanInterface::new();
        let mut d = dispatcher(&mock);
        let t0 = Instant::now();

        d.handle_line("01 0c", t0);
        mock.queue_response(CanFrame::new(OBD_RESPONSE_ID, vec![0x03, 0x41, 0x0C, 0x1A]));
        assert_eq!(d.poll_bus(t0).as_deref(), Some("PID: 1A 0 0C"));
    }

    #[test]
    fn timeout_scenario() {
        let mock = MockCanInterface::new();
        let mut d = dispatcher(&mock);
        let t0 = Instant::now();

        d.handle_line("01 0C", t0);
        assert_eq!(d.tick(t0 + Duration::from_millis(1000)), None);
        assert_eq!(
            d.tick(t0 + Duration::from_millis(1001)).as_deref(),
            Some(messages::NO_RESPONSE)
        );
        assert!(d.tracker().is_idle());

        d.handle_line("01 05", t0 + Duration::from_millis(1010));
        assert!(!d.tracker().is_idle());
    }

    #[test]
    fn malformed_request_is_silent() {
        let mock = MockCanInterface::new();
        let mut d = dispatcher(&mock);

        assert_eq!(d.handle_line("1 0C", Instant::now()), None);
        assert!(d.tracker().is_idle());
        assert!(mock.sent_frames().is_empty());
    }

    #[test]
    fn send_failure_notice() {
        let mock = MockCanInterface::new();
        mock.set_fail_sends(true);
        let mut d = dispatcher(&mock);

        assert_eq!(
            d.handle_line("01 0C", Instant::now()).as_deref(),
            Some(messages::SEND_FAILED)
        );
        assert!(d.tracker().is_idle());
    }

    #[test]
    fn busy_request_is_silent() {
        let mock = MockCanInterface::new();
        let mut d = dispatcher(&mock);
        let t0 = Instant::now();

        d.handle_line("01 0C", t0);
        assert_eq!(d.handle_line("01 05", t0), None);
        assert_eq!(mock.sent_frames().len(), 1);
        assert_eq!(d.tracker().pending().unwrap().request.pid(), 0x0C);
    }

    #[test]
    fn mismatched_reply_keeps_waiting() {
        let mock = MockCanInterface::new();
        let mut d = dispatcher(&mock);
        let t0 = Instant::now();

        d.handle_line("01 0C", t0);
        mock.queue_response(CanFrame::new(OBD_RESPONSE_ID, vec![0x03, 0x41, 0x05, 0x5A]));
        mock.queue_response(CanFrame::new(0x123, vec![0xDE, 0xAD]));
        assert_eq!(d.poll_bus(t0), None);
        assert!(!d.tracker().is_idle());
        assert_eq!(mock.pending_responses(), 0);
    }

    #[test]
    fn simple_commands() {
        let mock = MockCanInterface::new();
        let mut d = dispatcher(&mock);
        let now = Instant::now();

        assert_eq!(d.handle_line("ping", now).as_deref(), Some("PONG"));
        assert_eq!(d.handle_line("LED_ON", now).as_deref(), Some("LED turned ON"));
        assert!(d.indicator().is_on());
        assert_eq!(d.handle_line("led_off", now).as_deref(), Some("LED turned OFF"));
        assert!(!d.indicator().is_on());
        assert_eq!(d.handle_line("hey", now).as_deref(), Some("Echo: HEY"));
        assert_eq!(d.handle_line("", now), None);
        assert!(mock.sent_frames().is_empty());
    }

    #[test]
    fn format_timeout() {
        assert_eq!(format_outcome(DiagnosticOutcome::TimedOut), "No response - timeout");
    }

    #[test]
    fn receive_error_keeps_query_pending() {
        let mock = MockCanInterface::new();
        let mut d = dispatcher(&mock);
        let t0 = Instant::now();

        d.handle_line("01 0C", t0);
        mock.queue_response(CanFrame::new(OBD_RESPONSE_ID, vec![0x04, 0x41, 0x0C, 0x1A, 0x2B]));
        mock.set_fail_receives(true);
        assert_eq!(d.poll_bus(t0), None);
        assert!(!d.tracker().is_idle());
        assert_eq!(mock.pending_responses(), 1);

        mock.set_fail_receives(false);
        assert_eq!(d.poll_bus(t0).as_deref(), Some("PID: 1A 2B 0C"));
    }
}
