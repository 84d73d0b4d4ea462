//! CAN bus gateway abstraction.
//!
//! `BusGateway` trait with non-blocking `send`/`poll_receive`. Three impls:
//! - `SocketCanGateway`: Linux-only, wraps `socketcan::CanSocket`
//! - `MockCanInterface`: all platforms, scripted frames (in `mock.rs`)
//! - `SimulatedEcu`: all platforms, answers mode 01 queries (in `simulator.rs`)
//!
//! Nothing here blocks or retries. Buffering beyond what the transport
//! already holds is the caller's concern.

use std::sync::Arc;

use crate::error::CanResult;
use crate::types::CanFrame;

/// Send/receive capability of the underlying bus.
pub trait BusGateway {
    /// Transmit one frame. Fails with `CanError::Send` when the transport
    /// rejects it (arbitration loss, full TX buffer, bus off).
    fn send(&self, frame: &CanFrame) -> CanResult<()>;

    /// Return the next buffered frame, or `Ok(None)` if nothing is waiting.
    fn poll_receive(&self) -> CanResult<Option<CanFrame>>;
}

impl<G: BusGateway + ?Sized> BusGateway for &G {
    fn send(&self, frame: &CanFrame) -> CanResult<()> {
        (**self).send(frame)
    }

    fn poll_receive(&self) -> CanResult<Option<CanFrame>> {
        (**self).poll_receive()
    }
}

impl<G: BusGateway + ?Sized> BusGateway for Box<G> {
    fn send(&self, frame: &CanFrame) -> CanResult<()> {
        (**self).send(frame)
    }

    fn poll_receive(&self) -> CanResult<Option<CanFrame>> {
        (**self).poll_receive()
    }
}

impl<G: BusGateway + ?Sized> BusGateway for Arc<G> {
    fn send(&self, frame: &CanFrame) -> CanResult<()> {
        (**self).send(frame)
    }

    fn poll_receive(&self) -> CanResult<Option<CanFrame>> {
        (**self).poll_receive()
    }
}

// ── SocketCAN (Linux-only) ──────────────────────────────────────

#[cfg(target_os = "linux")]
pub use self::socketcan_gateway::SocketCanGateway;

#[cfg(target_os = "linux")]
mod socketcan_gateway {
    use std::io;

    use socketcan::{CanSocket, EmbeddedFrame, Frame, Socket, StandardId};

    use super::BusGateway;
    use crate::error::{CanError, CanResult};
    use crate::types::CanFrame;

    /// SocketCAN gateway for Linux hosts. The socket runs in non-blocking
    /// mode so `poll_receive` never stalls the control loop.
    pub struct SocketCanGateway {
        socket: CanSocket,
        interface_name: String,
    }

    impl SocketCanGateway {
        /// Open `interface_name` (e.g. `"can0"`). Bitrate is configured on the
        /// link itself (`ip link set can0 type can bitrate 500000`).
        pub fn open(interface_name: &str) -> CanResult<Self> {
            let socket = CanSocket::open(interface_name)
                .map_err(|e| CanError::Interface(format!("{interface_name}: {e}")))?;
            socket
                .set_nonblocking(true)
                .map_err(|e| CanError::Interface(format!("{interface_name}: {e}")))?;

            tracing::info!(interface = interface_name, "SocketCAN interface open");
            Ok(Self {
                socket,
                interface_name: interface_name.to_string(),
            })
        }
    }

    impl BusGateway for SocketCanGateway {
        fn send(&self, frame: &CanFrame) -> CanResult<()> {
            let id = u16::try_from(frame.id)
                .ok()
                .and_then(StandardId::new)
                .ok_or_else(|| {
                    CanError::Send(format!("0x{:X} is not a standard CAN ID", frame.id))
                })?;
            let out = socketcan::CanFrame::new(id, &frame.data).ok_or_else(|| {
                CanError::Send(format!("payload of {} bytes exceeds 8", frame.len()))
            })?;

            self.socket
                .write_frame(&out)
                .map_err(|e| CanError::Send(format!("{}: {e}", self.interface_name)))
        }

        fn poll_receive(&self) -> CanResult<Option<CanFrame>> {
            match self.socket.read_frame() {
                Ok(socketcan::CanFrame::Data(frame)) if !EmbeddedFrame::is_extended(&frame) => {
                    Ok(Some(CanFrame::new(
                        frame.raw_id(),
                        EmbeddedFrame::data(&frame).to_vec(),
                    )))
                }
                // Remote, error and 29-bit frames are never OBD replies.
                Ok(_) => Ok(None),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
                Err(e) => Err(CanError::Receive(format!("{}: {e}", self.interface_name))),
            }
        }
    }
}
