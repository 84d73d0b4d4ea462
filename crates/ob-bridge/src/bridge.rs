//! Control loop driving the dispatcher.
//!
//! Interleaves two event sources on a single task:
//! - host lines read from `reader`, handled as soon as they arrive
//! - a fixed-cadence ticker that drains the bus and expires stale queries
//!
//! The bus is also serviced after every host line, so a burst of host input
//! can't hold back replies or timeouts.
//!
//! Every reply goes back to the host as one `\n`-terminated line.

use std::io;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::MissedTickBehavior;

use ob_canbus::BusGateway;

use crate::dispatcher::Dispatcher;
use crate::indicator::Indicator;

/// Run until the host side reaches end of input.
///
/// A pending query at EOF is abandoned. Write errors on the host channel
/// end the loop.
pub async fn run<R, W, G, I>(
    dispatcher: &mut Dispatcher<G, I>,
    reader: R,
    writer: &mut W,
    poll_interval: Duration,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    G: BusGateway,
    I: Indicator,
{
    let mut lines = reader.lines();
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::info!("host input closed");
                    return Ok(());
                };
                tracing::debug!(line = %line.trim(), "host line");
                if let Some(reply) = dispatcher.handle_line(&line, now()) {
                    write_line(writer, &reply).await?;
                }
                service_bus(dispatcher, writer).await?;
            }
            _ = ticker.tick() => {
                service_bus(dispatcher, writer).await?;
            }
        }
    }
}

/// Drain the bus, then expire a stale query.
async fn service_bus<W, G, I>(
    dispatcher: &mut Dispatcher<G, I>,
    writer: &mut W,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
    G: BusGateway,
    I: Indicator,
{
    let now = now();
    if let Some(reply) = dispatcher.poll_bus(now) {
        write_line(writer, &reply).await?;
    }
    if let Some(reply) = dispatcher.tick(now) {
        write_line(writer, &reply).await?;
    }
    Ok(())
}

/// Write one line to the host and flush it.
pub async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

// Read through tokio's clock so paused-time tests control timeouts.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}
