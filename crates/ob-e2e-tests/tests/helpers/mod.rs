//! Shared test harness for E2E integration tests.
//!
//! Spawns the real control loop on a tokio task and plays the host over an
//! in-memory duplex stream, so every test exercises line parsing, the
//! query tracker, the frame codec and reply formatting together.

#![allow(dead_code)]

use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{
    AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf,
};
use tokio::task::JoinHandle;

use ob_bridge::bridge;
use ob_bridge::config::BridgeConfig;
use ob_bridge::dispatcher::Dispatcher;
use ob_bridge::indicator::LogIndicator;
use ob_canbus::BusGateway;
use ob_canbus::types::{CanFrame, OBD_RESPONSE_ID};

pub type TestDispatcher<G> = Dispatcher<Arc<G>, LogIndicator>;

/// A running bridge plus the host end of its line channel.
pub struct TestBridge<G> {
    /// Gateway shared with the bridge task, for scripting and inspection.
    pub gateway: Arc<G>,
    host_tx: WriteHalf<DuplexStream>,
    host_rx: Lines<BufReader<ReadHalf<DuplexStream>>>,
    task: JoinHandle<(io::Result<()>, TestDispatcher<G>)>,
    poll_interval: Duration,
}

impl<G> TestBridge<G>
where
    G: BusGateway + Send + Sync + 'static,
{
    /// Start with the default 1000 ms timeout and 10 ms poll cadence.
    pub fn start(gateway: G) -> Self {
        Self::start_with(gateway, &BridgeConfig::default())
    }

    pub fn start_with(gateway: G, config: &BridgeConfig) -> Self {
        let gateway = Arc::new(gateway);
        let (host, device) = tokio::io::duplex(4096);
        let (host_rx, host_tx) = tokio::io::split(host);
        let (device_rx, mut device_tx) = tokio::io::split(device);

        let mut dispatcher = Dispatcher::new(
            Arc::clone(&gateway),
            LogIndicator::default(),
            config.timeout(),
        );
        let poll_interval = config.poll_interval();

        let task = tokio::spawn(async move {
            let result = bridge::run(
                &mut dispatcher,
                BufReader::new(device_rx),
                &mut device_tx,
                poll_interval,
            )
            .await;
            (result, dispatcher)
        });

        Self {
            gateway,
            host_tx,
            host_rx: BufReader::new(host_rx).lines(),
            task,
            poll_interval,
        }
    }

    /// Write one line to the bridge.
    pub async fn send(&mut self, line: &str) {
        self.host_tx.write_all(line.as_bytes()).await.unwrap();
        self.host_tx.write_all(b"\n").await.unwrap();
        self.host_tx.flush().await.unwrap();
    }

    /// Next line from the bridge. Panics if the channel closes.
    pub async fn recv(&mut self) -> String {
        self.host_rx
            .next_line()
            .await
            .unwrap()
            .expect("bridge closed the host channel")
    }

    /// Next line from the bridge if one arrives within `window`.
    pub async fn recv_within(&mut self, window: Duration) -> Option<String> {
        tokio::time::timeout(window, self.host_rx.next_line())
            .await
            .ok()
            .map(|line| line.unwrap().expect("bridge closed the host channel"))
    }

    /// Let the bridge run a couple of poll cycles.
    pub async fn settle(&self) {
        tokio::time::sleep(self.poll_interval * 2).await;
    }

    /// Close host input and wait for the loop to exit. Returns the
    /// dispatcher for final-state assertions.
    pub async fn finish(mut self) -> TestDispatcher<G> {
        self.host_tx.shutdown().await.unwrap();
        let (result, dispatcher) = self.task.await.unwrap();
        result.unwrap();
        dispatcher
    }
}

/// A mode 01 reply frame from the engine ECU.
pub fn reply_frame(pid: u8, data: &[u8]) -> CanFrame {
    let mut bytes = vec![2 + data.len() as u8, 0x41, pid];
    bytes.extend_from_slice(data);
    CanFrame::new(OBD_RESPONSE_ID, bytes)
}
