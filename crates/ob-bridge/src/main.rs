//! OBD bridge: relays host text commands to a vehicle's OBD-II port over CAN.
//!
//! Host traffic runs over stdin/stdout, one command or reply per line.
//! Logs go to stderr so they never mix with the reply stream.

use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use ob_bridge::bridge;
use ob_bridge::config::{BridgeConfig, DEFAULT_CONFIG_PATH, LogFormat};
use ob_bridge::dispatcher::Dispatcher;
use ob_bridge::indicator::{Indicator, LogIndicator, SysfsLed};
use ob_canbus::{BusGateway, SimulatedEcu};
use ob_protocol::messages;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // ── Load config ─────────────────────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = BridgeConfig::load(&config_path)?;

    init_tracing(config.log_format);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path,
        "ob-bridge starting"
    );

    let mut stdout = tokio::io::stdout();
    bridge::write_line(&mut stdout, messages::READY).await?;

    // ── CAN bus ─────────────────────────────────────────────────
    let gateway = match open_gateway(&config) {
        Ok(gateway) => {
            bridge::write_line(&mut stdout, messages::BUS_READY).await?;
            gateway
        }
        Err(e) => {
            tracing::error!(error = %e, "CAN bus bring-up failed");
            bridge::write_line(&mut stdout, messages::BUS_FAILED).await?;
            return Err(e);
        }
    };

    // ── Indicator ───────────────────────────────────────────────
    let indicator: Box<dyn Indicator> = match &config.led_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "using sysfs LED");
            Box::new(SysfsLed::new(path))
        }
        None => Box::new(LogIndicator::default()),
    };

    let mut dispatcher = Dispatcher::new(gateway, indicator, config.timeout());
    let stdin = BufReader::new(tokio::io::stdin());

    tracing::info!(
        timeout_ms = config.timeout_ms,
        poll_interval_ms = config.poll_interval_ms,
        "ob-bridge ready"
    );

    tokio::select! {
        result = bridge::run(&mut dispatcher, stdin, &mut stdout, config.poll_interval()) => {
            result?;
        }
        // Graceful shutdown on SIGINT
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    tracing::info!("ob-bridge stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn open_gateway(config: &BridgeConfig) -> anyhow::Result<Box<dyn BusGateway>> {
    let Some(name) = config.can_interface.as_deref() else {
        tracing::warn!("no can_interface configured, answering from the simulated ECU");
        return Ok(Box::new(SimulatedEcu::new()));
    };

    #[cfg(target_os = "linux")]
    {
        Ok(Box::new(ob_canbus::SocketCanGateway::open(name)?))
    }

    #[cfg(not(target_os = "linux"))]
    {
        anyhow::bail!("SocketCAN interface {name} requested, but SocketCAN is Linux-only")
    }
}
