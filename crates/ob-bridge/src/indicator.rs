//! Indicator light driven by the `LED_ON` / `LED_OFF` host commands.

use std::io;
use std::path::PathBuf;

/// An on/off output.
pub trait Indicator {
    fn set(&mut self, on: bool) -> io::Result<()>;
    fn is_on(&self) -> bool;
}

impl<I: Indicator + ?Sized> Indicator for Box<I> {
    fn set(&mut self, on: bool) -> io::Result<()> {
        (**self).set(on)
    }

    fn is_on(&self) -> bool {
        (**self).is_on()
    }
}

/// Linux LED class device, e.g. `/sys/class/leds/led0/brightness`.
#[derive(Debug)]
pub struct SysfsLed {
    path: PathBuf,
    on: bool,
}

impl SysfsLed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            on: false,
        }
    }
}

impl Indicator for SysfsLed {
    fn set(&mut self, on: bool) -> io::Result<()> {
        std::fs::write(&self.path, if on { "1" } else { "0" })?;
        self.on = on;
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

/// No hardware attached; keeps the state and logs transitions.
#[derive(Debug, Default)]
pub struct LogIndicator {
    on: bool,
}

impl Indicator for LogIndicator {
    fn set(&mut self, on: bool) -> io::Result<()> {
        tracing::info!(on, "indicator");
        self.on = on;
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.on
    }
}
