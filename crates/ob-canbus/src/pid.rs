//! Mode 01 PID value decoding.
//!
//! Maps the raw A/B bytes of a reply to a physical value using the SAE J1979
//! formulas for the common current-data PIDs.

use crate::error::{CanError, CanResult};

/// Decoded PID value with metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PidValue {
    pub pid: u8,
    pub name: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

struct PidSpec {
    pid: u8,
    name: &'static str,
    unit: &'static str,
    /// Data bytes the formula needs (1 = A, 2 = A and B).
    bytes: usize,
    formula: fn(f64, f64) -> f64,
}

fn percent(a: f64, _: f64) -> f64 {
    a * 100.0 / 255.0
}

fn temperature(a: f64, _: f64) -> f64 {
    a - 40.0
}

fn fuel_trim(a: f64, _: f64) -> f64 {
    (a - 128.0) * 100.0 / 128.0
}

fn raw(a: f64, _: f64) -> f64 {
    a
}

fn word(a: f64, b: f64) -> f64 {
    a * 256.0 + b
}

#[rustfmt::skip]
const PIDS: &[PidSpec] = &[
    PidSpec { pid: 0x04, name: "Engine Load", unit: "%", bytes: 1, formula: percent },
    PidSpec { pid: 0x05, name: "Coolant Temperature", unit: "°C", bytes: 1, formula: temperature },
    PidSpec { pid: 0x06, name: "Short Term Fuel Trim B1", unit: "%", bytes: 1, formula: fuel_trim },
    PidSpec { pid: 0x07, name: "Long Term Fuel Trim B1", unit: "%", bytes: 1, formula: fuel_trim },
    PidSpec { pid: 0x0A, name: "Fuel Pressure", unit: "kPa", bytes: 1, formula: |a, _| a * 3.0 },
    PidSpec { pid: 0x0B, name: "Intake MAP", unit: "kPa", bytes: 1, formula: raw },
    PidSpec { pid: 0x0C, name: "Engine RPM", unit: "rpm", bytes: 2, formula: |a, b| word(a, b) / 4.0 },
    PidSpec { pid: 0x0D, name: "Vehicle Speed", unit: "km/h", bytes: 1, formula: raw },
    PidSpec { pid: 0x0E, name: "Timing Advance", unit: "°", bytes: 1, formula: |a, _| a / 2.0 - 64.0 },
    PidSpec { pid: 0x0F, name: "Intake Air Temp", unit: "°C", bytes: 1, formula: temperature },
    PidSpec { pid: 0x10, name: "MAF Rate", unit: "g/s", bytes: 2, formula: |a, b| word(a, b) / 100.0 },
    PidSpec { pid: 0x11, name: "Throttle Position", unit: "%", bytes: 1, formula: percent },
    PidSpec { pid: 0x1F, name: "Runtime Since Start", unit: "s", bytes: 2, formula: word },
    PidSpec { pid: 0x2F, name: "Fuel Level", unit: "%", bytes: 1, formula: percent },
    PidSpec { pid: 0x33, name: "Barometric Pressure", unit: "kPa", bytes: 1, formula: raw },
    PidSpec { pid: 0x42, name: "Control Module Voltage", unit: "V", bytes: 2, formula: |a, b| word(a, b) / 1000.0 },
    PidSpec { pid: 0x46, name: "Ambient Air Temp", unit: "°C", bytes: 1, formula: temperature },
    PidSpec { pid: 0x5C, name: "Engine Oil Temp", unit: "°C", bytes: 1, formula: temperature },
];

/// Decode a PID value from the reply's data bytes (A, then B).
pub fn decode_pid(pid: u8, data: &[u8]) -> CanResult<PidValue> {
    let spec = PIDS
        .iter()
        .find(|spec| spec.pid == pid)
        .ok_or(CanError::UnknownPid { pid })?;

    if data.len() < spec.bytes {
        return Err(CanError::Decode(format!(
            "PID 0x{pid:02X}: need {} bytes, got {}",
            spec.bytes,
            data.len()
        )));
    }

    let a = f64::from(data[0]);
    let b = data.get(1).copied().map(f64::from).unwrap_or(0.0);
    Ok(PidValue {
        pid,
        name: spec.name,
        value: (spec.formula)(a, b),
        unit: spec.unit,
    })
}
