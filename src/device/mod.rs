//! Device dispatch: one fixed chart layout per instrument.
//!
//! ```text
//!   Table + Params
//!        │  params["device"]
//!        ▼
//!   ┌──────────────┐   oscilloscope        → 1 area, 2–3 lines
//!   │  dispatcher  │── network_analyzer    → 2 areas, log X
//!   └──────────────┘   impedance_analyzer  → 2 areas, linear / log X
//!        │             curve_trace         → 1 area, scatter
//!        ▼
//!      Chart
//! ```

pub mod curve_trace;
pub mod impedance_analyzer;
pub mod network_analyzer;
pub mod oscilloscope;

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::chart::Chart;
use crate::data::Table;
use crate::error::{PlotError, Result};
use crate::params::Params;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    Oscilloscope,
    NetworkAnalyzer,
    ImpedanceAnalyzer,
    CurveTrace,
}

impl Device {
    pub const ALL: [Device; 4] = [
        Device::Oscilloscope,
        Device::NetworkAnalyzer,
        Device::ImpedanceAnalyzer,
        Device::CurveTrace,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Device::Oscilloscope => "oscilloscope",
            Device::NetworkAnalyzer => "network_analyzer",
            Device::ImpedanceAnalyzer => "impedance_analyzer",
            Device::CurveTrace => "curve_trace",
        }
    }

    /// Human readable name, used as a fallback window title.
    pub fn display_name(self) -> &'static str {
        match self {
            Device::Oscilloscope => "Oscilloscope",
            Device::NetworkAnalyzer => "Network analyzer",
            Device::ImpedanceAnalyzer => "Impedance analyzer",
            Device::CurveTrace => "Curve tracer",
        }
    }

    /// Read the `device` key of a configuration bag.
    pub fn from_params(params: &Params) -> Result<Self> {
        match params.str("device") {
            Ok(Some(name)) => name.parse(),
            Ok(None) => Err(PlotError::UnsupportedDevice(String::new())),
            Err(_) => Err(PlotError::UnsupportedDevice(
                params.get("device").map(|v| v.to_string()).unwrap_or_default(),
            )),
        }
    }

    /// Build this device's chart from a loaded table.
    pub fn render(self, table: &Table, params: &Params) -> Result<Chart> {
        log::debug!("Rendering {} chart from {table}", self.name());
        match self {
            Device::Oscilloscope => oscilloscope::render(table, params),
            Device::NetworkAnalyzer => network_analyzer::render(table, params),
            Device::ImpedanceAnalyzer => impedance_analyzer::render(table, params),
            Device::CurveTrace => curve_trace::render(table, params),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Device {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        Device::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| PlotError::UnsupportedDevice(s.to_string()))
    }
}

/// Pick the renderer named by `params["device"]` and run it.
pub fn dispatch(table: &Table, params: &Params) -> Result<Chart> {
    Device::from_params(params)?.render(table, params)
}

/// Check the table width against what a device expects.
fn require_columns(table: &Table, device: Device, expected: RangeInclusive<usize>) -> anyhow::Result<()> {
    let found = table.width();
    if expected.contains(&found) {
        return Ok(());
    }
    let wanted = if expected.start() == expected.end() {
        format!("{}", expected.start())
    } else {
        format!("{} to {}", expected.start(), expected.end())
    };
    bail!(
        "{} data needs {wanted} columns but the file has {found} ({})",
        device.name(),
        table.headers().join(", ")
    )
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn names_round_trip_through_from_str() {
        for device in Device::ALL {
            assert_eq!(device.name().parse::<Device>().unwrap(), device);
        }
    }

    #[test]
    fn serde_uses_the_same_names() {
        let device: Device = serde_json::from_value(json!("impedance_analyzer")).unwrap();
        assert_eq!(device, Device::ImpedanceAnalyzer);
    }

    #[test]
    fn oscilloscope_routes_to_oscilloscope_renderer() {
        let table = fixtures::table(&["t", "CH1", "CH2"], 4);
        let params = Params::new().with("device", "oscilloscope");
        let chart = dispatch(&table, &params).unwrap();
        assert_eq!(chart.areas.len(), 1);
        assert_eq!(chart.areas[0].y.label, "Voltage (V)");
    }

    #[test]
    fn unknown_device_is_rejected_without_a_chart() {
        let table = fixtures::table(&["t", "CH1", "CH2"], 4);
        let params = Params::new().with("device", "spectrometer");
        let err = dispatch(&table, &params).unwrap_err();
        assert!(matches!(&err, PlotError::UnsupportedDevice(name) if name == "spectrometer"));
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn missing_device_is_unsupported() {
        let table = fixtures::table(&["v", "i"], 2);
        let err = dispatch(&table, &Params::new()).unwrap_err();
        assert!(matches!(err, PlotError::UnsupportedDevice(_)));

        let params = Params::new().with("device", json!([1]));
        assert!(matches!(
            dispatch(&table, &params),
            Err(PlotError::UnsupportedDevice(_))
        ));
    }

    #[test]
    fn device_names_are_case_sensitive() {
        assert!("Oscilloscope".parse::<Device>().is_err());
    }

    #[test]
    fn wrong_width_is_an_unexpected_error() {
        let table = fixtures::table(&["f", "a"], 3);
        let params = Params::new().with("device", "network_analyzer");
        let err = dispatch(&table, &params).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(err.to_string().contains("needs 4 columns but the file has 2"));
    }
}
