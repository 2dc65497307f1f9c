//! Core domain types

use num_complex::Complex32;
use serde::{Deserialize, Serialize};

/// Complex baseband sample (32-bit float I/Q)
pub type Sample = Complex32;

/// Modulation variant: which sideband(s) of the real message survive.
///
/// `Double` passes the shaped message straight through as the in-phase
/// component. The single-sideband variants run the analytic-signal
/// constructor and keep only the positive (`Upper`) or negative (`Lower`)
/// frequency half of the spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sideband {
    #[default]
    Double,
    Upper,
    Lower,
}

impl std::str::FromStr for Sideband {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "double" | "dsb" => Ok(Sideband::Double),
            "upper" | "usb" => Ok(Sideband::Upper),
            "lower" | "lsb" => Ok(Sideband::Lower),
            other => Err(format!("unknown sideband '{other}'")),
        }
    }
}
