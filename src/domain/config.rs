//! Generator configuration
//!
//! A `GeneratorConfig` holds everything needed to build a `SignalGenerator`:
//! the spectral template parameters, the interpolation stage, the modulation
//! variant and the symbol-source mode. Profiles are plain JSON; every field
//! has a default so partial profiles load.

use serde::{Deserialize, Serialize};

use super::error::{ExciterError, ExciterResult};
use super::types::Sideband;

/// Gaussian mixture describing the message spectrum inside the occupied band.
///
/// Means and variances are in units of the half-bandwidth (0.0 = DC,
/// 1.0 = band edge). The component count is the length of the arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixtureParams {
    pub means: Vec<f32>,
    pub variances: Vec<f32>,
    pub weights: Vec<f32>,
}

impl MixtureParams {
    pub fn single(mean: f32, variance: f32) -> Self {
        Self {
            means: vec![mean],
            variances: vec![variance],
            weights: vec![1.0],
        }
    }

    fn validate(&self) -> ExciterResult<()> {
        let n = self.means.len();
        if n == 0 {
            return Err(ExciterError::Config(
                "mixture needs at least one component".into(),
            ));
        }
        if self.variances.len() != n || self.weights.len() != n {
            return Err(ExciterError::Config(format!(
                "mixture arrays differ in length: {} means, {} variances, {} weights",
                n,
                self.variances.len(),
                self.weights.len()
            )));
        }
        if !self.means.iter().all(|m| m.is_finite()) {
            return Err(ExciterError::Config("mixture means must be finite".into()));
        }
        if !self.variances.iter().all(|v| v.is_finite() && *v > 0.0) {
            return Err(ExciterError::Config(
                "mixture variances must be positive".into(),
            ));
        }
        if !self.weights.iter().all(|w| w.is_finite() && *w >= 0.0) {
            return Err(ExciterError::Config(
                "mixture weights must be non-negative".into(),
            ));
        }
        if self.weights.iter().sum::<f32>() <= 0.0 {
            return Err(ExciterError::Config(
                "mixture weights must not all be zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MixtureParams {
    fn default() -> Self {
        Self::single(0.0, 1.0)
    }
}

/// Longest AGC burn-in accepted, in output samples
pub const MAX_BURN_IN: usize = 1 << 24;

/// Construction parameters for a signal generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Message amplitude scale
    pub modulation_index: f32,
    /// Spectral template mixture
    pub mixture: MixtureParams,
    /// Highest occupied frequency in cycles/sample (template bandwidth is twice this)
    pub max_freq: f32,
    /// Prototype pulse-shape tap count
    pub tap_count: usize,
    /// RNG seed; negative draws one from system entropy
    pub seed: i64,
    /// Run the AGC over the output
    pub normalize: bool,
    /// Interpolation taps; the default low-pass is used when absent
    pub interp_taps: Option<Vec<f32>>,
    /// Interpolation factor
    pub interp: usize,
    /// Modulation variant
    pub sideband: Sideband,
    /// Background producer thread (true) or inline symbol generation (false)
    pub threaded: bool,
    /// Symbol buffer capacity (threaded mode)
    pub buffer_size: usize,
    /// Free space the producer waits for before refilling (threaded mode)
    pub notify_size: usize,
    /// Samples generated and discarded at construction when normalizing
    pub burn_in: usize,
    /// AGC adaptation rate
    pub agc_rate: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            modulation_index: 0.5,
            mixture: MixtureParams::default(),
            max_freq: 0.2,
            tap_count: 31,
            seed: -1,
            normalize: false,
            interp_taps: None,
            interp: 1,
            sideband: Sideband::Double,
            threaded: true,
            buffer_size: 8192,
            notify_size: 512,
            burn_in: 20,
            agc_rate: 5e-4,
        }
    }
}

impl GeneratorConfig {
    /// Check every construction-time constraint. Called before any buffer
    /// or thread is created.
    pub fn validate(&self) -> ExciterResult<()> {
        if self.tap_count < 2 {
            return Err(ExciterError::Config(format!(
                "tap count must be at least 2, got {}",
                self.tap_count
            )));
        }
        self.mixture.validate()?;
        if !(self.max_freq > 0.0 && self.max_freq <= 0.5) {
            return Err(ExciterError::Config(format!(
                "max frequency must be in (0, 0.5], got {}",
                self.max_freq
            )));
        }
        if !self.modulation_index.is_finite() {
            return Err(ExciterError::Config(
                "modulation index must be finite".into(),
            ));
        }
        if self.interp == 0 {
            return Err(ExciterError::Config(
                "interpolation factor must be at least 1".into(),
            ));
        }
        if let Some(taps) = &self.interp_taps {
            if taps.is_empty() {
                return Err(ExciterError::Config(
                    "interpolation taps were supplied but are empty".into(),
                ));
            }
            if !taps.iter().all(|t| t.is_finite()) {
                return Err(ExciterError::Config(
                    "interpolation taps must be finite".into(),
                ));
            }
            if taps.iter().all(|t| *t == 0.0) {
                return Err(ExciterError::Config(
                    "interpolation taps have zero energy".into(),
                ));
            }
        }
        if self.threaded {
            if self.buffer_size == 0 {
                return Err(ExciterError::Config(
                    "symbol buffer size must be positive".into(),
                ));
            }
            if self.notify_size == 0 || self.notify_size > self.buffer_size {
                return Err(ExciterError::Config(format!(
                    "notify size must be in 1..={}, got {}",
                    self.buffer_size, self.notify_size
                )));
            }
        }
        if self.burn_in > MAX_BURN_IN {
            return Err(ExciterError::Config(format!(
                "burn-in must be at most {} samples, got {}",
                MAX_BURN_IN, self.burn_in
            )));
        }
        if !(self.agc_rate.is_finite() && self.agc_rate >= 0.0) {
            return Err(ExciterError::Config(
                "AGC rate must be finite and non-negative".into(),
            ));
        }
        Ok(())
    }
}
