//! FFT planning and spectral measurement
//!
//! Plans are built once per (length, direction) and shared process-wide.
//! Planning is serialized behind a single lock; executing a plan is not.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use rustfft::{num_complex::Complex32, Fft, FftPlanner};

lazy_static::lazy_static! {
    static ref PLANS: Mutex<HashMap<(usize, bool), Arc<dyn Fft<f32>>>> =
        Mutex::new(HashMap::new());
}

fn plan(len: usize, inverse: bool) -> Arc<dyn Fft<f32>> {
    let mut plans = PLANS.lock().unwrap_or_else(PoisonError::into_inner);
    plans
        .entry((len, inverse))
        .or_insert_with(|| {
            let mut planner = FftPlanner::new();
            if inverse {
                planner.plan_fft_inverse(len)
            } else {
                planner.plan_fft_forward(len)
            }
        })
        .clone()
}

/// Unnormalized forward transform of length `len`
pub fn plan_forward(len: usize) -> Arc<dyn Fft<f32>> {
    plan(len, false)
}

/// Unnormalized inverse transform of length `len` (caller scales by 1/len)
pub fn plan_inverse(len: usize) -> Arc<dyn Fft<f32>> {
    plan(len, true)
}

/// Energy on each side of DC
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SidebandEnergy {
    pub lower: f32,
    pub upper: f32,
}

impl SidebandEnergy {
    /// Sum the two halves of a two-sided power spectrum, skipping DC and Nyquist
    pub fn from_spectrum(power: &[f32]) -> Self {
        let n = power.len();
        let mut lower = 0.0;
        let mut upper = 0.0;
        for k in 1..n {
            if 2 * k >= n {
                break;
            }
            upper += power[k];
            lower += power[n - k];
        }
        Self { lower, upper }
    }

    /// Upper-to-lower energy ratio in dB (positive when the upper side dominates)
    pub fn upper_to_lower_db(&self) -> f32 {
        10.0 * (self.upper.max(1e-30) / self.lower.max(1e-30)).log10()
    }
}

/// Two-sided power spectrum of complex samples
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    window: Vec<f32>,
}

impl SpectrumAnalyzer {
    /// Create an analyzer with the given size and a Hann window
    pub fn new(fft_size: usize) -> Self {
        let fft = plan_forward(fft_size);

        let window: Vec<f32> = (0..fft_size)
            .map(|i| {
                let x = std::f32::consts::PI * i as f32 / fft_size as f32;
                0.5 * (1.0 - (2.0 * x).cos())
            })
            .collect();

        Self {
            fft,
            fft_size,
            window,
        }
    }

    /// Linear power per bin, bin 0 = DC, bin `size/2` = Nyquist.
    /// Input shorter than `fft_size` is zero-padded.
    pub fn compute(&self, samples: &[Complex32]) -> Vec<f32> {
        let mut buffer: Vec<Complex32> = samples
            .iter()
            .take(self.fft_size)
            .zip(self.window.iter())
            .map(|(&s, &w)| s * w)
            .collect();
        buffer.resize(self.fft_size, Complex32::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        buffer.iter().map(|c| c.norm_sqr()).collect()
    }

    /// Sideband energy of `samples`
    pub fn sidebands(&self, samples: &[Complex32]) -> SidebandEnergy {
        SidebandEnergy::from_spectrum(&self.compute(samples))
    }

    /// Get the FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_fft_pure_tone_lands_in_expected_bin() {
        let analyzer = SpectrumAnalyzer::new(1024);
        let freq = 0.125;
        let samples: Vec<Complex32> = (0..1024)
            .map(|i| Complex32::from_polar(1.0, 2.0 * PI * freq * i as f32))
            .collect();

        let spectrum = analyzer.compute(&samples);
        let peak_bin = spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(i, _)| i)
            .unwrap();

        assert_eq!(peak_bin, 128, "Peak at bin {} but expected 128", peak_bin);
    }

    #[test]
    fn negative_tone_is_lower_sideband() {
        let analyzer = SpectrumAnalyzer::new(512);
        let samples: Vec<Complex32> = (0..512)
            .map(|i| Complex32::from_polar(1.0, -2.0 * PI * 0.1 * i as f32))
            .collect();
        let energy = analyzer.sidebands(&samples);
        assert!(energy.lower > energy.upper);
        assert!(energy.upper_to_lower_db() < -40.0);
    }

    #[test]
    fn plans_are_shared_between_callers() {
        let a = plan_forward(96);
        let b = plan_forward(96);
        assert!(Arc::ptr_eq(&a, &b), "same length should reuse the cached plan");
        assert!(!Arc::ptr_eq(&a, &plan_inverse(96)));
    }

    #[test]
    fn compute_repeated_calls_give_identical_results() {
        let analyzer = SpectrumAnalyzer::new(256);
        let samples: Vec<Complex32> = (0..256)
            .map(|i| Complex32::new((0.3 * i as f32).sin(), 0.0))
            .collect();
        assert_eq!(analyzer.compute(&samples), analyzer.compute(&samples));
    }
}
