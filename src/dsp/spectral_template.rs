//! Mixture-model spectral template
//!
//! Turns a Gaussian mixture over the occupied band into a prototype
//! pulse-shaping filter. The mixture is evaluated on the DFT grid as a
//! magnitude response, made even in frequency so the taps come out real,
//! delayed by `(N − 1)/2` samples and inverse-transformed into a symmetric,
//! unit-energy impulse response. The delay is a half sample off the DFT grid
//! when `N` is even, so it is applied as a phase ramp rather than a rotation.

use std::f64::consts::PI;

use rustfft::num_complex::Complex32;

use crate::domain::MixtureParams;
use crate::dsp::fft::plan_inverse;

/// Prototype taps derived from a mixture spectrum
#[derive(Debug, Clone)]
pub struct SpectralTemplate {
    taps: Vec<f32>,
}

impl SpectralTemplate {
    /// Build `tap_count` taps for a spectrum occupying `bandwidth`
    /// (two-sided, cycles/sample).
    pub fn new(mixture: &MixtureParams, bandwidth: f32, tap_count: usize) -> Self {
        let n = tap_count;
        if n == 0 {
            return Self { taps: Vec::new() };
        }

        let half_band = (bandwidth as f64 / 2.0).max(f64::EPSILON);
        let weight_sum: f64 = mixture.weights.iter().map(|&w| w as f64).sum();
        let delay = (n as f64 - 1.0) / 2.0;

        let mut spectrum: Vec<Complex32> = (0..n)
            .map(|k| {
                let f = if 2 * k <= n {
                    k as f64 / n as f64
                } else {
                    k as f64 / n as f64 - 1.0
                };
                let x = f.abs() / half_band;
                let magnitude = if x <= 1.0 {
                    mixture_density(mixture, x, weight_sum)
                } else {
                    0.0
                };
                let phase = -2.0 * PI * f * delay;
                Complex32::from_polar(magnitude as f32, phase as f32)
            })
            .collect();

        plan_inverse(n).process(&mut spectrum);

        // Mirror bins cancel in the imaginary part; the Nyquist bin of an
        // even-length grid is its own mirror and keeps only its cosine.
        let mut taps: Vec<f32> = spectrum.iter().map(|c| c.re / n as f32).collect();

        let energy: f32 = taps.iter().map(|t| t * t).sum();
        if energy > 0.0 {
            let scale = 1.0 / energy.sqrt();
            for t in &mut taps {
                *t *= scale;
            }
        }

        Self { taps }
    }

    pub fn taps(&self) -> &[f32] {
        &self.taps
    }
}

fn mixture_density(mixture: &MixtureParams, x: f64, weight_sum: f64) -> f64 {
    mixture
        .means
        .iter()
        .zip(&mixture.variances)
        .zip(&mixture.weights)
        .map(|((&mu, &var), &w)| {
            let d = x - mu as f64;
            (w as f64 / weight_sum) * (-d * d / (2.0 * var as f64)).exp()
        })
        .sum()
}
