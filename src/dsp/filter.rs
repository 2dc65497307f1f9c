//! FIR filter kernel and low-pass design

use std::f32::consts::PI;
use std::ops::{Add, Mul};

/// Tap count of the default interpolation low-pass
pub const DEFAULT_INTERP_TAPS: usize = 61;

/// Stateless FIR kernel with real coefficients.
///
/// The kernel holds no delay line: callers hand it a window of exactly
/// `len()` consecutive samples and own the history themselves. That keeps
/// block-to-block state in one place (the stage that carries it).
#[derive(Debug, Clone)]
pub struct FirKernel {
    taps: Vec<f32>,
}

impl FirKernel {
    /// Create a kernel from the given coefficients
    pub fn new(taps: Vec<f32>) -> Self {
        Self { taps }
    }

    /// Windowed-sinc low-pass with a Blackman-Harris window and unity DC gain.
    ///
    /// `cutoff` is normalized to the sample rate (0.5 = Nyquist).
    pub fn low_pass(cutoff: f32, num_taps: usize) -> Self {
        let window = blackman_harris(num_taps);
        let middle = (num_taps as f32 - 1.0) / 2.0;

        let mut taps: Vec<f32> = (0..num_taps)
            .map(|i| {
                let n = i as f32 - middle;
                let sinc = if n == 0.0 {
                    2.0 * cutoff
                } else {
                    (2.0 * PI * cutoff * n).sin() / (PI * n)
                };
                sinc * window[i]
            })
            .collect();

        let sum: f32 = taps.iter().sum();
        if sum.abs() > 1e-12 {
            for t in &mut taps {
                *t /= sum;
            }
        }

        Self::new(taps)
    }

    /// Number of taps (and required window length)
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    pub fn taps(&self) -> &[f32] {
        &self.taps
    }

    /// Output for the sample at the end of `window`.
    ///
    /// `window[len-1]` is the newest sample, so this is
    /// `Σ taps[k] · window[len-1-k]`.
    pub fn filter<T>(&self, window: &[T]) -> T
    where
        T: Copy + Default + Add<Output = T> + Mul<f32, Output = T>,
    {
        debug_assert_eq!(window.len(), self.taps.len());
        self.taps
            .iter()
            .rev()
            .zip(window)
            .fold(T::default(), |acc, (&tap, &x)| acc + x * tap)
    }
}

/// Four-term Blackman-Harris window
pub fn blackman_harris(n: usize) -> Vec<f32> {
    if n < 2 {
        return vec![1.0; n];
    }
    let denom = (n - 1) as f32;
    (0..n)
        .map(|i| {
            let x = 2.0 * PI * i as f32 / denom;
            0.35875 - 0.48829 * x.cos() + 0.14128 * (2.0 * x).cos() - 0.01168 * (3.0 * x).cos()
        })
        .collect()
}

/// Interpolation taps used when none are supplied.
///
/// The cutoff sits at Nyquist, so this is an all-pass with a fixed group
/// delay of 30 samples.
pub fn default_interpolation_taps() -> Vec<f32> {
    FirKernel::low_pass(0.5, DEFAULT_INTERP_TAPS).taps
}
