//! Tap preparation: prototype taps to windowed shaping taps

use std::f32::consts::PI;

/// Two-term cosine window with both endpoints forced to zero.
///
/// `w[i] = 0.42 − 0.5·cos(2πi/(N−1)) + 0.08·cos(4πi/(N−1))` for interior
/// points. Zeroing the endpoints shortens the effective pulse by one tap at
/// each end, which is what the carried history length assumes.
pub fn analytic_window(n: usize) -> Vec<f32> {
    let mut window = vec![0.0f32; n];
    if n < 3 {
        return window;
    }
    let denom = (n - 1) as f32;
    for (i, w) in window.iter_mut().enumerate().take(n - 1).skip(1) {
        let x = i as f32 / denom;
        *w = 0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos();
    }
    window
}

/// Windowed pulse-shape taps plus the history length they imply
#[derive(Debug, Clone)]
pub struct PreparedTaps {
    taps: Vec<f32>,
    history_len: usize,
}

impl PreparedTaps {
    /// Apply [`analytic_window`] to `prototype`
    pub fn from_prototype(prototype: &[f32]) -> Self {
        let window = analytic_window(prototype.len());
        let taps = prototype
            .iter()
            .zip(&window)
            .map(|(&t, &w)| t * w)
            .collect();

        Self {
            taps,
            history_len: prototype.len().saturating_sub(1),
        }
    }

    pub fn taps(&self) -> &[f32] {
        &self.taps
    }

    pub fn into_taps(self) -> Vec<f32> {
        self.taps
    }

    /// Samples of lookback the shaping filter must carry between calls
    pub fn history_len(&self) -> usize {
        self.history_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_endpoints_are_zero() {
        let w = analytic_window(31);
        assert_eq!(w.len(), 31);
        assert_eq!(w[0], 0.0);
        assert_eq!(w[30], 0.0);
    }

    #[test]
    fn window_is_symmetric_with_unit_peak() {
        let w = analytic_window(31);
        for i in 0..31 {
            assert!((w[i] - w[30 - i]).abs() < 1e-6, "asymmetric at {}", i);
        }
        assert!((w[15] - 1.0).abs() < 1e-6, "peak {}", w[15]);
    }

    #[test]
    fn window_matches_closed_form_interior_point() {
        let w = analytic_window(11);
        let x = 3.0f32 / 10.0;
        let expected = 0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos();
        assert!((w[3] - expected).abs() < 1e-7);
    }

    #[test]
    fn prepared_taps_keep_length_and_set_history() {
        let prototype = vec![1.0f32; 31];
        let prepared = PreparedTaps::from_prototype(&prototype);
        assert_eq!(prepared.taps().len(), 31);
        assert_eq!(prepared.history_len(), 30);
        assert_eq!(prepared.taps()[0], 0.0);
        assert_eq!(prepared.taps()[30], 0.0);
        assert_eq!(prepared.taps(), analytic_window(31).as_slice());
    }

    #[test]
    fn two_tap_prototype_windows_to_silence() {
        let prepared = PreparedTaps::from_prototype(&[0.7, 0.7]);
        assert_eq!(prepared.taps(), &[0.0, 0.0]);
        assert_eq!(prepared.history_len(), 1);
    }
}
