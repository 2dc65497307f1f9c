//! Automatic Gain Control

use num_complex::Complex32;

/// Largest gain the loop may reach (keeps silence from blowing up)
const MAX_GAIN: f32 = 65536.0;

/// Single-rate complex AGC.
///
/// Each sample is scaled by the current gain, then the gain moves toward
/// making the output magnitude equal `reference`:
/// `gain += rate * (reference - |out|)`.
#[derive(Debug, Clone)]
pub struct Agc {
    rate: f32,
    reference: f32,
    gain: f32,
    max_gain: f32,
}

impl Agc {
    pub fn new(rate: f32) -> Self {
        Self {
            rate,
            reference: 1.0,
            gain: 1.0,
            max_gain: MAX_GAIN,
        }
    }

    /// Scale one sample and update the gain
    pub fn scale(&mut self, sample: Complex32) -> Complex32 {
        let output = sample * self.gain;
        self.gain += self.rate * (self.reference - output.norm());
        self.gain = self.gain.clamp(0.0, self.max_gain);
        output
    }

    /// Scale a block in place
    pub fn scale_block(&mut self, samples: &mut [Complex32]) {
        for s in samples.iter_mut() {
            *s = self.scale(*s);
        }
    }

    /// Get current gain value
    pub fn current_gain(&self) -> f32 {
        self.gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agc_converges_to_reference_magnitude() {
        let mut agc = Agc::new(0.01);
        let mut last = Complex32::new(0.0, 0.0);
        for _ in 0..5000 {
            last = agc.scale(Complex32::new(0.1, 0.1));
        }
        assert!(
            (last.norm() - 1.0).abs() < 0.01,
            "output magnitude should settle at 1.0, got {}",
            last.norm()
        );
    }

    #[test]
    fn agc_gain_never_negative_on_huge_input() {
        let mut agc = Agc::new(0.5);
        for _ in 0..10 {
            agc.scale(Complex32::new(1000.0, 0.0));
        }
        assert!(agc.current_gain() >= 0.0);
    }

    #[test]
    fn agc_gain_is_clamped_on_silence() {
        let mut agc = Agc::new(1000.0);
        let mut block = vec![Complex32::new(0.0, 0.0); 1000];
        agc.scale_block(&mut block);
        assert!(agc.current_gain() <= MAX_GAIN);
    }
}
