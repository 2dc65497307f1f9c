//! Analytic-signal constructor: single-sideband selection in the spectral domain
//!
//! Pipeline per block of `m` real samples:
//! 1. forward DFT
//! 2. drop DC and Nyquist, double every bin strictly between them
//! 3. keep only one side of the spectrum:
//!    - upper: `2·X[k]` stays at bin `k`
//!    - lower: `2·conj(X[k])` moves to bin `m − k`
//! 4. inverse DFT scaled by `1/m`
//!
//! The real part of the result is the input minus its DC and Nyquist
//! content; the imaginary part is its Hilbert transform, negated for the
//! lower sideband.

use std::sync::Arc;

use rustfft::num_complex::Complex32;
use rustfft::Fft;

use crate::dsp::fft::{plan_forward, plan_inverse};

/// Which half of the spectrum survives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebandSelect {
    Upper,
    Lower,
}

struct Plans {
    len: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
}

pub struct AnalyticConstructor {
    select: SidebandSelect,
    plans: Option<Plans>,
    /// Working spectra, grown to the largest block seen and reused
    spectrum: Vec<Complex32>,
    one_sided: Vec<Complex32>,
    scratch: Vec<Complex32>,
}

impl AnalyticConstructor {
    pub fn new(select: SidebandSelect) -> Self {
        Self {
            select,
            plans: None,
            spectrum: Vec::new(),
            one_sided: Vec::new(),
            scratch: Vec::new(),
        }
    }

    fn plans_for(&mut self, len: usize) -> (Arc<dyn Fft<f32>>, Arc<dyn Fft<f32>>) {
        match &self.plans {
            Some(p) if p.len == len => (p.forward.clone(), p.inverse.clone()),
            _ => {
                let forward = plan_forward(len);
                let inverse = plan_inverse(len);
                self.plans = Some(Plans {
                    len,
                    forward: forward.clone(),
                    inverse: inverse.clone(),
                });
                (forward, inverse)
            }
        }
    }

    /// Turn `input` into its one-sided complex counterpart.
    /// `output` must be the same length as `input`.
    pub fn construct(&mut self, input: &[f32], output: &mut [Complex32]) {
        let m = input.len();
        debug_assert_eq!(output.len(), m);
        if m == 0 {
            return;
        }

        let (forward, inverse) = self.plans_for(m);
        let zero = Complex32::new(0.0, 0.0);

        self.spectrum.clear();
        self.spectrum
            .extend(input.iter().map(|&x| Complex32::new(x, 0.0)));

        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        if self.scratch.len() < scratch_len {
            self.scratch.resize(scratch_len, zero);
        }
        forward.process_with_scratch(&mut self.spectrum, &mut self.scratch[..scratch_len]);

        self.one_sided.clear();
        self.one_sided.resize(m, zero);
        for k in 1..m {
            if 2 * k >= m {
                break;
            }
            let doubled = self.spectrum[k] * 2.0;
            match self.select {
                SidebandSelect::Upper => self.one_sided[k] = doubled,
                SidebandSelect::Lower => self.one_sided[m - k] = doubled.conj(),
            }
        }

        inverse.process_with_scratch(&mut self.one_sided, &mut self.scratch[..scratch_len]);

        let scale = 1.0 / m as f32;
        for (out, v) in output.iter_mut().zip(&self.one_sided) {
            *out = *v * scale;
        }
    }
}
