//! Polyphase interpolation bank
//!
//! Upsample-by-`I` plus a long low-pass, done as `I` short sub-filters.
//! Branch `j` holds taps `j, j+I, j+2I, …`. Every output runs the current
//! branch over the window ending at the current input sample, then moves
//! to the next branch; the input advances one sample each time the branch
//! offset wraps to zero. No zero-stuffed signal is ever built.
//!
//! Between calls the bank carries:
//! - `history`: exactly `taps_per_branch − 1` samples before the current input
//! - `pending`: the current input itself, while its branches are only
//!   partly used (`branch_offset != 0`)
//! - `branch_offset`

use num_complex::Complex32;

use crate::domain::{ExciterError, ExciterResult};
use crate::dsp::filter::FirKernel;

/// Scale `taps` so their energy equals `interp`
pub fn normalize_power(taps: &[f32], interp: usize) -> Vec<f32> {
    let power: f64 = taps.iter().map(|&t| t as f64 * t as f64).sum();
    if power <= 0.0 {
        return taps.to_vec();
    }
    let normalizer = (interp as f64 / power).sqrt();
    taps.iter().map(|&t| (t as f64 * normalizer) as f32).collect()
}

pub struct PolyphaseBank {
    interp: usize,
    branches: Vec<FirKernel>,
    history: Vec<Complex32>,
    pending: Option<Complex32>,
    branch_offset: usize,
    /// Reused `history ++ pending ++ input` buffer
    work: Vec<Complex32>,
}

impl PolyphaseBank {
    /// Split `taps` across `interp` branches, zero-padding the tail so every
    /// branch has the same length
    pub fn new(taps: &[f32], interp: usize) -> Self {
        let interp = interp.max(1);
        let taps_per_branch = taps.len().div_ceil(interp).max(1);

        let mut branch_taps = vec![vec![0.0f32; taps_per_branch]; interp];
        for (i, &t) in taps.iter().enumerate() {
            branch_taps[i % interp][i / interp] = t;
        }

        Self {
            interp,
            branches: branch_taps.into_iter().map(FirKernel::new).collect(),
            history: vec![Complex32::new(0.0, 0.0); taps_per_branch - 1],
            pending: None,
            branch_offset: 0,
            work: Vec::new(),
        }
    }

    pub fn interp(&self) -> usize {
        self.interp
    }

    pub fn taps_per_branch(&self) -> usize {
        self.history.len() + 1
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Branch that produces the next output, in `0..interp`
    pub fn branch_offset(&self) -> usize {
        self.branch_offset
    }

    pub fn branch_taps(&self, branch: usize) -> &[f32] {
        self.branches[branch].taps()
    }

    /// Input samples `process` needs to produce `nout` outputs
    pub fn inputs_needed(&self, nout: usize) -> usize {
        let from_pending = if self.branch_offset != 0 {
            self.interp - self.branch_offset
        } else {
            0
        };
        nout.saturating_sub(from_pending).div_ceil(self.interp)
    }

    /// Samples `warm_start` expects: the history, plus the current input
    /// when the branch offset is mid-cycle
    pub fn warm_start_len(&self) -> usize {
        self.history.len() + usize::from(self.branch_offset != 0)
    }

    /// Replace carried state with real signal instead of zeros (first pass)
    pub fn warm_start(&mut self, samples: &[Complex32]) {
        let zero = Complex32::new(0.0, 0.0);
        let hist = self.history.len();
        for (i, h) in self.history.iter_mut().enumerate() {
            *h = samples.get(i).copied().unwrap_or(zero);
        }
        self.pending = if self.branch_offset != 0 {
            Some(samples.get(hist).copied().unwrap_or(zero))
        } else {
            None
        };
    }

    /// Produce `output.len()` interpolated samples from `input`, which should
    /// hold exactly `inputs_needed(output.len())` samples.
    pub fn process(&mut self, input: &[Complex32], output: &mut [Complex32]) -> ExciterResult<()> {
        let expected = self.inputs_needed(output.len());
        let taps = self.taps_per_branch();
        let hist = self.history.len();

        self.work.clear();
        self.work.extend_from_slice(&self.history);
        self.work.extend(self.pending.take());
        self.work.extend_from_slice(input);

        let mut ii = 0;
        let mut produced = 0;
        for out in output.iter_mut() {
            if ii + taps > self.work.len() {
                break;
            }
            *out = self.branches[self.branch_offset].filter(&self.work[ii..ii + taps]);
            self.branch_offset = (self.branch_offset + 1) % self.interp;
            if self.branch_offset == 0 {
                ii += 1;
            }
            produced += 1;
        }
        output[produced..].fill(Complex32::new(0.0, 0.0));

        // Running short only ever stops on a wrap, so the window at `ii`
        // always has at least `hist` samples (plus one when mid-cycle).
        self.history.copy_from_slice(&self.work[ii..ii + hist]);
        if self.branch_offset != 0 {
            self.pending = Some(self.work[ii + hist]);
        }

        if input.len() != expected {
            return Err(ExciterError::BufferAccounting {
                stage: "interpolator",
                observed: input.len(),
                expected,
            });
        }
        Ok(())
    }
}
