//! Shaping filter stage
//!
//! Each call sees `history ++ input`. Output `i` is the kernel applied to
//! the `N`-sample window ending at input sample `i`, so exactly one output
//! comes out per input and the last `N − 1` samples become the next
//! call's history.

use crate::domain::{ExciterError, ExciterResult};
use crate::dsp::filter::FirKernel;

use super::taps::PreparedTaps;

pub struct ShapingFilter {
    kernel: FirKernel,
    history: Vec<f32>,
    /// Reused `history ++ input` buffer
    work: Vec<f32>,
}

impl ShapingFilter {
    /// Build the kernel from prepared taps with zeroed history
    pub fn new(prepared: PreparedTaps) -> Self {
        let history = vec![0.0; prepared.history_len()];
        Self {
            kernel: FirKernel::new(prepared.into_taps()),
            history,
            work: Vec::new(),
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn taps(&self) -> &[f32] {
        self.kernel.taps()
    }

    /// Replace the history with raw message samples (first-pass start).
    ///
    /// `samples` should hold exactly `history_len()` values; shorter input
    /// is zero-padded at the front, longer input keeps the newest values.
    pub fn warm_start(&mut self, samples: &[f32]) {
        let hist = self.history.len();
        self.history.fill(0.0);
        let take = samples.len().min(hist);
        self.history[hist - take..].copy_from_slice(&samples[samples.len() - take..]);
    }

    /// Filter `input` into `output`, one output per input.
    ///
    /// A length mismatch means the caller's chunk math is off: the stage
    /// still filters what it can, carries exactly `history_len()` samples,
    /// and reports the mismatch.
    pub fn filter(&mut self, input: &[f32], output: &mut [f32]) -> ExciterResult<()> {
        let hist = self.history.len();
        let taps = self.kernel.len();

        self.work.clear();
        self.work.extend_from_slice(&self.history);
        self.work.extend_from_slice(input);

        let produced = output.len().min(input.len());
        for (i, out) in output.iter_mut().take(produced).enumerate() {
            *out = self.kernel.filter(&self.work[i..i + taps]);
        }
        output[produced..].fill(0.0);

        let total = self.work.len();
        self.history
            .copy_from_slice(&self.work[total - hist..]);

        let trailing = total.saturating_sub(output.len());
        if trailing != hist {
            return Err(ExciterError::BufferAccounting {
                stage: "shaping filter",
                observed: trailing,
                expected: hist,
            });
        }
        Ok(())
    }
}
