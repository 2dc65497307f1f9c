//! Waveform source trait

use crate::domain::Sample;

/// An endless stream of complex baseband samples.
///
/// Consecutive calls continue the same stream: the caller may chunk its
/// requests however it likes.
pub trait WaveformSource {
    /// Fill `output` with the next `output.len()` samples.
    ///
    /// Single-sideband implementations may work per call, in which case very
    /// short requests lose sideband rejection (two samples or fewer can come
    /// back silent). Request thousands of samples at a time.
    fn generate_signal(&mut self, output: &mut [Sample]);

    /// Fill `output` with raw message symbols, returning how many were written
    fn generate_symbols(&mut self, output: &mut [Sample]) -> usize;

    /// Re-initialize carried filter history on the next `generate_signal`
    fn reset(&mut self);

    /// Reseed the message stream; negative values draw from system entropy
    fn set_seed(&mut self, seed: i64);
}
