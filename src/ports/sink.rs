//! Sample sink trait

use crate::domain::{ExciterResult, Sample};

/// Destination for generated samples (file, pipe, socket, ...).
/// Only requires `Send` so a sink can be handed to a writer thread.
pub trait SampleSink: Send {
    /// Write a block of samples
    fn write_samples(&mut self, samples: &[Sample]) -> ExciterResult<()>;

    /// Push any buffered data to the underlying device
    fn flush(&mut self) -> ExciterResult<()>;
}
