//! Interleaved IQ writer, implements SampleSink
//!
//! Writes `cf32`: each sample as two little-endian `f32` values, I then Q.
//! Most SDR tools read this directly.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::domain::{ExciterResult, Sample};
use crate::ports::SampleSink;

pub struct IqWriter<W: Write + Send> {
    inner: W,
    samples_written: u64,
    /// Reused byte buffer for one block
    bytes: Vec<u8>,
}

impl<W: Write + Send> IqWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            samples_written: 0,
            bytes: Vec::new(),
        }
    }

    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl IqWriter<BufWriter<File>> {
    pub fn create(path: &Path) -> ExciterResult<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl IqWriter<BufWriter<io::Stdout>> {
    pub fn stdout() -> Self {
        Self::new(BufWriter::new(io::stdout()))
    }
}

impl<W: Write + Send> SampleSink for IqWriter<W> {
    fn write_samples(&mut self, samples: &[Sample]) -> ExciterResult<()> {
        self.bytes.clear();
        self.bytes.reserve(samples.len() * 8);
        for s in samples {
            self.bytes.extend_from_slice(&s.re.to_le_bytes());
            self.bytes.extend_from_slice(&s.im.to_le_bytes());
        }
        self.inner.write_all(&self.bytes)?;
        self.samples_written += samples.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> ExciterResult<()> {
        self.inner.flush()?;
        Ok(())
    }
}
