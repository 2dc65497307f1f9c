//! Message symbol source
//!
//! Symbols are `(modulation_index · g / 3, 0)` with `g ~ N(0, 1)`, so the
//! message stays inside ±modulation_index about 99.7% of the time.
//!
//! Two modes:
//! - `Inline`: draws on the caller's thread, fully deterministic
//! - `Threaded`: one producer thread keeps a `SymbolBuffer` topped up;
//!   `fill` drains it until satisfied or the source is stopped
//!
//! A `StopHandle` stops a threaded source from any thread, including while
//! the owner is blocked inside `fill`. Joining the producer stays with the
//! owner (`stop` or drop).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use num_complex::Complex32;

use crate::domain::ExciterResult;
use crate::dsp::GaussianSource;

use super::buffer::SymbolBuffer;

/// Ratio between the Gaussian standard deviation and the modulation index
const SIGMA_PER_INDEX: f32 = 1.0 / 3.0;

fn draw_into(gaussian: &mut GaussianSource, scale: f32, out: &mut [Complex32]) {
    for s in out.iter_mut() {
        *s = Complex32::new(scale * gaussian.next_sample(), 0.0);
    }
}

/// Cloneable handle that stops a threaded source from another thread.
/// For an inline source it does nothing.
#[derive(Clone, Default)]
pub struct StopHandle {
    shared: Option<(Arc<AtomicBool>, Arc<SymbolBuffer>)>,
}

impl StopHandle {
    /// Clear the running flag and close the buffer. Blocked callers on both
    /// sides return; the producer exits on its own.
    pub fn stop(&self) {
        if let Some((running, buffer)) = &self.shared {
            running.store(false, Ordering::SeqCst);
            buffer.close();
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared
            .as_ref()
            .map_or(true, |(running, _)| running.load(Ordering::SeqCst))
    }
}

pub enum SymbolSource {
    Inline {
        gaussian: GaussianSource,
        scale: f32,
    },
    Threaded {
        buffer: Arc<SymbolBuffer>,
        running: Arc<AtomicBool>,
        reseed_tx: Sender<u64>,
        handle: Option<JoinHandle<()>>,
    },
}

impl SymbolSource {
    pub fn inline(modulation_index: f32, seed: u64) -> Self {
        Self::Inline {
            gaussian: GaussianSource::new(seed),
            scale: modulation_index * SIGMA_PER_INDEX,
        }
    }

    /// Start the producer thread. It fills `notify_size` symbols at a time
    /// into a buffer of `buffer_size`.
    pub fn threaded(
        modulation_index: f32,
        seed: u64,
        buffer_size: usize,
        notify_size: usize,
    ) -> ExciterResult<Self> {
        let buffer = Arc::new(SymbolBuffer::new(buffer_size, notify_size));
        let running = Arc::new(AtomicBool::new(true));
        let (reseed_tx, reseed_rx) = crossbeam_channel::unbounded();

        let handle = {
            let buffer = buffer.clone();
            let running = running.clone();
            let producer = Producer {
                gaussian: GaussianSource::new(seed),
                scale: modulation_index * SIGMA_PER_INDEX,
                block: notify_size.clamp(1, buffer_size.max(1)),
                reseed_rx,
            };
            thread::Builder::new()
                .name("symbol-producer".into())
                .spawn(move || producer.run(&buffer, &running))?
        };

        log::debug!(
            "Symbol producer started (buffer {}, notify {})",
            buffer_size,
            notify_size
        );

        Ok(Self::Threaded {
            buffer,
            running,
            reseed_tx,
            handle: Some(handle),
        })
    }

    /// Fill `out` with message symbols. Returns how many were written, which
    /// is `out.len()` unless the threaded source has been stopped.
    pub fn fill(&mut self, out: &mut [Complex32]) -> usize {
        match self {
            Self::Inline { gaussian, scale } => {
                draw_into(gaussian, *scale, out);
                out.len()
            }
            Self::Threaded { buffer, .. } => {
                let mut filled = 0;
                while filled < out.len() {
                    let taken = buffer.pop(&mut out[filled..]);
                    if taken == 0 {
                        break;
                    }
                    filled += taken;
                }
                filled
            }
        }
    }

    /// Restart the Gaussian stream from `seed`.
    ///
    /// Threaded: the producer picks the seed up before its next fill, so
    /// symbols already queued still come from the old stream.
    pub fn set_seed(&mut self, seed: u64) {
        match self {
            Self::Inline { gaussian, .. } => gaussian.reseed(seed),
            Self::Threaded { reseed_tx, .. } => {
                if reseed_tx.send(seed).is_err() {
                    log::debug!("Symbol producer already stopped; seed {seed} ignored");
                }
            }
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        match self {
            Self::Inline { .. } => StopHandle::default(),
            Self::Threaded {
                buffer, running, ..
            } => StopHandle {
                shared: Some((running.clone(), buffer.clone())),
            },
        }
    }

    pub fn is_running(&self) -> bool {
        match self {
            Self::Inline { .. } => true,
            Self::Threaded { running, .. } => running.load(Ordering::SeqCst),
        }
    }

    /// Stop the producer, release any blocked caller and join the thread.
    /// Idempotent. An inline source has nothing to stop.
    pub fn stop(&mut self) {
        if let Self::Threaded {
            buffer,
            running,
            handle,
            ..
        } = self
        {
            running.store(false, Ordering::SeqCst);
            buffer.close();
            if let Some(handle) = handle.take() {
                if handle.join().is_err() {
                    log::error!("Symbol producer thread panicked");
                } else {
                    log::debug!("Symbol producer stopped");
                }
            }
        }
    }
}

impl Drop for SymbolSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// State owned by the producer thread
struct Producer {
    gaussian: GaussianSource,
    scale: f32,
    block: usize,
    reseed_rx: Receiver<u64>,
}

impl Producer {
    fn run(mut self, buffer: &SymbolBuffer, running: &AtomicBool) {
        let mut work = vec![Complex32::new(0.0, 0.0); self.block];

        while running.load(Ordering::SeqCst) {
            while let Ok(seed) = self.reseed_rx.try_recv() {
                self.gaussian.reseed(seed);
            }

            draw_into(&mut self.gaussian, self.scale, &mut work);

            let mut sent = 0;
            while sent < work.len() {
                let queued = buffer.push(&work[sent..]);
                if queued == 0 {
                    // Closed while we were waiting for room
                    return;
                }
                sent += queued;
            }
        }
    }
}
