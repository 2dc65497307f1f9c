//! Signal Exciter
//!
//! A streaming synthetic-waveform generator: Gaussian message symbols are
//! pulse-shaped, optionally turned into a single-sideband analytic signal,
//! interpolated, and optionally normalized, producing an endless stream of
//! complex baseband samples that stays continuous across calls.
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Pure domain types, no I/O dependencies
//! - `dsp/` - Generic numeric primitives (FIR, AGC, Gaussian RNG, FFT, spectral template)
//! - `exciter/` - The stateful synthesis pipeline and its symbol producer
//! - `ports/` - Trait definitions (interfaces) at the edges
//! - `adapters/` - Implementations of ports (JSON profiles, cf32 writer)

// Core (pure, no I/O)
pub mod domain;
pub mod dsp;
pub mod exciter;
pub mod ports;

// Adapters (external I/O)
pub mod adapters;

pub use domain::{ExciterError, ExciterResult, GeneratorConfig, MixtureParams, Sample, Sideband};
pub use exciter::SignalGenerator;
pub use ports::{SampleSink, WaveformSource};
