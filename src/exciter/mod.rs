//! Streaming exciter
//!
//! The stateful synthesis pipeline: tap preparation, the shaping FIR, the
//! analytic-signal constructor for the single-sideband variants, the
//! polyphase interpolation bank, and the symbol source feeding it all.
//! `SignalGenerator` wires the stages together.

pub mod analytic;
pub mod buffer;
pub mod generator;
pub mod polyphase;
pub mod shaping;
pub mod symbols;
pub mod taps;

pub use analytic::{AnalyticConstructor, SidebandSelect};
pub use buffer::SymbolBuffer;
pub use generator::SignalGenerator;
pub use polyphase::PolyphaseBank;
pub use shaping::ShapingFilter;
pub use symbols::{StopHandle, SymbolSource};
pub use taps::PreparedTaps;
