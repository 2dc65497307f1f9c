//! Digital Signal Processing
//!
//! Generic numeric building blocks. No I/O dependencies, no knowledge of
//! the generator pipeline that strings them together.

pub mod agc;
pub mod fft;
pub mod filter;
pub mod gaussian;
pub mod spectral_template;

// Re-export commonly used items
pub use agc::Agc;
pub use fft::{SidebandEnergy, SpectrumAnalyzer};
pub use filter::FirKernel;
pub use gaussian::GaussianSource;
pub use spectral_template::SpectralTemplate;
