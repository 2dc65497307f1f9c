//! Core domain types
//!
//! Pure types with no I/O dependencies: configuration, errors, and the
//! sample/variant vocabulary shared by every stage.

pub mod config;
pub mod error;
pub mod types;

pub use config::*;
pub use error::*;
pub use types::*;
