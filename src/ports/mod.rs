//! Port traits (interfaces)
//!
//! These traits define the boundaries between the generator core and
//! whatever drives it or stores its output. Adapters implement the sinks.

pub mod sink;
pub mod source;

pub use sink::*;
pub use source::*;
