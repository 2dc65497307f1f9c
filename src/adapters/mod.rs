//! Adapters: concrete I/O behind the port traits
//!
//! - `config_file`: generator profiles as JSON on disk
//! - `iq_writer`: interleaved cf32 output implementing `SampleSink`

pub mod config_file;
pub mod iq_writer;

pub use config_file::{load_config, save_config, ProfileStore};
pub use iq_writer::IqWriter;
