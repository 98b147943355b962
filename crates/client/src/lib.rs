//! Host-side pieces of the replay client.
//!
//! - [`ReplayConfig`] resolves which scenario and configuration to load
//! - [`LoggingEmitter`] turns emitted actions into log lines
//! - [`logging`] installs the per-session file subscriber
pub mod logging;

mod config;
mod emitter;

pub use config::ReplayConfig;
pub use emitter::LoggingEmitter;
