//! Public API surface of the runtime: the emitter seam and error types.
mod emitter;
mod errors;

pub use emitter::{ActionEmitter, Emitted, RecordingEmitter};
pub use errors::{Result, RuntimeError};
