//! Error types surfaced by the runtime API.
//!
//! Only configuration and scenario loading can fail. World conditions reach
//! the host as notices through the emitter, never as errors.
use std::path::PathBuf;

use furnace_core::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {what} RON")]
    Parse {
        what: &'static str,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("failed to serialize configuration")]
    Serialize(#[source] ron::Error),

    #[error("invalid configuration ({})", .0.error_code())]
    InvalidConfig(#[from] ConfigError),

    #[error("scenario has no frames")]
    EmptyScenario,
}
