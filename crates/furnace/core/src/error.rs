//! Configuration validation errors.
//!
//! World conditions are never errors in this crate: missing objects and
//! exhausted supplies surface as [`crate::action::Notice`]s and a safe
//! terminal state. The only fallible operation is accepting a
//! configuration, which is checked once before a session starts.

/// Reasons a [`crate::config::BotConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("delay_amount must be at least 1 tick")]
    ZeroDelayAmount,

    #[error("coffer_amount must be at least 1 coin")]
    ZeroCofferAmount,

    #[error("{name}: min {min} is greater than max {max}")]
    InvertedBounds {
        name: &'static str,
        min: u64,
        max: u64,
    },

    #[error("run energy threshold {0} is above 100")]
    RunThresholdOutOfRange(u32),

    #[error("{0} list must not be empty")]
    EmptyList(&'static str),
}

impl ConfigError {
    /// Stable code for logs and host-side error mapping.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroDelayAmount => "CONFIG_ZERO_DELAY_AMOUNT",
            Self::ZeroCofferAmount => "CONFIG_ZERO_COFFER_AMOUNT",
            Self::InvertedBounds { .. } => "CONFIG_INVERTED_BOUNDS",
            Self::RunThresholdOutOfRange(_) => "CONFIG_RUN_THRESHOLD_OUT_OF_RANGE",
            Self::EmptyList(_) => "CONFIG_EMPTY_LIST",
        }
    }
}
