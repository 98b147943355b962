//! Replay client configuration.
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use runtime::RuntimeConfig;

/// What the replay binary loads.
#[derive(Clone, Debug, Default)]
pub struct ReplayConfig {
    /// Scenario file to replay.
    pub scenario: Option<PathBuf>,
    /// Explicit configuration file. Falls back to the platform default path
    /// when that file exists.
    pub config_path: Option<PathBuf>,
    /// Log session id; a timestamp when unset.
    pub session_id: Option<String>,
}

impl ReplayConfig {
    /// Construct from command-line arguments and environment variables.
    ///
    /// Environment variables:
    /// - `FURNACE_SCENARIO` - scenario file, overridden by the first argument
    /// - `FURNACE_CONFIG` - configuration file
    /// - `FURNACE_SESSION_ID` - log directory name
    pub fn from_env(mut args: impl Iterator<Item = String>) -> Self {
        let scenario = args
            .next()
            .map(PathBuf::from)
            .or_else(|| env::var_os("FURNACE_SCENARIO").map(PathBuf::from));

        Self {
            scenario,
            config_path: env::var_os("FURNACE_CONFIG").map(PathBuf::from),
            session_id: env::var("FURNACE_SESSION_ID").ok(),
        }
    }

    /// Loads the runtime configuration, then applies environment overrides.
    ///
    /// `base` is used when no configuration file is available, e.g. the
    /// configuration embedded in a scenario.
    pub fn runtime_config(&self, base: Option<RuntimeConfig>) -> Result<RuntimeConfig> {
        let path = self
            .config_path
            .clone()
            .or_else(|| RuntimeConfig::default_path().filter(|path| path.exists()));

        let config = match path {
            Some(path) => RuntimeConfig::load_from_file(&path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => base.unwrap_or_default(),
        };

        config
            .with_env_overrides()
            .context("applying environment overrides")
    }
}
