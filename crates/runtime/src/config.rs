//! Session configuration loading.
//!
//! A [`RuntimeConfig`] is read from a RON file, then selectively overridden
//! from the environment, then validated before a session starts.
use std::env;
use std::path::{Path, PathBuf};

use furnace_core::BotConfig;
use serde::{Deserialize, Serialize};

use crate::api::{Result, RuntimeError};

/// Everything a [`crate::Session`] needs to start.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub bot: BotConfig,
    /// Seed for the session RNG. Drawn from entropy when absent.
    pub seed: Option<u64>,
}

impl RuntimeConfig {
    /// Platform config file location, e.g. `~/.config/furnace/config.ron`.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "furnace")
            .map(|dirs| dirs.config_dir().join("config.ron"))
    }

    /// Loads and validates a RON configuration file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&content)?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_ron(content: &str) -> Result<Self> {
        let config: RuntimeConfig = ron::from_str(content).map_err(|source| {
            RuntimeError::Parse {
                what: "configuration",
                source,
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(RuntimeError::Serialize)
    }

    /// Applies overrides from the process environment.
    ///
    /// Environment variables:
    /// - `FURNACE_DELAY_AMOUNT` - cooldown upper bound in ticks
    /// - `FURNACE_COFFER_AMOUNT` - coins typed into the coffer prompt
    /// - `FURNACE_COFFER_THRESHOLD` - refill the coffer below this level
    /// - `FURNACE_DISMISS_ALL` - dismiss every random event (`true`/`false`)
    /// - `FURNACE_SEED` - fixed RNG seed
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup. Unparsable values are
    /// ignored with a warning.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(delay) = read_var(&lookup, "FURNACE_DELAY_AMOUNT") {
            self.bot.delay_amount = delay;
        }
        if let Some(amount) = read_var(&lookup, "FURNACE_COFFER_AMOUNT") {
            self.bot.coffer_amount = amount;
        }
        if let Some(threshold) = read_var(&lookup, "FURNACE_COFFER_THRESHOLD") {
            self.bot.coffer_threshold = threshold;
        }
        if let Some(dismiss_all) = read_var(&lookup, "FURNACE_DISMISS_ALL") {
            self.bot.interrupt.policy.dismiss_all = dismiss_all;
        }
        if let Some(seed) = read_var(&lookup, "FURNACE_SEED") {
            self.seed = Some(seed);
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        self.bot.validate()?;
        Ok(())
    }
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}
