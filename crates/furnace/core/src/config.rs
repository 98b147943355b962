//! Tunable parameters for the decision engine and interrupt handler.
//!
//! Defaults reproduce a coal + runite ore setup. Hosts either build a
//! [`BotConfig`] in code or deserialize one (feature `serde`) and must call
//! [`BotConfig::validate`] before starting a session.
use rand::Rng;

use crate::error::ConfigError;
use crate::ids::{ItemId, NpcId, item};
use crate::interrupt::{DismissPolicy, DisruptorKind};
use crate::random::DelayDistribution;

/// Items consumed and produced by one smelting loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recipe {
    /// Carried in bulk by the auxiliary container.
    pub primary: ItemId,
    /// Carried in the inventory only.
    pub secondary: ItemId,
    /// Collected from the dispenser.
    pub product: ItemId,
}

impl Default for Recipe {
    fn default() -> Self {
        Self {
            primary: item::COAL,
            secondary: item::RUNITE_ORE,
            product: item::RUNITE_BAR,
        }
    }
}

impl Recipe {
    /// Raw materials in the order they are checked.
    pub fn materials(&self) -> [ItemId; 2] {
        [self.primary, self.secondary]
    }
}

/// Run energy thresholds sampled when deciding to re-enable running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunThreshold {
    pub min: u32,
    pub max: u32,
}

impl RunThreshold {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvertedBounds {
                name: "run",
                min: self.min as u64,
                max: self.max as u64,
            });
        }
        if self.max > 100 {
            return Err(ConfigError::RunThresholdOutOfRange(self.max));
        }
        Ok(())
    }
}

/// Interrupt handler settings.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InterruptConfig {
    pub policy: DismissPolicy,
    /// Delay before the dismiss click, in milliseconds.
    pub sleep: DelayDistribution,
    /// Ticks to wait before acting on a disruptor.
    pub ticks: DelayDistribution,
    /// Catalog entries added on top of the built-in ids.
    pub extra_disruptors: Vec<(NpcId, DisruptorKind)>,
}

impl Default for InterruptConfig {
    fn default() -> Self {
        Self {
            policy: DismissPolicy::default(),
            sleep: DelayDistribution::new(false, 60, 350, 10, 100),
            ticks: DelayDistribution::new(false, 1, 3, 2, 2),
            extra_disruptors: Vec::new(),
        }
    }
}

/// Complete configuration of one automated session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BotConfig {
    /// Upper bound of the post-action cooldown, in ticks.
    pub delay_amount: u32,
    /// Minimum coins carried for, and typed into, a coffer deposit.
    pub coffer_amount: u32,
    /// Refill the coffer when it drops below this many coins.
    pub coffer_threshold: i32,
    /// Keep withdrawing primary material until the furnace holds this much.
    pub primary_reserve: i32,
    pub recipe: Recipe,
    /// The auxiliary container that batches primary material.
    pub aux_container: ItemId,
    /// Stamina items, any one of which satisfies the restock step.
    pub stamina_items: Vec<ItemId>,
    /// Shape of the pauses between inputs, in milliseconds. Each pause
    /// narrows it to its own bounds.
    pub sleep: DelayDistribution,
    /// Post-action cooldown in ticks, clamped to `[1, delay_amount]`.
    pub pacing: DelayDistribution,
    /// Energy thresholds used while waiting out a cooldown.
    pub run_while_waiting: RunThreshold,
    /// Energy thresholds used while storage is closed.
    pub run_while_working: RunThreshold,
    pub interrupt: InterruptConfig,
}

impl BotConfig {
    pub const DEFAULT_DELAY_AMOUNT: u32 = 3;
    pub const DEFAULT_COFFER_AMOUNT: u32 = 2_500;
    pub const DEFAULT_COFFER_THRESHOLD: i32 = 3_000;
    pub const DEFAULT_PRIMARY_RESERVE: i32 = 81;

    /// Largest amount typed into the coffer prompt.
    pub const MAX_COFFER_DEPOSIT: u32 = 10_000;
    /// Free slots required before collecting product.
    pub const COLLECT_FREE_SLOTS: u32 = 26;
    /// Tiles within which the agent counts as standing at the storage.
    pub const NEAR_STORAGE_DISTANCE: i32 = 8;

    pub fn new() -> Self {
        Self {
            delay_amount: Self::DEFAULT_DELAY_AMOUNT,
            coffer_amount: Self::DEFAULT_COFFER_AMOUNT,
            coffer_threshold: Self::DEFAULT_COFFER_THRESHOLD,
            primary_reserve: Self::DEFAULT_PRIMARY_RESERVE,
            recipe: Recipe::default(),
            aux_container: item::COAL_BAG,
            stamina_items: item::STAMINA_POTIONS.to_vec(),
            sleep: DelayDistribution::new(false, 10, 350, 40, 100),
            pacing: DelayDistribution::new(false, 1, 10, 1, 2),
            run_while_waiting: RunThreshold::new(10, 30),
            run_while_working: RunThreshold::new(20, 20),
            interrupt: InterruptConfig::default(),
        }
    }

    /// Items never deposited by a deposit-all-except.
    pub fn keep_items(&self) -> Vec<ItemId> {
        let mut keep = Vec::with_capacity(self.stamina_items.len() + 1);
        keep.push(self.aux_container);
        keep.extend(self.stamina_items.iter().copied());
        keep
    }

    /// Post-action cooldown drawn from `pacing`, kept within
    /// `[1, delay_amount]`.
    pub fn cooldown<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let ticks = u32::try_from(self.pacing.sample(rng)).unwrap_or(u32::MAX);
        ticks.clamp(1, self.delay_amount.max(1))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delay_amount == 0 {
            return Err(ConfigError::ZeroDelayAmount);
        }
        if self.coffer_amount == 0 {
            return Err(ConfigError::ZeroCofferAmount);
        }
        if self.stamina_items.is_empty() {
            return Err(ConfigError::EmptyList("stamina_items"));
        }
        self.sleep.validate("sleep")?;
        self.pacing.validate("pacing")?;
        self.run_while_waiting.validate()?;
        self.run_while_working.validate()?;
        self.interrupt.sleep.validate("interrupt.sleep")?;
        self.interrupt.ticks.validate("interrupt.ticks")?;
        Ok(())
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self::new()
    }
}
