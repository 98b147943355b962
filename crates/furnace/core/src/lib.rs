//! Pure decision logic for the blast furnace loop.
//!
//! `furnace-core` turns one world observation plus a small amount of session
//! memory into at most one intended action per tick. It never talks to the
//! client: observations arrive through [`world::WorldView`] and decisions
//! leave as plain data ([`engine::Decision`], [`interrupt::InterruptTick`]).
//! The tick driver and the action emitter live in the `runtime` crate.
pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod ids;
pub mod interrupt;
pub mod random;
pub mod state;
pub mod world;

pub use action::{
    InputCommand, Intent, Interaction, Key, Notice, NoticeKind, Quantity, StorageCommand, Target,
    Verb,
};
pub use config::{BotConfig, InterruptConfig, Recipe, RunThreshold};
pub use engine::{Decision, DecisionContext, DecisionEngine};
pub use error::ConfigError;
pub use ids::{ItemId, NpcId, ObjectId, VarbitId, WidgetId};
pub use interrupt::{
    DismissPolicy, DisruptorCatalog, DisruptorKind, InteractionChange, InterruptAction,
    InterruptHandler, InterruptPhase, InterruptTick,
};
pub use random::DelayDistribution;
pub use state::{BotState, SessionEvent, SessionState};
pub use world::{
    ItemStack, Npc, Rect, SceneObject, ScenePoint, Tile, WidgetView, WorldSnapshot, WorldView,
};
