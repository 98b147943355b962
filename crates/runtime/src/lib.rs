//! Runtime driver for the furnace decision core.
//!
//! This crate connects `furnace-core` to a host: it serializes the interrupt
//! handler and the decision engine into one evaluation per tick, forwards
//! decisions to an [`ActionEmitter`], and loads configuration and scenarios.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the tick driver
//! - [`api`] exposes the emitter seam and error types
//! - [`config`] loads RON configuration with environment overrides
//! - [`scenario`] replays scripted frames through a session
//! - [`stats`] keeps per-session counters
pub mod api;
pub mod config;
pub mod scenario;
pub mod session;
pub mod stats;

pub use api::{ActionEmitter, Emitted, RecordingEmitter, Result, RuntimeError};
pub use config::RuntimeConfig;
pub use scenario::{Frame, Scenario, ScenarioEvent, TickReport};
pub use session::{Session, SkipReason, TickOutcome};
pub use stats::SessionStats;
