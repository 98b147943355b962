//! Scripted sessions for replay and regression tests.
//!
//! A scenario is a list of frames. Each frame posts its events, runs one
//! tick against its world snapshot, and optionally acknowledges delivery of
//! the pending action, in that order. Scenarios are stored as RON:
//!
//! ```ron
//! (
//!     name: "deposit bars",
//!     frames: [
//!         (world: (position: Some((x: 1, y: 1)), storage_open: true), dispatched: true),
//!     ],
//! )
//! ```

use std::path::Path;

use furnace_core::{InteractionChange, Intent, Npc, SessionEvent, WorldSnapshot};
use serde::{Deserialize, Serialize};

use crate::api::{ActionEmitter, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::session::{Session, TickOutcome};

/// Collaborator event delivered before a frame's tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioEvent {
    Session(SessionEvent),
    InteractingChanged(InteractionChange),
    NpcDespawned(Npc),
    /// Interface group id that finished loading.
    WidgetLoaded(u16),
}

/// One tick of a scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
    pub world: WorldSnapshot,
    /// The host delivered the pending action after this tick.
    #[serde(default)]
    pub dispatched: bool,
}

impl Frame {
    pub fn new(world: WorldSnapshot) -> Self {
        Self {
            events: Vec::new(),
            world,
            dispatched: false,
        }
    }

    pub fn with_event(mut self, event: ScenarioEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn dispatched(mut self) -> Self {
        self.dispatched = true;
        self
    }
}

/// What happened on one replayed frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub frame: usize,
    pub outcome: TickOutcome,
    /// Intent acknowledged as delivered after the tick.
    pub dispatched: Option<Intent>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    /// Session configuration; the caller's configuration is used when absent.
    #[serde(default)]
    pub config: Option<RuntimeConfig>,
    pub frames: Vec<Frame>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, frames: Vec<Frame>) -> Self {
        Self {
            name: name.into(),
            config: None,
            frames,
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&content)
    }

    pub fn from_ron(content: &str) -> Result<Self> {
        let scenario: Scenario = ron::from_str(content).map_err(|source| RuntimeError::Parse {
            what: "scenario",
            source,
        })?;
        if scenario.frames.is_empty() {
            return Err(RuntimeError::EmptyScenario);
        }
        if let Some(config) = &scenario.config {
            config.validate()?;
        }
        Ok(scenario)
    }

    /// Plays every frame through `session`.
    pub fn replay(&self, session: &mut Session, emitter: &mut dyn ActionEmitter) -> Vec<TickReport> {
        tracing::info!(
            scenario = %self.name,
            frames = self.frames.len(),
            "replaying scenario"
        );

        self.frames
            .iter()
            .enumerate()
            .map(|(index, frame)| {
                for event in &frame.events {
                    apply_event(session, event, &mut *emitter);
                }
                let outcome = session.tick(&frame.world, &mut *emitter);
                let dispatched = if frame.dispatched {
                    session.on_action_dispatched()
                } else {
                    None
                };
                TickReport {
                    frame: index,
                    outcome,
                    dispatched,
                }
            })
            .collect()
    }
}

fn apply_event(session: &mut Session, event: &ScenarioEvent, emitter: &mut dyn ActionEmitter) {
    match event {
        ScenarioEvent::Session(event) => session.on_event(event),
        ScenarioEvent::InteractingChanged(change) => {
            session.on_interacting_changed(change);
        }
        ScenarioEvent::NpcDespawned(npc) => session.on_npc_despawned(npc),
        ScenarioEvent::WidgetLoaded(group) => {
            session.on_widget_loaded(*group, emitter);
        }
    }
}
