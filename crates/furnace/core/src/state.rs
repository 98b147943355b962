//! Session state carried between ticks.
//!
//! [`SessionState`] is the only memory the decision engine has. Everything
//! else is recomputed from observations each tick. Collaborators never touch
//! its fields directly; they post [`SessionEvent`]s, and the host reports
//! delivery of the pending action through [`SessionState::take_pending`].
use crate::action::{Intent, Verb};
use crate::ids::{ObjectId, object};
use crate::world::{SceneObject, Tile};

/// Outcome tag of the last evaluation. Diagnostic only.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BotState {
    CollectingOutput,
    OpeningStorage,
    Moving,
    TimedOut,
    OutOfArea,
    OutOfItems,
    Depositing,
    Withdrawing,
    FillingCoffer,
    FillingAuxContainer,
    EmptyingAuxContainer,
    PlacingOnConveyor,
}

/// Updates posted by event-driven collaborators.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionEvent {
    ObjectSpawned(SceneObject),
    ObjectDespawned(SceneObject),
    /// The world is reloading; every cached scene handle is stale.
    WorldLoading,
}

/// Mutable per-session memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Last reported outcome; `None` after an idle tick.
    pub current: Option<BotState>,
    /// Intent handed to the emitter and not yet delivered.
    pub pending: Option<Intent>,
    /// Ticks left before the engine acts again.
    pub cooldown: u32,
    /// Agent tile seen at the previous evaluation.
    pub last_position: Option<Tile>,
    /// The auxiliary container holds a full load.
    ///
    /// Set when a fill interaction is delivered, cleared when an empty
    /// interaction is delivered. Read by both storage branches to decide
    /// between filling, emptying, and placing materials.
    pub aux_full: bool,
    conveyor: Option<SceneObject>,
    dispenser: Option<SceneObject>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conveyor(&self) -> Option<&SceneObject> {
        self.conveyor.as_ref()
    }

    pub fn dispenser(&self) -> Option<&SceneObject> {
        self.dispenser.as_ref()
    }

    /// Both location handles are resolved.
    pub fn has_location_handles(&self) -> bool {
        self.conveyor.is_some() && self.dispenser.is_some()
    }

    /// Stores freshly resolved handles. Either may still be missing.
    pub fn set_location_handles(
        &mut self,
        conveyor: Option<SceneObject>,
        dispenser: Option<SceneObject>,
    ) {
        self.conveyor = conveyor;
        self.dispenser = dispenser;
    }

    pub fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::ObjectSpawned(spawned) => match spawned.id {
                id if id == object::CONVEYOR_BELT => self.conveyor = Some(*spawned),
                id if id == object::BAR_DISPENSER => self.dispenser = Some(*spawned),
                _ => {}
            },
            SessionEvent::ObjectDespawned(despawned) => {
                clear_if(&mut self.conveyor, despawned.id, object::CONVEYOR_BELT);
                clear_if(&mut self.dispenser, despawned.id, object::BAR_DISPENSER);
            }
            SessionEvent::WorldLoading => {
                self.conveyor = None;
                self.dispenser = None;
            }
        }
    }

    /// Cooldown branch: one tick passes.
    pub fn tick_cooldown(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    /// Records the agent tile and reports whether it moved since last time.
    ///
    /// The first observation of a session is never treated as movement.
    pub fn observe_position(&mut self, position: Option<Tile>) -> bool {
        let previous = self.last_position;
        if position.is_some() {
            self.last_position = position;
        }
        matches!((previous, position), (Some(before), Some(now)) if before != now)
    }

    /// Consumes the pending intent after the host delivered it.
    ///
    /// Delivering a fill or empty interaction on the auxiliary container
    /// updates [`SessionState::aux_full`].
    pub fn take_pending(&mut self, aux_container: crate::ids::ItemId) -> Option<Intent> {
        let intent = self.pending.take()?;
        if let Some(interaction) = intent.interaction()
            && let crate::action::Target::InventoryItem { item, .. } = interaction.target
            && item == aux_container
        {
            match interaction.verb {
                Verb::Fill => self.aux_full = true,
                Verb::Empty => self.aux_full = false,
                _ => {}
            }
        }
        Some(intent)
    }

    /// Drops an intent the host never delivered.
    pub fn discard_pending(&mut self) -> Option<Intent> {
        self.pending.take()
    }
}

fn clear_if(slot: &mut Option<SceneObject>, despawned: ObjectId, expected: ObjectId) {
    if despawned == expected {
        *slot = None;
    }
}
