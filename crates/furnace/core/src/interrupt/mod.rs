//! Random-event interrupt handler.
//!
//! Tracks the disruptive NPC that started interacting with the local player
//! and, when the [`DismissPolicy`] says so, takes over the tick until the NPC
//! despawns. While active the decision engine must not run.
//!
//! ```text
//! Idle ──(catalogued NPC targets player, policy dismisses)──▶ PendingDismiss
//! PendingDismiss / GenieDialogue / Dismissing
//!     countdown > 0  → decrement only
//!     countdown == 0 → genie + continue widget ─▶ GenieDialogue
//!                      otherwise               ─▶ Dismissing
//! any ──(tracked NPC despawned)──▶ Idle
//! ```
mod policy;

pub use policy::{DismissPolicy, DisruptorCatalog, DisruptorKind};

use rand::RngCore;

use crate::action::{InputCommand, Intent, Interaction, Target, Verb};
use crate::config::InterruptConfig;
use crate::ids::widget;
use crate::world::{Npc, WorldView};

/// Handler phase. Everything but [`InterruptPhase::Idle`] suppresses the
/// decision engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum InterruptPhase {
    #[default]
    Idle,
    PendingDismiss,
    GenieDialogue,
    Dismissing,
}

/// Interacting-changed notification reduced to what the handler needs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractionChange {
    /// The NPC whose interaction target changed.
    pub source: Npc,
    /// The NPC's new target is the local player.
    pub targets_local_player: bool,
    /// The local player is itself interacting with `source`.
    pub local_player_interacting_with_source: bool,
}

/// One action chosen by the handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterruptAction {
    pub intent: Intent,
    /// Pointer input that delivers the intent.
    pub click: InputCommand,
}

/// Outcome of one handler tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InterruptTick {
    /// Nothing to handle; the engine may run.
    Inactive,
    /// Counting down; the engine must not run.
    Suppressing { remaining: u32 },
    /// The handler acted; the engine must not run.
    Acted(InterruptAction),
}

impl InterruptTick {
    pub fn suppresses_engine(&self) -> bool {
        !matches!(self, InterruptTick::Inactive)
    }
}

#[derive(Clone, Debug)]
pub struct InterruptHandler {
    catalog: DisruptorCatalog,
    phase: InterruptPhase,
    /// Last catalogued NPC seen targeting the player, dismissed or not.
    current: Option<Npc>,
    /// The NPC being dismissed.
    target: Option<(Npc, DisruptorKind)>,
    countdown: u32,
}

impl Default for InterruptHandler {
    fn default() -> Self {
        Self::new(DisruptorCatalog::default())
    }
}

impl InterruptHandler {
    pub fn new(catalog: DisruptorCatalog) -> Self {
        Self {
            catalog,
            phase: InterruptPhase::Idle,
            current: None,
            target: None,
            countdown: 0,
        }
    }

    pub fn from_config(config: &InterruptConfig) -> Self {
        Self::new(DisruptorCatalog::with_extra(&config.extra_disruptors))
    }

    pub fn phase(&self) -> InterruptPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != InterruptPhase::Idle
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    /// The catalogued NPC currently tracked.
    pub fn tracked(&self) -> Option<&Npc> {
        self.current.as_ref()
    }

    /// Feeds an interacting-changed event.
    ///
    /// Returns true if the handler became active. Events from NPCs aimed at
    /// someone else, or that the player started themselves, are ignored.
    pub fn on_interacting_changed(
        &mut self,
        change: &InteractionChange,
        config: &InterruptConfig,
        rng: &mut dyn RngCore,
    ) -> bool {
        if !change.targets_local_player || change.local_player_interacting_with_source {
            return false;
        }
        let Some(kind) = self.catalog.kind_of(change.source.id) else {
            return false;
        };
        if self
            .target
            .as_ref()
            .is_some_and(|(npc, _)| npc.index == change.source.index)
        {
            return false;
        }

        tracing::debug!(npc = %change.source.name, %kind, "random event spawned");
        self.current = Some(change.source.clone());

        if !config.policy.should_dismiss(kind) {
            tracing::debug!(%kind, "random event kept by policy");
            return false;
        }

        self.target = Some((change.source.clone(), kind));
        self.countdown = tick_countdown(config, rng);
        self.phase = InterruptPhase::PendingDismiss;
        tracing::info!(npc = %change.source.name, countdown = self.countdown, "dismissing random event");
        true
    }

    /// Returns to idle if `npc` is the tracked or targeted disruptor.
    pub fn on_npc_despawned(&mut self, npc: &Npc) {
        let same = |other: &Npc| other.index == npc.index && other.id == npc.id;
        let tracked = self.current.as_ref().is_some_and(same)
            || self.target.as_ref().is_some_and(|(target, _)| same(target));
        if tracked {
            tracing::debug!(npc = %npc.name, "random event despawned");
            self.reset();
        }
    }

    /// Runs one tick. Emits at most one action.
    pub fn tick(
        &mut self,
        world: &dyn WorldView,
        config: &InterruptConfig,
        rng: &mut dyn RngCore,
    ) -> InterruptTick {
        let Some((npc, kind)) = self.target.clone() else {
            return InterruptTick::Inactive;
        };
        if self.countdown > 0 {
            self.countdown -= 1;
            return InterruptTick::Suppressing {
                remaining: self.countdown,
            };
        }

        let (intent, phase) = if kind.has_dialogue_step() {
            if world.is_widget_visible(widget::NPC_DIALOGUE_CONTINUE) {
                (continue_dialogue(), InterruptPhase::GenieDialogue)
            } else {
                (dismiss(&npc, Verb::TalkTo), InterruptPhase::Dismissing)
            }
        } else {
            (dismiss(&npc, Verb::Dismiss), InterruptPhase::Dismissing)
        };

        let click = match world.npc_bounds(&npc) {
            Some(bounds) => InputCommand::ClickWithin {
                bounds,
                delay_ms: config.sleep.sample(rng),
            },
            None => InputCommand::center_click(),
        };
        self.countdown = tick_countdown(config, rng).saturating_add(2);
        self.phase = phase;
        tracing::info!(
            npc = %npc.name,
            %phase,
            action = intent.label(),
            "random event action"
        );

        InterruptTick::Acted(InterruptAction { intent, click })
    }

    pub fn reset(&mut self) {
        self.phase = InterruptPhase::Idle;
        self.current = None;
        self.target = None;
        self.countdown = 0;
    }
}

/// Ticks to wait, saturating at `u32::MAX` for oversized configurations.
fn tick_countdown(config: &InterruptConfig, rng: &mut dyn RngCore) -> u32 {
    u32::try_from(config.ticks.sample(rng)).unwrap_or(u32::MAX)
}

fn continue_dialogue() -> Intent {
    Intent::Interact(Interaction::new(
        Target::Widget {
            widget: widget::NPC_DIALOGUE_CONTINUE,
            index: -1,
        },
        Verb::Continue,
    ))
}

fn dismiss(npc: &Npc, verb: Verb) -> Intent {
    Intent::Interact(Interaction::new(
        Target::Npc {
            index: npc.index,
            id: npc.id,
        },
        verb,
    ))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::ids::NpcId;
    use crate::world::{Rect, WidgetView, WorldSnapshot};

    const FROG: NpcId = NpcId(5429);
    const GENIE: NpcId = NpcId(327);

    fn change(npc: Npc) -> InteractionChange {
        InteractionChange {
            source: npc,
            targets_local_player: true,
            local_player_interacting_with_source: false,
        }
    }

    fn quick() -> InterruptConfig {
        InterruptConfig {
            ticks: crate::random::DelayDistribution::new(false, 1, 1, 0, 1),
            ..InterruptConfig::default()
        }
    }

    fn run_until_action(
        handler: &mut InterruptHandler,
        world: &WorldSnapshot,
        config: &InterruptConfig,
        rng: &mut StdRng,
    ) -> InterruptAction {
        for _ in 0..16 {
            match handler.tick(world, config, rng) {
                InterruptTick::Acted(action) => return action,
                InterruptTick::Suppressing { .. } => {}
                InterruptTick::Inactive => panic!("handler went inactive"),
            }
        }
        panic!("no action within 16 ticks");
    }

    #[test]
    fn ignores_events_aimed_elsewhere() {
        let mut handler = InterruptHandler::default();
        let mut rng = StdRng::seed_from_u64(1);
        let config = quick();

        let mut other = change(Npc::new(4, FROG, "Frog"));
        other.targets_local_player = false;
        assert!(!handler.on_interacting_changed(&other, &config, &mut rng));

        let mut own = change(Npc::new(4, FROG, "Frog"));
        own.local_player_interacting_with_source = true;
        assert!(!handler.on_interacting_changed(&own, &config, &mut rng));

        let unknown = change(Npc::new(4, NpcId(1), "Man"));
        assert!(!handler.on_interacting_changed(&unknown, &config, &mut rng));
        assert!(handler.tracked().is_none());
    }

    #[test]
    fn kept_events_are_tracked_but_inactive() {
        let mut handler = InterruptHandler::default();
        let mut rng = StdRng::seed_from_u64(1);
        let config = InterruptConfig {
            policy: DismissPolicy::none(),
            ..quick()
        };

        assert!(!handler.on_interacting_changed(&change(Npc::new(4, FROG, "Frog")), &config, &mut rng));
        assert!(handler.tracked().is_some());
        assert_eq!(
            handler.tick(&WorldSnapshot::new(), &config, &mut rng),
            InterruptTick::Inactive
        );
    }

    #[test]
    fn countdown_then_one_dismiss_per_expiry() {
        let mut handler = InterruptHandler::default();
        let mut rng = StdRng::seed_from_u64(9);
        let config = quick();
        let frog = Npc::new(4, FROG, "Frog");
        let world = WorldSnapshot::new().with_npc_bounds(4, Rect {
            x: 100,
            y: 100,
            width: 20,
            height: 30,
        });

        assert!(handler.on_interacting_changed(&change(frog.clone()), &config, &mut rng));
        assert_eq!(handler.phase(), InterruptPhase::PendingDismiss);
        assert_eq!(
            handler.tick(&world, &config, &mut rng),
            InterruptTick::Suppressing { remaining: 0 }
        );

        let InterruptTick::Acted(action) = handler.tick(&world, &config, &mut rng) else {
            panic!("expected an action");
        };
        assert_eq!(action.intent, dismiss(&frog, Verb::Dismiss));
        assert!(matches!(action.click, InputCommand::ClickWithin { .. }));
        assert_eq!(handler.phase(), InterruptPhase::Dismissing);
        assert_eq!(handler.countdown(), 3);

        // Re-armed: the next three ticks only count down.
        for _ in 0..3 {
            assert!(matches!(
                handler.tick(&world, &config, &mut rng),
                InterruptTick::Suppressing { .. }
            ));
        }
        assert!(matches!(
            handler.tick(&world, &config, &mut rng),
            InterruptTick::Acted(_)
        ));
    }

    #[test]
    fn genie_continues_dialogue_before_talking() {
        let mut handler = InterruptHandler::default();
        let mut rng = StdRng::seed_from_u64(2);
        let config = quick();
        let genie = Npc::new(9, GENIE, "Genie");
        handler.on_interacting_changed(&change(genie.clone()), &config, &mut rng);

        let dialogue = WorldSnapshot::new()
            .with_widget(widget::NPC_DIALOGUE_CONTINUE, WidgetView::visible());
        let action = run_until_action(&mut handler, &dialogue, &config, &mut rng);
        assert_eq!(action.intent, continue_dialogue());
        assert_eq!(action.click, InputCommand::center_click());
        assert_eq!(handler.phase(), InterruptPhase::GenieDialogue);

        let action = run_until_action(&mut handler, &WorldSnapshot::new(), &config, &mut rng);
        assert_eq!(action.intent, dismiss(&genie, Verb::TalkTo));
        assert_eq!(handler.phase(), InterruptPhase::Dismissing);
    }

    #[test]
    fn despawn_of_tracked_npc_returns_to_idle() {
        let mut handler = InterruptHandler::default();
        let mut rng = StdRng::seed_from_u64(3);
        let config = quick();
        let frog = Npc::new(4, FROG, "Frog");
        handler.on_interacting_changed(&change(frog.clone()), &config, &mut rng);

        handler.on_npc_despawned(&Npc::new(5, FROG, "Frog"));
        assert!(handler.is_active());

        handler.on_npc_despawned(&frog);
        assert!(!handler.is_active());
        assert!(handler.tracked().is_none());
        assert_eq!(
            handler.tick(&WorldSnapshot::new(), &config, &mut rng),
            InterruptTick::Inactive
        );
    }

    #[test]
    fn repeated_events_keep_the_running_countdown() {
        let mut handler = InterruptHandler::default();
        let mut rng = StdRng::seed_from_u64(4);
        let config = quick();
        let frog = Npc::new(4, FROG, "Frog");

        assert!(handler.on_interacting_changed(&change(frog.clone()), &config, &mut rng));
        handler.tick(&WorldSnapshot::new(), &config, &mut rng);
        assert!(!handler.on_interacting_changed(&change(frog), &config, &mut rng));
        assert_eq!(handler.countdown(), 0);
    }

    #[test]
    fn base_genie_id_is_talked_to() {
        let mut handler = InterruptHandler::default();
        let mut rng = StdRng::seed_from_u64(5);
        let config = quick();
        let genie = Npc::new(11, NpcId(326), "Genie");

        assert!(handler.on_interacting_changed(&change(genie.clone()), &config, &mut rng));
        let action = run_until_action(&mut handler, &WorldSnapshot::new(), &config, &mut rng);
        assert_eq!(action.intent, dismiss(&genie, Verb::TalkTo));
    }

    #[test]
    fn oversized_tick_delay_saturates() {
        let mut handler = InterruptHandler::default();
        let mut rng = StdRng::seed_from_u64(6);
        let config = InterruptConfig {
            ticks: crate::random::DelayDistribution::new(false, u64::MAX, u64::MAX, 0, u64::MAX),
            ..InterruptConfig::default()
        };

        assert!(handler.on_interacting_changed(&change(Npc::new(4, FROG, "Frog")), &config, &mut rng));
        assert_eq!(handler.countdown(), u32::MAX);

        handler.countdown = 0;
        assert!(matches!(
            handler.tick(&WorldSnapshot::new(), &config, &mut rng),
            InterruptTick::Acted(_)
        ));
        assert_eq!(handler.countdown(), u32::MAX);
    }
}
