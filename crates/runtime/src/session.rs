//! Tick driver.
//!
//! [`Session`] owns the decision engine, the interrupt handler, the session
//! state and the RNG, and serializes them into one evaluation per tick:
//!
//! 1. skip if the world is not playable or the emitter is still busy
//! 2. discard any action the host did not deliver since the last tick
//! 3. let the interrupt handler run; if it is active the engine does not
//! 4. otherwise evaluate the engine and forward its decision to the emitter
//!
//! Event-driven collaborators reach the state only through the `on_*`
//! methods.
use furnace_core::ids::widget;
use furnace_core::{
    BotState, Decision, DecisionEngine, InputCommand, Intent, Interaction, InteractionChange,
    InterruptHandler, InterruptTick, Notice, Npc, SessionEvent, SessionState, Target, Verb,
    WorldView,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::api::{ActionEmitter, Result};
use crate::config::RuntimeConfig;
use crate::stats::SessionStats;

/// Why a tick did not reach either decision component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    NotPlayable,
    EmitterBusy,
}

/// What one call to [`Session::tick`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Skipped(SkipReason),
    Interrupt(InterruptTick),
    Decision(Decision),
}

impl TickOutcome {
    /// The intent handed to the emitter this tick, if any.
    pub fn intent(&self) -> Option<&Intent> {
        match self {
            TickOutcome::Skipped(_) => None,
            TickOutcome::Interrupt(InterruptTick::Acted(action)) => Some(&action.intent),
            TickOutcome::Interrupt(_) => None,
            TickOutcome::Decision(decision) => decision.intent.as_ref(),
        }
    }

    pub fn state(&self) -> Option<BotState> {
        match self {
            TickOutcome::Decision(decision) => decision.state,
            _ => None,
        }
    }
}

pub struct Session {
    config: RuntimeConfig,
    engine: DecisionEngine,
    interrupt: InterruptHandler,
    state: SessionState,
    rng: StdRng,
    stats: SessionStats,
    /// Notices already surfaced since the reported state last changed.
    surfaced: Vec<Notice>,
    last_reported: Option<BotState>,
}

impl Session {
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        tracing::info!(
            seed = ?config.seed,
            delay_amount = config.bot.delay_amount,
            coffer_amount = config.bot.coffer_amount,
            dismiss_all = config.bot.interrupt.policy.dismiss_all,
            "session started"
        );

        Ok(Self {
            engine: DecisionEngine::new(config.bot.clone()),
            interrupt: InterruptHandler::from_config(&config.bot.interrupt),
            config,
            state: SessionState::new(),
            rng,
            stats: SessionStats::new(),
            surfaced: Vec::new(),
            last_reported: None,
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn interrupt(&self) -> &InterruptHandler {
        &self.interrupt
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Runs one tick against `world`, forwarding any action to `emitter`.
    pub fn tick(&mut self, world: &dyn WorldView, emitter: &mut dyn ActionEmitter) -> TickOutcome {
        if !world.is_playable() {
            self.stats.record_skip();
            return TickOutcome::Skipped(SkipReason::NotPlayable);
        }
        if emitter.is_busy() {
            tracing::debug!("emitter busy, skipping tick");
            self.stats.record_skip();
            return TickOutcome::Skipped(SkipReason::EmitterBusy);
        }

        if let Some(stale) = self.state.discard_pending() {
            tracing::warn!(discarded = stale.label(), "discarding undelivered pending action");
        }

        let interrupt = self
            .interrupt
            .tick(world, &self.config.bot.interrupt, &mut self.rng);
        if interrupt.suppresses_engine() {
            tracing::debug!(
                phase = %self.interrupt.phase(),
                countdown = self.interrupt.countdown(),
                npc = self.interrupt.tracked().map(|npc| npc.name.as_str()).unwrap_or("-"),
                "random event owns the tick"
            );
            if let InterruptTick::Acted(action) = &interrupt {
                emitter.submit(&action.intent);
                emitter.perform(&action.click);
            }
            self.stats
                .record_interrupt(matches!(interrupt, InterruptTick::Acted(_)));
            return TickOutcome::Interrupt(interrupt);
        }

        let decision = self.engine.evaluate(world, &mut self.state, &mut self.rng);

        if let Some(state) = decision.state
            && self.last_reported != decision.state
        {
            tracing::info!(%state, rule = decision.rule().unwrap_or("-"), "state changed");
        }

        self.forward(&decision, emitter);
        self.stats.record_decision(&decision);
        TickOutcome::Decision(decision)
    }

    fn forward(&mut self, decision: &Decision, emitter: &mut dyn ActionEmitter) {
        if let Some(intent) = &decision.intent {
            emitter.submit(intent);
        }
        for input in &decision.inputs {
            emitter.perform(input);
        }

        if self.last_reported != decision.state {
            self.surfaced.clear();
            self.last_reported = decision.state;
        }
        for notice in &decision.notices {
            if self.surfaced.contains(notice) {
                tracing::debug!(%notice, "notice already surfaced");
                continue;
            }
            if notice.kind.needs_human() {
                tracing::error!(%notice, "loop blocked until a human intervenes");
            } else {
                tracing::warn!(%notice, "notice");
            }
            emitter.notify(notice);
            self.surfaced.push(notice.clone());
            self.stats.record_notice(notice.kind);
        }
    }

    /// The host delivered the pending action.
    ///
    /// Consumes it, updates the container flag for fill and empty
    /// interactions, and starts a fresh cooldown. Ignored while the interrupt
    /// handler owns the client.
    pub fn on_action_dispatched(&mut self) -> Option<Intent> {
        if self.interrupt.is_active() {
            tracing::debug!("not overriding click during random event");
            return None;
        }
        let intent = self.state.take_pending(self.config.bot.aux_container)?;
        self.state.cooldown = self.config.bot.cooldown(&mut self.rng);
        self.stats.record_dispatch();
        tracing::info!(
            action = intent.label(),
            aux_full = self.state.aux_full,
            cooldown = self.state.cooldown,
            "action dispatched"
        );
        Some(intent)
    }

    pub fn on_event(&mut self, event: &SessionEvent) {
        tracing::debug!(?event, "session event");
        self.state.apply(event);
    }

    pub fn on_interacting_changed(&mut self, change: &InteractionChange) -> bool {
        self.interrupt
            .on_interacting_changed(change, &self.config.bot.interrupt, &mut self.rng)
    }

    pub fn on_npc_despawned(&mut self, npc: &Npc) {
        self.interrupt.on_npc_despawned(npc);
    }

    /// Reacts to an interface group loading.
    ///
    /// The make-product panel queues taking the product; the dialogue option
    /// list queues the deposit-coins option. Other groups are ignored.
    pub fn on_widget_loaded(&mut self, group: u16, emitter: &mut dyn ActionEmitter) -> Option<Intent> {
        let intent = match group {
            widget::group::MAKE_PRODUCT => widget_action(widget::MAKE_PRODUCT, -1, Verb::Use),
            widget::group::DIALOGUE_OPTIONS => {
                widget_action(widget::DIALOGUE_OPTIONS, 1, Verb::Select)
            }
            _ => return None,
        };
        tracing::debug!(group, action = intent.label(), "widget loaded");

        self.state.pending = Some(intent.clone());
        emitter.submit(&intent);
        emitter.perform(&InputCommand::center_click());
        Some(intent)
    }

    /// Drops any undelivered action, e.g. when the host stops the session.
    pub fn stop(&mut self) {
        if let Some(intent) = self.state.discard_pending() {
            tracing::warn!(discarded = intent.label(), "session stopped with a pending action");
        }
        tracing::info!(
            ticks = self.stats.ticks(),
            submitted = self.stats.submitted(),
            dispatched = self.stats.dispatched(),
            "session stopped"
        );
    }
}

fn widget_action(widget: furnace_core::WidgetId, index: i32, verb: Verb) -> Intent {
    Intent::Interact(Interaction::new(Target::Widget { widget, index }, verb))
}

#[cfg(test)]
mod tests {
    use furnace_core::ids::item;
    use furnace_core::WorldSnapshot;

    use super::*;
    use crate::api::RecordingEmitter;

    fn session() -> Session {
        Session::new(RuntimeConfig {
            seed: Some(1),
            ..RuntimeConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn unplayable_world_is_skipped() {
        let mut session = session();
        let mut emitter = RecordingEmitter::new();
        let world = WorldSnapshot {
            playable: false,
            ..WorldSnapshot::default()
        };

        let outcome = session.tick(&world, &mut emitter);

        assert_eq!(outcome, TickOutcome::Skipped(SkipReason::NotPlayable));
        assert!(emitter.emitted.is_empty());
    }

    #[test]
    fn busy_emitter_is_skipped() {
        let mut session = session();
        let mut emitter = RecordingEmitter {
            busy: true,
            ..RecordingEmitter::default()
        };

        let outcome = session.tick(&WorldSnapshot::new(), &mut emitter);

        assert_eq!(outcome, TickOutcome::Skipped(SkipReason::EmitterBusy));
        assert_eq!(session.stats().skipped(), 1);
    }

    #[test]
    fn make_product_panel_queues_taking_bars() {
        let mut session = session();
        let mut emitter = RecordingEmitter::new();

        let intent = session
            .on_widget_loaded(widget::group::MAKE_PRODUCT, &mut emitter)
            .unwrap();

        assert_eq!(intent, widget_action(widget::MAKE_PRODUCT, -1, Verb::Use));
        assert_eq!(session.state().pending.as_ref(), Some(&intent));
        assert_eq!(emitter.inputs().count(), 1);
        assert!(
            session
                .on_widget_loaded(widget::group::CHATBOX, &mut emitter)
                .is_none()
        );
    }

    #[test]
    fn dispatching_a_fill_sets_the_flag_and_cooldown() {
        let mut session = session();
        session.state.pending = Some(Intent::Interact(Interaction::new(
            Target::InventoryItem {
                item: item::COAL_BAG,
                slot: 0,
            },
            Verb::Fill,
        )));

        assert!(session.on_action_dispatched().is_some());
        assert!(session.state().aux_full);
        assert!((1..=3).contains(&session.state().cooldown));
        assert!(session.on_action_dispatched().is_none());
        assert_eq!(session.stats().dispatched(), 1);
    }
}
