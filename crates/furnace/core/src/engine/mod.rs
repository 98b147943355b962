//! Per-tick decision engine.
//!
//! [`DecisionEngine::evaluate`] inspects one world observation together with
//! the [`SessionState`] and produces a [`Decision`]: at most one [`Intent`],
//! a reported [`BotState`], low-level input commands, and notices.
//!
//! The branching logic lives in ordered rule tables (see [`rules`]). Each
//! table is first-match, so a rule may rely on every earlier guard in its
//! table having been false. The rule names that fired, outermost first, are
//! recorded in [`Decision::trail`].
//!
//! Missing collaborators are never errors here. A branch that needs an
//! object that is not there emits a [`Notice`] and settles on a safe state.
mod procedures;
pub mod rules;

use arrayvec::ArrayVec;
use behavior_tree::RuleTable;
use rand::RngCore;

use crate::action::{InputCommand, Intent, Notice, NoticeKind};
use crate::config::BotConfig;
use crate::ids::object;
use crate::random;
use crate::state::{BotState, SessionState};
use crate::world::WorldView;

/// Upper bound of low-level inputs a single decision may carry.
pub const MAX_INPUTS: usize = 8;
/// Upper bound of nested rule tables.
pub const MAX_TRAIL: usize = 4;

/// Everything one evaluation produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decision {
    /// Outcome tag; `None` for an idle tick.
    pub state: Option<BotState>,
    /// The single intended interaction, if any.
    pub intent: Option<Intent>,
    /// Inputs to perform, in order.
    pub inputs: ArrayVec<InputCommand, MAX_INPUTS>,
    pub notices: Vec<Notice>,
    /// Names of the rules that fired, outermost table first.
    pub trail: ArrayVec<&'static str, MAX_TRAIL>,
}

impl Decision {
    pub fn is_idle(&self) -> bool {
        self.state.is_none() && self.intent.is_none()
    }

    /// Name of the innermost rule that fired.
    pub fn rule(&self) -> Option<&'static str> {
        self.trail.last().copied()
    }
}

/// Blackboard shared by every rule of one evaluation.
pub struct DecisionContext<'a> {
    pub world: &'a dyn WorldView,
    pub config: &'a BotConfig,
    pub session: &'a mut SessionState,
    /// The agent tile changed since the previous evaluation.
    pub moved: bool,
    rng: &'a mut dyn RngCore,
    decision: Decision,
}

impl<'a> DecisionContext<'a> {
    pub fn new(
        world: &'a dyn WorldView,
        config: &'a BotConfig,
        session: &'a mut SessionState,
        rng: &'a mut dyn RngCore,
    ) -> Self {
        let moved = session.observe_position(world.local_position());
        Self {
            world,
            config,
            session,
            moved,
            rng,
            decision: Decision::default(),
        }
    }

    pub fn into_decision(self) -> Decision {
        self.decision
    }

    /// Runs the first matching rule of `table`, recording its name.
    pub fn fire(&mut self, table: &RuleTable<DecisionContext<'a>>) -> Option<&'static str> {
        let fired = table.fire_with(self, |ctx, name| {
            if ctx.decision.trail.try_push(name).is_err() {
                tracing::warn!(rule = name, "rule trail overflow");
            }
        });
        if fired.is_none() {
            tracing::debug!(table = table.name(), "no rule matched");
        }
        fired
    }

    pub fn report(&mut self, state: BotState) {
        self.decision.state = Some(state);
    }

    /// Sets the intent for this tick and marks it pending delivery.
    pub fn emit(&mut self, intent: Intent) {
        if let Some(previous) = self.decision.intent.as_ref() {
            tracing::debug!(
                replaced = previous.label(),
                by = intent.label(),
                "intent replaced within one evaluation"
            );
        }
        self.session.pending = Some(intent.clone());
        self.decision.intent = Some(intent);
    }

    pub fn input(&mut self, command: InputCommand) {
        if let Err(overflow) = self.decision.inputs.try_push(command) {
            tracing::warn!(command = ?overflow.element(), "input buffer full, dropping command");
        }
    }

    pub fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.decision.notices.push(Notice::new(kind, message));
    }

    /// Fresh cooldown, see [`BotConfig::cooldown`].
    pub fn arm_cooldown(&mut self) {
        self.session.cooldown = self.config.cooldown(&mut *self.rng);
    }

    /// Queues a pause drawn from the configured sleep shape within
    /// `[min_ms, max_ms]`.
    pub fn sleep(&mut self, min_ms: u64, max_ms: u64) {
        let ms = self.config.sleep.within(min_ms, max_ms).sample(&mut *self.rng);
        self.input(InputCommand::sleep(ms, ms));
    }

    /// Draws a uniform value in `[min, max]`.
    pub fn between(&mut self, min: u32, max: u32) -> u32 {
        random::between(&mut *self.rng, min, max)
    }
}

/// The primary decision procedure.
#[derive(Clone, Debug, Default)]
pub struct DecisionEngine {
    config: BotConfig,
}

impl DecisionEngine {
    pub fn new(config: BotConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Evaluates one tick.
    ///
    /// Records the agent position, lazily resolves the location handles,
    /// then runs the root rule table. Any intent in the result is also left
    /// in [`SessionState::pending`] until the host delivers or discards it.
    pub fn evaluate(
        &self,
        world: &dyn WorldView,
        session: &mut SessionState,
        rng: &mut dyn RngCore,
    ) -> Decision {
        let mut ctx = DecisionContext::new(world, &self.config, session, rng);
        resolve_location_handles(&mut ctx);

        let root = rules::root();
        ctx.fire(&root);

        let decision = ctx.into_decision();
        session.current = decision.state;

        match decision.state {
            Some(state) => tracing::debug!(
                %state,
                rule = decision.rule().unwrap_or("-"),
                intent = decision.intent.as_ref().map(Intent::label).unwrap_or("-"),
                cooldown = session.cooldown,
                "evaluated"
            ),
            None => tracing::debug!(rule = decision.rule().unwrap_or("-"), "idle tick"),
        }
        decision
    }
}

fn resolve_location_handles(ctx: &mut DecisionContext<'_>) {
    if ctx.session.has_location_handles() {
        return;
    }
    let conveyor = ctx.world.find_nearest_object(object::CONVEYOR_BELT);
    let dispenser = ctx.world.find_nearest_object(object::BAR_DISPENSER);
    tracing::debug!(
        conveyor = conveyor.is_some(),
        dispenser = dispenser.is_some(),
        "resolving location handles"
    );
    ctx.session.set_location_handles(conveyor, dispenser);
}
