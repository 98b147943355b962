//! Per-session counters.
//!
//! Tracks how ticks were spent and how many actions were emitted and
//! delivered, for log summaries and replay reports.
use std::collections::BTreeMap;

use furnace_core::{BotState, Decision, NoticeKind};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Every tick the driver was called for.
    ticks: u64,

    /// Ticks skipped because the world was not playable or the emitter was busy
    skipped: u64,

    /// Ticks owned by the interrupt handler
    interrupted: u64,

    /// Engine ticks that matched no state
    idle: u64,

    by_state: BTreeMap<BotState, u64>,

    /// Intents handed to the emitter, interrupt actions included
    submitted: u64,

    /// Intents the host reported as delivered
    dispatched: u64,

    /// Notices surfaced after de-duplication
    notices: u64,

    /// Surfaced notices that stop the loop until a human steps in
    needs_human: u64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_skip(&mut self) {
        self.ticks += 1;
        self.skipped += 1;
    }

    pub fn record_interrupt(&mut self, acted: bool) {
        self.ticks += 1;
        self.interrupted += 1;
        if acted {
            self.submitted += 1;
        }
    }

    pub fn record_decision(&mut self, decision: &Decision) {
        self.ticks += 1;
        match decision.state {
            Some(state) => *self.by_state.entry(state).or_default() += 1,
            None => self.idle += 1,
        }
        if decision.intent.is_some() {
            self.submitted += 1;
        }
    }

    pub fn record_dispatch(&mut self) {
        self.dispatched += 1;
    }

    pub fn record_notice(&mut self, kind: NoticeKind) {
        self.notices += 1;
        if kind.needs_human() {
            self.needs_human += 1;
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn interrupted(&self) -> u64 {
        self.interrupted
    }

    pub fn idle(&self) -> u64 {
        self.idle
    }

    /// Ticks that reported `state`.
    pub fn state_ticks(&self, state: BotState) -> u64 {
        self.by_state.get(&state).copied().unwrap_or(0)
    }

    pub fn by_state(&self) -> impl Iterator<Item = (BotState, u64)> + '_ {
        self.by_state.iter().map(|(&state, &count)| (state, count))
    }

    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    pub fn notices(&self) -> u64 {
        self.notices
    }

    pub fn needs_human(&self) -> u64 {
        self.needs_human
    }
}
