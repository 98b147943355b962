//! Delivery of decisions to the host client.
//!
//! The session hands every intent, input command and notice to an
//! [`ActionEmitter`]. Emission is fire-and-forget: the host reports actual
//! delivery of the pending intent back through
//! [`crate::Session::on_action_dispatched`].
use furnace_core::{InputCommand, Intent, Key, Notice, Rect};

/// Host-side sink for actions.
///
/// Implementations may be:
/// - the live client's menu and input injector
/// - a logging sink for replays
/// - a recording fixture in tests
pub trait ActionEmitter {
    /// Queues the intended interaction for the next click.
    fn submit(&mut self, intent: &Intent);

    fn type_text(&mut self, text: &str);

    fn press_key(&mut self, key: Key);

    /// Clicks a random point offset from the viewport center.
    fn click_random_point(&mut self, min_offset: i32, max_offset: i32);

    fn click_within(&mut self, bounds: Rect, delay_ms: u64);

    fn sleep(&mut self, min_ms: u64, max_ms: u64);

    fn toggle_run(&mut self);

    fn notify(&mut self, notice: &Notice);

    /// True while a previously issued input sequence is still running.
    fn is_busy(&self) -> bool {
        false
    }

    /// Dispatches one input command to the matching method.
    fn perform(&mut self, command: &InputCommand) {
        match command {
            InputCommand::TypeText(text) => self.type_text(text),
            InputCommand::PressKey(key) => self.press_key(*key),
            InputCommand::Sleep { min_ms, max_ms } => self.sleep(*min_ms, *max_ms),
            InputCommand::ClickRandomPoint {
                min_offset,
                max_offset,
            } => self.click_random_point(*min_offset, *max_offset),
            InputCommand::ClickWithin { bounds, delay_ms } => self.click_within(*bounds, *delay_ms),
            InputCommand::ToggleRun => self.toggle_run(),
        }
    }
}

/// One thing handed to a [`RecordingEmitter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Emitted {
    Intent(Intent),
    Input(InputCommand),
    Notice(Notice),
}

/// Emitter that keeps everything it receives, in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingEmitter {
    pub emitted: Vec<Emitted>,
    /// Reported by [`ActionEmitter::is_busy`].
    pub busy: bool,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intents(&self) -> impl Iterator<Item = &Intent> {
        self.emitted.iter().filter_map(|entry| match entry {
            Emitted::Intent(intent) => Some(intent),
            _ => None,
        })
    }

    pub fn inputs(&self) -> impl Iterator<Item = &InputCommand> {
        self.emitted.iter().filter_map(|entry| match entry {
            Emitted::Input(input) => Some(input),
            _ => None,
        })
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.emitted.iter().filter_map(|entry| match entry {
            Emitted::Notice(notice) => Some(notice),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.emitted.clear();
    }
}

impl ActionEmitter for RecordingEmitter {
    fn submit(&mut self, intent: &Intent) {
        self.emitted.push(Emitted::Intent(intent.clone()));
    }

    fn type_text(&mut self, text: &str) {
        self.emitted
            .push(Emitted::Input(InputCommand::TypeText(text.to_owned())));
    }

    fn press_key(&mut self, key: Key) {
        self.emitted.push(Emitted::Input(InputCommand::PressKey(key)));
    }

    fn click_random_point(&mut self, min_offset: i32, max_offset: i32) {
        self.emitted.push(Emitted::Input(InputCommand::ClickRandomPoint {
            min_offset,
            max_offset,
        }));
    }

    fn click_within(&mut self, bounds: Rect, delay_ms: u64) {
        self.emitted
            .push(Emitted::Input(InputCommand::ClickWithin { bounds, delay_ms }));
    }

    fn sleep(&mut self, min_ms: u64, max_ms: u64) {
        self.emitted
            .push(Emitted::Input(InputCommand::Sleep { min_ms, max_ms }));
    }

    fn toggle_run(&mut self) {
        self.emitted.push(Emitted::Input(InputCommand::ToggleRun));
    }

    fn notify(&mut self, notice: &Notice) {
        self.emitted.push(Emitted::Notice(notice.clone()));
    }

    fn is_busy(&self) -> bool {
        self.busy
    }
}
