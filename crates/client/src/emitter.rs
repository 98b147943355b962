use furnace_core::{Intent, Key, Notice, Rect};
use runtime::ActionEmitter;

/// Emitter for replays with no game client attached.
///
/// Every action becomes a log line; notices are also collected so the
/// binary can print them at the end.
#[derive(Debug, Default)]
pub struct LoggingEmitter {
    notices: Vec<Notice>,
    inputs: u64,
}

impl LoggingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Number of low-level input commands performed.
    pub fn inputs(&self) -> u64 {
        self.inputs
    }
}

impl ActionEmitter for LoggingEmitter {
    fn submit(&mut self, intent: &Intent) {
        tracing::info!(intent = intent.label(), ?intent, "submit");
    }

    fn type_text(&mut self, text: &str) {
        self.inputs += 1;
        tracing::debug!(text, "type");
    }

    fn press_key(&mut self, key: Key) {
        self.inputs += 1;
        tracing::debug!(?key, "press");
    }

    fn click_random_point(&mut self, min_offset: i32, max_offset: i32) {
        self.inputs += 1;
        tracing::debug!(min_offset, max_offset, "click near center");
    }

    fn click_within(&mut self, bounds: Rect, delay_ms: u64) {
        self.inputs += 1;
        tracing::debug!(?bounds, delay_ms, "click");
    }

    fn sleep(&mut self, min_ms: u64, max_ms: u64) {
        self.inputs += 1;
        tracing::trace!(min_ms, max_ms, "sleep");
    }

    fn toggle_run(&mut self) {
        self.inputs += 1;
        tracing::debug!("toggle run");
    }

    fn notify(&mut self, notice: &Notice) {
        tracing::warn!(kind = %notice.kind, "{}", notice.message);
        self.notices.push(notice.clone());
    }
}

#[cfg(test)]
mod tests {
    use furnace_core::{InputCommand, NoticeKind};

    use super::*;

    #[test]
    fn counts_inputs_and_keeps_notices() {
        let mut emitter = LoggingEmitter::new();
        emitter.perform(&InputCommand::center_click());
        emitter.perform(&InputCommand::sleep(10, 50));
        emitter.notify(&Notice::new(NoticeKind::ResourceExhausted, "Out of ore, log off"));

        assert_eq!(emitter.inputs(), 2);
        assert_eq!(emitter.notices().len(), 1);
        assert_eq!(emitter.notices()[0].message, "Out of ore, log off");
    }
}
