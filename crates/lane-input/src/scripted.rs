use std::collections::VecDeque;

use lane_model::LaneId;

use crate::{InputSource, KeyBindings, KeyEvent, KeyInputLog, KeyStateTable};

/// Input source that delivers pre-recorded or programmatically injected
/// transitions.
///
/// Events either go straight to the pending queue (`press`, `release`, `push`)
/// or sit in a time-sorted script until `advance_to` reaches them.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    script: VecDeque<KeyEvent>,
    pending: Vec<KeyEvent>,
    keys: KeyStateTable,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script of events to release over time. Sorted stably by time.
    pub fn from_events(mut events: Vec<KeyEvent>) -> Self {
        events.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            script: events.into(),
            ..Self::default()
        }
    }

    /// Script from a replay log. Entries for unbound keys are dropped.
    pub fn from_log(log: &[KeyInputLog], bindings: &KeyBindings) -> Self {
        Self::from_events(log.iter().filter_map(|e| e.to_event(bindings)).collect())
    }

    pub fn press(&mut self, lane: LaneId, time: f64) {
        self.push(KeyEvent::down(lane, time));
    }

    pub fn release(&mut self, lane: LaneId, time: f64) {
        self.push(KeyEvent::up(lane, time));
    }

    /// Deliver an event on the next poll. Redundant edges are dropped.
    pub fn push(&mut self, event: KeyEvent) {
        if self.keys.apply(&event) {
            self.pending.push(event);
        } else {
            log::trace!("Dropping redundant {:?} on {}", event.transition, event.lane);
        }
    }

    /// Release every scripted event with `time <= now`.
    pub fn advance_to(&mut self, now: f64) {
        while self.script.front().is_some_and(|e| e.time <= now) {
            if let Some(event) = self.script.pop_front() {
                self.push(event);
            }
        }
    }

    /// Scripted events not yet released.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.script.is_empty() && self.pending.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll_events(&mut self) -> Vec<KeyEvent> {
        std::mem::take(&mut self.pending)
    }

    fn is_down(&self, lane: LaneId) -> bool {
        self.keys.is_down(lane)
    }
}
