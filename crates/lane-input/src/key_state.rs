use lane_model::{LANE_COUNT, LaneId};

use crate::{KeyEvent, KeyTransition};

/// Per-lane key state, fed by edge events.
///
/// Redundant edges (a press while already down, a release while already up)
/// are rejected so consumers see one event per physical transition.
#[derive(Debug, Clone, Default)]
pub struct KeyStateTable {
    pressed: [bool; LANE_COUNT],
}

impl KeyStateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a transition. Returns `false` and leaves the state untouched for a
    /// redundant edge.
    pub fn apply(&mut self, event: &KeyEvent) -> bool {
        let pressed = event.transition == KeyTransition::Down;
        let key = &mut self.pressed[event.lane.index()];
        if *key == pressed {
            return false;
        }
        *key = pressed;
        true
    }

    pub fn is_down(&self, lane: LaneId) -> bool {
        self.pressed[lane.index()]
    }
}
