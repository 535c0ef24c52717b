use lane_model::LaneId;

/// Direction of a physical key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyTransition {
    Down,
    Up,
}

/// One physical key transition on a lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyEvent {
    pub lane: LaneId,
    pub transition: KeyTransition,
    /// Song position of the transition in seconds.
    pub time: f64,
}

impl KeyEvent {
    pub fn down(lane: LaneId, time: f64) -> Self {
        Self {
            lane,
            transition: KeyTransition::Down,
            time,
        }
    }

    pub fn up(lane: LaneId, time: f64) -> Self {
        Self {
            lane,
            transition: KeyTransition::Up,
            time,
        }
    }

    pub fn is_down(&self) -> bool {
        self.transition == KeyTransition::Down
    }
}

/// Abstraction over input sources.
/// Implementations: ScriptedInput (replays, testing); a windowing layer feeds live keys.
pub trait InputSource {
    /// Drain the transitions observed since the last call, in arrival order.
    /// Each physical transition is delivered exactly once.
    fn poll_events(&mut self) -> Vec<KeyEvent>;

    /// Whether the lane's key is physically down right now.
    fn is_down(&self, lane: LaneId) -> bool;
}
