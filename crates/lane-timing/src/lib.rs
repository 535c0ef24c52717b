//! Song-position clocks.
//!
//! Every judgment computation reads time through [`Clock`]. Timeouts are pure
//! functions of this time, so pausing the clock pauses them as well.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of the current song position.
/// Implementations: SystemClock (production), ManualClock (replays and testing).
pub trait Clock {
    /// Current song position in seconds. Monotonic non-decreasing while running.
    fn now(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

/// Wall-clock song position that can be paused and resumed.
///
/// Time spent paused is excluded from the position.
pub struct SystemClock {
    start: Instant,
    origin: f64,
    paused_at: Cell<Option<Instant>>,
    paused_total: Cell<Duration>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Clock whose position is `origin` seconds at the moment of creation.
    pub fn starting_at(origin: f64) -> Self {
        Self {
            start: Instant::now(),
            origin,
            paused_at: Cell::new(None),
            paused_total: Cell::new(Duration::ZERO),
        }
    }

    pub fn pause(&self) {
        if self.paused_at.get().is_none() {
            self.paused_at.set(Some(Instant::now()));
            log::debug!("Clock paused at {:.3}s", self.now());
        }
    }

    pub fn resume(&self) {
        if let Some(at) = self.paused_at.take() {
            self.paused_total.set(self.paused_total.get() + at.elapsed());
            log::debug!("Clock resumed at {:.3}s", self.now());
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.get().is_some()
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        let until = self.paused_at.get().unwrap_or_else(Instant::now);
        let running = until
            .saturating_duration_since(self.start)
            .saturating_sub(self.paused_total.get());
        self.origin + running.as_secs_f64()
    }
}

/// Clock driven explicitly by the caller, for replays and deterministic tests.
pub struct ManualClock {
    current: Cell<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    pub fn starting_at(time: f64) -> Self {
        Self {
            current: Cell::new(time),
        }
    }

    pub fn set_time(&self, time: f64) {
        debug_assert!(
            time >= self.current.get(),
            "clock moved backwards: {} -> {time}",
            self.current.get()
        );
        self.current.set(time);
    }

    pub fn advance(&self, delta: f64) {
        debug_assert!(delta >= 0.0, "negative clock advance: {delta}");
        self.current.set(self.current.get() + delta);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.current.get()
    }
}
