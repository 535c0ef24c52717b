// Deterministic frame loop: spawn feed -> dispatcher -> tally.

use std::rc::Rc;

use anyhow::{Context, Result, bail};
use lane_config::PlayConfig;
use lane_input::ScriptedInput;
use lane_model::{Chart, ChartFeed};
use lane_rule::{JudgeDispatcher, JudgeEvent, JudgeTally};
use lane_timing::{Clock, ManualClock};

/// Seconds past the last note end after which an unsettled run is a bug.
const SETTLE_LIMIT: f64 = 10.0;

pub struct Simulation {
    feed: ChartFeed,
    dispatcher: JudgeDispatcher<Rc<ManualClock>, ScriptedInput>,
    clock: Rc<ManualClock>,
    start: f64,
    step: f64,
    frame: u64,
    tally: JudgeTally,
}

impl Simulation {
    pub fn new(chart: Chart, input: ScriptedInput, config: &PlayConfig) -> Result<Self> {
        let windows = config.judge_windows()?;
        let feed = ChartFeed::new(chart, config.spawn_offset);
        let start = feed.first_note_time().unwrap_or(0.0).min(0.0) - feed.spawn_offset();
        let clock = Rc::new(ManualClock::starting_at(start));
        let dispatcher = JudgeDispatcher::new(windows, Rc::clone(&clock), input);
        log::debug!(
            "Simulating from {start:.3}s at {} fps, {} notes",
            config.frame_rate,
            feed.remaining()
        );
        Ok(Self {
            feed,
            dispatcher,
            clock,
            start,
            step: config.frame_step(),
            frame: 0,
            tally: JudgeTally::new(),
        })
    }

    /// Song position of the next frame.
    fn frame_time(&self) -> f64 {
        self.start + self.frame as f64 * self.step
    }

    /// Nothing left to spawn or judge.
    pub fn is_finished(&self) -> bool {
        self.feed.is_exhausted() && self.dispatcher.is_idle()
    }

    /// Advance one frame and return the outcomes decided in it.
    pub fn step(&mut self) -> Result<Vec<JudgeEvent>> {
        let now = self.frame_time();
        if now > self.feed.last_event_time() + SETTLE_LIMIT {
            bail!(
                "simulation still has {} pending notes at {now:.3}s",
                self.dispatcher.pending_count()
            );
        }
        self.clock.set_time(now);

        for note in self.feed.due(now) {
            self.dispatcher
                .register(note)
                .with_context(|| format!("Failed to register note at {:.3}s", note.time))?;
        }
        self.dispatcher.input_mut().advance_to(now);
        let events = self.dispatcher.tick();
        self.tally.record_all(&events);
        self.frame += 1;
        Ok(events)
    }

    /// Run to completion.
    pub fn run(mut self) -> Result<JudgeTally> {
        while !self.is_finished() {
            self.step()?;
        }
        Ok(self.into_tally())
    }

    pub fn into_tally(self) -> JudgeTally {
        log::info!(
            "Judged {} notes in {} frames ending at {:.3}s",
            self.tally.total(),
            self.frame,
            self.clock.now()
        );
        self.tally
    }
}
