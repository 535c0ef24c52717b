use anyhow::{Result, bail};
use lane_input::InputSource;
use lane_model::{LaneId, NoteSpec};
use lane_timing::Clock;

use crate::{
    HoldJudge, InstantNoteState, JudgeEvent, JudgeWindows, LaneSlot, LaneSlots, LongNoteState,
    NoteId, NoteJudge,
};

/// Routes key transitions and time to the note and hold judges.
///
/// Each `tick` handles, in order: every key-down (note judgment, then hold
/// grab), every key-up (early release), then per lane the never-grabbed sweep,
/// the end-of-hold check and the instant-note expiry. Key transitions are
/// judged at their own timestamps; the sweeps use the clock.
pub struct JudgeDispatcher<C: Clock, I: InputSource> {
    windows: JudgeWindows,
    note_judge: NoteJudge,
    hold_judge: HoldJudge,
    lanes: LaneSlots,
    clock: C,
    input: I,
    next_id: u64,
}

impl<C: Clock, I: InputSource> JudgeDispatcher<C, I> {
    pub fn new(windows: JudgeWindows, clock: C, input: I) -> Self {
        Self {
            windows,
            note_judge: NoteJudge::new(windows),
            hold_judge: HoldJudge::new(windows),
            lanes: LaneSlots::new(),
            clock,
            input,
            next_id: 0,
        }
    }

    /// Register a chart note, routed by duration.
    pub fn register(&mut self, spec: &NoteSpec) -> Result<NoteId> {
        if spec.is_long() {
            self.register_long_note(spec)
        } else {
            self.register_instant_note(spec)
        }
    }

    /// Append an instantaneous note to its lane. Notes on one lane must be
    /// registered in non-decreasing time order.
    pub fn register_instant_note(&mut self, spec: &NoteSpec) -> Result<NoteId> {
        if spec.is_long() {
            bail!(
                "long note at {:.3}s on {} registered as an instant note",
                spec.time,
                spec.lane
            );
        }
        if !spec.time.is_finite() {
            bail!("note on {} has non-finite time {}", spec.lane, spec.time);
        }
        let id = NoteId(self.next_id);
        self.lanes[spec.lane]
            .instant
            .push_back(InstantNoteState::new(id, spec.lane, spec.time))?;
        self.next_id += 1;
        log::trace!("{} {id}: registered at {:.3}s", spec.lane, spec.time);
        Ok(id)
    }

    /// Append a long note to its lane. Long notes on one lane must be
    /// registered in non-decreasing start order.
    pub fn register_long_note(&mut self, spec: &NoteSpec) -> Result<NoteId> {
        if !spec.is_long() {
            bail!(
                "note at {:.3}s on {} has no duration and cannot be held",
                spec.time,
                spec.lane
            );
        }
        if !spec.time.is_finite() || !spec.duration.is_finite() {
            bail!(
                "long note on {} has non-finite timing ({}, {})",
                spec.lane,
                spec.time,
                spec.duration
            );
        }
        let id = NoteId(self.next_id);
        let note = LongNoteState::new(id, spec.lane, spec.start_time(), spec.end_time());
        self.lanes[spec.lane].long.push_back(note)?;
        self.next_id += 1;
        log::trace!(
            "{} {id}: registered hold {:.3}s..{:.3}s",
            spec.lane,
            spec.start_time(),
            spec.end_time()
        );
        Ok(id)
    }

    /// Run one judgment step and return the outcomes it decided.
    pub fn tick(&mut self) -> Vec<JudgeEvent> {
        let now = self.clock.now();
        let keys = self.input.poll_events();
        let mut events = Vec::new();

        for key in keys.iter().filter(|k| k.is_down()) {
            let slot = &mut self.lanes[key.lane];
            self.note_judge.on_key_down(slot, key.time, &mut events);
            self.hold_judge.try_start_hold(slot, key.time);
        }
        for key in keys.iter().filter(|k| !k.is_down()) {
            self.hold_judge.end_hold(&mut self.lanes[key.lane], key.time, &mut events);
        }

        for slot in self.lanes.iter_mut() {
            self.hold_judge.miss_sweep(slot, now, &mut events);
            let key_down = self.input.is_down(slot.lane());
            self.hold_judge.finish_hold(slot, now, key_down, &mut events);
            self.note_judge.on_expiry(slot, now, &mut events);
            slot.debug_check_holding();
        }
        events
    }

    pub fn windows(&self) -> &JudgeWindows {
        &self.windows
    }

    pub fn lane(&self, lane: LaneId) -> &LaneSlot {
        &self.lanes[lane]
    }

    pub fn lanes(&self) -> &LaneSlots {
        &self.lanes
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Notes registered but not yet resolved.
    pub fn pending_count(&self) -> usize {
        self.lanes.iter().map(LaneSlot::pending_count).sum()
    }

    pub fn is_idle(&self) -> bool {
        self.lanes.iter().all(LaneSlot::is_idle)
    }

    /// Number of notes registered so far.
    pub fn registered_count(&self) -> u64 {
        self.next_id
    }
}
