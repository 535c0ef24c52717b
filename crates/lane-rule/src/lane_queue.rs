use std::collections::VecDeque;
use std::ops::{Index, IndexMut};

use anyhow::{Result, bail};
use lane_model::{LANE_COUNT, LaneId};

use crate::NoteId;

/// An entry that waits in a [`LaneQueue`] until a scheduled time.
pub trait Scheduled {
    fn id(&self) -> NoteId;
    /// Time the queue is ordered by.
    fn scheduled_time(&self) -> f64;
}

/// An instantaneous note awaiting its key-down.
#[derive(Debug, Clone, PartialEq)]
pub struct InstantNoteState {
    pub id: NoteId,
    pub lane: LaneId,
    pub target_time: f64,
    judged: bool,
}

impl InstantNoteState {
    pub fn new(id: NoteId, lane: LaneId, target_time: f64) -> Self {
        Self {
            id,
            lane,
            target_time,
            judged: false,
        }
    }

    pub fn is_judged(&self) -> bool {
        self.judged
    }

    /// Mark the note judged. Returns `false` if it already was.
    pub(crate) fn mark_judged(&mut self) -> bool {
        debug_assert!(!self.judged, "{} judged twice", self.id);
        !std::mem::replace(&mut self.judged, true)
    }
}

impl Scheduled for InstantNoteState {
    fn id(&self) -> NoteId {
        self.id
    }

    fn scheduled_time(&self) -> f64 {
        self.target_time
    }
}

/// Phase of a long note. Only moves forward:
/// Pending -> Holding -> Resolved, or Pending -> Resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoldPhase {
    Pending,
    Holding,
    Resolved,
}

impl HoldPhase {
    pub fn can_advance_to(self, next: HoldPhase) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Holding)
                | (Self::Pending, Self::Resolved)
                | (Self::Holding, Self::Resolved)
        )
    }
}

/// A long note from registration until it is resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct LongNoteState {
    pub id: NoteId,
    pub lane: LaneId,
    pub start_time: f64,
    pub end_time: f64,
    phase: HoldPhase,
}

impl LongNoteState {
    pub fn new(id: NoteId, lane: LaneId, start_time: f64, end_time: f64) -> Self {
        Self {
            id,
            lane,
            start_time,
            end_time,
            phase: HoldPhase::Pending,
        }
    }

    pub fn phase(&self) -> HoldPhase {
        self.phase
    }

    /// Move to `next`. An illegal transition leaves the phase unchanged and
    /// returns `false`.
    pub(crate) fn advance(&mut self, next: HoldPhase) -> bool {
        let legal = self.phase.can_advance_to(next);
        debug_assert!(legal, "{}: illegal transition {:?} -> {:?}", self.id, self.phase, next);
        if legal {
            self.phase = next;
        }
        legal
    }
}

impl Scheduled for LongNoteState {
    fn id(&self) -> NoteId {
        self.id
    }

    fn scheduled_time(&self) -> f64 {
        self.start_time
    }
}

/// FIFO of notes ordered by non-decreasing scheduled time.
#[derive(Debug, Clone)]
pub struct LaneQueue<T> {
    entries: VecDeque<T>,
}

impl<T: Scheduled> LaneQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Append at the tail. Fails if `entry` is scheduled before the current tail.
    pub fn push_back(&mut self, entry: T) -> Result<()> {
        if let Some(tail) = self.entries.back()
            && entry.scheduled_time() < tail.scheduled_time()
        {
            bail!(
                "{} at {:.3}s registered after {} at {:.3}s",
                entry.id(),
                entry.scheduled_time(),
                tail.id(),
                tail.scheduled_time()
            );
        }
        self.entries.push_back(entry);
        Ok(())
    }

    /// The only entry eligible for judgment.
    pub fn head(&self) -> Option<&T> {
        self.entries.front()
    }

    pub(crate) fn head_mut(&mut self) -> Option<&mut T> {
        self.entries.front_mut()
    }

    pub(crate) fn pop_head(&mut self) -> Option<T> {
        self.entries.pop_front()
    }

    pub(crate) fn retain_mut(&mut self, f: impl FnMut(&mut T) -> bool) {
        self.entries.retain_mut(f);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

impl<T: Scheduled> Default for LaneQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Judgment state of one lane.
#[derive(Debug, Clone)]
pub struct LaneSlot {
    lane: LaneId,
    pub(crate) instant: LaneQueue<InstantNoteState>,
    pub(crate) long: LaneQueue<LongNoteState>,
    /// Id of the long note being held. Always the head of `long`.
    pub(crate) holding: Option<NoteId>,
}

impl LaneSlot {
    pub fn new(lane: LaneId) -> Self {
        Self {
            lane,
            instant: LaneQueue::new(),
            long: LaneQueue::new(),
            holding: None,
        }
    }

    pub fn lane(&self) -> LaneId {
        self.lane
    }

    pub fn instant(&self) -> &LaneQueue<InstantNoteState> {
        &self.instant
    }

    pub fn long(&self) -> &LaneQueue<LongNoteState> {
        &self.long
    }

    pub fn holding(&self) -> Option<NoteId> {
        self.holding
    }

    pub fn pending_count(&self) -> usize {
        self.instant.len() + self.long.len()
    }

    /// No note left to judge on this lane.
    pub fn is_idle(&self) -> bool {
        self.instant.is_empty() && self.long.is_empty()
    }

    /// Check that `holding` is set exactly when the long-note head is Holding.
    pub fn debug_check_holding(&self) {
        if cfg!(debug_assertions) {
            let head = self.long.head();
            let head_holding = head.filter(|n| n.phase() == HoldPhase::Holding).map(|n| n.id);
            debug_assert_eq!(
                self.holding, head_holding,
                "{}: holding reference out of sync with queue head",
                self.lane
            );
            debug_assert!(
                self.long.iter().skip(1).all(|n| n.phase() == HoldPhase::Pending),
                "{}: non-head long note left the Pending phase",
                self.lane
            );
            debug_assert!(
                self.instant.iter().all(|n| !n.is_judged()),
                "{}: judged note still queued",
                self.lane
            );
        }
    }
}

/// The six lane slots, indexed by [`LaneId`].
#[derive(Debug, Clone)]
pub struct LaneSlots([LaneSlot; LANE_COUNT]);

impl LaneSlots {
    pub fn new() -> Self {
        Self(LaneId::ALL.map(LaneSlot::new))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LaneSlot> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LaneSlot> {
        self.0.iter_mut()
    }
}

impl Default for LaneSlots {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<LaneId> for LaneSlots {
    type Output = LaneSlot;

    fn index(&self, lane: LaneId) -> &LaneSlot {
        &self.0[lane.index()]
    }
}

impl IndexMut<LaneId> for LaneSlots {
    fn index_mut(&mut self, lane: LaneId) -> &mut LaneSlot {
        &mut self.0[lane.index()]
    }
}
