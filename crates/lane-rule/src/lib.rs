// Judge windows, lane queues, note and hold judgment, outcome tally

mod hold_judge;
mod judge_dispatcher;
mod judge_event;
mod judge_tally;
mod lane_queue;
mod note_judge;
mod timing_policy;

pub use hold_judge::HoldJudge;
pub use judge_dispatcher::JudgeDispatcher;
pub use judge_event::{HoldOutcome, JudgeEvent, NoteId, NoteOutcome};
pub use judge_tally::JudgeTally;
pub use lane_queue::{
    HoldPhase, InstantNoteState, LaneQueue, LaneSlot, LaneSlots, LongNoteState, Scheduled,
};
pub use note_judge::NoteJudge;
pub use timing_policy::{
    DEFAULT_GOOD_WINDOW, DEFAULT_MISS_WINDOW, DEFAULT_PERFECT_WINDOW, JudgeWindows, Tier, classify,
};
