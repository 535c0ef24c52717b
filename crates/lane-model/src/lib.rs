// Lanes, chart notes, chart files and the spawn feed

mod chart;
mod lane;
mod note;

pub use chart::{Chart, ChartFeed};
pub use lane::{LANE_COUNT, LaneId};
pub use note::NoteSpec;
