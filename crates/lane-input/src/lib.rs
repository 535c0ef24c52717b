// Key transitions, per-lane key state, key bindings and replayable input

mod bindings;
mod event;
mod key_input_log;
mod key_state;
mod scripted;

pub use bindings::{DEFAULT_KEYS, KeyBindings};
pub use event::{InputSource, KeyEvent, KeyTransition};
pub use key_input_log::{KeyInputLog, read_log, write_log};
pub use key_state::KeyStateTable;
pub use scripted::ScriptedInput;
