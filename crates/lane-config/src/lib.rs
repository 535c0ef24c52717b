// Play configuration (judge windows, spawn lookahead, key layout, frame rate)

pub mod play_config;

pub use play_config::PlayConfig;
