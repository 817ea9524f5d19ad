//! Commands that follow lyrics along a running playback clock

pub mod play;
