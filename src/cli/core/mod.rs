//! Commands for inspecting timed lyrics without playing anything

pub mod locate;
pub mod parse;
