pub mod ball;
pub mod cue;
pub mod geometry;
pub mod outcome;
pub mod rack;
pub mod snapshot;
pub mod table;
