pub mod constants;
pub mod math;
pub mod time;
