pub mod constants;
pub mod progress;
pub mod rounding;

pub use constants::*;
pub use progress::ProgressReporter;
pub use rounding::{mean, round_half_away, round_to};
