mod dataset;
mod learner;

pub use dataset::{Dataset, Example};
pub use learner::{EpochStats, Learner};
