//! Recently active experiments.
//!
//! An experiment is a directory under the experiments root. Its activity time is the
//! newest `output/*.txt` artifact, or the directory mtime when there are no artifacts.
//! [`RecencyFilter`] keeps the ones that are recent by both creation and activity and that
//! are not already visible in the scheduler queue.

pub mod activity;
pub mod recent;

pub use activity::{creation_time, last_activity_time, OUTPUT_PATTERN};
pub use recent::{Experiment, RecencyFilter};
