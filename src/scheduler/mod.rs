//! Scheduler queue snapshots.
//!
//! Turns the tab-separated output of `squeue` into [`Job`] records:
//! - [`parse_queue`]: pure parser over raw text
//! - [`fetch_queue`]: runs `squeue` through a [`CommandRunner`](crate::runner::CommandRunner)
//!   and parses the result

pub mod job;
pub mod queue;

pub use job::{format_pending, Job, JobStatus};
pub use queue::{fetch_queue, parse_queue, QueueFormat};
