//! External process invocation.
//!
//! Everything that shells out (`squeue` locally, `ssh` for remote hosts) goes through the
//! [`CommandRunner`] trait so tests can substitute canned output.
//!
//! # Components
//!
//! - [`CommandRunner`]: run a program, returning stdout or a typed failure
//! - [`ProcessRunner`]: the real implementation on top of `tokio::process`
//!
//! A non-zero exit or a spawn failure becomes
//! [`DashboardError::Retrieval`](crate::error::DashboardError::Retrieval) with the captured
//! stderr attached, so callers can tell "the command failed" apart from "no output".

pub mod process;

use async_trait::async_trait;

use crate::error::Result;

pub use process::ProcessRunner;

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` to completion and return its stdout.
    async fn run(&self, program: &str, args: &[String]) -> Result<String>;
}
