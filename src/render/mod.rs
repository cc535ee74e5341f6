//! Presentation of the aggregated dashboard.
//!
//! - [`swiftbar`]: SwiftBar/xbar plugin markup for the macOS menu bar
//! - [`delta`]: human wording for elapsed times

pub mod delta;
pub mod swiftbar;

pub use delta::natural_delta;
pub use swiftbar::{render, SelfInvocation};
