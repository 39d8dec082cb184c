//! Timing primitives shared by the data sources
//!
//! - [`limiter`]: trailing-edge suppression of rapid repeated calls
//! - [`readiness`]: one-shot readiness latch

pub mod limiter;
pub mod readiness;

pub use limiter::{CallLimiter, CallLimiterHandle};
pub use readiness::Readiness;
