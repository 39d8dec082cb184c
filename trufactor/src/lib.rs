//! # Trufactor (demo mode)
//!
//! A stand-in for the Trufactor analytics client that serves canned data with
//! simulated latency, so UI code can be exercised without network access or
//! credentials.
//!
//! ## Overview
//!
//! - [`DemoDataSource`]: becomes ready shortly after construction, then
//!   answers [`DataSource::get_data`] with a fixed [`Dataset`] after a
//!   simulated fetch delay, running any attached [`Hooks`] in a fixed order
//! - [`CallLimiter`]: trailing-edge suppression of rapid repeated calls, used
//!   for progress updates
//! - Backend-only operations (points of interest, address lookup, speech,
//!   intent, caching, strategies, indexes) fail with
//!   [`DataSourceError::UnsupportedInDemoMode`]
//!
//! ## Quick Start
//!
//! ```
//! use std::time::Duration;
//! use trufactor::{DataSource, DemoDataSource, HookPoint};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> trufactor::Result<()> {
//! let source = DemoDataSource::builder()
//!     .ready_delay(Duration::ZERO)
//!     .fetch_delay(Duration::from_millis(5))
//!     .build()?;
//!
//! source.hooks().set_after_strategy(|dataset| {
//!     assert!(!dataset.features.is_empty());
//!     Ok(())
//! });
//! assert_eq!(source.hooks().attached(), vec![HookPoint::AfterStrategy]);
//!
//! source.loaded().await;
//! let dataset = source.get_data().await?;
//! println!("{} features for {}", dataset.features.len(), source.selected_date());
//! # Ok(())
//! # }
//! ```
//!
//! ## Hook Order
//!
//! Each fetch runs attached hooks in [`HookPoint::ORDER`]:
//! `beforeGetData`, `beforeStrategy`, `afterStrategy`, `beforeSupplementary`,
//! `beforeCaching`, `afterCaching`, `afterSupplementary`, `afterGetData`.
//! A hook returning an error aborts that fetch with [`DataSourceError::Hook`].
//!
//! ## Runtime
//!
//! Construction spawns timer tasks, so it must happen inside a tokio runtime.

pub mod core;
pub mod dataset;
pub mod error;
pub mod filters;
pub mod source;

pub use crate::core::{CallLimiter, CallLimiterHandle, Readiness};
pub use dataset::{Dataset, Feature, FeatureSet};
pub use error::{DataSourceError, Result};
pub use filters::Filters;
pub use source::{
    DataSource, DateCursor, DemoDataSource, DemoDataSourceBuilder, HookPoint, Hooks, Operation,
};
