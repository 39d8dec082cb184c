//! Demo-mode data source
//!
//! [`DemoDataSource`] stands in for the backend client so UI code can run
//! without network access or credentials. It becomes ready a fixed delay
//! after construction, serves a canned [`Dataset`] after a simulated fetch
//! latency, and runs the attached [`Hooks`] in their fixed order before each
//! fetch resolves.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use trufactor::{DataSource, DemoDataSource};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> trufactor::Result<()> {
//! let source = DemoDataSource::builder()
//!     .ready_delay(Duration::from_millis(10))
//!     .fetch_delay(Duration::from_millis(10))
//!     .build()?;
//!
//! source.hooks().set_after_get_data(|dataset| {
//!     println!("fetched {} features", dataset.features.len());
//!     Ok(())
//! });
//!
//! let dataset = source.get_data().await?;
//! assert_eq!(source.domain(), "demo");
//! assert_eq!(source.progress(), 100.0);
//! assert!(!dataset.features.is_empty());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::dates::DateCursor;
use super::hooks::Hooks;
use super::{DataSource, Operation};
use crate::core::{CallLimiter, CallLimiterHandle, Readiness};
use crate::dataset::Dataset;
use crate::error::{DataSourceError, Result};
use crate::filters::Filters;

pub const DEFAULT_DOMAIN: &str = "demo";
pub const DEFAULT_READY_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_PROGRESS_WINDOW: Duration = Duration::from_millis(50);

/// The single date the demo dataset covers
pub fn demo_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 4, 7).unwrap_or_default()
}

/// Builder for [`DemoDataSource`]
#[derive(Debug, Clone)]
pub struct DemoDataSourceBuilder {
    domain: String,
    ready_delay: Duration,
    fetch_delay: Duration,
    progress_window: Duration,
    dates: Vec<NaiveDate>,
    dataset: Option<Arc<Dataset>>,
    hooks: Option<Hooks>,
}

impl Default for DemoDataSourceBuilder {
    fn default() -> Self {
        DemoDataSourceBuilder {
            domain: DEFAULT_DOMAIN.to_string(),
            ready_delay: DEFAULT_READY_DELAY,
            fetch_delay: DEFAULT_FETCH_DELAY,
            progress_window: DEFAULT_PROGRESS_WINDOW,
            dates: vec![demo_date()],
            dataset: None,
            hooks: None,
        }
    }
}

impl DemoDataSourceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Time from construction until the source reports ready
    pub fn ready_delay(mut self, delay: Duration) -> Self {
        self.ready_delay = delay;
        self
    }

    /// Simulated latency of each fetch
    pub fn fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    /// Quiet window applied to progress updates
    pub fn progress_window(mut self, window: Duration) -> Self {
        self.progress_window = window;
        self
    }

    /// Dates available for selection, oldest first
    pub fn dates(mut self, dates: Vec<NaiveDate>) -> Self {
        self.dates = dates;
        self
    }

    /// Serve `dataset` instead of the embedded demo dataset
    pub fn dataset(mut self, dataset: Arc<Dataset>) -> Self {
        self.dataset = Some(dataset);
        self
    }

    /// Share an existing hook registry
    pub fn hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Build the source and start its readiness timer
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`DataSourceError::InvalidConfig`] if no dates were given
    /// - [`DataSourceError::Dataset`] if the embedded dataset fails to decode
    pub fn build(self) -> Result<DemoDataSource> {
        let dates = DateCursor::new(self.dates)?;
        let dataset = match self.dataset {
            Some(dataset) => dataset,
            None => Dataset::demo()?,
        };

        tracing::info!("Trufactor initialized in demo mode.");
        tracing::info!(
            "Trufactor initialized with latest date: {}",
            dates.last_available()
        );
        tracing::info!(
            "Trufactor dates available: {}",
            dates
                .dates()
                .iter()
                .map(NaiveDate::to_string)
                .collect::<Vec<_>>()
                .join(",")
        );

        let state = Arc::new(Mutex::new(SourceState {
            dates,
            progress: 0.0,
        }));

        let sink = Arc::clone(&state);
        let progress_limiter = CallLimiter::spawn(self.progress_window, move |fraction: f64| {
            let percent = (fraction * 100.0).clamp(0.0, 100.0);
            tracing::trace!(percent, "progress updated");
            sink.lock().progress = percent;
        });

        Ok(DemoDataSource {
            inner: Arc::new(Inner {
                domain: self.domain,
                fetch_delay: self.fetch_delay,
                dataset,
                filters: Filters::default(),
                state,
                readiness: Readiness::after(self.ready_delay),
                progress_limiter,
                hooks: self.hooks.unwrap_or_default(),
            }),
        })
    }
}

struct SourceState {
    dates: DateCursor,
    progress: f64,
}

struct Inner {
    domain: String,
    fetch_delay: Duration,
    dataset: Arc<Dataset>,
    filters: Filters,
    state: Arc<Mutex<SourceState>>,
    readiness: Readiness,
    progress_limiter: CallLimiterHandle<f64>,
    hooks: Hooks,
}

/// Data source serving canned data with simulated latency
///
/// Cloning is cheap; clones share state, hooks and timers.
#[derive(Clone)]
pub struct DemoDataSource {
    inner: Arc<Inner>,
}

impl DemoDataSource {
    /// Create a source with default settings (domain `"demo"`)
    ///
    /// Must be called from within a tokio runtime.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> DemoDataSourceBuilder {
        DemoDataSourceBuilder::new()
    }

    /// Registry of fetch hooks; attach or clear at any time
    pub fn hooks(&self) -> &Hooks {
        &self.inner.hooks
    }

    pub fn is_ready(&self) -> bool {
        self.inner.readiness.is_ready()
    }

    /// Report loading progress as a fraction in `[0, 1]`
    ///
    /// Bursts of updates are collapsed: only the last value in a burst is
    /// applied, once updates have been quiet for the progress window.
    pub fn update_progress(&self, fraction: f64) {
        if fraction.is_nan() {
            tracing::warn!("ignoring NaN progress update");
            return;
        }
        self.inner.progress_limiter.call(fraction);
    }

    pub fn dates_available(&self) -> Vec<NaiveDate> {
        self.inner.state.lock().dates.dates().to_vec()
    }

    pub fn last_available_date(&self) -> NaiveDate {
        self.inner.state.lock().dates.last_available()
    }

    pub fn selected_date_index(&self) -> usize {
        self.inner.state.lock().dates.index()
    }

    /// Speech-service token; never issued in demo mode
    pub fn cognitive_token(&self) -> Option<&str> {
        None
    }

    pub fn default_filters(&self) -> &Filters {
        &self.inner.filters
    }

    fn set_progress(&self, percent: f64) {
        self.inner.state.lock().progress = percent;
    }

    fn unsupported(&self, operation: Operation) -> Result<Value> {
        tracing::warn!(%operation, "operation not available in demo mode");
        Err(DataSourceError::UnsupportedInDemoMode { operation })
    }
}

#[async_trait]
impl DataSource for DemoDataSource {
    fn domain(&self) -> &str {
        &self.inner.domain
    }

    fn selected_date(&self) -> NaiveDate {
        self.inner.state.lock().dates.selected()
    }

    fn next_date(&self) -> NaiveDate {
        self.inner.state.lock().dates.next()
    }

    fn previous_date(&self) -> NaiveDate {
        self.inner.state.lock().dates.previous()
    }

    fn progress(&self) -> f64 {
        self.inner.state.lock().progress
    }

    async fn loaded(&self) {
        self.inner.readiness.wait().await;
    }

    async fn get_data(&self) -> Result<Arc<Dataset>> {
        self.inner.readiness.wait().await;
        self.set_progress(0.0);

        tracing::debug!(domain = %self.inner.domain, "fetching demo data");
        tokio::time::sleep(self.inner.fetch_delay).await;
        self.set_progress(100.0);

        self.inner.hooks.run(&self.inner.dataset)?;

        tracing::debug!(
            features = self.inner.dataset.features.len(),
            "demo data fetched"
        );
        Ok(Arc::clone(&self.inner.dataset))
    }

    fn get_points_of_interest(&self) -> Result<Value> {
        self.unsupported(Operation::GetPointsOfInterest)
    }

    fn get_address(&self) -> Result<Value> {
        self.unsupported(Operation::GetAddress)
    }

    fn get_fuzzy(&self) -> Result<Value> {
        self.unsupported(Operation::GetFuzzy)
    }

    fn get_speech_to_text(&self) -> Result<Value> {
        self.unsupported(Operation::GetSpeechToText)
    }

    fn get_text_to_speech(&self) -> Result<Value> {
        self.unsupported(Operation::GetTextToSpeech)
    }

    fn get_intent(&self) -> Result<Value> {
        self.unsupported(Operation::GetIntent)
    }

    fn cache_data(&self) -> Result<Value> {
        self.unsupported(Operation::CacheData)
    }

    fn get_strategy(&self) -> Result<Value> {
        self.unsupported(Operation::GetStrategy)
    }

    fn get_indexes(&self) -> Result<Value> {
        self.unsupported(Operation::GetIndexes)
    }
}
