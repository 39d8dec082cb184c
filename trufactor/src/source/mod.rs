//! Data source interface and the demo-mode implementation
//!
//! [`DataSource`] is the surface UI code programs against. The backend-backed
//! client answers every operation; [`DemoDataSource`] serves canned data for
//! [`DataSource::get_data`] and rejects the backend-only operations listed in
//! [`Operation`].

pub mod dates;
pub mod demo;
pub mod hooks;

pub use dates::DateCursor;
pub use demo::{DemoDataSource, DemoDataSourceBuilder};
pub use hooks::{HookPoint, Hooks};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::dataset::Dataset;
use crate::error::Result;

/// Backend operations that have no demo-mode counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetPointsOfInterest,
    GetAddress,
    GetFuzzy,
    GetSpeechToText,
    GetTextToSpeech,
    GetIntent,
    CacheData,
    GetStrategy,
    GetIndexes,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::GetPointsOfInterest,
        Operation::GetAddress,
        Operation::GetFuzzy,
        Operation::GetSpeechToText,
        Operation::GetTextToSpeech,
        Operation::GetIntent,
        Operation::CacheData,
        Operation::GetStrategy,
        Operation::GetIndexes,
    ];

    /// Client API name of the operation
    pub fn name(self) -> &'static str {
        match self {
            Operation::GetPointsOfInterest => "getPointsOfInterest",
            Operation::GetAddress => "getAddress",
            Operation::GetFuzzy => "getFuzzy",
            Operation::GetSpeechToText => "getSpeechToText",
            Operation::GetTextToSpeech => "getTextToSpeech",
            Operation::GetIntent => "getIntent",
            Operation::CacheData => "cacheData",
            Operation::GetStrategy => "getStrategy",
            Operation::GetIndexes => "getIndexes",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Common interface for demo and backend data sources
#[async_trait]
pub trait DataSource: Send + Sync {
    fn domain(&self) -> &str;

    fn selected_date(&self) -> NaiveDate;

    /// Select the next available date, wrapping around
    fn next_date(&self) -> NaiveDate;

    /// Select the previous available date, wrapping around
    fn previous_date(&self) -> NaiveDate;

    /// Fetch progress in percent
    fn progress(&self) -> f64;

    /// Resolve once the source has finished its startup
    async fn loaded(&self);

    /// Fetch the dataset for the selected date, running any attached hooks
    async fn get_data(&self) -> Result<Arc<Dataset>>;

    fn get_points_of_interest(&self) -> Result<Value>;
    fn get_address(&self) -> Result<Value>;
    fn get_fuzzy(&self) -> Result<Value>;
    fn get_speech_to_text(&self) -> Result<Value>;
    fn get_text_to_speech(&self) -> Result<Value>;
    fn get_intent(&self) -> Result<Value>;
    fn cache_data(&self) -> Result<Value>;
    fn get_strategy(&self) -> Result<Value>;
    fn get_indexes(&self) -> Result<Value>;

    /// Dispatch one of the backend operations by name
    fn invoke(&self, operation: Operation) -> Result<Value> {
        match operation {
            Operation::GetPointsOfInterest => self.get_points_of_interest(),
            Operation::GetAddress => self.get_address(),
            Operation::GetFuzzy => self.get_fuzzy(),
            Operation::GetSpeechToText => self.get_speech_to_text(),
            Operation::GetTextToSpeech => self.get_text_to_speech(),
            Operation::GetIntent => self.get_intent(),
            Operation::CacheData => self.cache_data(),
            Operation::GetStrategy => self.get_strategy(),
            Operation::GetIndexes => self.get_indexes(),
        }
    }
}
