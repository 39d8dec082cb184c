//! Circular cursor over the dates a data source can serve

use chrono::NaiveDate;

use crate::error::{DataSourceError, Result};

/// Dates available for selection, oldest first, plus the selected position
///
/// The cursor starts on the last (latest) date and wraps in both directions,
/// so the index is always valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCursor {
    dates: Vec<NaiveDate>,
    index: usize,
}

impl DateCursor {
    pub fn new(dates: Vec<NaiveDate>) -> Result<Self> {
        if dates.is_empty() {
            return Err(DataSourceError::InvalidConfig(
                "at least one available date is required".into(),
            ));
        }

        let index = dates.len() - 1;
        Ok(DateCursor { dates, index })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn selected(&self) -> NaiveDate {
        self.dates[self.index]
    }

    pub fn last_available(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// Move forward one date, wrapping to the first after the last
    pub fn next(&mut self) -> NaiveDate {
        self.index = (self.index + 1) % self.dates.len();
        self.selected()
    }

    /// Move back one date, wrapping to the last before the first
    pub fn previous(&mut self) -> NaiveDate {
        self.index = match self.index {
            0 => self.dates.len() - 1,
            i => i - 1,
        };
        self.selected()
    }
}
