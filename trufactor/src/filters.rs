use serde::{Deserialize, Serialize};

/// Value meaning "no filter applied" for a demographic dimension
pub const DEFAULT_FILTER: &str = "default";

/// Demographic filter selection applied to fetched features
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub age: String,
    pub gender: String,
    pub ethnicity: String,
    pub income: String,
}

impl Default for Filters {
    fn default() -> Self {
        Filters {
            age: DEFAULT_FILTER.to_string(),
            gender: DEFAULT_FILTER.to_string(),
            ethnicity: DEFAULT_FILTER.to_string(),
            income: DEFAULT_FILTER.to_string(),
        }
    }
}

impl Filters {
    /// True when no dimension is narrowed
    pub fn is_default(&self) -> bool {
        [&self.age, &self.gender, &self.ethnicity, &self.income]
            .iter()
            .all(|value| value.as_str() == DEFAULT_FILTER)
    }
}
