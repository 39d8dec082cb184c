//! Canned dataset served in demo mode
//!
//! The demo dataset is a GeoJSON-style feature collection embedded at compile
//! time. It is decoded once per process and shared as an `Arc<Dataset>`; the
//! decoded value is never mutated.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::{Arc, OnceLock};

use crate::error::Result;

const DEMO_JSON: &str = include_str!("../data/demo.json");

static DEMO_DATASET: OnceLock<Arc<Dataset>> = OnceLock::new();

/// A collection of features plus whatever metadata came with them
///
/// Keys other than `features` are kept verbatim in `metadata`, so a dataset
/// serializes back to the document it was decoded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub features: Vec<Feature>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Value,
    pub properties: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Borrowed `{ features }` view handed to the caching hooks
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeatureSet<'a> {
    pub features: &'a [Feature],
}

impl Dataset {
    /// The embedded demo dataset, decoded on first use
    pub fn demo() -> Result<Arc<Dataset>> {
        if let Some(dataset) = DEMO_DATASET.get() {
            return Ok(Arc::clone(dataset));
        }

        let decoded = Arc::new(Dataset::from_json(DEMO_JSON)?);
        Ok(Arc::clone(DEMO_DATASET.get_or_init(|| decoded)))
    }

    pub fn from_json(json: &str) -> Result<Dataset> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn feature_set(&self) -> FeatureSet<'_> {
        FeatureSet {
            features: &self.features,
        }
    }

    /// Top-level metadata value, e.g. `"date"`
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}

impl Feature {
    pub fn id(&self) -> Option<&str> {
        self.extra.get("id").and_then(Value::as_str)
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_dataset_decodes() {
        let dataset = Dataset::demo().unwrap();
        assert_eq!(dataset.features.len(), 5);
        assert_eq!(dataset.meta("type"), Some(&Value::from("FeatureCollection")));
        assert_eq!(dataset.meta("date"), Some(&Value::from("2019-04-07")));
        assert_eq!(dataset.features[0].id(), Some("poi-0001"));
        assert_eq!(
            dataset.features[1].property("name"),
            Some(&Value::from("State Capitol"))
        );
    }

    #[test]
    fn test_demo_dataset_is_shared() {
        let a = Dataset::demo().unwrap();
        let b = Dataset::demo().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_dataset_serializes_verbatim() {
        let document: Value = serde_json::from_str(DEMO_JSON).unwrap();
        let dataset = Dataset::demo().unwrap();
        assert_eq!(serde_json::to_value(&*dataset).unwrap(), document);
    }

    #[test]
    fn test_feature_set_borrows_features() {
        let dataset = Dataset::demo().unwrap();
        let set = dataset.feature_set();
        assert_eq!(set.features.len(), dataset.features.len());
        assert_eq!(
            serde_json::to_value(set).unwrap()["features"][0]["id"],
            Value::from("poi-0001")
        );
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(Dataset::from_json("{\"features\": 3}").is_err());
    }
}
