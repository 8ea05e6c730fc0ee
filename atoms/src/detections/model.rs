use serde::{Deserialize, Serialize};

/// Labels found in a marker's imagery on a given date.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectedObjects {
    pub date_detected: String,
    pub detected_objects: Vec<String>,
}

impl DetectedObjects {
    pub fn new(date_detected: impl Into<String>, detected_objects: Vec<String>) -> Self {
        Self {
            date_detected: date_detected.into(),
            detected_objects,
        }
    }
}
