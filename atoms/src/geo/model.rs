use serde::{Deserialize, Serialize};

/// Geographic position of a marker. Kept as strings exactly as clients send them.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Coordinate {
    pub longitude: String,
    pub latitude: String,
}

impl Coordinate {
    pub fn new(longitude: impl Into<String>, latitude: impl Into<String>) -> Self {
        Self {
            longitude: longitude.into(),
            latitude: latitude.into(),
        }
    }

    pub fn longitude(&self) -> &str {
        &self.longitude
    }

    pub fn latitude(&self) -> &str {
        &self.latitude
    }
}
