use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::detections::DetectedObjects;
use crate::error::Result;
use crate::geo::Coordinate;
use crate::media::Image;

pub const DEFAULT_MARKER_NAME: &str = "name me";
pub const DEFAULT_MARKER_STATUS: &str = "created";

/// LocationMarker domain model - a named point being watched for change
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationMarker {
    /// Assigned by the data service on create, never by clients
    #[serde(default)]
    pub marker_id: Option<String>,

    #[serde(default = "default_name", deserialize_with = "name_or_default")]
    pub name: String,

    #[serde(default)]
    pub coordinate: Coordinate,

    #[serde(default = "default_status", deserialize_with = "status_or_default")]
    pub status: String,

    #[serde(default = "Utc::now", with = "crate::timestamp")]
    pub date_created: DateTime<Utc>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub subscribed_emails: Vec<String>,

    #[serde(default)]
    pub current_image: Option<Image>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub historical_images: Vec<Image>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub detected_objects: Vec<DetectedObjects>,
}

/// Response body of the historical images endpoint
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalImages {
    pub marker_id: String,
    pub historical_images: Vec<Image>,
}

/// Body accepted by the historical images endpoint
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalImagesPayload {
    #[serde(default)]
    pub marker_id: Option<String>,
}

fn default_name() -> String {
    DEFAULT_MARKER_NAME.to_string()
}

fn default_status() -> String {
    DEFAULT_MARKER_STATUS.to_string()
}

fn name_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_name))
}

fn status_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_status))
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl LocationMarker {
    /// New unsaved marker, created now, with every optional field at its default.
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            marker_id: None,
            name: default_name(),
            coordinate,
            status: default_status(),
            date_created: Utc::now(),
            subscribed_emails: Vec::new(),
            current_image: None,
            historical_images: Vec::new(),
            detected_objects: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn marker_id(&self) -> Option<&str> {
        self.marker_id.as_deref()
    }

    pub fn set_marker_id(&mut self, marker_id: impl Into<String>) {
        self.marker_id = Some(marker_id.into());
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn add_subscription_email(&mut self, email: impl Into<String>) {
        self.subscribed_emails.push(email.into());
    }

    pub fn set_current_image(&mut self, image: Image) {
        self.current_image = Some(image);
    }

    pub fn add_image_to_history(&mut self, image: Image) {
        self.historical_images.push(image);
    }

    pub fn add_detected_objects(&mut self, detected: DetectedObjects) {
        self.detected_objects.push(detected);
    }

    /// JSON form used both on the wire and as the stored row.
    pub fn to_representation(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Build a marker from its JSON form, filling documented defaults.
    pub fn from_representation(data: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(data)?)
    }

    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }
}
