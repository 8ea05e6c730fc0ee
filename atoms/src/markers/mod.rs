// Re-export model types, service and HTTP handlers
pub mod model;
pub mod service;
pub mod http;

pub use model::{HistoricalImages, HistoricalImagesPayload, LocationMarker};
pub use service::DataService;
pub use http::*;
