//! Domain building blocks for the change observer service: the location
//! marker entity model, the markers table backends, the [`markers::DataService`]
//! data access layer and the HTTP handlers the Lambdas wrap.

pub mod detections;
pub mod error;
pub mod geo;
pub mod markers;
pub mod media;
pub mod table;
pub mod timestamp;

pub use detections::DetectedObjects;
pub use error::{MarkerError, Result};
pub use geo::Coordinate;
pub use markers::{DataService, ErrorStatusMode, LocationMarker, Operation};
pub use media::Image;
