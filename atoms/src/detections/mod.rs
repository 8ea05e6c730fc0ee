pub mod model;

pub use model::DetectedObjects;
