pub mod model;

pub use model::Coordinate;
