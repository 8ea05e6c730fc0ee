pub mod model;

pub use model::Image;
