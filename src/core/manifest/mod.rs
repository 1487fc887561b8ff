pub mod loader;
pub mod model;

pub use model::Manifest;
