// Re-export glam for convenience
pub use glam::*;

// Tessera math types
mod basis;
mod interval;
mod ray;
mod sampling;

pub use basis::OrthoNormalBasis;
pub use interval::Interval;
pub use ray::Ray;
pub use sampling::{cone_sample, hemisphere_sample, reflect};
