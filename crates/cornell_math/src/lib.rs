//! Cornell Math - vectors, rays, bounds and samplers for the path tracer.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod onb;
mod ray;

pub mod monte_carlo;
pub mod sampling;

pub use aabb::Aabb;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;

/// Linear RGB radiance. Components are unbounded above.
pub type Color = Vec3;
