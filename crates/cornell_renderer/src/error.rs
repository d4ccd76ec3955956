//! Scene construction, configuration and output errors.
//!
//! Geometry is validated when it is built so that a malformed scene fails
//! before the first ray is traced instead of leaking NaNs into the image.

use thiserror::Error;

/// Errors that can occur while assembling a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("BVH must be built over at least one object")]
    EmptyBvh,

    #[error("Degenerate rectangle: [{a0}, {a1}] x [{b0}, {b1}] at k = {k}")]
    DegenerateRect { a0: f32, a1: f32, b0: f32, b1: f32, k: f32 },

    #[error("Sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    #[error("Moving sphere needs distinct shutter times, got {time0} and {time1}")]
    InvalidTimeRange { time0: f32, time1: f32 },

    #[error("Medium density must be positive and finite, got {0}")]
    InvalidDensity(f32),

    #[error("Box corners must satisfy min < max on every axis")]
    InvalidCuboid,

    #[error("Degenerate camera: {0}")]
    DegenerateCamera(&'static str),

    #[error("Unknown scene: {0}")]
    UnknownScene(String),
}

/// Result type for scene construction.
pub type SceneResult<T> = Result<T, SceneError>;

/// Render settings rejected before any pixel is traced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Image width must be at least 1 pixel")]
    ZeroWidth,

    #[error("Samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("Aspect ratio must be positive and finite, got {0}")]
    InvalidAspectRatio(f32),

    #[error("Image of {width}x{height} exceeds {max} pixels")]
    TooManyPixels { width: u32, height: u32, max: u64 },

    #[error("Camera cannot be aimed: {0}")]
    Camera(#[from] SceneError),
}

/// Errors writing a finished image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}
