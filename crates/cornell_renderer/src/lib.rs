//! Cornell Renderer - CPU Monte Carlo path tracing
//!
//! Renders the Cornell box with a recursive estimator that samples the
//! ceiling light directly at every diffuse bounce.
//!
//! Geometry and materials are closed enums dispatched by `match`. A scene is
//! built once, wrapped in a BVH, and then shared read-only by the rayon
//! workers that trace its pixels.

mod bvh;
mod camera;
mod cuboid;
mod error;
mod hittable;
mod integrator;
mod light;
mod material;
mod medium;
mod output;
mod rect;
mod renderer;
mod scene;
mod sphere;
mod texture;
mod transform;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use cuboid::Cuboid;
pub use error::{ConfigError, OutputError, SceneError, SceneResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use integrator::{estimate, estimate_material_sampled, light_pdf, ray_color, LIGHT_COSINE_EPSILON, T_MIN};
pub use light::{LightSampler, RectLight};
pub use material::{Dielectric, DiffuseLight, Isotropic, Lambertian, Lobe, Material, Metal, ScatterRecord};
pub use medium::ConstantMedium;
pub use output::{color_to_rgb, linear_to_gamma, save_png, write_ppm};
pub use rect::{AxisRect, Plane};
pub use renderer::{render, render_pixel, ImageBuffer, RenderConfig, MAX_PIXELS};
pub use scene::{Scene, SceneKind};
pub use sphere::{MovingSphere, Sphere};
pub use texture::Texture;
pub use transform::{FlipFace, RotateY, Translate};

/// Re-export Vec3 and common math types from cornell_math
pub use cornell_math::{Aabb, Color, Interval, Ray, Vec3};
