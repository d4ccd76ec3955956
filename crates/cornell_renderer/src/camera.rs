//! Camera for ray generation.

use crate::{
    error::{SceneError, SceneResult},
    Ray,
};
use cornell_math::sampling::{gen_range_f32, random_in_unit_disk};
use cornell_math::Vec3;
use rand::RngCore;

/// Squared length below which a basis vector counts as zero.
const MIN_BASIS_LENGTH_SQUARED: f32 = 1e-12;

/// Thin-lens camera generating rays over normalized screen coordinates.
#[derive(Clone, Debug)]
pub struct Camera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,         // Vertical field of view in degrees
    aspect_ratio: f32, // Viewport width over height
    aperture: f32,     // Lens diameter
    focus_dist: f32,   // Distance from camera to plane of perfect focus

    // Shutter interval
    time0: f32,
    time1: f32,

    // Cached computed values (set by initialize())
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        let mut camera = Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 1.0,
            aperture: 0.0,
            focus_dist: 1.0,
            time0: 0.0,
            time1: 0.0,
            origin: Vec3::ZERO,
            lower_left_corner: Vec3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            lens_radius: 0.0,
        };
        camera.update_viewport();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set the interval ray times are drawn from.
    pub fn with_shutter(mut self, time0: f32, time1: f32) -> Self {
        self.time0 = time0;
        self.time1 = time1;
        self
    }

    /// Validate the settings and recompute the viewport (must be called after
    /// changing settings).
    pub fn initialize(&mut self) -> SceneResult<()> {
        self.validate()?;
        self.update_viewport();
        Ok(())
    }

    /// Reject settings that would produce NaN or degenerate rays.
    pub fn validate(&self) -> SceneResult<()> {
        let degenerate = |reason| Err(SceneError::DegenerateCamera(reason));

        if !(self.look_from.is_finite() && self.look_at.is_finite() && self.vup.is_finite()) {
            return degenerate("position, target and up vector must be finite");
        }
        let view = self.look_from - self.look_at;
        if view.length_squared() < MIN_BASIS_LENGTH_SQUARED {
            return degenerate("position and target coincide");
        }
        if self.vup.cross(view.normalize()).length_squared() < MIN_BASIS_LENGTH_SQUARED {
            return degenerate("up vector is zero or parallel to the view direction");
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return degenerate("vertical field of view must lie in (0, 180) degrees");
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return degenerate("aspect ratio must be positive and finite");
        }
        if !(self.aperture.is_finite() && self.aperture >= 0.0) {
            return degenerate("aperture must be finite and non-negative");
        }
        if !(self.focus_dist.is_finite() && self.focus_dist > 0.0) {
            return degenerate("focus distance must be positive and finite");
        }
        if !(self.time0.is_finite() && self.time1.is_finite() && self.time0 <= self.time1) {
            return degenerate("shutter interval must be finite and ordered");
        }
        Ok(())
    }

    fn update_viewport(&mut self) {
        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = self.aspect_ratio * viewport_height;

        // Calculate camera basis vectors
        let w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(w).normalize();
        self.v = w.cross(self.u);

        self.origin = self.look_from;
        self.horizontal = self.focus_dist * viewport_width * self.u;
        self.vertical = self.focus_dist * viewport_height * self.v;
        self.lower_left_corner =
            self.origin - self.horizontal / 2.0 - self.vertical / 2.0 - self.focus_dist * w;

        self.lens_radius = self.aperture / 2.0;
    }

    /// Ray through screen coordinates `(s, t)` in [0, 1], measured from the
    /// lower-left corner of the viewport.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius <= 0.0 {
            Vec3::ZERO
        } else {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        };

        let ray_origin = self.origin + offset;
        let ray_direction =
            self.lower_left_corner + s * self.horizontal + t * self.vertical - ray_origin;
        let ray_time = if self.time1 > self.time0 {
            gen_range_f32(rng, self.time0, self.time1)
        } else {
            self.time0
        };

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
