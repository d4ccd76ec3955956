//! Constant-density participating media (smoke, fog).

use crate::{
    error::{SceneError, SceneResult},
    hittable::{HitRecord, Hittable},
    Isotropic, Material, Ray, Texture,
};
use cornell_math::sampling::gen_f32;
use cornell_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Gap between the entry and exit searches, so the exit search does not
/// find the entry point again.
const EXIT_SEARCH_OFFSET: f32 = 0.0001;

/// Homogeneous volume filling a closed boundary shape.
///
/// A ray passing through the volume scatters after an exponentially
/// distributed distance, so hits can land anywhere inside the boundary.
#[derive(Debug)]
pub struct ConstantMedium {
    boundary: Arc<Hittable>,
    neg_inv_density: f32,
    phase_function: Arc<Material>,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<Hittable>, density: f32, albedo: impl Into<Texture>) -> SceneResult<Self> {
        if !(density > 0.0 && density.is_finite()) {
            return Err(SceneError::InvalidDensity(density));
        }

        Ok(Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Arc::new(Isotropic::new(albedo).into()),
        })
    }

    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + EXIT_SEARCH_OFFSET, f32::INFINITY), rng)?;

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        // The ray may start inside the medium.
        t_enter = t_enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f32(rng).ln();
        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;
        let mut rec = HitRecord::new(ray, t, Vec3::X, (0.0, 0.0), &self.phase_function);
        // Normal and facing are meaningless inside a volume.
        rec.normal = Vec3::X;
        rec.front_face = true;
        Some(rec)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
