//! Instance transforms: translation, rotation about y, and face flipping.
//!
//! Each wrapper moves the incoming ray into the child's local frame,
//! delegates, and carries the resulting hit back into world space. Children
//! are shared so one shape can be placed several times.

use crate::{
    hittable::{HitRecord, Hittable},
    Ray,
};
use cornell_math::{Aabb, Interval, Mat3, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Child geometry shifted by a fixed offset.
#[derive(Debug)]
pub struct Translate {
    object: Arc<Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self { object, offset, bbox }
    }

    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        let local_ray = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        // Translation leaves directions, and therefore the normal and its
        // facing, unchanged.
        let mut rec = self.object.hit(&local_ray, ray_t, rng)?;
        rec.p += self.offset;
        Some(rec)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Child geometry rotated about the y axis.
#[derive(Debug)]
pub struct RotateY {
    object: Arc<Hittable>,
    /// Local to world
    rotation: Mat3,
    /// World to local
    inverse: Mat3,
    bbox: Aabb,
}

impl RotateY {
    pub fn new(object: Arc<Hittable>, degrees: f32) -> Self {
        let rotation = Mat3::from_rotation_y(degrees.to_radians());
        let inverse = rotation.transpose();
        let bbox = object.bounding_box().transformed(|p| rotation * p);

        Self {
            object,
            rotation,
            inverse,
            bbox,
        }
    }

    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        let local_ray = Ray::new(
            self.inverse * ray.origin(),
            self.inverse * ray.direction(),
            ray.time(),
        );

        // Rotations preserve dot products, so front_face still holds.
        let mut rec = self.object.hit(&local_ray, ray_t, rng)?;
        rec.p = self.rotation * rec.p;
        rec.normal = self.rotation * rec.normal;
        Some(rec)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Child geometry with front and back faces swapped.
///
/// Only the `front_face` classification changes; the stored normal still
/// opposes the ray. Used to make one-sided emitters face the room.
#[derive(Debug)]
pub struct FlipFace {
    object: Arc<Hittable>,
}

impl FlipFace {
    pub fn new(object: Arc<Hittable>) -> Self {
        Self { object }
    }

    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        let mut rec = self.object.hit(ray, ray_t, rng)?;
        rec.front_face = !rec.front_face;
        Some(rec)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.object.bounding_box()
    }
}
