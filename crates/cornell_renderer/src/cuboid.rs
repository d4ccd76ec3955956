//! Rectangular box built from six axis-aligned faces.

use crate::{
    error::{SceneError, SceneResult},
    hittable::{HitRecord, Hittable, HittableList},
    rect::AxisRect,
    Material, Ray,
};
use cornell_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Axis-aligned box between two corners.
///
/// The faces on the min side of each axis are flipped so that every face's
/// front side points out of the box.
#[derive(Debug)]
pub struct Cuboid {
    sides: HittableList,
    bbox: Aabb,
}

impl Cuboid {
    pub fn new(min: Vec3, max: Vec3, material: Arc<Material>) -> SceneResult<Self> {
        if !min.cmplt(max).all() {
            return Err(SceneError::InvalidCuboid);
        }

        let mut sides = HittableList::new();
        let m = || material.clone();

        sides.add(AxisRect::xy(min.x, max.x, min.y, max.y, max.z, m())?);
        sides.add(Hittable::from(AxisRect::xy(min.x, max.x, min.y, max.y, min.z, m())?).flip_face());

        sides.add(AxisRect::xz(min.x, max.x, min.z, max.z, max.y, m())?);
        sides.add(Hittable::from(AxisRect::xz(min.x, max.x, min.z, max.z, min.y, m())?).flip_face());

        sides.add(AxisRect::yz(min.y, max.y, min.z, max.z, max.x, m())?);
        sides.add(Hittable::from(AxisRect::yz(min.y, max.y, min.z, max.z, min.x, m())?).flip_face());

        Ok(Self {
            sides,
            bbox: Aabb::from_points(min, max),
        })
    }

    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        self.sides.hit(ray, ray_t, rng)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
