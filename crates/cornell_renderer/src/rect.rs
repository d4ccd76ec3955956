//! Axis-aligned rectangles.

use crate::{
    error::{SceneError, SceneResult},
    hittable::HitRecord,
    Material, Ray,
};
use cornell_math::{Aabb, Interval, Vec3};
use std::sync::Arc;

/// Orientation of an axis-aligned rectangle, named by the two axes it spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Spans x and y at a fixed z.
    Xy,
    /// Spans x and z at a fixed y.
    Xz,
    /// Spans y and z at a fixed x.
    Yz,
}

impl Plane {
    /// Axis indices `(a, b, normal)`.
    #[inline]
    pub fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::Xy => (0, 1, 2),
            Plane::Xz => (0, 2, 1),
            Plane::Yz => (1, 2, 0),
        }
    }

    /// Unit normal along the fixed axis.
    pub fn normal(self) -> Vec3 {
        match self {
            Plane::Xy => Vec3::Z,
            Plane::Xz => Vec3::Y,
            Plane::Yz => Vec3::X,
        }
    }

    /// Assemble a point from in-plane coordinates and the plane offset.
    pub fn point(self, a: f32, b: f32, k: f32) -> Vec3 {
        let (ia, ib, ik) = self.axes();
        let mut p = [0.0; 3];
        p[ia] = a;
        p[ib] = b;
        p[ik] = k;
        Vec3::from_array(p)
    }
}

/// Rectangle `[a0, a1] x [b0, b1]` lying in `plane` at offset `k`.
#[derive(Debug)]
pub struct AxisRect {
    plane: Plane,
    a: Interval,
    b: Interval,
    k: f32,
    material: Arc<Material>,
}

impl AxisRect {
    pub fn new(
        plane: Plane,
        (a0, a1): (f32, f32),
        (b0, b1): (f32, f32),
        k: f32,
        material: Arc<Material>,
    ) -> SceneResult<Self> {
        check_bounds((a0, a1), (b0, b1), k)?;

        Ok(Self {
            plane,
            a: Interval::new(a0, a1),
            b: Interval::new(b0, b1),
            k,
            material,
        })
    }

    /// Rectangle `[x0, x1] x [y0, y1]` at `z = k`.
    pub fn xy(x0: f32, x1: f32, y0: f32, y1: f32, k: f32, material: Arc<Material>) -> SceneResult<Self> {
        Self::new(Plane::Xy, (x0, x1), (y0, y1), k, material)
    }

    /// Rectangle `[x0, x1] x [z0, z1]` at `y = k`.
    pub fn xz(x0: f32, x1: f32, z0: f32, z1: f32, k: f32, material: Arc<Material>) -> SceneResult<Self> {
        Self::new(Plane::Xz, (x0, x1), (z0, z1), k, material)
    }

    /// Rectangle `[y0, y1] x [z0, z1]` at `x = k`.
    pub fn yz(y0: f32, y1: f32, z0: f32, z1: f32, k: f32, material: Arc<Material>) -> SceneResult<Self> {
        Self::new(Plane::Yz, (y0, y1), (z0, z1), k, material)
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    /// Extent along the first in-plane axis.
    pub fn a(&self) -> Interval {
        self.a
    }

    /// Extent along the second in-plane axis.
    pub fn b(&self) -> Interval {
        self.b
    }

    /// Offset along the normal axis.
    pub fn k(&self) -> f32 {
        self.k
    }

    pub fn area(&self) -> f32 {
        self.a.size() * self.b.size()
    }

    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let (ia, ib, ik) = self.plane.axes();
        let origin = ray.origin().to_array();
        let direction = ray.direction().to_array();

        // Parallel rays give an infinite or NaN t and fall out here.
        let t = (self.k - origin[ik]) / direction[ik];
        if !ray_t.surrounds(t) {
            return None;
        }

        let a = origin[ia] + t * direction[ia];
        let b = origin[ib] + t * direction[ib];
        if !self.a.contains(a) || !self.b.contains(b) {
            return None;
        }

        let uv = ((a - self.a.min) / self.a.size(), (b - self.b.min) / self.b.size());
        Some(HitRecord::new(ray, t, self.plane.normal(), uv, &self.material))
    }

    pub fn bounding_box(&self) -> Aabb {
        // Flat along the normal axis; Aabb pads it.
        Aabb::from_points(
            self.plane.point(self.a.min, self.b.min, self.k),
            self.plane.point(self.a.max, self.b.max, self.k),
        )
    }
}

/// Reject inverted, empty or non-finite rectangle bounds.
pub(crate) fn check_bounds((a0, a1): (f32, f32), (b0, b1): (f32, f32), k: f32) -> SceneResult<()> {
    let finite = [a0, a1, b0, b1, k].iter().all(|x| x.is_finite());
    if !finite || a0 >= a1 || b0 >= b1 {
        return Err(SceneError::DegenerateRect { a0, a1, b0, b1, k });
    }
    Ok(())
}
