//! Light sampling for next-event estimation.

use crate::{
    error::SceneResult,
    rect::{check_bounds, AxisRect, Plane},
};
use cornell_math::sampling::gen_range_f32;
use cornell_math::{Interval, Vec3};
use rand::RngCore;

/// A light source the estimator can aim rays at.
pub trait LightSampler: Send + Sync {
    /// Uniformly distributed point on the light's surface.
    fn sample_point(&self, rng: &mut dyn RngCore) -> Vec3;

    /// Surface area of the light.
    fn area(&self) -> f32;

    /// Unit normal of the light's surface (either orientation).
    fn normal(&self) -> Vec3;
}

/// Uniform sampler over an axis-aligned rectangular light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectLight {
    plane: Plane,
    a: Interval,
    b: Interval,
    k: f32,
}

impl RectLight {
    /// Sampler over `[a0, a1] x [b0, b1]` in `plane` at offset `k`.
    ///
    /// Validated with the same rules as the rectangle geometry.
    pub fn new(plane: Plane, (a0, a1): (f32, f32), (b0, b1): (f32, f32), k: f32) -> SceneResult<Self> {
        check_bounds((a0, a1), (b0, b1), k)?;
        Ok(Self {
            plane,
            a: Interval::new(a0, a1),
            b: Interval::new(b0, b1),
            k,
        })
    }

    /// Sampler over the same region as an existing rectangle.
    pub fn from_rect(rect: &AxisRect) -> Self {
        Self {
            plane: rect.plane(),
            a: rect.a(),
            b: rect.b(),
            k: rect.k(),
        }
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }
}

impl LightSampler for RectLight {
    fn sample_point(&self, rng: &mut dyn RngCore) -> Vec3 {
        let a = gen_range_f32(rng, self.a.min, self.a.max);
        let b = gen_range_f32(rng, self.b.min, self.b.max);
        self.plane.point(a, b, self.k)
    }

    fn area(&self) -> f32 {
        self.a.size() * self.b.size()
    }

    fn normal(&self) -> Vec3 {
        self.plane.normal()
    }
}
