//! Sphere primitives, static and moving.

use crate::{
    error::{SceneError, SceneResult},
    hittable::HitRecord,
    Material, Ray,
};
use cornell_math::{Aabb, Interval, Vec3};
use std::f32::consts::PI;
use std::sync::Arc;

/// A sphere primitive.
#[derive(Debug)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> SceneResult<Self> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(SceneError::InvalidRadius(radius));
        }

        let rvec = Vec3::splat(radius);
        Ok(Self {
            center,
            radius,
            material,
            bbox: Aabb::from_points(center - rvec, center + rvec),
        })
    }

    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        hit_sphere(self.center, self.radius, &self.material, ray, ray_t)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// A sphere whose center moves linearly over the shutter interval.
#[derive(Debug)]
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl MovingSphere {
    /// Sphere at `center0` at `time0` and `center1` at `time1`.
    pub fn new(
        (center0, time0): (Vec3, f32),
        (center1, time1): (Vec3, f32),
        radius: f32,
        material: Arc<Material>,
    ) -> SceneResult<Self> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(SceneError::InvalidRadius(radius));
        }
        if time0 == time1 || !time0.is_finite() || !time1.is_finite() {
            return Err(SceneError::InvalidTimeRange { time0, time1 });
        }

        let rvec = Vec3::splat(radius);
        let box0 = Aabb::from_points(center0 - rvec, center0 + rvec);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);

        Ok(Self {
            center0,
            center1,
            time0,
            time1,
            radius,
            material,
            bbox: Aabb::surrounding(&box0, &box1),
        })
    }

    /// Center position at `time`.
    pub fn center(&self, time: f32) -> Vec3 {
        let s = (time - self.time0) / (self.time1 - self.time0);
        self.center0 + s * (self.center1 - self.center0)
    }

    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        hit_sphere(self.center(ray.time()), self.radius, &self.material, ray, ray_t)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

fn hit_sphere<'a>(
    center: Vec3,
    radius: f32,
    material: &'a Material,
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord<'a>> {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    let outward_normal = (ray.at(root) - center) / radius;
    Some(HitRecord::new(
        ray,
        root,
        outward_normal,
        sphere_uv(outward_normal),
        material,
    ))
}

/// UV coordinates for a point on the unit sphere centered at the origin.
///
/// u: angle around the Y axis from X=-1, v: angle from Y=-1 to Y=+1.
fn sphere_uv(p: Vec3) -> (f32, f32) {
    let theta = (-p.y).clamp(-1.0, 1.0).acos();
    let phi = (-p.z).atan2(p.x) + PI;
    (phi / (2.0 * PI), theta / PI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian};

    fn grey() -> Arc<Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)).into())
    }

    #[test]
    fn test_sphere_hit_along_radius() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, grey()).unwrap();
        let origin = Vec3::new(0.0, 0.0, -7.0);
        let direction = Vec3::new(0.0, 0.0, 1.0);
        let ray = Ray::new(origin, direction, 0.0);

        let rec = sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("ray along the radius line hits");

        // distance to center minus radius
        assert!((rec.t - 5.0).abs() < 1e-4);
        assert!(rec.front_face);
        // normal is parallel to the ray direction
        assert!(rec.normal.cross(direction).length() < 1e-5);
        assert!((rec.normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_far_root_from_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, grey()).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);

        let rec = sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();

        assert!((rec.t - 1.0).abs() < 1e-5);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::X);
    }

    #[test]
    fn test_sphere_respects_interval() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey()).unwrap();
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);

        assert!(sphere.hit(&ray, Interval::new(0.001, 0.4)).is_none());
        let rec = sphere.hit(&ray, Interval::new(0.6, f32::INFINITY)).unwrap();
        assert!((rec.t - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey()).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::Y, 0.0);

        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_sphere_rejects_bad_radius() {
        assert_eq!(
            Sphere::new(Vec3::ZERO, 0.0, grey()).unwrap_err(),
            SceneError::InvalidRadius(0.0)
        );
        assert!(Sphere::new(Vec3::ZERO, f32::NAN, grey()).is_err());
    }

    #[test]
    fn test_moving_sphere_follows_time() {
        let sphere = MovingSphere::new(
            (Vec3::ZERO, 0.0),
            (Vec3::new(0.0, 2.0, 0.0), 1.0),
            0.5,
            grey(),
        )
        .unwrap();

        assert_eq!(sphere.center(0.5), Vec3::new(0.0, 1.0, 0.0));

        let early = Ray::new(Vec3::new(0.0, 2.0, -5.0), Vec3::Z, 0.0);
        let late = Ray::new(Vec3::new(0.0, 2.0, -5.0), Vec3::Z, 1.0);
        let window = Interval::new(0.001, f32::INFINITY);
        assert!(sphere.hit(&early, window).is_none());
        assert!(sphere.hit(&late, window).is_some());

        let bbox = sphere.bounding_box();
        assert_eq!(bbox.y, Interval::new(-0.5, 2.5));
    }

    #[test]
    fn test_moving_sphere_rejects_empty_shutter() {
        let result = MovingSphere::new((Vec3::ZERO, 0.5), (Vec3::ONE, 0.5), 1.0, grey());
        assert!(matches!(result, Err(SceneError::InvalidTimeRange { .. })));
    }
}
