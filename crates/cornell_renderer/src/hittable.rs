//! Hittable geometry and HitRecord for ray-object intersection.
//!
//! Every kind of geometry in the scene is a variant of the `Hittable` enum.
//! Composite variants (boxes, transforms, media, BVH nodes, lists) hold their
//! children as plain `Hittable` values, so a scene is an acyclic tree that
//! is dispatched by `match` rather than through trait objects.

use crate::{
    bvh::BvhNode,
    cuboid::Cuboid,
    error::SceneResult,
    medium::ConstantMedium,
    rect::AxisRect,
    sphere::{MovingSphere, Sphere},
    transform::{FlipFace, RotateY, Translate},
    Material, Ray,
};
use cornell_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Record of a ray-object intersection.
#[derive(Clone, Debug)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal, always pointing against the incoming ray
    pub normal: Vec3,
    /// Material at the intersection point, shared with the geometry
    pub material: &'a Material,
    /// Surface coordinates in [0, 1]
    pub u: f32,
    pub v: f32,
    /// Ray parameter of the intersection
    pub t: f32,
    /// Whether the ray arrived from the side the outward normal points to
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record from the geometric outward normal, orienting the stored
    /// normal against the ray.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        (u, v): (f32, f32),
        material: &'a Material,
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // Ray and outward normal in the same direction means we are inside.
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Anything a ray can hit.
#[derive(Debug)]
pub enum Hittable {
    Sphere(Sphere),
    MovingSphere(MovingSphere),
    Rect(AxisRect),
    Cuboid(Cuboid),
    ConstantMedium(ConstantMedium),
    Translate(Translate),
    RotateY(RotateY),
    FlipFace(FlipFace),
    Bvh(BvhNode),
    List(HittableList),
}

impl Hittable {
    /// Nearest intersection with `ray` strictly inside `ray_t`.
    ///
    /// The generator is only consumed by participating media, which sample
    /// a free-flight distance.
    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        match self {
            Hittable::Sphere(sphere) => sphere.hit(ray, ray_t),
            Hittable::MovingSphere(sphere) => sphere.hit(ray, ray_t),
            Hittable::Rect(rect) => rect.hit(ray, ray_t),
            Hittable::Cuboid(cuboid) => cuboid.hit(ray, ray_t, rng),
            Hittable::ConstantMedium(medium) => medium.hit(ray, ray_t, rng),
            Hittable::Translate(translate) => translate.hit(ray, ray_t, rng),
            Hittable::RotateY(rotate) => rotate.hit(ray, ray_t, rng),
            Hittable::FlipFace(flip) => flip.hit(ray, ray_t, rng),
            Hittable::Bvh(node) => node.hit(ray, ray_t, rng),
            Hittable::List(list) => list.hit(ray, ray_t, rng),
        }
    }

    /// World-space bounding box.
    pub fn bounding_box(&self) -> Aabb {
        match self {
            Hittable::Sphere(sphere) => sphere.bounding_box(),
            Hittable::MovingSphere(sphere) => sphere.bounding_box(),
            Hittable::Rect(rect) => rect.bounding_box(),
            Hittable::Cuboid(cuboid) => cuboid.bounding_box(),
            Hittable::ConstantMedium(medium) => medium.bounding_box(),
            Hittable::Translate(translate) => translate.bounding_box(),
            Hittable::RotateY(rotate) => rotate.bounding_box(),
            Hittable::FlipFace(flip) => flip.bounding_box(),
            Hittable::Bvh(node) => node.bounding_box(),
            Hittable::List(list) => list.bounding_box(),
        }
    }

    /// Wrap in a translation by `offset`.
    pub fn translate(self, offset: Vec3) -> Hittable {
        Translate::new(Arc::new(self), offset).into()
    }

    /// Wrap in a rotation about the y axis by `degrees`.
    pub fn rotate_y(self, degrees: f32) -> Hittable {
        RotateY::new(Arc::new(self), degrees).into()
    }

    /// Wrap so that front and back faces swap.
    pub fn flip_face(self) -> Hittable {
        FlipFace::new(Arc::new(self)).into()
    }
}

macro_rules! impl_from_variant {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Hittable {
                fn from(value: $ty) -> Self {
                    Hittable::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant! {
    Sphere => Sphere,
    MovingSphere => MovingSphere,
    AxisRect => Rect,
    Cuboid => Cuboid,
    ConstantMedium => ConstantMedium,
    Translate => Translate,
    RotateY => RotateY,
    FlipFace => FlipFace,
    BvhNode => Bvh,
    HittableList => List,
}

/// A list of hittable objects, scanned linearly.
#[derive(Debug)]
pub struct HittableList {
    objects: Vec<Hittable>,
    bbox: Aabb,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: impl Into<Hittable>) {
        let object = object.into();
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[Hittable] {
        &self.objects
    }

    /// Consume the list and build a BVH over its objects.
    pub fn into_bvh(self) -> SceneResult<BvhNode> {
        BvhNode::new(self.objects)
    }

    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;

        for object in &self.objects {
            let window = ray_t.with_max(closest.as_ref().map_or(ray_t.max, |rec| rec.t));
            if let Some(rec) = object.hit(ray, window, rng) {
                closest = Some(rec);
            }
        }

        closest
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Hittable> for HittableList {
    fn from_iter<I: IntoIterator<Item = Hittable>>(iter: I) -> Self {
        let mut list = HittableList::new();
        for object in iter {
            list.add(object);
        }
        list
    }
}
