//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree of bounding boxes over the scene's top-level objects. A ray
//! only descends into a subtree when it passes through that subtree's box.

use crate::{
    error::{SceneError, SceneResult},
    hittable::{HitRecord, Hittable},
    Ray,
};
use cornell_math::{Aabb, Interval};
use rand::RngCore;

/// Maximum objects per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 2;

/// BVH node - either a branch with two children or a leaf holding objects.
#[derive(Debug)]
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with at most `LEAF_MAX_SIZE` objects.
    Leaf { objects: Vec<Hittable>, bbox: Aabb },
}

impl BvhNode {
    /// Build a BVH over `objects`. Fails on an empty set.
    pub fn new(objects: Vec<Hittable>) -> SceneResult<Self> {
        if objects.is_empty() {
            return Err(SceneError::EmptyBvh);
        }

        let count = objects.len();
        let node = Self::build(objects);
        log::info!(
            "Built BVH over {} objects: {} nodes, depth {}",
            count,
            node.node_count(),
            node.depth()
        );
        Ok(node)
    }

    /// Median split along the longest axis of the centroid bounds.
    fn build(mut objects: Vec<Hittable>) -> Self {
        if objects.len() <= LEAF_MAX_SIZE {
            let bbox = objects
                .iter()
                .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));
            return BvhNode::Leaf { objects, bbox };
        }

        let centroid_bounds = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
            let c = obj.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        objects.sort_unstable_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val.total_cmp(&b_val)
        });

        let right_objects = objects.split_off(objects.len() / 2);
        let left = Self::build(objects);
        let right = Self::build(right_objects);

        // Children first, then the union of their boxes.
        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        if !self.bounding_box().hit(ray, ray_t) {
            return None;
        }

        match self {
            BvhNode::Leaf { objects, .. } => {
                let mut closest: Option<HitRecord<'a>> = None;
                for obj in objects {
                    let window = ray_t.with_max(closest.as_ref().map_or(ray_t.max, |rec| rec.t));
                    if let Some(rec) = obj.hit(ray, window, rng) {
                        closest = Some(rec);
                    }
                }
                closest
            }

            BvhNode::Branch { left, right, .. } => {
                let hit_left = left.hit(ray, ray_t, rng);

                // Only check right up to closest hit
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, ray_t.with_max(right_max), rng);

                hit_right.or(hit_left)
            }
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } | BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}
