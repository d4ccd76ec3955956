use crate::Vec3;

/// Orthonormal basis built around a single axis `w`.
///
/// Used to carry directions sampled around +Z (such as cosine-weighted
/// hemisphere samples) into the frame of a surface normal.
#[derive(Debug, Clone, Copy)]
pub struct Onb {
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Onb {
    /// Build a basis whose `w` axis points along `n` (normalized here).
    pub fn from_w(n: Vec3) -> Self {
        let w = n.normalize();
        // Any helper axis that is not parallel to w works.
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);
        Self { u, v, w }
    }

    pub fn u(&self) -> Vec3 {
        self.u
    }

    pub fn v(&self) -> Vec3 {
        self.v
    }

    pub fn w(&self) -> Vec3 {
        self.w
    }

    /// Express local coordinates `a` in world space.
    #[inline]
    pub fn local(&self, a: Vec3) -> Vec3 {
        a.x * self.u + a.y * self.v + a.z * self.w
    }
}
