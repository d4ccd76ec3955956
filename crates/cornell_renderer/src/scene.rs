//! Built-in scenes.

use crate::{
    camera::Camera,
    cuboid::Cuboid,
    error::{SceneError, SceneResult},
    hittable::{Hittable, HittableList},
    light::RectLight,
    medium::ConstantMedium,
    rect::AxisRect,
    Color, DiffuseLight, Lambertian, Material,
};
use cornell_math::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Everything a render needs: geometry, light, background and camera.
///
/// Immutable once built; shared read-only by every render worker.
#[derive(Debug)]
pub struct Scene {
    pub world: Hittable,
    /// Light the estimator samples directly. Without one the renderer falls
    /// back to material sampling.
    pub light: Option<RectLight>,
    pub background: Color,
    pub camera: Camera,
}

/// Selects one of the built-in scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneKind {
    #[default]
    CornellBox,
    CornellSmoke,
}

impl SceneKind {
    pub const ALL: [SceneKind; 2] = [SceneKind::CornellBox, SceneKind::CornellSmoke];

    pub fn name(self) -> &'static str {
        match self {
            SceneKind::CornellBox => "cornell-box",
            SceneKind::CornellSmoke => "cornell-smoke",
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| SceneError::UnknownScene(s.to_string()))
    }
}

/// Placement and strength of the ceiling light.
struct CeilingLight {
    x: (f32, f32),
    z: (f32, f32),
    emission: f32,
}

impl Scene {
    pub fn build(kind: SceneKind) -> SceneResult<Self> {
        let scene = match kind {
            SceneKind::CornellBox => Self::cornell_box()?,
            SceneKind::CornellSmoke => Self::cornell_smoke()?,
        };
        log::info!("Built scene '{}'", kind);
        Ok(scene)
    }

    /// Classic Cornell box: red and green side walls, a small ceiling light
    /// and two white boxes.
    pub fn cornell_box() -> SceneResult<Self> {
        let white = white();
        let (mut objects, light) = room(CeilingLight {
            x: (213.0, 343.0),
            z: (227.0, 332.0),
            emission: 15.0,
        })?;

        let (tall, short) = boxes(&white)?;
        objects.add(tall);
        objects.add(short);

        Self::finish(objects, light)
    }

    /// The Cornell box with both boxes replaced by smoke, one dark and one
    /// light, under a larger and dimmer light.
    pub fn cornell_smoke() -> SceneResult<Self> {
        let white = white();
        let (mut objects, light) = room(CeilingLight {
            x: (113.0, 443.0),
            z: (127.0, 432.0),
            emission: 7.0,
        })?;

        let (tall, short) = boxes(&white)?;
        objects.add(ConstantMedium::new(Arc::new(tall), 0.01, Color::ZERO)?);
        objects.add(ConstantMedium::new(Arc::new(short), 0.01, Color::ONE)?);

        Self::finish(objects, light)
    }

    fn finish(objects: HittableList, light: RectLight) -> SceneResult<Self> {
        let count = objects.len();
        let world = Hittable::Bvh(objects.into_bvh()?);
        log::debug!("Cornell room with {} top-level objects", count);

        Ok(Self {
            world,
            light: Some(light),
            background: Color::ZERO,
            camera: cornell_camera()?,
        })
    }
}

fn white() -> Arc<Material> {
    Arc::new(Lambertian::new(Color::splat(0.73)).into())
}

/// Walls, floor, ceiling and a downward-facing light.
fn room(ceiling_light: CeilingLight) -> SceneResult<(HittableList, RectLight)> {
    let red: Arc<Material> = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)).into());
    let green: Arc<Material> = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)).into());
    let white = white();
    let light: Arc<Material> = Arc::new(DiffuseLight::new(Color::splat(ceiling_light.emission)).into());

    let CeilingLight { x, z, .. } = ceiling_light;
    let light_rect = AxisRect::xz(x.0, x.1, z.0, z.1, 554.0, light)?;
    let sampler = RectLight::from_rect(&light_rect);

    let mut objects = HittableList::new();
    objects.add(AxisRect::yz(0.0, 555.0, 0.0, 555.0, 555.0, green)?);
    objects.add(AxisRect::yz(0.0, 555.0, 0.0, 555.0, 0.0, red)?);
    // Emits downward into the room only.
    objects.add(Hittable::from(light_rect).flip_face());
    objects.add(AxisRect::xz(0.0, 555.0, 0.0, 555.0, 0.0, white.clone())?);
    objects.add(AxisRect::xz(0.0, 555.0, 0.0, 555.0, 555.0, white.clone())?);
    objects.add(AxisRect::xy(0.0, 555.0, 0.0, 555.0, 555.0, white)?);

    Ok((objects, sampler))
}

/// The tall and short boxes, rotated and placed on the floor.
fn boxes(material: &Arc<Material>) -> SceneResult<(Hittable, Hittable)> {
    let tall = Hittable::from(Cuboid::new(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), material.clone())?)
        .rotate_y(15.0)
        .translate(Vec3::new(265.0, 0.0, 295.0));
    let short = Hittable::from(Cuboid::new(Vec3::ZERO, Vec3::splat(165.0), material.clone())?)
        .rotate_y(-18.0)
        .translate(Vec3::new(130.0, 0.0, 65.0));
    Ok((tall, short))
}

fn cornell_camera() -> SceneResult<Camera> {
    let mut camera = Camera::new()
        .with_position(Vec3::new(278.0, 278.0, -800.0), Vec3::new(278.0, 278.0, 0.0), Vec3::Y)
        .with_lens(40.0, 0.0, 10.0)
        .with_shutter(0.0, 1.0);
    camera.initialize()?;
    Ok(camera)
}
