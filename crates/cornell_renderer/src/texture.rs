//! Surface color lookups.

use crate::Color;
use cornell_math::Vec3;

/// Color as a function of surface coordinates and position.
#[derive(Debug, Clone, PartialEq)]
pub enum Texture {
    /// Same color everywhere.
    Solid(Color),
    /// 3D checkerboard alternating between two textures.
    Checker {
        /// Spatial frequency of the pattern.
        frequency: f32,
        even: Box<Texture>,
        odd: Box<Texture>,
    },
}

impl Texture {
    pub fn solid(color: Color) -> Self {
        Texture::Solid(color)
    }

    pub fn checker(frequency: f32, even: impl Into<Texture>, odd: impl Into<Texture>) -> Self {
        Texture::Checker {
            frequency,
            even: Box::new(even.into()),
            odd: Box::new(odd.into()),
        }
    }

    /// Evaluate the texture at surface coordinates `(u, v)` and point `p`.
    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker { frequency, even, odd } => {
                let sines = (frequency * p.x).sin() * (frequency * p.y).sin() * (frequency * p.z).sin();
                if sines < 0.0 {
                    odd.value(u, v, p)
                } else {
                    even.value(u, v, p)
                }
            }
        }
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Solid(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_ignores_position() {
        let texture = Texture::solid(Color::new(0.73, 0.73, 0.73));

        assert_eq!(texture.value(0.0, 0.0, Vec3::ZERO), Color::splat(0.73));
        assert_eq!(texture.value(0.9, 0.1, Vec3::splat(100.0)), Color::splat(0.73));
    }

    #[test]
    fn test_checker_alternates() {
        let texture = Texture::checker(1.0, Color::ONE, Color::ZERO);

        // sin(1)^3 > 0, sin(-1) sin(1) sin(1) < 0
        assert_eq!(texture.value(0.0, 0.0, Vec3::splat(1.0)), Color::ONE);
        assert_eq!(texture.value(0.0, 0.0, Vec3::new(-1.0, 1.0, 1.0)), Color::ZERO);
    }
}
