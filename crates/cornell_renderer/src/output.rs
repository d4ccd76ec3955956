//! Image output: gamma mapping, PPM text and PNG files.

use crate::{error::OutputError, renderer::ImageBuffer, Color};
use std::io::Write;
use std::path::Path;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a radiance sum over `samples` estimates to 8-bit RGB.
///
/// NaN components count as black. Values are clamped below 1 so that the
/// brightest channel maps to 255.
pub fn color_to_rgb(sum: Color, samples: u32) -> [u8; 3] {
    let scale = 1.0 / samples.max(1) as f32;
    let channel = |c: f32| {
        let c = if c.is_nan() { 0.0 } else { c };
        (256.0 * linear_to_gamma(c * scale).clamp(0.0, 0.999)) as u8
    };
    [channel(sum.x), channel(sum.y), channel(sum.z)]
}

impl ImageBuffer {
    /// Tightly packed 8-bit RGB, top row first.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(*color, self.samples_per_pixel));
        }
        bytes
    }
}

/// Write the image as plain-text PPM (`P3`), one pixel per line.
pub fn write_ppm<W: Write>(mut writer: W, image: &ImageBuffer) -> Result<(), OutputError> {
    writeln!(writer, "P3\n{} {}\n255", image.width, image.height)?;
    for color in &image.pixels {
        let [r, g, b] = color_to_rgb(*color, image.samples_per_pixel);
        writeln!(writer, "{} {} {}", r, g, b)?;
    }
    writer.flush()?;
    Ok(())
}

/// Save the image as an 8-bit RGB PNG.
pub fn save_png(path: impl AsRef<Path>, image: &ImageBuffer) -> Result<(), OutputError> {
    let path = path.as_ref();
    image::save_buffer(
        path,
        &image.to_rgb8(),
        image.width,
        image.height,
        image::ColorType::Rgb8,
    )?;
    log::info!("Saved {}x{} PNG to {}", image.width, image.height, path.display());
    Ok(())
}
