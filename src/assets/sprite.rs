use anyhow::Context;
use image::{RgbaImage, imageops};

use crate::foundation::core::Rgb8;
use crate::foundation::error::{HuesError, HuesResult};

/// Alpha-keyed raster sprite with a floodable color.
///
/// Respack art is black line-work on transparency or on white; decoding
/// composites onto white, scales to the canvas height, then derives the alpha
/// channel from the inverted luminance so the art becomes a recolorable mask.
/// Pixels are straight (non-premultiplied) RGBA8.
#[derive(Clone, Debug)]
pub struct Sprite {
    width: u32,
    height: u32,
    rgba8: Vec<u8>,
}

impl Sprite {
    /// Decode encoded image bytes and prepare the sprite at `target_height`,
    /// preserving aspect ratio.
    pub fn from_bytes(bytes: &[u8], target_height: u32) -> HuesResult<Self> {
        if target_height == 0 {
            return Err(HuesError::validation("sprite target height must be > 0"));
        }

        let dyn_img = image::load_from_memory(bytes).context("decode sprite image")?;
        let rgba = dyn_img.to_rgba8();
        let (src_w, src_h) = rgba.dimensions();
        if src_w == 0 || src_h == 0 {
            return Err(HuesError::asset("sprite image has zero dimensions"));
        }

        let mut flat = flatten_onto_white(&rgba);

        let width =
            (((src_w as u64) * u64::from(target_height)) / u64::from(src_h)).max(1) as u32;
        if (width, target_height) != (src_w, src_h) {
            flat = imageops::resize(&flat, width, target_height, imageops::FilterType::Triangle);
        }

        let mut rgba8 = flat.into_raw();
        mask_from_inverted_luminance(&mut rgba8);

        Ok(Self {
            width,
            height: target_height,
            rgba8,
        })
    }

    /// Build a sprite from raw straight RGBA8 pixels (used by tests and
    /// synthetic sources).
    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> HuesResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| HuesError::validation("sprite buffer size overflow"))?;
        if rgba8.len() != expected {
            return Err(HuesError::validation(
                "sprite pixel buffer must match width*height*4",
            ));
        }
        Ok(Self {
            width,
            height,
            rgba8,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.rgba8
    }

    /// Flood every pixel's RGB with `color`, leaving alpha untouched.
    pub fn set_color(&mut self, color: Rgb8) {
        for px in self.rgba8.chunks_exact_mut(4) {
            px[0] = color.r;
            px[1] = color.g;
            px[2] = color.b;
        }
    }

    /// Derive a copy with every alpha value scaled by `factor`.
    pub fn alpha_scale(&self, factor: f64) -> Sprite {
        let mut out = self.clone();
        for px in out.rgba8.chunks_exact_mut(4) {
            px[3] = (f64::from(px[3]) * factor) as u8;
        }
        out
    }
}

fn flatten_onto_white(src: &RgbaImage) -> RgbaImage {
    let mut out = src.clone();
    for px in out.pixels_mut() {
        let a = u16::from(px.0[3]);
        let inv = 255 - a;
        for c in 0..3 {
            px.0[c] = ((u16::from(px.0[c]) * a + 255 * inv + 127) / 255) as u8;
        }
        px.0[3] = 255;
    }
    out
}

/// Invert RGB and set alpha to the mean of the inverted channels, so dark art
/// becomes opaque and white paper becomes transparent.
fn mask_from_inverted_luminance(rgba8: &mut [u8]) {
    for px in rgba8.chunks_exact_mut(4) {
        let (r, g, b) = (255 - px[0], 255 - px[1], 255 - px[2]);
        px[0] = r;
        px[1] = g;
        px[2] = b;
        px[3] = ((u16::from(r) + u16::from(g) + u16::from(b)) / 3) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/sprite.rs"]
mod tests;
