use crate::assets::sprite::Sprite;
use crate::foundation::core::{Canvas, Rgb8};
use crate::foundation::math::mul_div255;

/// Opaque RGBA8 raster frame buffer, row-major, tightly packed.
///
/// The background fill makes every frame fully opaque; sprite blits use
/// straight-alpha source-over compositing on top. The buffer is handed to the
/// encoder as-is (rawvideo rgba).
#[derive(Clone, Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0u8; canvas.width as usize * canvas.height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Fill the whole surface with an opaque color.
    pub fn fill(&mut self, color: Rgb8) {
        for px in self.data.chunks_exact_mut(4) {
            px[0] = color.r;
            px[1] = color.g;
            px[2] = color.b;
            px[3] = 255;
        }
    }

    /// Blend an axis-aligned rectangle of `color` at `alpha` over the
    /// surface, clipped to bounds.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb8, alpha: u8) {
        if alpha == 0 {
            return;
        }
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x.saturating_add(w as i32)).min(self.width as i32);
        let y1 = (y.saturating_add(h as i32)).min(self.height as i32);
        let src = [color.r, color.g, color.b];
        for yy in y0..y1 {
            for xx in x0..x1 {
                let idx = (yy as usize * self.width as usize + xx as usize) * 4;
                blend_px(&mut self.data[idx..idx + 3], src, alpha);
            }
        }
    }

    /// Blend a full-surface black overlay at `alpha` (fade-to-black ramps).
    pub fn overlay_black(&mut self, alpha: u8) {
        self.fill_rect(0, 0, self.width, self.height, Rgb8::BLACK, alpha);
    }

    /// Source-over blit of a straight-alpha sprite at `dest`, clipped to
    /// bounds.
    pub fn blit(&mut self, sprite: &Sprite, dest: (i32, i32)) {
        let (dx, dy) = dest;
        let sw = sprite.width() as i32;
        let sh = sprite.height() as i32;

        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = dx.saturating_add(sw).min(self.width as i32);
        let y1 = dy.saturating_add(sh).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let src = sprite.data();
        for yy in y0..y1 {
            let sy = (yy - dy) as usize;
            for xx in x0..x1 {
                let sx = (xx - dx) as usize;
                let s_idx = (sy * sprite.width() as usize + sx) * 4;
                let a = src[s_idx + 3];
                if a == 0 {
                    continue;
                }
                let d_idx = (yy as usize * self.width as usize + xx as usize) * 4;
                blend_px(
                    &mut self.data[d_idx..d_idx + 3],
                    [src[s_idx], src[s_idx + 1], src[s_idx + 2]],
                    a,
                );
            }
        }
    }
}

fn blend_px(dst: &mut [u8], src: [u8; 3], alpha: u8) {
    if alpha == 255 {
        dst.copy_from_slice(&src);
        return;
    }
    let a = u16::from(alpha);
    let inv = 255 - a;
    for c in 0..3 {
        dst[c] = mul_div255(u16::from(src[c]), a).saturating_add(mul_div255(u16::from(dst[c]), inv));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
