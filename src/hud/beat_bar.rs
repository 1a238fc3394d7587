use crate::foundation::core::Rgb8;
use crate::render::surface::Surface;
use crate::rhythm::track::SUSTAIN;

const BOX_BORDER_COLOR: Rgb8 = Rgb8 {
    r: 0x33,
    g: 0x33,
    b: 0x33,
};
const BOX_BACK_COLOR: Rgb8 = Rgb8 {
    r: 0xcc,
    g: 0xcc,
    b: 0xcc,
};
const BOX_BAR_COLOR: Rgb8 = Rgb8::BLACK;
const BOX_ALPHA: u8 = 128;

const CIRCLE_OUT_COLOR: Rgb8 = Rgb8::BLACK;
const CIRCLE_IN_COLOR: Rgb8 = Rgb8 {
    r: 0x55,
    g: 0x55,
    b: 0x55,
};

const TICK_COLOR: Rgb8 = Rgb8::WHITE;
const TICK_ALPHA: u8 = 200;
const TICK_SPACING_PX: i32 = 8;

/// Beat-position indicator overlay.
///
/// A translucent boxed bar with a center medallion; upcoming non-sustain
/// beats scroll toward the center from both edges as ticks, and the medallion
/// lights up while the current beat is non-sustain. Pure rendering, no state
/// feedback into the session.
pub struct BeatBar {
    loop_rhythm: Vec<char>,
    buildup_rhythm: Vec<char>,
    width: u32,
    height: u32,
    border_width: u32,
}

impl BeatBar {
    pub fn new(loop_rhythm: &[char], buildup_rhythm: &[char]) -> Self {
        Self {
            loop_rhythm: loop_rhythm.to_vec(),
            buildup_rhythm: buildup_rhythm.to_vec(),
            width: 1000,
            height: 38,
            border_width: 4,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn draw(&self, surface: &mut Surface, dest: (i32, i32), raw_position: f64, is_buildup: bool) {
        self.draw_box(surface, dest);
        self.draw_ticks(surface, dest, raw_position, is_buildup);
        self.draw_medallion(surface, dest, raw_position, is_buildup);
    }

    fn draw_box(&self, surface: &mut Surface, dest: (i32, i32)) {
        let (x, y) = dest;
        let b = self.border_width as i32;

        surface.fill_rect(x, y, self.width, self.height, BOX_BORDER_COLOR, BOX_ALPHA);
        surface.fill_rect(
            x + b,
            y + b,
            self.width - 2 * self.border_width,
            self.height - 2 * self.border_width,
            BOX_BACK_COLOR,
            BOX_ALPHA,
        );

        let bar_height = 2 * (self.height - 2 * self.border_width) / 3;
        let bar_y = (self.height as i32 - bar_height as i32) / 2;
        surface.fill_rect(
            x + b,
            y + bar_y,
            self.width - 2 * self.border_width,
            bar_height,
            BOX_BAR_COLOR,
            BOX_ALPHA,
        );
    }

    /// Upcoming non-sustain beats approach the medallion from both edges,
    /// mirrored, one tick per beat slot.
    fn draw_ticks(&self, surface: &mut Surface, dest: (i32, i32), raw_position: f64, is_buildup: bool) {
        let (x, y) = dest;
        let center_x = x + (self.width as i32) / 2;
        let half_gap = (self.height as i32) / 2 + 2;
        let scroll_width = (self.width as i32 - self.height as i32) / 2 - self.border_width as i32 - 2;

        let j = raw_position.floor().max(0.0) as usize;
        let frac = raw_position - raw_position.floor();

        let tick_h = self.height - 2 * self.border_width - 8;
        let tick_y = y + (self.height as i32 - tick_h as i32) / 2;

        let max_ticks = (scroll_width / TICK_SPACING_PX + 2) as usize;
        for (k, symbol) in self.upcoming(j, is_buildup).take(max_ticks).enumerate() {
            if symbol == SUSTAIN {
                continue;
            }
            // Slots drift toward the center as the fractional position advances.
            let offset = half_gap
                + (((k + 1) as f64 - frac) * f64::from(TICK_SPACING_PX)) as i32;
            if offset > half_gap + scroll_width {
                continue;
            }
            surface.fill_rect(center_x + offset, tick_y, 2, tick_h, TICK_COLOR, TICK_ALPHA);
            surface.fill_rect(center_x - offset - 2, tick_y, 2, tick_h, TICK_COLOR, TICK_ALPHA);
        }
    }

    fn draw_medallion(&self, surface: &mut Surface, dest: (i32, i32), raw_position: f64, is_buildup: bool) {
        let (x, y) = dest;
        let cx = x + (self.width as i32) / 2;
        let cy = y + (self.height as i32) / 2;
        let max_r = (self.height as i32) / 2;

        for i in (1..=max_r).rev() {
            let t = (-f64::from(i)).exp();
            let color = CIRCLE_IN_COLOR.lerp(CIRCLE_OUT_COLOR, t);
            fill_circle(surface, cx, cy, max_r - i, color);
        }

        let j = raw_position.floor().max(0.0) as usize;
        let current = if is_buildup && !self.buildup_rhythm.is_empty() {
            self.buildup_rhythm[j % self.buildup_rhythm.len()]
        } else if !self.loop_rhythm.is_empty() {
            self.loop_rhythm[j % self.loop_rhythm.len()]
        } else {
            SUSTAIN
        };
        if current != SUSTAIN {
            fill_circle(surface, cx, cy, max_r / 3, Rgb8::WHITE);
        }
    }

    fn upcoming(&self, j: usize, is_buildup: bool) -> impl Iterator<Item = char> + '_ {
        let (head, tail): (&[char], &[char]) = if is_buildup && !self.buildup_rhythm.is_empty() {
            (
                &self.buildup_rhythm[(j + 1).min(self.buildup_rhythm.len())..],
                &self.loop_rhythm,
            )
        } else if !self.loop_rhythm.is_empty() {
            (
                &self.loop_rhythm[(j + 1) % self.loop_rhythm.len()..],
                &self.loop_rhythm,
            )
        } else {
            (&[], &[])
        };
        head.iter().copied().chain(tail.iter().copied().cycle())
    }
}

fn fill_circle(surface: &mut Surface, cx: i32, cy: i32, radius: i32, color: Rgb8) {
    if radius <= 0 {
        surface.fill_rect(cx, cy, 1, 1, color, 255);
        return;
    }
    for dy in -radius..=radius {
        let span = ((radius * radius - dy * dy) as f64).sqrt() as i32;
        surface.fill_rect(cx - span, cy + dy, (2 * span + 1) as u32, 1, color, 255);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/hud/beat_bar.rs"]
mod tests;
