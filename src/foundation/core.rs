use rand::Rng;

use crate::foundation::error::{HuesError, HuesResult};

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8 { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb8 = Rgb8 {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation from `self` toward `to` by fraction `s`.
    ///
    /// `s` is intentionally not clamped to `[0, 1]`: color-change transitions
    /// extrapolate past the target when drawn after their nominal duration.
    /// Channels saturate at the `u8` range boundaries.
    pub fn lerp(self, to: Rgb8, s: f64) -> Rgb8 {
        fn mix(a: u8, b: u8, s: f64) -> u8 {
            (f64::from(b) * s + f64::from(a) * (1.0 - s)) as u8
        }
        Rgb8 {
            r: mix(self.r, to.r, s),
            g: mix(self.g, to.g, s),
            b: mix(self.b, to.b, s),
        }
    }
}

/// Background/foreground color pair active for the current effect.
///
/// Pairs are replaced wholesale on color-change beats, never mutated in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorPair {
    pub background: Rgb8,
    pub foreground: Rgb8,
}

impl ColorPair {
    /// White-on-black starting pair used before the first beat fires.
    pub fn initial() -> Self {
        Self {
            background: Rgb8::WHITE,
            foreground: Rgb8::BLACK,
        }
    }

    /// Draw a fresh pair: light background (channels in `[160, 255]`) over a
    /// dark foreground (channels in `[0, 95]`), biased for contrast.
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut light = || rng.random_range(160..=255u16) as u8;
        let background = Rgb8::new(light(), light(), light());
        let mut dark = || rng.random_range(0..96u16) as u8;
        let foreground = Rgb8::new(dark(), dark(), dark());
        Self {
            background,
            foreground,
        }
    }
}

/// Rational frame rate (e.g. 24000/1001 for NTSC film cadence).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> HuesResult<Self> {
        if den == 0 {
            return Err(HuesError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(HuesError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
