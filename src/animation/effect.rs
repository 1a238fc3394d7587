use crate::assets::sprite::Sprite;
use crate::foundation::core::{ColorPair, Rgb8};
use crate::foundation::math::linspace;
use crate::render::surface::Surface;

/// Capability set shared by every effect variant and composition wrapper.
///
/// `t` is the effect's local phase time in seconds, zeroed when the effect
/// was anchored to a beat. Wrappers own a boxed inner animation and forward
/// unless they override.
pub trait Animation {
    fn draw(&mut self, surface: &mut Surface, dest: (i32, i32), t: f64);
    fn set_color(&mut self, color: Rgb8);
}

/// Draws a fixed sprite; ignores phase time.
pub struct StaticImage {
    sprite: Sprite,
}

impl StaticImage {
    pub fn new(sprite: Sprite) -> Self {
        Self { sprite }
    }
}

impl Animation for StaticImage {
    fn draw(&mut self, surface: &mut Surface, dest: (i32, i32), _t: f64) {
        surface.blit(&self.sprite, dest);
    }

    fn set_color(&mut self, color: Rgb8) {
        self.sprite.set_color(color);
    }
}

/// Axis along which [`Blur`] jitters its faint copies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlurAxis {
    Horizontal,
    Vertical,
}

const BLUR_AMOUNT: usize = 11;
const BLUR_DECAY: f64 = 16.0;

/// Directional shake that settles as phase time grows.
///
/// The sprite is drawn at `dest` together with a symmetric fan of faint
/// copies offset along one axis by an exponentially decaying jitter envelope:
/// `5 * amount * exp(-decay * t) * linspace(-1, 1, amount)`, truncated to
/// whole pixels.
pub struct Blur {
    sprite: Sprite,
    faint: Sprite,
    axis: BlurAxis,
}

impl Blur {
    pub fn new(sprite: Sprite, axis: BlurAxis) -> Self {
        let faint = sprite.alpha_scale(2.0 / BLUR_AMOUNT as f64);
        Self {
            sprite,
            faint,
            axis,
        }
    }
}

impl Animation for Blur {
    fn draw(&mut self, surface: &mut Surface, dest: (i32, i32), t: f64) {
        let (x, y) = dest;
        let envelope = 5.0 * BLUR_AMOUNT as f64 * (-BLUR_DECAY * t).exp();

        surface.blit(&self.sprite, dest);
        for f in linspace(-1.0, 1.0, BLUR_AMOUNT) {
            let offset = (envelope * f) as i32;
            let jittered = match self.axis {
                BlurAxis::Horizontal => (x + offset, y),
                BlurAxis::Vertical => (x, y + offset),
            };
            surface.blit(&self.faint, jittered);
        }
    }

    fn set_color(&mut self, color: Rgb8) {
        self.sprite.set_color(color);
        self.faint.set_color(color);
    }
}

/// Fills the destination solid black on every draw; recolor is a no-op.
///
/// Persists until the next beat transition replaces it.
pub struct InstantBlackout;

impl Animation for InstantBlackout {
    fn draw(&mut self, surface: &mut Surface, _dest: (i32, i32), _t: f64) {
        surface.fill(Rgb8::BLACK);
    }

    fn set_color(&mut self, _color: Rgb8) {}
}

/// Fast fade-to-black over the inner animation.
///
/// The overlay opacity ramps at 2550/s, so the frame is fully black by
/// roughly 0.1s of phase time.
pub struct BlackoutWrapper {
    inner: Box<dyn Animation>,
}

impl BlackoutWrapper {
    pub fn new(inner: Box<dyn Animation>) -> Self {
        Self { inner }
    }
}

impl Animation for BlackoutWrapper {
    fn draw(&mut self, surface: &mut Surface, dest: (i32, i32), t: f64) {
        self.inner.draw(surface, dest, t);
        let alpha = (2550.0 * t).min(255.0).max(0.0) as u8;
        surface.overlay_black(alpha);
    }

    fn set_color(&mut self, color: Rgb8) {
        self.inner.set_color(color);
    }
}

/// Whether a [`ColorChangeWrapper`] is still interpolating.
///
/// The only allowed move is `Transitioning -> Settled`, triggered by the next
/// external `set_color` call; it is never reversed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorChangePhase {
    Transitioning,
    Settled,
}

/// Smooth background/foreground color transition over the inner animation.
///
/// While transitioning, each draw interpolates the color pair by
/// `s = t / transition_duration`, fills the surface with the interpolated
/// background, recolors the inner animation with the interpolated foreground,
/// then delegates drawing at `t + time_offset`. `s` is intentionally left
/// unclamped: draws past the nominal duration extrapolate beyond the target
/// pair until the next beat settles the wrapper.
///
/// An external `set_color` marks the transition finished: the wrapper becomes
/// a pass-through that still applies `time_offset`, so the wrapped
/// animation's phase continues uninterrupted.
pub struct ColorChangeWrapper {
    inner: Box<dyn Animation>,
    old: ColorPair,
    new: ColorPair,
    transition_duration: f64,
    time_offset: f64,
    phase: ColorChangePhase,
}

impl ColorChangeWrapper {
    pub fn new(
        inner: Box<dyn Animation>,
        old: ColorPair,
        new: ColorPair,
        transition_duration: f64,
        time_offset: f64,
    ) -> Self {
        Self {
            inner,
            old,
            new,
            transition_duration,
            time_offset,
            phase: ColorChangePhase::Transitioning,
        }
    }

    pub fn phase(&self) -> ColorChangePhase {
        self.phase
    }
}

impl Animation for ColorChangeWrapper {
    fn draw(&mut self, surface: &mut Surface, dest: (i32, i32), t: f64) {
        match self.phase {
            ColorChangePhase::Settled => {
                self.inner.draw(surface, dest, t + self.time_offset);
            }
            ColorChangePhase::Transitioning => {
                let s = t / self.transition_duration;
                let background = self.old.background.lerp(self.new.background, s);
                let foreground = self.old.foreground.lerp(self.new.foreground, s);
                surface.fill(background);
                self.inner.set_color(foreground);
                self.inner.draw(surface, dest, t + self.time_offset);
            }
        }
    }

    fn set_color(&mut self, color: Rgb8) {
        self.inner.set_color(color);
        self.phase = ColorChangePhase::Settled;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/effect.rs"]
mod tests;
