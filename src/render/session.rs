use std::path::Path;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::animation::effect::{
    Animation, BlackoutWrapper, Blur, BlurAxis, ColorChangeWrapper, InstantBlackout, StaticImage,
};
use crate::assets::respack::{Align, OpenedSong, Resources};
use crate::assets::sprite::Sprite;
use crate::assets::media::probe_duration;
use crate::foundation::core::{Canvas, ColorPair};
use crate::foundation::error::{HuesError, HuesResult};
use crate::hud::beat_bar::BeatBar;
use crate::hud::spectrum::Spectrum;
use crate::render::surface::Surface;
use crate::rhythm::beat::{BeatEvent, BeatMachine};
use crate::rhythm::track::{PlaybackTimeline, RhythmTrack, TrackPhase};

/// Provider of the next sprite for image-swapping beat transitions.
///
/// [`Resources`] implements this by decoding a random catalogued image;
/// tests substitute synthetic sources.
pub trait SpriteSource {
    fn next_sprite(&mut self, rng: &mut StdRng, target_height: u32) -> HuesResult<(Sprite, Align)>;
}

impl SpriteSource for Resources {
    fn next_sprite(&mut self, rng: &mut StdRng, target_height: u32) -> HuesResult<(Sprite, Align)> {
        let (sprite, entry) = self.open_random_image(rng, target_height)?;
        Ok((sprite, entry.align))
    }
}

/// Which effect shape is currently active, for logging and introspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Static,
    BlurHorizontal,
    BlurVertical,
    Recolor,
    Blackout,
    InstantBlackout,
    ColorChange,
    ColorChangeStatic,
}

struct Hud {
    beat_bar: BeatBar,
    spectrum: Spectrum,
}

/// One visualizer run: rhythm timeline, beat machine, active animation and
/// colors, plus the sprite source feeding image swaps.
///
/// All mutable session state lives here and is advanced strictly in frame
/// order; `render_frame` must be called with non-decreasing `t`.
pub struct Session {
    timeline: PlaybackTimeline,
    machine: BeatMachine,
    sprites: Box<dyn SpriteSource>,
    animation: Box<dyn Animation>,
    current_sprite: Sprite,
    sprite_dest: (i32, i32),
    colors: ColorPair,
    canvas: Canvas,
    rng: StdRng,
    hud: Option<Hud>,
    current_effect: EffectKind,
    song: Option<OpenedSong>,
}

impl Session {
    /// Build a session from explicit parts (no IO).
    pub fn new(
        timeline: PlaybackTimeline,
        mut sprites: Box<dyn SpriteSource>,
        canvas: Canvas,
        seed: Option<u64>,
    ) -> HuesResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(HuesError::validation("canvas dimensions must be non-zero"));
        }

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::rng().next_u64()),
        };

        let colors = ColorPair::initial();
        let (mut sprite, align) = sprites.next_sprite(&mut rng, canvas.height)?;
        sprite.set_color(colors.foreground);
        let sprite_dest = (align.dest_x(canvas.width, sprite.width()), 0);

        Ok(Self {
            timeline,
            machine: BeatMachine::new(),
            sprites,
            animation: Box::new(StaticImage::new(sprite.clone())),
            current_sprite: sprite,
            sprite_dest,
            colors,
            canvas,
            rng,
            hud: None,
            current_effect: EffectKind::Static,
            song: None,
        })
    }

    /// Open a catalogued song and build a full session: probe durations,
    /// construct the timeline, and precompute the HUD overlays.
    #[tracing::instrument(skip(resources))]
    pub fn open(
        resources: Resources,
        song_name: &str,
        canvas: Canvas,
        seed: Option<u64>,
    ) -> HuesResult<Self> {
        let song = resources.open_song(song_name)?;

        let loop_duration = probe_duration(&song.loop_media_path)?;
        let loop_track = RhythmTrack::new(&song.entry.rhythm, loop_duration)?;

        let buildup_track = match &song.buildup_media_path {
            Some(path) => {
                let rhythm = song.entry.buildup_rhythm.as_deref().ok_or_else(|| {
                    HuesError::rhythm(format!(
                        "song '{song_name}' declares buildup audio without a buildup rhythm"
                    ))
                })?;
                Some(RhythmTrack::new(rhythm, probe_duration(path)?)?)
            }
            None => None,
        };

        tracing::info!(
            song = song_name,
            loop_beats = loop_track.len(),
            loop_duration,
            has_buildup = buildup_track.is_some(),
            "session opened"
        );

        let beat_bar = BeatBar::new(
            loop_track.symbols(),
            buildup_track.as_ref().map(RhythmTrack::symbols).unwrap_or(&[]),
        );
        let spectrum = Spectrum::from_media(
            &song.loop_media_path,
            loop_duration,
            song.buildup_media_path
                .as_deref()
                .zip(buildup_track.as_ref().map(RhythmTrack::duration_seconds)),
        )?;

        let timeline = PlaybackTimeline::new(loop_track, buildup_track);
        let mut session = Session::new(timeline, Box::new(resources), canvas, seed)?;
        session.hud = Some(Hud { beat_bar, spectrum });
        session.song = Some(song);
        Ok(session)
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn timeline(&self) -> &PlaybackTimeline {
        &self.timeline
    }

    pub fn colors(&self) -> ColorPair {
        self.colors
    }

    pub fn current_effect(&self) -> EffectKind {
        self.current_effect
    }

    /// Extracted media paths backing this session's audio, when the session
    /// was opened from a respack song.
    pub fn media_paths(&self) -> Option<(&Path, Option<&Path>)> {
        self.song
            .as_ref()
            .map(|s| (s.loop_media_path.as_path(), s.buildup_media_path.as_deref()))
    }

    /// Advance the state machine to absolute time `t` and compose one frame.
    #[tracing::instrument(skip(self, surface), level = "trace")]
    pub fn render_frame(&mut self, t: f64, surface: &mut Surface) -> HuesResult<()> {
        let (phase, t_local) = self.timeline.phase_at(t);
        let raw = self.timeline.track(phase).raw_position(t_local);

        let event = self.machine.update(self.timeline.track(phase), raw);
        if let Some(event) = event {
            self.apply_symbol(event, phase)?;
        }

        let track = self.timeline.track(phase);
        let phase_time = track.phase_time(raw, self.machine.anchor_index());
        let overlay_elapsed = t_local.rem_euclid(track.duration_seconds());

        surface.fill(self.colors.background);
        self.animation.draw(surface, self.sprite_dest, phase_time);

        if let Some(hud) = &self.hud {
            let is_buildup = phase == TrackPhase::Buildup;
            let bar_x = (self.canvas.width as i64 - hud.beat_bar.width() as i64) / 2;
            hud.beat_bar.draw(surface, (bar_x as i32, -4), raw, is_buildup);

            let spec_x = (self.canvas.width as i64 - hud.spectrum.width() as i64) / 2;
            let spec_y = self.canvas.height as i64 - hud.spectrum.height() as i64;
            hud.spectrum.draw(
                surface,
                (spec_x as i32, spec_y as i32),
                overlay_elapsed,
                is_buildup,
            );
        }

        Ok(())
    }

    /// Beat-symbol transition table: map the crossed symbol to an effect
    /// swap, case-insensitively. Unrecognized symbols are no-ops.
    fn apply_symbol(&mut self, event: BeatEvent, phase: TrackPhase) -> HuesResult<()> {
        let symbol = event.symbol.to_ascii_lowercase();
        let kind = match symbol {
            'o' | 'x' => {
                self.pick_new_colors();
                self.pick_new_sprite()?;
                self.machine.re_anchor();
                let axis = if symbol == 'o' {
                    BlurAxis::Horizontal
                } else {
                    BlurAxis::Vertical
                };
                self.animation = Box::new(Blur::new(self.current_sprite.clone(), axis));
                if symbol == 'o' {
                    EffectKind::BlurHorizontal
                } else {
                    EffectKind::BlurVertical
                }
            }
            ':' => {
                self.pick_new_colors();
                self.machine.re_anchor();
                self.animation.set_color(self.colors.foreground);
                EffectKind::Recolor
            }
            '-' => {
                self.pick_new_colors();
                self.pick_new_sprite()?;
                self.machine.re_anchor();
                self.animation = Box::new(StaticImage::new(self.current_sprite.clone()));
                EffectKind::Static
            }
            '+' => {
                self.machine.re_anchor();
                let blur = Blur::new(self.current_sprite.clone(), BlurAxis::Horizontal);
                self.animation = Box::new(BlackoutWrapper::new(Box::new(blur)));
                EffectKind::Blackout
            }
            '|' => {
                self.machine.re_anchor();
                self.animation = Box::new(InstantBlackout);
                EffectKind::InstantBlackout
            }
            '~' => {
                let new_colors = ColorPair::random(&mut self.rng);
                let track = self.timeline.track(phase);
                let len = track.len() as f64;
                // Offset by the time already accumulated under the old
                // anchor, so the wrapped animation's phase continues
                // uninterrupted across the re-anchor.
                let t_delta = track.duration_seconds()
                    * (event.index as f64 - self.machine.anchor_index() as f64)
                    / len;
                let duration = self.transition_duration(phase, event.index);
                self.machine.re_anchor();
                let inner = std::mem::replace(&mut self.animation, Box::new(InstantBlackout));
                self.animation = Box::new(ColorChangeWrapper::new(
                    inner,
                    self.colors,
                    new_colors,
                    duration,
                    t_delta,
                ));
                EffectKind::ColorChange
            }
            '=' => {
                self.pick_new_sprite()?;
                let new_colors = ColorPair::random(&mut self.rng);
                let duration = self.transition_duration(phase, event.index);
                self.machine.re_anchor();
                let fresh = StaticImage::new(self.current_sprite.clone());
                self.animation = Box::new(ColorChangeWrapper::new(
                    Box::new(fresh),
                    self.colors,
                    new_colors,
                    duration,
                    0.0,
                ));
                EffectKind::ColorChangeStatic
            }
            _ => return Ok(()),
        };

        self.current_effect = kind;
        tracing::debug!(index = event.index, symbol = %event.symbol, ?kind, "transition");
        Ok(())
    }

    /// Transition duration for color-change beats: the current beat's
    /// lookahead length in seconds. An all-sustain tail falls back to one
    /// full track cycle.
    fn transition_duration(&self, phase: TrackPhase, index: usize) -> f64 {
        let track = self.timeline.track(phase);
        let beats = self
            .timeline
            .next_nonsustain_distance(phase, index)
            .unwrap_or(track.len());
        track.duration_seconds() * beats as f64 / track.len() as f64
    }

    fn pick_new_colors(&mut self) {
        self.colors = ColorPair::random(&mut self.rng);
        self.current_sprite.set_color(self.colors.foreground);
    }

    fn pick_new_sprite(&mut self) -> HuesResult<()> {
        let (mut sprite, align) = self.sprites.next_sprite(&mut self.rng, self.canvas.height)?;
        sprite.set_color(self.colors.foreground);
        self.sprite_dest = (align.dest_x(self.canvas.width, sprite.width()), 0);
        self.current_sprite = sprite;
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("canvas", &self.canvas)
            .field("current_effect", &self.current_effect)
            .field("cursor", &self.machine.cursor())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/session.rs"]
mod tests;
