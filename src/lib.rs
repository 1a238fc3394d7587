//! Hues is a beat-synchronized visualizer renderer.
//!
//! A textual rhythm track and continuous playback time drive a small animation
//! state machine; each frame is composed on a CPU raster surface and streamed
//! as raw RGBA to the system `ffmpeg` binary, which muxes the frames with the
//! session's audio.
//!
//! # Pipeline overview
//!
//! 1. **Catalogue**: respack zip archives are scanned into sprites, songs and
//!    rhythm tracks ([`Resources`]).
//! 2. **Advance**: per frame, playback time is converted into beat-crossing
//!    events ([`BeatMachine`]) which swap or decorate the active animation.
//! 3. **Render**: the active [`Animation`] and HUD overlays are composited
//!    onto a [`Surface`].
//! 4. **Encode**: finished frames stream to [`FfmpegEncoder`].
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Strictly ordered frames**: beat cursor and wrapper state are
//!   accumulated, order-dependent state; frames are generated sequentially.
//! - **No IO in the renderer**: archive reads, audio probing and spectrogram
//!   analysis are front-loaded at session construction.
#![forbid(unsafe_code)]

mod animation;
mod assets;
mod encode;
mod foundation;
mod hud;
mod render;
mod rhythm;

pub use animation::effect::{
    Animation, BlackoutWrapper, Blur, BlurAxis, ColorChangePhase, ColorChangeWrapper,
    InstantBlackout, StaticImage,
};
pub use assets::media::{decode_audio_f32_mono, is_ffprobe_on_path, probe_duration};
pub use assets::respack::{Align, ImageEntry, OpenedSong, ResPack, Resources, SongEntry};
pub use assets::sprite::Sprite;
pub use encode::ffmpeg::{
    AudioInputConfig, EncodeConfig, FfmpegEncoder, default_video_config, ensure_parent_dir,
    is_ffmpeg_on_path,
};
pub use foundation::core::{Canvas, ColorPair, Fps, Rgb8};
pub use foundation::error::{HuesError, HuesResult};
pub use hud::beat_bar::BeatBar;
pub use hud::spectrum::Spectrum;
pub use render::pipeline::{RenderStats, render_to_video};
pub use render::session::{EffectKind, Session, SpriteSource};
pub use render::surface::Surface;
pub use rhythm::beat::{BeatCursor, BeatEvent, BeatMachine};
pub use rhythm::track::{PlaybackTimeline, RhythmTrack, SUSTAIN, TrackPhase};
