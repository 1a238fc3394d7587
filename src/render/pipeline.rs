use crate::{
    encode::ffmpeg::{EncodeConfig, FfmpegEncoder},
    foundation::error::{HuesError, HuesResult},
    render::session::Session,
    render::surface::Surface,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames_total: u64,
}

/// Drive a session through `seconds` of output and stream every frame into
/// an ffmpeg encoder, strictly in time order.
#[tracing::instrument(skip(session), fields(out = %cfg.out_path.display()))]
pub fn render_to_video(
    session: &mut Session,
    cfg: EncodeConfig,
    seconds: f64,
) -> HuesResult<RenderStats> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(HuesError::validation(
            "render duration must be finite and > 0",
        ));
    }
    let canvas = session.canvas();
    if canvas.width != cfg.width || canvas.height != cfg.height {
        return Err(HuesError::validation(format!(
            "canvas {}x{} does not match encode config {}x{}",
            canvas.width, canvas.height, cfg.width, cfg.height
        )));
    }

    let fps = cfg.fps;
    let frames = fps.secs_to_frames_floor(seconds);
    if frames == 0 {
        return Err(HuesError::validation(
            "render duration is shorter than one frame",
        ));
    }

    let mut encoder = FfmpegEncoder::new(cfg)?;
    let mut surface = Surface::new(canvas);

    for f in 0..frames {
        let t = fps.frames_to_secs(f);
        session.render_frame(t, &mut surface)?;
        encoder.encode_frame(&surface)?;
        if f > 0 && (f % 500) == 0 {
            tracing::info!(frame = f, of = frames, "rendering");
        }
    }

    encoder.finish()?;
    tracing::info!(frames, seconds, "render complete");

    Ok(RenderStats {
        frames_total: frames,
    })
}
