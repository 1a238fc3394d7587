use std::{
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::{
    foundation::core::Fps,
    foundation::error::{HuesError, HuesResult},
    render::surface::Surface,
};

/// Audio inputs muxed into the output alongside the piped video stream.
///
/// The loop track repeats for as long as video frames keep arriving; an
/// optional buildup track plays once in front of it.
#[derive(Clone, Debug)]
pub struct AudioInputConfig {
    pub loop_path: PathBuf,
    pub buildup_path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    pub out_path: PathBuf,
    pub overwrite: bool,
    pub audio: Option<AudioInputConfig>,
}

impl EncodeConfig {
    pub fn validate(&self) -> HuesResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(HuesError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(HuesError::validation(
                "encode fps numerator/denominator must be non-zero",
            ));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // Default settings target yuv420p output for maximum compatibility.
            return Err(HuesError::validation(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }

    pub fn with_out_path(mut self, out_path: impl Into<PathBuf>) -> Self {
        self.out_path = out_path.into();
        self
    }

    pub fn with_audio(mut self, audio: AudioInputConfig) -> Self {
        self.audio = Some(audio);
        self
    }
}

/// NTSC-film video config, no audio.
pub fn default_video_config(out_path: impl Into<PathBuf>, width: u32, height: u32) -> EncodeConfig {
    EncodeConfig {
        width,
        height,
        fps: Fps {
            num: 24_000,
            den: 1_001,
        },
        out_path: out_path.into(),
        overwrite: true,
        audio: None,
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> HuesResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Filter graph sourcing audio from the media files directly: the loop
/// repeats forever (`-shortest` trims it to the video), with the buildup
/// concatenated in front when present.
pub(crate) fn audio_filter_graph(audio: &AudioInputConfig) -> String {
    let loop_path = audio.loop_path.display();
    match &audio.buildup_path {
        Some(buildup) => format!(
            "amovie='{}'[bu];amovie='{loop_path}':loop=0,asetpts=N/SR/TB[lp];\
             [bu][lp]concat=n=2:v=0:a=1[aout]",
            buildup.display()
        ),
        None => format!("amovie='{loop_path}':loop=0,asetpts=N/SR/TB[aout]"),
    }
}

/// Full ffmpeg argument list for `cfg`, excluding the binary name.
pub(crate) fn build_args(cfg: &EncodeConfig) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    args.push(if cfg.overwrite { "-y" } else { "-n" }.into());

    args.extend(
        [
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
        ]
        .map(String::from),
    );

    match &cfg.audio {
        Some(audio) => {
            args.extend(["-filter_complex".into(), audio_filter_graph(audio)]);
            args.extend(
                [
                    "-map", "0:v", "-map", "[aout]", "-shortest", "-c:a", "aac", "-b:a", "160k",
                    "-ac", "2", "-ar", "44100",
                ]
                .map(String::from),
            );
        }
        None => args.push("-an".into()),
    }

    args.extend(
        [
            "-c:v",
            "libx264",
            "-preset",
            "veryfast",
            "-crf",
            "22",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]
        .map(String::from),
    );
    args.push(cfg.out_path.display().to_string());
    args
}

/// Streams raw RGBA frames into a spawned `ffmpeg` process.
///
/// The system binary is used rather than linking FFmpeg to avoid native dev
/// header/lib requirements.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    child: Child,
    stdin: Option<ChildStdin>,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig) -> HuesResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(HuesError::validation(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(HuesError::encode(
                "ffmpeg is required for video encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.args(build_args(&cfg))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        tracing::debug!(out = %cfg.out_path.display(), "spawning ffmpeg");
        let mut child = cmd.spawn().map_err(|e| {
            HuesError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| HuesError::encode("failed to open ffmpeg stdin (unexpected)"))?;

        Ok(Self {
            cfg,
            child,
            stdin: Some(stdin),
        })
    }

    pub fn config(&self) -> &EncodeConfig {
        &self.cfg
    }

    pub fn encode_frame(&mut self, frame: &Surface) -> HuesResult<()> {
        if frame.width() != self.cfg.width || frame.height() != self.cfg.height {
            return Err(HuesError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                self.cfg.width,
                self.cfg.height
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(HuesError::encode("ffmpeg encoder is already finalized"));
        };

        use std::io::Write as _;
        stdin
            .write_all(frame.data())
            .map_err(|e| HuesError::encode(format!("failed to write frame to ffmpeg stdin: {e}")))?;

        Ok(())
    }

    pub fn finish(mut self) -> HuesResult<()> {
        drop(self.stdin.take());

        let output = self
            .child
            .wait_with_output()
            .map_err(|e| HuesError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HuesError::encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
