use std::path::Path;

use crate::foundation::error::{HuesError, HuesResult};

/// Check whether `ffprobe` can be spawned from PATH.
pub fn is_ffprobe_on_path() -> bool {
    std::process::Command::new("ffprobe")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Probe a media file's duration in seconds via the system `ffprobe` binary.
///
/// Timeline math requires an exact duration; any probe failure is surfaced as
/// [`HuesError::DurationUnavailable`] and is fatal for the session.
pub fn probe_duration(media_path: &Path) -> HuesResult<f64> {
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        format: Option<ProbeFormat>,
    }

    let unavailable = || HuesError::DurationUnavailable(media_path.display().to_string());

    let out = std::process::Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_format"])
        .arg(media_path)
        .output()
        .map_err(|_| unavailable())?;
    if !out.status.success() {
        tracing::warn!(
            path = %media_path.display(),
            stderr = %String::from_utf8_lossy(&out.stderr).trim(),
            "ffprobe failed"
        );
        return Err(unavailable());
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout).map_err(|_| unavailable())?;
    let duration = parsed
        .format
        .and_then(|f| f.duration)
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(unavailable)?;

    if !duration.is_finite() || duration <= 0.0 {
        return Err(unavailable());
    }
    Ok(duration)
}

/// Decode a media file's audio track to mono f32 PCM at `sample_rate` using
/// the system `ffmpeg` binary.
///
/// Used to precompute the spectrum overlay's spectrogram at session start.
pub fn decode_audio_f32_mono(path: &Path, sample_rate: u32) -> HuesResult<Vec<f32>> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "1",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| HuesError::asset(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        return Err(HuesError::asset(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(HuesError::asset(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let mut pcm = Vec::<f32>::with_capacity(out.stdout.len() / 4);
    for chunk in out.stdout.chunks_exact(4) {
        pcm.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    Ok(pcm)
}
