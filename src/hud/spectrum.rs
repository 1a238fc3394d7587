use std::path::Path;

use realfft::RealFftPlanner;

use crate::assets::media::decode_audio_f32_mono;
use crate::foundation::core::Rgb8;
use crate::foundation::error::{HuesError, HuesResult};
use crate::render::surface::Surface;

const ANALYSIS_SAMPLE_RATE: u32 = 22_050;
const FFT_WINDOW: usize = 2048;
const HOP: usize = 512;
const BANDS: usize = 64;

const COLOR_TOP: Rgb8 = Rgb8::WHITE;
const COLOR_BOTTOM: Rgb8 = Rgb8 {
    r: 20,
    g: 20,
    b: 20,
};
const SPECTRUM_ALPHA: u8 = 155;

/// Spectrogram for one track: band powers per analysis column.
#[derive(Clone, Debug)]
struct Spectrogram {
    /// `columns[time][band]`, non-negative dB-ish powers.
    columns: Vec<Vec<f32>>,
    duration_seconds: f64,
}

/// Spectrum visualizer overlay.
///
/// The spectrogram is precomputed at session start from audio decoded via
/// ffmpeg, so per-frame drawing is pure: pick the analysis column for the
/// elapsed time and paint a mirrored column plot. No state feedback into the
/// session.
pub struct Spectrum {
    loop_bands: Spectrogram,
    buildup_bands: Option<Spectrogram>,
    power_max: f32,
    width: u32,
    height: u32,
}

impl Spectrum {
    /// Decode and analyze the session's audio.
    pub fn from_media(
        loop_path: &Path,
        loop_duration: f64,
        buildup: Option<(&Path, f64)>,
    ) -> HuesResult<Self> {
        let loop_pcm = decode_audio_f32_mono(loop_path, ANALYSIS_SAMPLE_RATE)?;
        let loop_bands = analyze(&loop_pcm, loop_duration)?;

        let buildup_bands = match buildup {
            Some((path, duration)) => {
                let pcm = decode_audio_f32_mono(path, ANALYSIS_SAMPLE_RATE)?;
                Some(analyze(&pcm, duration)?)
            }
            None => None,
        };

        Ok(Self::from_columns(
            loop_bands.columns,
            loop_bands.duration_seconds,
            buildup_bands.map(|b| (b.columns, b.duration_seconds)),
        ))
    }

    /// Build directly from precomputed columns (synthetic sources and tests).
    pub fn from_columns(
        loop_columns: Vec<Vec<f32>>,
        loop_duration: f64,
        buildup: Option<(Vec<Vec<f32>>, f64)>,
    ) -> Self {
        let loop_bands = Spectrogram {
            columns: loop_columns,
            duration_seconds: loop_duration,
        };
        let buildup_bands = buildup.map(|(columns, duration_seconds)| Spectrogram {
            columns,
            duration_seconds,
        });

        let power_max = loop_bands
            .columns
            .iter()
            .chain(buildup_bands.iter().flat_map(|b| b.columns.iter()))
            .flatten()
            .copied()
            .fold(0.0f32, f32::max)
            .max(1e-6);

        Self {
            loop_bands,
            buildup_bands,
            power_max,
            width: 1000,
            height: 80,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn draw(&self, surface: &mut Surface, dest: (i32, i32), elapsed: f64, is_buildup: bool) {
        let bands = match (is_buildup, &self.buildup_bands) {
            (true, Some(b)) => b,
            _ => &self.loop_bands,
        };
        if bands.columns.is_empty() {
            return;
        }

        let n = bands.columns.len();
        let j = ((elapsed / bands.duration_seconds) * n as f64).max(0.0) as usize;
        let column = &bands.columns[j.min(n - 1)];
        if column.is_empty() {
            return;
        }

        let (x, y) = dest;
        let half = (self.width / 2) as i32;
        let band_w = (half as f64 / column.len() as f64).max(1.0);

        for (b, &power) in column.iter().enumerate() {
            let frac = (power / self.power_max).clamp(0.0, 1.0);
            let bar_h = (f64::from(frac) * f64::from(self.height)) as i32;
            if bar_h <= 0 {
                continue;
            }
            let x_off = (b as f64 * band_w) as i32;
            let bar_top = y + self.height as i32 - bar_h;

            // Vertical gradient, drawn row by row; mirrored about the center.
            for row in 0..bar_h {
                let ty = f64::from(bar_top + row - y) / f64::from(self.height - 1);
                let color = COLOR_TOP.lerp(COLOR_BOTTOM, ty);
                surface.fill_rect(
                    x + half + x_off,
                    bar_top + row,
                    band_w as u32,
                    1,
                    color,
                    SPECTRUM_ALPHA,
                );
                surface.fill_rect(
                    x + half - x_off - band_w as i32,
                    bar_top + row,
                    band_w as u32,
                    1,
                    color,
                    SPECTRUM_ALPHA,
                );
            }
        }
    }
}

/// Windowed FFT over mono PCM; geometric band pooling and a dB-ish floor.
fn analyze(pcm: &[f32], duration_seconds: f64) -> HuesResult<Spectrogram> {
    if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return Err(HuesError::validation(
            "spectrum analysis duration must be finite and > 0",
        ));
    }

    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(FFT_WINDOW);
    let mut input = fft.make_input_vec();
    let mut output = fft.make_output_vec();

    let hann: Vec<f32> = (0..FFT_WINDOW)
        .map(|i| {
            let phase = (i as f32) / (FFT_WINDOW as f32 - 1.0);
            0.5 - 0.5 * (2.0 * std::f32::consts::PI * phase).cos()
        })
        .collect();

    let n_bins = FFT_WINDOW / 2 + 1;
    let edges = band_edges(n_bins, BANDS);

    let mut columns = Vec::new();
    let mut start = 0usize;
    while start + FFT_WINDOW <= pcm.len() {
        for (dst, (&sample, &w)) in input
            .iter_mut()
            .zip(pcm[start..start + FFT_WINDOW].iter().zip(&hann))
        {
            *dst = sample * w;
        }
        fft.process(&mut input, &mut output)
            .map_err(|e| HuesError::asset(format!("spectrum fft failed: {e}")))?;

        let mut bands = Vec::with_capacity(BANDS);
        for pair in edges.windows(2) {
            let (lo, hi) = (pair[0], pair[1].max(pair[0] + 1).min(n_bins));
            let mean_power = output[lo..hi]
                .iter()
                .map(|c| c.norm_sqr())
                .sum::<f32>()
                / (hi - lo) as f32;
            let db = 10.0 * (mean_power + 1e-10).log10();
            bands.push((db + 60.0).max(0.0));
        }
        columns.push(bands);
        start += HOP;
    }

    if columns.is_empty() {
        // Too little audio for even one window; draw nothing rather than fail.
        tracing::warn!("audio too short for spectrum analysis");
    }

    Ok(Spectrogram {
        columns,
        duration_seconds,
    })
}

/// Geometric bin edges so low frequencies get finer bands.
fn band_edges(n_bins: usize, bands: usize) -> Vec<usize> {
    let max = n_bins as f64;
    (0..=bands)
        .map(|b| {
            let frac = b as f64 / bands as f64;
            (max.powf(frac) - 1.0).round() as usize
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/hud/spectrum.rs"]
mod tests;
