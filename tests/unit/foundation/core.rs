use super::*;

use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn lerp_endpoints_and_midpoint() {
    let a = Rgb8::new(0, 100, 200);
    let b = Rgb8::new(200, 100, 0);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.5), Rgb8::new(100, 100, 100));
}

#[test]
fn lerp_extrapolates_and_saturates() {
    let a = Rgb8::new(100, 0, 255);
    let b = Rgb8::new(200, 0, 0);
    // s > 1 keeps moving past the target until the cast saturates.
    let over = a.lerp(b, 2.0);
    assert_eq!(over.r, 255);
    assert_eq!(over.b, 0);
    let under = a.lerp(b, -1.0);
    assert_eq!(under.r, 0);
    assert_eq!(under.b, 255);
}

#[test]
fn initial_pair_is_white_on_black() {
    let pair = ColorPair::initial();
    assert_eq!(pair.background, Rgb8::WHITE);
    assert_eq!(pair.foreground, Rgb8::BLACK);
}

#[test]
fn random_pairs_respect_channel_ranges() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let pair = ColorPair::random(&mut rng);
        for c in [pair.background.r, pair.background.g, pair.background.b] {
            assert!(c >= 160, "background channel {c} below range");
        }
        for c in [pair.foreground.r, pair.foreground.g, pair.foreground.b] {
            assert!(c < 96, "foreground channel {c} above range");
        }
    }
}

#[test]
fn fps_rejects_zero_terms() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_frame_timing_round_trips() {
    let fps = Fps::new(24_000, 1_001).unwrap();
    assert!((fps.as_f64() - 23.976).abs() < 1e-3);
    assert!((fps.frames_to_secs(24_000) - 1_001.0).abs() < 1e-9);
    assert_eq!(fps.secs_to_frames_floor(1.0), 23);
    assert_eq!(fps.secs_to_frames_floor(0.0), 0);
}
