use super::*;

fn track(symbols: &str, duration: f64) -> RhythmTrack {
    RhythmTrack::new(symbols, duration).unwrap()
}

#[test]
fn rejects_empty_and_bad_durations() {
    assert!(RhythmTrack::new("", 10.0).is_err());
    assert!(RhythmTrack::new("x...", 0.0).is_err());
    assert!(RhythmTrack::new("x...", -2.0).is_err());
    assert!(RhythmTrack::new("x...", f64::NAN).is_err());
    assert!(RhythmTrack::new("x...", f64::INFINITY).is_err());
}

#[test]
fn symbol_lookup_wraps_modulo_len() {
    let t = track("xo.-", 4.0);
    assert_eq!(t.symbol(0), 'x');
    assert_eq!(t.symbol(3), '-');
    assert_eq!(t.symbol(4), 'x');
    assert_eq!(t.symbol(9), 'o');
}

#[test]
fn raw_position_spans_one_cycle() {
    let t = track("x...o...", 8.0);
    assert_eq!(t.raw_position(0.0), 0.0);
    assert_eq!(t.raw_position(4.0), 4.0);
    // One full cycle later maps back to the same slot.
    assert!((t.raw_position(12.0) - 4.0).abs() < 1e-9);
    // Negative times wrap backwards into the cycle.
    assert!((t.raw_position(-1.0) - 7.0).abs() < 1e-9);
}

#[test]
fn phase_time_wraps_across_loop_boundary() {
    let t = track("x...o...", 8.0);
    // Anchor at slot 6, current raw position at slot 1 of the next cycle:
    // three beats elapsed.
    let raw = t.raw_position(9.0); // 1.0
    assert!((t.phase_time(raw, 6) - 3.0).abs() < 1e-9);
    // Anchor equal to position: zero elapsed.
    assert!((t.phase_time(2.0, 2) - 0.0).abs() < 1e-9);
}

#[test]
fn next_nonsustain_scans_cyclically() {
    let t = track("x...o...", 8.0);
    assert_eq!(t.next_nonsustain_distance(0), Some(4));
    assert_eq!(t.next_nonsustain_distance(4), Some(4)); // wraps to slot 0
    assert_eq!(t.next_nonsustain_distance(6), Some(2));
}

#[test]
fn next_nonsustain_none_when_all_sustain() {
    let t = track("....", 4.0);
    assert_eq!(t.next_nonsustain_distance(0), None);
}

#[test]
fn timeline_without_buildup_is_always_loop() {
    let timeline = PlaybackTimeline::new(track("x...", 4.0), None);
    assert_eq!(timeline.buildup_duration(), 0.0);
    let (phase, t_local) = timeline.phase_at(10.0);
    assert_eq!(phase, TrackPhase::Loop);
    assert_eq!(t_local, 10.0);
}

#[test]
fn timeline_buildup_hands_over_to_loop() {
    let timeline = PlaybackTimeline::new(track("x...", 4.0), Some(track("o.", 2.0)));

    let (phase, t_local) = timeline.phase_at(1.5);
    assert_eq!(phase, TrackPhase::Buildup);
    assert_eq!(t_local, 1.5);

    // At exactly the buildup duration the loop starts from zero.
    let (phase, t_local) = timeline.phase_at(2.0);
    assert_eq!(phase, TrackPhase::Loop);
    assert_eq!(t_local, 0.0);

    let (phase, t_local) = timeline.phase_at(5.0);
    assert_eq!(phase, TrackPhase::Loop);
    assert_eq!(t_local, 3.0);
}

#[test]
fn buildup_lookahead_chains_into_loop_track() {
    // Buildup tail is all sustain; the scan continues into the loop track
    // instead of wrapping within the buildup.
    let timeline = PlaybackTimeline::new(track("..x.", 4.0), Some(track("o...", 4.0)));
    assert_eq!(
        timeline.next_nonsustain_distance(TrackPhase::Buildup, 0),
        Some(6)
    );
    // From the last buildup slot the very next slot is loop slot 0 (sustain),
    // then slot 1, then the 'x' at loop slot 2.
    assert_eq!(
        timeline.next_nonsustain_distance(TrackPhase::Buildup, 3),
        Some(3)
    );
}

#[test]
fn loop_lookahead_wraps_cyclically() {
    let timeline = PlaybackTimeline::new(track("x...", 4.0), Some(track("o...", 4.0)));
    assert_eq!(
        timeline.next_nonsustain_distance(TrackPhase::Loop, 2),
        Some(2)
    );
}
