use super::*;

fn track(symbols: &str) -> RhythmTrack {
    RhythmTrack::new(symbols, symbols.len() as f64).unwrap()
}

#[test]
fn first_update_bootstraps_even_on_sustain() {
    let t = track("....x...");
    let mut machine = BeatMachine::new();

    let event = machine.update(&t, 2.5).unwrap();
    assert_eq!(event, BeatEvent { index: 2, symbol: SUSTAIN });

    let cursor = machine.cursor().unwrap();
    assert_eq!(cursor.active_index, 2);
    assert_eq!(cursor.anchor_index, 2);
}

#[test]
fn sustain_crossings_do_not_fire() {
    let t = track("x.......");
    let mut machine = BeatMachine::new();
    machine.update(&t, 0.0);

    assert_eq!(machine.update(&t, 1.2), None);
    assert_eq!(machine.update(&t, 3.9), None);
    // active_index stays put until a non-sustain slot is crossed
    assert_eq!(machine.cursor().unwrap().active_index, 0);
}

#[test]
fn skipped_beats_dispatch_only_the_last() {
    let t = track("xo-.x...");
    let mut machine = BeatMachine::new();
    machine.update(&t, 0.0);

    // Jump across slots 1, 2 and 3 in one frame: only the '-' at slot 2 is
    // the last non-sustain crossed.
    let event = machine.update(&t, 3.5).unwrap();
    assert_eq!(event, BeatEvent { index: 2, symbol: '-' });
    assert_eq!(machine.cursor().unwrap().active_index, 2);
}

#[test]
fn wraps_across_the_loop_boundary() {
    let t = track("x...o...");
    let mut machine = BeatMachine::new();
    machine.update(&t, 6.0);

    // Position wrapped past the end: slot 7, then slots 0 and 1 of the next
    // cycle. The 'x' at slot 0 fires.
    let event = machine.update(&t, 1.5).unwrap();
    assert_eq!(event, BeatEvent { index: 0, symbol: 'x' });
    assert_eq!(machine.cursor().unwrap().active_index, 0);
}

#[test]
fn re_anchor_zeroes_at_active_beat() {
    let t = track("x...o...");
    let mut machine = BeatMachine::new();
    machine.update(&t, 0.0);
    machine.update(&t, 4.5);

    assert_eq!(machine.anchor_index(), 0);
    machine.re_anchor();
    assert_eq!(machine.anchor_index(), 4);
}

#[test]
fn anchor_index_defaults_to_zero_before_first_update() {
    let machine = BeatMachine::new();
    assert_eq!(machine.anchor_index(), 0);
    assert!(machine.cursor().is_none());
}

#[test]
fn repeated_updates_within_one_slot_fire_once() {
    let t = track("x.x.");
    let mut machine = BeatMachine::new();
    machine.update(&t, 0.0);

    assert!(machine.update(&t, 2.1).is_some());
    assert!(machine.update(&t, 2.5).is_none());
    assert!(machine.update(&t, 2.9).is_none());
}
