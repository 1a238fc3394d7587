use super::*;

use crate::foundation::core::Canvas;

fn surface() -> Surface {
    Surface::new(Canvas {
        width: 1100,
        height: 120,
    })
}

fn black(surface: &mut Surface) {
    surface.fill(Rgb8::BLACK);
}

#[test]
fn reports_fixed_dimensions() {
    let bar = BeatBar::new(&['x', '.'], &[]);
    assert_eq!(bar.width(), 1000);
    assert_eq!(bar.height(), 38);
}

#[test]
fn draw_paints_the_box_region() {
    let bar = BeatBar::new(&['x', '.', '.', '.'], &[]);
    let mut s = surface();
    black(&mut s);
    bar.draw(&mut s, (50, 10), 0.0, false);

    // Border and back panel are translucent greys over black.
    assert_ne!(s.pixel(52, 12), [0, 0, 0, 255]);
    assert_ne!(s.pixel(60, 20), [0, 0, 0, 255]);
    // Outside the box nothing changes.
    assert_eq!(s.pixel(10, 10), [0, 0, 0, 255]);
    assert_eq!(s.pixel(50 + 1000 + 5, 20), [0, 0, 0, 255]);
}

#[test]
fn draw_clips_when_partially_offscreen() {
    let bar = BeatBar::new(&['x', '.', '.', '.'], &[]);
    let mut s = surface();
    black(&mut s);
    // Matches the session placement: the top border hangs off the canvas.
    bar.draw(&mut s, (50, -4), 0.0, false);
    assert_ne!(s.pixel(60, 10), [0, 0, 0, 255]);
}

#[test]
fn medallion_lights_on_non_sustain_beats() {
    let bar = BeatBar::new(&['x', '.', '.', '.'], &[]);
    let center = (50 + 500, 10 + 19);

    let mut on_beat = surface();
    black(&mut on_beat);
    bar.draw(&mut on_beat, (50, 10), 0.5, false);
    assert_eq!(
        on_beat.pixel(center.0 as u32, center.1 as u32),
        [255, 255, 255, 255]
    );

    let mut off_beat = surface();
    black(&mut off_beat);
    bar.draw(&mut off_beat, (50, 10), 1.5, false);
    assert_ne!(
        off_beat.pixel(center.0 as u32, center.1 as u32),
        [255, 255, 255, 255]
    );
}

#[test]
fn buildup_flag_reads_the_buildup_rhythm() {
    let bar = BeatBar::new(&['.', '.'], &['o', '.']);
    let center = (50 + 500, 10 + 19);

    let mut s = surface();
    black(&mut s);
    bar.draw(&mut s, (50, 10), 0.3, true);
    assert_eq!(
        s.pixel(center.0 as u32, center.1 as u32),
        [255, 255, 255, 255]
    );

    // Same position against the loop rhythm is a sustain.
    let mut s = surface();
    black(&mut s);
    bar.draw(&mut s, (50, 10), 0.3, false);
    assert_ne!(
        s.pixel(center.0 as u32, center.1 as u32),
        [255, 255, 255, 255]
    );
}

#[test]
fn upcoming_beats_draw_ticks_beside_the_medallion() {
    let with_beats = BeatBar::new(&['.', 'x', '.', 'x'], &[]);
    let all_sustain = BeatBar::new(&['.', '.', '.', '.'], &[]);

    let mut a = surface();
    black(&mut a);
    with_beats.draw(&mut a, (50, 10), 0.0, false);

    let mut b = surface();
    black(&mut b);
    all_sustain.draw(&mut b, (50, 10), 0.0, false);

    // Identical boxes and medallions, so any difference comes from ticks.
    assert_ne!(a.data(), b.data());
}
