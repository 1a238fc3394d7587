use super::*;

fn canvas(width: u32, height: u32) -> Canvas {
    Canvas { width, height }
}

fn sprite(width: u32, height: u32, rgba: [u8; 4]) -> Sprite {
    let data = rgba
        .iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect();
    Sprite::from_rgba8(width, height, data).unwrap()
}

#[test]
fn new_surface_is_zeroed_and_sized() {
    let s = Surface::new(canvas(3, 2));
    assert_eq!(s.width(), 3);
    assert_eq!(s.height(), 2);
    assert_eq!(s.data().len(), 3 * 2 * 4);
    assert!(s.data().iter().all(|&b| b == 0));
}

#[test]
fn fill_makes_every_pixel_opaque() {
    let mut s = Surface::new(canvas(4, 4));
    s.fill(Rgb8::new(9, 8, 7));
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(s.pixel(x, y), [9, 8, 7, 255]);
        }
    }
}

#[test]
fn fill_rect_clips_to_bounds() {
    let mut s = Surface::new(canvas(4, 4));
    s.fill(Rgb8::WHITE);
    // Rect hangs off the top-left corner; only the in-bounds part changes.
    s.fill_rect(-2, -2, 4, 4, Rgb8::BLACK, 255);
    assert_eq!(s.pixel(0, 0), [0, 0, 0, 255]);
    assert_eq!(s.pixel(1, 1), [0, 0, 0, 255]);
    assert_eq!(s.pixel(2, 2), [255, 255, 255, 255]);
}

#[test]
fn fill_rect_blends_by_alpha() {
    let mut s = Surface::new(canvas(2, 2));
    s.fill(Rgb8::WHITE);
    s.fill_rect(0, 0, 2, 2, Rgb8::BLACK, 128);
    let [r, g, b, a] = s.pixel(0, 0);
    assert_eq!(a, 255);
    assert!(r > 100 && r < 150, "half blend off: {r}");
    assert_eq!(r, g);
    assert_eq!(g, b);
}

#[test]
fn fill_rect_zero_alpha_is_noop() {
    let mut s = Surface::new(canvas(2, 2));
    s.fill(Rgb8::WHITE);
    s.fill_rect(0, 0, 2, 2, Rgb8::BLACK, 0);
    assert_eq!(s.pixel(0, 0), [255, 255, 255, 255]);
}

#[test]
fn overlay_black_at_full_alpha_blacks_out() {
    let mut s = Surface::new(canvas(2, 2));
    s.fill(Rgb8::new(50, 100, 150));
    s.overlay_black(255);
    assert_eq!(s.pixel(1, 1), [0, 0, 0, 255]);
}

#[test]
fn blit_composites_straight_alpha_over() {
    let mut s = Surface::new(canvas(4, 4));
    s.fill(Rgb8::WHITE);

    // Opaque source replaces.
    s.blit(&sprite(1, 1, [10, 20, 30, 255]), (0, 0));
    assert_eq!(s.pixel(0, 0), [10, 20, 30, 255]);

    // Half-transparent black over white lands near mid grey.
    s.blit(&sprite(1, 1, [0, 0, 0, 128]), (1, 1));
    let [r, _, _, a] = s.pixel(1, 1);
    assert!(r > 100 && r < 150, "half blend off: {r}");
    assert_eq!(a, 255);

    // Fully transparent source leaves the destination alone.
    s.blit(&sprite(1, 1, [0, 0, 0, 0]), (2, 2));
    assert_eq!(s.pixel(2, 2), [255, 255, 255, 255]);
}

#[test]
fn blit_clips_partially_offscreen_sprites() {
    let mut s = Surface::new(canvas(4, 4));
    s.fill(Rgb8::WHITE);

    s.blit(&sprite(3, 3, [0, 0, 0, 255]), (-1, -1));
    assert_eq!(s.pixel(0, 0), [0, 0, 0, 255]);
    assert_eq!(s.pixel(1, 1), [0, 0, 0, 255]);
    assert_eq!(s.pixel(2, 2), [255, 255, 255, 255]);

    s.blit(&sprite(3, 3, [0, 0, 0, 255]), (3, 3));
    assert_eq!(s.pixel(3, 3), [0, 0, 0, 255]);

    // Entirely offscreen: no panic, no change.
    s.blit(&sprite(3, 3, [0, 0, 0, 255]), (10, 10));
    s.blit(&sprite(3, 3, [0, 0, 0, 255]), (-10, -10));
}
