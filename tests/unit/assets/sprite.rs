use super::*;

use std::io::Cursor;

fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    png_bytes(&RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
}

#[test]
fn from_rgba8_validates_buffer_size() {
    assert!(Sprite::from_rgba8(2, 2, vec![0u8; 16]).is_ok());
    assert!(Sprite::from_rgba8(2, 2, vec![0u8; 15]).is_err());
    assert!(Sprite::from_rgba8(2, 2, vec![0u8; 20]).is_err());
}

#[test]
fn from_bytes_rejects_zero_target_height() {
    let bytes = solid_png(2, 2, [0, 0, 0, 255]);
    assert!(Sprite::from_bytes(&bytes, 0).is_err());
}

#[test]
fn from_bytes_rejects_garbage() {
    assert!(Sprite::from_bytes(b"not an image", 16).is_err());
}

#[test]
fn decoding_scales_to_target_height_keeping_aspect() {
    // 4x2 source at target height 8 becomes 16x8.
    let bytes = solid_png(4, 2, [0, 0, 0, 255]);
    let sprite = Sprite::from_bytes(&bytes, 8).unwrap();
    assert_eq!(sprite.width(), 16);
    assert_eq!(sprite.height(), 8);
    assert_eq!(sprite.data().len(), 16 * 8 * 4);
}

#[test]
fn black_art_becomes_opaque_white_mask() {
    let bytes = solid_png(2, 2, [0, 0, 0, 255]);
    let sprite = Sprite::from_bytes(&bytes, 2).unwrap();
    // Inverted black is white, mean inverted luminance is full alpha.
    assert_eq!(&sprite.data()[0..4], &[255, 255, 255, 255]);
}

#[test]
fn white_paper_becomes_transparent() {
    let bytes = solid_png(2, 2, [255, 255, 255, 255]);
    let sprite = Sprite::from_bytes(&bytes, 2).unwrap();
    assert_eq!(sprite.data()[3], 0);
}

#[test]
fn transparent_source_is_flattened_onto_white_first() {
    // Fully transparent pixels read as white paper, not as black.
    let bytes = solid_png(2, 2, [0, 0, 0, 0]);
    let sprite = Sprite::from_bytes(&bytes, 2).unwrap();
    assert_eq!(sprite.data()[3], 0);
}

#[test]
fn set_color_floods_rgb_and_keeps_alpha() {
    let mut sprite = Sprite::from_rgba8(1, 2, vec![1, 2, 3, 40, 4, 5, 6, 200]).unwrap();
    sprite.set_color(Rgb8::new(10, 20, 30));
    assert_eq!(sprite.data(), &[10, 20, 30, 40, 10, 20, 30, 200]);
}

#[test]
fn alpha_scale_derives_a_faint_copy() {
    let sprite = Sprite::from_rgba8(1, 1, vec![9, 9, 9, 110]).unwrap();
    let faint = sprite.alpha_scale(0.5);
    assert_eq!(faint.data(), &[9, 9, 9, 55]);
    // Original untouched.
    assert_eq!(sprite.data()[3], 110);
}
