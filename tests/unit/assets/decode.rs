use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let buf = png_bytes(1, 1, vec![100, 50, 200, 128]);

    let decoded = decode_image(&buf).unwrap();
    assert_eq!(decoded.width, 1);
    assert_eq!(decoded.height, 1);
    assert_eq!(
        decoded.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn garbage_bytes_fail_with_context() {
    let err = decode_image(b"not an image").unwrap_err();
    assert!(matches!(err, TableauError::Other(_)));
    assert!(err.to_string().contains("decode image from memory"));
}

#[test]
fn transparent_pixels_lose_color() {
    let mut px = vec![10, 20, 30, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![0, 0, 0, 0]);
}

#[test]
fn unpremultiply_restores_opaque_and_half_alpha() {
    let mut px = vec![50, 25, 100, 128, 7, 8, 9, 255];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[4..], &[7, 8, 9, 255]);
    assert!((px[0] as i32 - 100).abs() <= 1);
    assert!((px[2] as i32 - 200).abs() <= 1);
}

#[test]
fn from_premul_checks_length() {
    assert!(ImageData::from_premul(2, 2, vec![0; 16]).is_ok());
    assert!(ImageData::from_premul(2, 2, vec![0; 15]).is_err());
    assert!(ImageData::from_premul(0, 2, vec![]).is_err());
}
