use super::*;

#[test]
fn intensity_maps_onto_the_radius_range() {
    assert_eq!(blur_radius(0.0), 0);
    assert_eq!(blur_radius(-1.0), 0);
    assert_eq!(blur_radius(f64::NAN), 0);
    assert_eq!(blur_radius(0.5), MAX_BLUR_RADIUS / 2);
    assert_eq!(blur_radius(1.0), MAX_BLUR_RADIUS);
    assert_eq!(blur_radius(3.0), MAX_BLUR_RADIUS);
}

#[test]
fn zero_radius_copies_the_input() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    assert_eq!(blur_rgba8_premul(&src, 2, 1, 0).unwrap(), src);
}

#[test]
fn flat_images_stay_flat() {
    let src = [10u8, 20, 30, 40].repeat(5 * 3);
    assert_eq!(blur_rgba8_premul(&src, 5, 3, 4).unwrap(), src);
}

#[test]
fn a_single_pixel_spreads_and_keeps_alpha_over_color() {
    let (w, h) = (7u32, 7u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((3 * w + 3) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 128, 0, 255]);

    let out = blur_rgba8_premul(&src, w, h, 2).unwrap();
    let lit = out.chunks_exact(4).filter(|px| px[3] > 0).count();
    assert!(lit > 1);
    assert!(out[center + 3] < 255);
    assert!(out.chunks_exact(4).all(|px| px[0] <= px[3] && px[1] <= px[3]));

    let total: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!(total.abs_diff(255) <= 20);
}

#[test]
fn mismatched_buffers_are_rejected() {
    assert!(matches!(
        blur_rgba8_premul(&[0u8; 7], 1, 2, 1),
        Err(TableauError::InvalidParameter(_))
    ));
}
