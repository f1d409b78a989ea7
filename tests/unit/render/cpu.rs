use super::*;

fn pixel(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

fn rect_path(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
    let mut p = BezPath::new();
    p.move_to((x0, y0));
    p.line_to((x1, y0));
    p.line_to((x1, y1));
    p.line_to((x0, y1));
    p.close_path();
    p
}

#[test]
fn rejects_degenerate_sizes() {
    assert!(CpuSurface::new(0, 4).is_err());
    assert!(CpuSurface::new(70_000, 4).is_err());
}

#[test]
fn clear_color_fills_the_frame() {
    let mut s = CpuSurface::new(4, 4).unwrap();
    s.set_clear_color(Rgba8::rgb(0, 0, 255));
    s.clear().unwrap();
    s.present().unwrap();
    let frame = s.frame_rgba();
    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 4 * 4 * 4);
    assert_eq!(pixel(&frame, 2, 2), [0, 0, 255, 255]);
}

#[test]
fn fill_respects_the_current_transform() {
    let mut s = CpuSurface::new(8, 8).unwrap();
    s.clear().unwrap();
    s.save();
    s.concat_transform(Affine::translate((4.0, 0.0)));
    s.fill_path(&rect_path(0.0, 0.0, 4.0, 8.0), Rgba8::rgb(255, 0, 0))
        .unwrap();
    s.restore().unwrap();
    s.present().unwrap();

    let frame = s.frame_rgba();
    assert_eq!(pixel(&frame, 1, 4), [0, 0, 0, 0]);
    assert_eq!(pixel(&frame, 6, 4), [255, 0, 0, 255]);
}

#[test]
fn unbalanced_restore_is_fatal() {
    let mut s = CpuSurface::new(2, 2).unwrap();
    assert!(s.restore().unwrap_err().is_fatal());
}

#[test]
fn next_frame_starts_from_an_empty_context() {
    let mut s = CpuSurface::new(8, 8).unwrap();
    s.clear().unwrap();
    s.fill_path(&rect_path(0.0, 0.0, 4.0, 8.0), Rgba8::rgb(255, 0, 0))
        .unwrap();
    s.present().unwrap();
    assert_eq!(pixel(&s.frame_rgba(), 1, 4), [255, 0, 0, 255]);

    s.clear().unwrap();
    s.fill_path(&rect_path(4.0, 0.0, 8.0, 8.0), Rgba8::rgb(0, 255, 0))
        .unwrap();
    s.present().unwrap();
    let frame = s.frame_rgba();
    assert_eq!(pixel(&frame, 1, 4), [0, 0, 0, 0]);
    assert_eq!(pixel(&frame, 6, 4), [0, 255, 0, 255]);
}

fn blurred_edge(intensity: Option<f64>) -> [u8; 4] {
    let mut s = CpuSurface::new(32, 32).unwrap();
    s.clear().unwrap();
    s.save();
    if let Some(intensity) = intensity {
        s.push_filter(Filter {
            name: BLUR_FILTER.to_string(),
            intensity,
        });
    }
    s.fill_path(&rect_path(8.0, 8.0, 24.0, 24.0), Rgba8::WHITE)
        .unwrap();
    s.restore().unwrap();
    s.present().unwrap();
    pixel(&s.frame_rgba(), 6, 16)
}

#[test]
fn blur_filter_spreads_coverage_past_the_edge() {
    assert_eq!(blurred_edge(None), [0, 0, 0, 0]);
    let [_, _, _, a] = blurred_edge(Some(0.25));
    assert!(a > 0, "blurred edge should be partly covered");
    assert!(a < 255);
}

#[test]
fn other_filters_draw_unchanged() {
    let mut s = CpuSurface::new(8, 8).unwrap();
    s.clear().unwrap();
    s.push_filter(Filter {
        name: "sepia".to_string(),
        intensity: 1.0,
    });
    s.fill_path(&rect_path(0.0, 0.0, 4.0, 8.0), Rgba8::rgb(255, 0, 0))
        .unwrap();
    s.present().unwrap();
    let frame = s.frame_rgba();
    assert_eq!(pixel(&frame, 1, 4), [255, 0, 0, 255]);
    assert_eq!(pixel(&frame, 6, 4), [0, 0, 0, 0]);
}
