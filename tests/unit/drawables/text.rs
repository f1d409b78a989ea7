use super::*;
use crate::render::recording::{DrawOp, RecordingSurface};

fn dejavu() -> Font {
    Font::open(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/data/fonts/DejaVuSans.ttf"
    ))
    .unwrap()
}

fn glyph_count(text: &Text) -> usize {
    text.runs().iter().map(|run| run.glyphs.len()).sum()
}

#[test]
fn bounds_are_centered_on_the_position() {
    let text = Text::new("Score", dejavu(), 24.0, Rgba8::WHITE, Point::new(100.0, 50.0)).unwrap();
    let bounds = text.bounds().unwrap();
    assert!(bounds.width() > 0.0);
    assert!(bounds.height() > 0.0);
    let center = bounds.center();
    assert!((center.x - 100.0).abs() < 1e-3);
    assert!((center.y - 50.0).abs() < 1e-3);
}

#[test]
fn glyphs_sit_inside_the_bounds() {
    let text = Text::new("Hi", dejavu(), 32.0, Rgba8::WHITE, Point::new(40.0, 40.0)).unwrap();
    let bounds = text.bounds().unwrap();
    for glyph in text.runs().iter().flat_map(|run| &run.glyphs) {
        assert!(f64::from(glyph.x) >= bounds.x0 - 1e-3);
        assert!(f64::from(glyph.x) <= bounds.x1);
        assert!(f64::from(glyph.y) >= bounds.y0);
        assert!(f64::from(glyph.y) <= bounds.y1 + 1e-3);
    }
}

#[test]
fn render_emits_one_glyph_per_character() {
    let color = Rgba8::rgb(10, 200, 30);
    let text = Text::new("Hi", dejavu(), 20.0, color, Point::ZERO).unwrap();
    let mut surface = RecordingSurface::new();
    text.render(&mut surface).unwrap();

    let glyphs: usize = surface
        .commands()
        .iter()
        .map(|cmd| match &cmd.op {
            DrawOp::Glyphs { run } => {
                assert_eq!(run.color, color);
                assert_eq!(run.font_size, 20.0);
                run.glyphs.len()
            }
            other => panic!("unexpected draw op {other:?}"),
        })
        .sum();
    assert_eq!(glyphs, 2);
}

#[test]
fn set_text_reshapes_and_failures_keep_the_layout() {
    let mut text = Text::new("Hi", dejavu(), 20.0, Rgba8::WHITE, Point::ZERO).unwrap();
    let narrow = text.bounds().unwrap().width();
    text.set_text("Hello").unwrap();
    assert_eq!(text.text(), "Hello");
    assert_eq!(glyph_count(&text), 5);
    assert!(text.bounds().unwrap().width() > narrow);

    assert!(text.set_size(-1.0).is_err());
    assert_eq!(text.size_px(), 20.0);
    assert_eq!(glyph_count(&text), 5);
}

#[test]
fn set_color_recolors_existing_runs() {
    let mut text = Text::new("Hi", dejavu(), 20.0, Rgba8::WHITE, Point::ZERO).unwrap();
    text.set_color(Rgba8::BLACK);
    assert_eq!(text.color(), Rgba8::BLACK);
    assert!(text.runs().iter().all(|run| run.color == Rgba8::BLACK));
}

#[test]
fn style_is_kept() {
    let text = Text::new("Hi", dejavu(), 20.0, Rgba8::WHITE, Point::ZERO)
        .unwrap()
        .with_style(TextStyle::Bold)
        .unwrap();
    assert_eq!(text.style(), TextStyle::Bold);
    assert_eq!(glyph_count(&text), 2);
}

#[test]
fn invalid_construction_is_rejected() {
    assert!(Text::new("Hi", dejavu(), 0.0, Rgba8::WHITE, Point::ZERO).is_err());
    assert!(Text::new("Hi", dejavu(), 12.0, Rgba8::WHITE, Point::new(f64::NAN, 0.0)).is_err());
}
