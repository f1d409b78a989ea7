use super::*;
use crate::render::recording::{DrawOp, RecordingSurface};

fn vertex_count(shape: &Shape) -> usize {
    shape
        .path()
        .elements()
        .iter()
        .filter(|el| matches!(el, kurbo::PathEl::MoveTo(_) | kurbo::PathEl::LineTo(_)))
        .count()
}

#[test]
fn polygon_vertices_sit_on_the_radius() {
    let shape = Shape::polygon(5, 100.0, Point::new(350.0, 100.0)).unwrap();
    assert_eq!(vertex_count(&shape), 5);
    let kurbo::PathEl::MoveTo(first) = shape.path().elements()[0] else {
        panic!("polygon must start with a move");
    };
    assert!((first.x - 450.0).abs() < 1e-9);
    assert!((first.y - 100.0).abs() < 1e-9);
}

#[test]
fn star_alternates_outer_and_inner_radius() {
    let center = Point::new(0.0, 0.0);
    let shape = Shape::star(5, 100.0, 0.5, center).unwrap();
    assert_eq!(vertex_count(&shape), 10);
    let pts: Vec<Point> = shape
        .path()
        .elements()
        .iter()
        .filter_map(|el| match el {
            kurbo::PathEl::MoveTo(p) | kurbo::PathEl::LineTo(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert!((pts[0].distance(center) - 100.0).abs() < 1e-9);
    assert!((pts[1].distance(center) - 50.0).abs() < 1e-9);
}

#[test]
fn invalid_geometry_is_rejected() {
    assert!(Shape::polygon(2, 10.0, Point::ZERO).is_err());
    assert!(Shape::star(5, 10.0, 1.5, Point::ZERO).is_err());
    assert!(Shape::circle(-1.0, Point::ZERO).is_err());
    assert!(Shape::rectangle(f64::NAN, 1.0, Point::ZERO).is_err());
    assert!(Shape::from_svg("M 0 0 X 1").is_err());
    assert!(
        Shape::rectangle(1.0, 1.0, Point::ZERO)
            .unwrap()
            .with_stroke(Rgba8::BLACK, -1.0, &[])
            .is_err()
    );
}

#[test]
fn bounds_cover_the_geometry() {
    let rect = Shape::rectangle(200.0, 100.0, Point::new(20.0, 250.0)).unwrap();
    assert_eq!(rect.bounds(), Some(Rect::new(20.0, 250.0, 220.0, 350.0)));

    let circle = Shape::circle(75.0, Point::new(350.0, 300.0)).unwrap();
    let b = circle.bounds().unwrap();
    assert!((b.center().x - 350.0).abs() < 1e-6);
    assert!((b.width() - 150.0).abs() < 1e-6);

    let svg = Shape::from_svg("M20 20 l 200 0 l 0 100 l -200 0 Z").unwrap();
    assert_eq!(svg.bounds(), Some(Rect::new(20.0, 20.0, 220.0, 120.0)));

    assert_eq!(Shape::from_path(BezPath::new()).bounds(), None);
}

#[test]
fn render_fills_then_strokes() {
    let shape = Shape::ellipse(200.0, 100.0, Point::new(650.0, 350.0))
        .unwrap()
        .with_fill(Rgba8::new(128, 0, 128, 128))
        .with_stroke(Rgba8::BLACK, 5.0, &[5.0])
        .unwrap();
    let mut surface = RecordingSurface::new();
    shape.render(&mut surface).unwrap();

    let cmds = surface.commands();
    assert_eq!(cmds.len(), 2);
    assert!(matches!(cmds[0].op, DrawOp::FillPath { color, .. } if color == Rgba8::new(128, 0, 128, 128)));
    match &cmds[1].op {
        DrawOp::StrokePath { stroke, .. } => {
            assert_eq!(stroke.width, 5.0);
            assert_eq!(stroke.dash, vec![5.0]);
        }
        other => panic!("expected stroke, got {other:?}"),
    }
}

#[test]
fn all_zero_dash_means_solid() {
    let shape = Shape::rectangle(1.0, 1.0, Point::ZERO)
        .unwrap()
        .with_stroke(Rgba8::BLACK, 1.0, &[0.0])
        .unwrap();
    assert!(shape.stroke().unwrap().dash.is_empty());
}

#[test]
fn unpainted_shape_draws_nothing() {
    let shape = Shape::circle(3.0, Point::ZERO).unwrap();
    let mut surface = RecordingSurface::new();
    shape.render(&mut surface).unwrap();
    assert!(surface.commands().is_empty());
}
