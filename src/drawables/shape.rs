//! Vector shapes: the stock drawables for paths, polygons, stars, rectangles, circles, ellipses.
//!
//! Every constructor produces a [`Shape`] holding a single [`BezPath`] in local coordinates.
//! Fill and stroke are optional; a shape with neither draws nothing but still has bounds.

use kurbo::Shape as _;

use crate::{
    foundation::core::{
        BezPath, Point, Rect, Rgba8, Vec2, ensure_finite, ensure_non_negative, ensure_range,
    },
    foundation::error::{TableauError, TableauResult},
    render::surface::{Renderable, StrokeStyle, Surface},
};

const CURVE_TOLERANCE: f64 = 0.1;

/// Filled and/or stroked vector path.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    path: BezPath,
    fill: Option<Rgba8>,
    stroke: Option<StrokeStyle>,
}

impl Shape {
    /// Wrap an existing path.
    pub fn from_path(path: BezPath) -> Self {
        Self {
            path,
            fill: None,
            stroke: None,
        }
    }

    /// Parse SVG path data (`"M20 20 l 200 0 l 0 100 Z"`).
    pub fn from_svg(data: &str) -> TableauResult<Self> {
        let path = BezPath::from_svg(data)
            .map_err(|e| TableauError::invalid_parameter(format!("svg path data: {e}")))?;
        Ok(Self::from_path(path))
    }

    /// Regular polygon with `sides` vertices on a circle of `radius` around `center`.
    ///
    /// The first vertex sits at angle 0 (to the right of the center).
    pub fn polygon(sides: u32, radius: f64, center: Point) -> TableauResult<Self> {
        if sides < 3 {
            return Err(TableauError::invalid_parameter(format!(
                "polygon needs at least 3 sides, got {sides}"
            )));
        }
        let radius = ensure_non_negative("polygon radius", radius)?;
        ensure_point(center)?;
        let vertices = (0..sides).map(|i| {
            let angle = std::f64::consts::TAU * f64::from(i) / f64::from(sides);
            center + Vec2::from_angle(angle) * radius
        });
        Ok(Self::from_path(closed_polyline(vertices)))
    }

    /// Star with `points` tips.
    ///
    /// `aperture` in `[0, 1]` sets the inner radius to `radius * (1 - aperture)`: 0 gives a
    /// polygon-like bold star, 1 collapses the inner vertices onto the center.
    pub fn star(points: u32, radius: f64, aperture: f64, center: Point) -> TableauResult<Self> {
        if points < 2 {
            return Err(TableauError::invalid_parameter(format!(
                "star needs at least 2 points, got {points}"
            )));
        }
        let radius = ensure_non_negative("star radius", radius)?;
        let aperture = ensure_range("star aperture", aperture, 0.0, 1.0)?;
        ensure_point(center)?;
        let inner = radius * (1.0 - aperture);
        let vertices = (0..points * 2).map(|i| {
            let angle = std::f64::consts::PI * f64::from(i) / f64::from(points);
            let r = if i % 2 == 0 { radius } else { inner };
            center + Vec2::from_angle(angle) * r
        });
        Ok(Self::from_path(closed_polyline(vertices)))
    }

    /// Axis-aligned rectangle with its top-left corner at `origin`.
    pub fn rectangle(width: f64, height: f64, origin: Point) -> TableauResult<Self> {
        let width = ensure_non_negative("rectangle width", width)?;
        let height = ensure_non_negative("rectangle height", height)?;
        ensure_point(origin)?;
        let rect = Rect::from_origin_size(origin, (width, height));
        Ok(Self::from_path(rect.to_path(CURVE_TOLERANCE)))
    }

    /// Circle of `radius` around `center`.
    pub fn circle(radius: f64, center: Point) -> TableauResult<Self> {
        let radius = ensure_non_negative("circle radius", radius)?;
        ensure_point(center)?;
        Ok(Self::from_path(
            kurbo::Circle::new(center, radius).to_path(CURVE_TOLERANCE),
        ))
    }

    /// Axis-aligned ellipse of `width` x `height` around `center`.
    pub fn ellipse(width: f64, height: f64, center: Point) -> TableauResult<Self> {
        let width = ensure_non_negative("ellipse width", width)?;
        let height = ensure_non_negative("ellipse height", height)?;
        ensure_point(center)?;
        let radii = Vec2::new(width / 2.0, height / 2.0);
        Ok(Self::from_path(
            kurbo::Ellipse::new(center, radii, 0.0).to_path(CURVE_TOLERANCE),
        ))
    }

    /// Set the fill color.
    pub fn with_fill(mut self, color: Rgba8) -> Self {
        self.fill = Some(color);
        self
    }

    /// Set the stroke. An empty `dash` draws a solid line.
    pub fn with_stroke(mut self, color: Rgba8, width: f64, dash: &[f64]) -> TableauResult<Self> {
        let width = ensure_non_negative("stroke width", width)?;
        for &d in dash {
            ensure_non_negative("stroke dash", d)?;
        }
        // A pattern of all zeros would never advance.
        let dash = if dash.iter().all(|&d| d == 0.0) {
            Vec::new()
        } else {
            dash.to_vec()
        };
        self.stroke = Some(StrokeStyle { color, width, dash });
        Ok(self)
    }

    /// Underlying path.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Fill color, if any.
    pub fn fill(&self) -> Option<Rgba8> {
        self.fill
    }

    /// Stroke, if any.
    pub fn stroke(&self) -> Option<&StrokeStyle> {
        self.stroke.as_ref()
    }
}

impl Renderable for Shape {
    fn render(&self, surface: &mut dyn Surface) -> TableauResult<()> {
        if let Some(fill) = self.fill {
            surface.fill_path(&self.path, fill)?;
        }
        if let Some(stroke) = &self.stroke {
            surface.stroke_path(&self.path, stroke)?;
        }
        Ok(())
    }

    fn bounds(&self) -> Option<Rect> {
        if self.path.elements().is_empty() {
            return None;
        }
        Some(self.path.bounding_box())
    }
}

fn ensure_point(p: Point) -> TableauResult<()> {
    ensure_finite("x", p.x)?;
    ensure_finite("y", p.y)?;
    Ok(())
}

fn closed_polyline(vertices: impl IntoIterator<Item = Point>) -> BezPath {
    let mut path = BezPath::new();
    for (i, p) in vertices.into_iter().enumerate() {
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    path
}

#[cfg(test)]
#[path = "../../tests/unit/drawables/shape.rs"]
mod tests;
