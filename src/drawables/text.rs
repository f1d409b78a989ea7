//! Single-paragraph text, shaped with `parley` and drawn as glyph runs.

use crate::{
    assets::text::{Font, TextLayoutEngine, TextStyle},
    foundation::core::{Point, Rect, Rgba8, Vec2, ensure_finite},
    foundation::error::{TableauError, TableauResult},
    render::surface::{Glyph, GlyphRun, Renderable, Surface},
};

/// Text centered on a position.
///
/// The layout is shaped eagerly; changing the text, style, size or font reshapes it.
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    text: String,
    font: Font,
    size_px: f32,
    style: TextStyle,
    color: Rgba8,
    position: Point,
    size: Vec2,
    runs: Vec<GlyphRun>,
}

impl Text {
    /// Shape `text` in `font` at `size_px`, centered on `position`.
    pub fn new(
        text: impl Into<String>,
        font: Font,
        size_px: f32,
        color: Rgba8,
        position: Point,
    ) -> TableauResult<Self> {
        let position = Point::new(
            ensure_finite("text x", position.x)?,
            ensure_finite("text y", position.y)?,
        );
        let mut out = Self {
            text: text.into(),
            font,
            size_px,
            style: TextStyle::Normal,
            color,
            position,
            size: Vec2::ZERO,
            runs: Vec::new(),
        };
        out.reshape()?;
        Ok(out)
    }

    /// Set the weight/slant.
    pub fn with_style(mut self, style: TextStyle) -> TableauResult<Self> {
        self.set_style(style)?;
        Ok(self)
    }

    /// Change the weight/slant. On failure the previous layout stays.
    pub fn set_style(&mut self, style: TextStyle) -> TableauResult<()> {
        let previous = std::mem::replace(&mut self.style, style);
        self.reshape().inspect_err(|_| self.style = previous)
    }

    /// Replace the displayed string.
    pub fn set_text(&mut self, text: impl Into<String>) -> TableauResult<()> {
        let previous = std::mem::replace(&mut self.text, text.into());
        self.reshape().inspect_err(|_| self.text = previous)
    }

    /// Change the font size in pixels.
    pub fn set_size(&mut self, size_px: f32) -> TableauResult<()> {
        let previous = std::mem::replace(&mut self.size_px, size_px);
        self.reshape().inspect_err(|_| self.size_px = previous)
    }

    /// Change the fill color.
    pub fn set_color(&mut self, color: Rgba8) {
        self.color = color;
        for run in &mut self.runs {
            run.color = color;
        }
    }

    /// Displayed string.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Font the text is shaped with.
    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Font size in pixels.
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Weight/slant.
    pub fn style(&self) -> TextStyle {
        self.style
    }

    /// Fill color.
    pub fn color(&self) -> Rgba8 {
        self.color
    }

    /// Center of the text block.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Shaped glyph runs in local coordinates.
    pub fn runs(&self) -> &[GlyphRun] {
        &self.runs
    }

    fn top_left(&self) -> Point {
        self.position - self.size / 2.0
    }

    fn reshape(&mut self) -> TableauResult<()> {
        let mut engine = TextLayoutEngine::new();
        let layout = engine.layout(&self.text, &self.font, self.size_px, self.style)?;
        let size = Vec2::new(f64::from(layout.width()), f64::from(layout.height()));
        if !size.x.is_finite() || !size.y.is_finite() {
            return Err(TableauError::invalid_parameter("text layout has no finite size"));
        }

        let origin = self.position - size / 2.0;
        let (dx, dy) = (origin.x as f32, origin.y as f32);
        let mut runs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let glyphs: Vec<Glyph> = glyph_run
                    .glyphs()
                    .map(|g| Glyph {
                        id: g.id,
                        x: g.x + dx,
                        y: g.y + dy,
                    })
                    .collect();
                if glyphs.is_empty() {
                    continue;
                }
                runs.push(GlyphRun {
                    font: self.font.clone(),
                    font_size: glyph_run.run().font_size(),
                    color: self.color,
                    glyphs,
                });
            }
        }

        tracing::debug!(
            text_len = self.text.len(),
            runs = runs.len(),
            width = size.x,
            height = size.y,
            "text shaped"
        );
        self.size = size;
        self.runs = runs;
        Ok(())
    }
}

impl Renderable for Text {
    fn render(&self, surface: &mut dyn Surface) -> TableauResult<()> {
        for run in &self.runs {
            surface.draw_glyphs(run)?;
        }
        Ok(())
    }

    fn bounds(&self) -> Option<Rect> {
        Some(Rect::from_origin_size(self.top_left(), self.size.to_size()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/drawables/text.rs"]
mod tests;
