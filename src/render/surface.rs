//! Drawing-surface contract.
//!
//! The surface's transform/style state is the one shared mutable resource every object touches
//! during a frame. Scene traversal brackets each node with [`Surface::save`] /
//! [`Surface::restore`], so a sibling never inherits a preceding sibling's transform.

use crate::{
    assets::decode::ImageData,
    assets::text::Font,
    foundation::core::{Affine, BezPath, Rect, Rgba8},
    foundation::error::{TableauError, TableauResult},
    transform::state::{BlendMode, ColorAdjust, Filter},
};

/// Stroke parameters for [`Surface::stroke_path`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StrokeStyle {
    /// Stroke color.
    pub color: Rgba8,
    /// Line width in local units.
    pub width: f64,
    /// Dash pattern (alternating on/off lengths); empty means solid.
    pub dash: Vec<f64>,
}

/// One positioned glyph of a [`GlyphRun`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    /// Glyph index inside the font face.
    pub id: u32,
    /// Baseline x in local coordinates.
    pub x: f32,
    /// Baseline y in local coordinates.
    pub y: f32,
}

/// Shaped glyphs sharing one font and size.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphRun {
    /// Font the glyph ids index into.
    pub font: Font,
    /// Font size in pixels.
    pub font_size: f32,
    /// Fill color before color adjustment.
    pub color: Rgba8,
    /// Glyphs in visual order.
    pub glyphs: Vec<Glyph>,
}

/// Resolved drawing state at the moment of a draw call.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceState {
    /// Current transform (ancestors composed with the object's own).
    pub transform: Affine,
    /// Accumulated alpha in `[0, 1]`.
    pub alpha: f64,
    /// Compositing mode.
    pub blend: BlendMode,
    /// Accumulated color adjustment.
    pub color: ColorAdjust,
    /// Filters pushed by the current object and its ancestors.
    pub filters: Vec<Filter>,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            alpha: 1.0,
            blend: BlendMode::Normal,
            color: ColorAdjust::IDENTITY,
            filters: Vec::new(),
        }
    }
}

/// Save/restore stack of [`SurfaceState`], shared by the stock surfaces.
#[derive(Clone, Debug, Default)]
pub struct StateStack {
    current: SurfaceState,
    saved: Vec<SurfaceState>,
}

impl StateStack {
    /// Fresh stack with the default state.
    pub fn new() -> Self {
        Self::default()
    }

    /// State applied to the next draw call.
    pub fn current(&self) -> &SurfaceState {
        &self.current
    }

    /// Number of outstanding saves.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Push a copy of the current state.
    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Pop the last saved state; unbalanced restores are a surface failure.
    pub fn restore(&mut self) -> TableauResult<()> {
        self.current = self
            .saved
            .pop()
            .ok_or_else(|| TableauError::surface("restore without matching save"))?;
        Ok(())
    }

    /// Drop every saved state and return to the default state.
    pub fn reset(&mut self) {
        self.current = SurfaceState::default();
        self.saved.clear();
    }

    /// Post-multiply the current transform.
    pub fn concat_transform(&mut self, affine: Affine) {
        self.current.transform = self.current.transform * affine;
    }

    /// Multiply the current alpha.
    pub fn multiply_alpha(&mut self, alpha: f64) {
        self.current.alpha = (self.current.alpha * alpha).clamp(0.0, 1.0);
    }

    /// Replace the compositing mode.
    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.current.blend = mode;
    }

    /// Compose a color adjustment on top of the current one.
    pub fn compose_color_adjust(&mut self, adjust: ColorAdjust) {
        self.current.color = self.current.color.then(adjust);
    }

    /// Add a filter for the rest of the current scope.
    pub fn push_filter(&mut self, filter: Filter) {
        self.current.filters.push(filter);
    }
}

/// Drawing target consumed by scene traversal and by leaf drawables.
///
/// Transform and style calls change the current state until the matching [`Surface::restore`].
/// Draw calls use the current state.
pub trait Surface {
    /// Clear the whole surface and reset its state stack. Called once per frame.
    fn clear(&mut self) -> TableauResult<()>;

    /// Color used by later [`Surface::clear`] calls. Surfaces without a backdrop ignore it.
    fn set_clear_color(&mut self, _color: Rgba8) {}

    /// Push a copy of the current state.
    fn save(&mut self);

    /// Pop the last saved state.
    fn restore(&mut self) -> TableauResult<()>;

    /// Post-multiply the current transform.
    fn concat_transform(&mut self, affine: Affine);

    /// Multiply the current alpha.
    fn multiply_alpha(&mut self, alpha: f64);

    /// Replace the compositing mode.
    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Compose a color adjustment on top of the current one.
    fn compose_color_adjust(&mut self, adjust: ColorAdjust);

    /// Apply a named filter for the rest of the current scope.
    fn push_filter(&mut self, filter: Filter);

    /// Fill a path with a solid color.
    fn fill_path(&mut self, path: &BezPath, color: Rgba8) -> TableauResult<()>;

    /// Stroke a path.
    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeStyle) -> TableauResult<()>;

    /// Draw an image stretched into `dest` (local coordinates).
    fn draw_image(&mut self, image: &ImageData, dest: Rect) -> TableauResult<()>;

    /// Fill a run of shaped glyphs.
    fn draw_glyphs(&mut self, run: &GlyphRun) -> TableauResult<()>;

    /// Finish the frame. Surfaces that buffer draw calls flush here.
    fn present(&mut self) -> TableauResult<()> {
        Ok(())
    }
}

/// Leaf drawable attached to a game object.
///
/// Implementations draw in local coordinates: the scene has already applied the ancestor
/// chain and the object's own transform state. Anything an implementation changes on the
/// surface beyond that must be saved and restored by the implementation itself.
pub trait Renderable: std::any::Any {
    /// Draw onto `surface`.
    fn render(&self, surface: &mut dyn Surface) -> TableauResult<()>;

    /// Local-space bounds, used as the pivot for rotation, scale, skew and inflate.
    fn bounds(&self) -> Option<Rect> {
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
