use crate::{
    assets::decode::ImageData,
    foundation::core::{Affine, BezPath, Rect, Rgba8},
    foundation::error::{TableauError, TableauResult},
    render::surface::{GlyphRun, StateStack, StrokeStyle, Surface, SurfaceState},
    transform::state::{BlendMode, ColorAdjust, Filter},
};

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Solid path fill.
    FillPath {
        /// Path in local coordinates.
        path: BezPath,
        /// Fill color before color adjustment.
        color: Rgba8,
    },
    /// Path stroke.
    StrokePath {
        /// Path in local coordinates.
        path: BezPath,
        /// Stroke parameters.
        stroke: StrokeStyle,
    },
    /// Image blit.
    Image {
        /// Source width in pixels.
        width: u32,
        /// Source height in pixels.
        height: u32,
        /// Destination rectangle in local coordinates.
        dest: Rect,
    },
    /// Glyph run fill.
    Glyphs {
        /// The run as issued.
        run: GlyphRun,
    },
}

/// A draw call together with the surface state it was issued under.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    /// What was drawn.
    pub op: DrawOp,
    /// Fully resolved surface state at the time of the call.
    pub state: SurfaceState,
}

/// Display-list surface: records every draw call with its resolved state.
///
/// Useful for headless hosts and for checking render order and state isolation.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    states: StateStack,
    commands: Vec<DrawCommand>,
    clears: u64,
    presents: u64,
    clear_color: Rgba8,
    invalid: bool,
}

impl RecordingSurface {
    /// Empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls since the last clear.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of clears so far.
    pub fn clears(&self) -> u64 {
        self.clears
    }

    /// Number of presented frames so far.
    pub fn presents(&self) -> u64 {
        self.presents
    }

    /// Color the surface was last asked to clear to.
    pub fn clear_color(&self) -> Rgba8 {
        self.clear_color
    }

    /// Outstanding saves.
    pub fn save_depth(&self) -> usize {
        self.states.depth()
    }

    /// Mark the surface handle as lost; every later fallible call fails.
    pub fn invalidate(&mut self) {
        self.invalid = true;
    }

    fn ensure_valid(&self) -> TableauResult<()> {
        if self.invalid {
            return Err(TableauError::surface("recording surface handle is no longer valid"));
        }
        Ok(())
    }

    fn record(&mut self, op: DrawOp) -> TableauResult<()> {
        self.ensure_valid()?;
        self.commands.push(DrawCommand {
            op,
            state: self.states.current().clone(),
        });
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) -> TableauResult<()> {
        self.ensure_valid()?;
        self.commands.clear();
        self.states.reset();
        self.clears += 1;
        Ok(())
    }

    fn set_clear_color(&mut self, color: Rgba8) {
        self.clear_color = color;
    }

    fn save(&mut self) {
        self.states.save();
    }

    fn restore(&mut self) -> TableauResult<()> {
        self.ensure_valid()?;
        self.states.restore()
    }

    fn concat_transform(&mut self, affine: Affine) {
        self.states.concat_transform(affine);
    }

    fn multiply_alpha(&mut self, alpha: f64) {
        self.states.multiply_alpha(alpha);
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.states.set_blend_mode(mode);
    }

    fn compose_color_adjust(&mut self, adjust: ColorAdjust) {
        self.states.compose_color_adjust(adjust);
    }

    fn push_filter(&mut self, filter: Filter) {
        self.states.push_filter(filter);
    }

    fn fill_path(&mut self, path: &BezPath, color: Rgba8) -> TableauResult<()> {
        self.record(DrawOp::FillPath {
            path: path.clone(),
            color,
        })
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeStyle) -> TableauResult<()> {
        self.record(DrawOp::StrokePath {
            path: path.clone(),
            stroke: stroke.clone(),
        })
    }

    fn draw_image(&mut self, image: &ImageData, dest: Rect) -> TableauResult<()> {
        self.record(DrawOp::Image {
            width: image.width,
            height: image.height,
            dest,
        })
    }

    fn draw_glyphs(&mut self, run: &GlyphRun) -> TableauResult<()> {
        self.record(DrawOp::Glyphs { run: run.clone() })
    }

    fn present(&mut self) -> TableauResult<()> {
        self.ensure_valid()?;
        self.presents += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/recording.rs"]
mod tests;
