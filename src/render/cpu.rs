use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::decode::ImageData,
    assets::text::Font,
    foundation::core::{Affine, BezPath, Point, Rect, Rgba8},
    foundation::error::{TableauError, TableauResult},
    render::blur::{blur_radius, blur_rgba8_premul},
    render::surface::{GlyphRun, StateStack, StrokeStyle, Surface, SurfaceState},
    transform::state::{BlendMode, ColorAdjust, Filter},
};

/// Filter name the CPU surface applies; other filters are recorded but not drawn.
pub const BLUR_FILTER: &str = "blur";

/// One rendered frame, row-major RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
    /// Whether color channels are premultiplied by alpha.
    pub premultiplied: bool,
}

/// Software surface backed by `vello_cpu`.
///
/// Draw calls are encoded into a render context and rasterized on [`Surface::present`];
/// [`CpuSurface::frame_rgba`] reads back the last presented frame. Draws under a `"blur"`
/// filter are rasterized offscreen, blurred, and composited as an image.
pub struct CpuSurface {
    width: u16,
    height: u16,
    clear: Rgba8,
    ctx: vello_cpu::RenderContext,
    scratch: Option<vello_cpu::RenderContext>,
    pixmap: vello_cpu::Pixmap,
    states: StateStack,
    fonts: HashMap<usize, (Font, vello_cpu::peniko::FontData)>,
}

impl CpuSurface {
    /// Surface of `width` x `height` pixels, cleared to transparent.
    pub fn new(width: u32, height: u32) -> TableauResult<Self> {
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| TableauError::invalid_parameter("surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| TableauError::invalid_parameter("surface height exceeds u16"))?;
        if width_u16 == 0 || height_u16 == 0 {
            return Err(TableauError::invalid_parameter(
                "surface dimensions must be non-zero",
            ));
        }
        Ok(Self {
            width: width_u16,
            height: height_u16,
            clear: Rgba8::TRANSPARENT,
            ctx: vello_cpu::RenderContext::new(width_u16, height_u16),
            scratch: None,
            pixmap: vello_cpu::Pixmap::new(width_u16, height_u16),
            states: StateStack::new(),
            fonts: HashMap::new(),
        })
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Copy of the last presented frame (premultiplied).
    pub fn frame_rgba(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.width(),
            height: self.height(),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    /// Run `draw` with the current transform and compositing layers applied.
    fn with_state(
        &mut self,
        draw: impl FnOnce(&mut vello_cpu::RenderContext, &SurfaceState),
    ) -> TableauResult<()> {
        let state = self.states.current().clone();
        if state.alpha <= 0.0 {
            return Ok(());
        }
        let radius = state
            .filters
            .iter()
            .filter(|f| f.name == BLUR_FILTER)
            .map(|f| blur_radius(f.intensity))
            .max()
            .unwrap_or(0);
        let ignored = state.filters.iter().filter(|f| f.name != BLUR_FILTER).count();
        if ignored > 0 {
            tracing::trace!(count = ignored, "cpu surface ignores non-blur filters");
        }

        if radius == 0 {
            let ctx = &mut self.ctx;
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(affine_to_cpu(state.transform));
            push_layers(ctx, &state);
            draw(ctx, &state);
            pop_layers(ctx, &state);
            return Ok(());
        }

        let layer = self.render_offscreen(&state, draw);
        let blurred = blur_rgba8_premul(
            layer.data_as_u8_slice(),
            self.width(),
            self.height(),
            radius,
        )?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(premul_to_pixmap(
                &blurred,
                self.width,
                self.height,
            ))),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        let ctx = &mut self.ctx;
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        push_layers(ctx, &state);
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
        pop_layers(ctx, &state);
        Ok(())
    }

    /// Rasterize `draw` alone into a transparent frame-sized pixmap.
    fn render_offscreen(
        &mut self,
        state: &SurfaceState,
        draw: impl FnOnce(&mut vello_cpu::RenderContext, &SurfaceState),
    ) -> vello_cpu::Pixmap {
        let mut scratch = self
            .scratch
            .take()
            .unwrap_or_else(|| vello_cpu::RenderContext::new(self.width, self.height));
        scratch.reset();
        scratch.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        scratch.set_transform(affine_to_cpu(state.transform));
        draw(&mut scratch, state);
        scratch.flush();

        let mut layer = vello_cpu::Pixmap::new(self.width, self.height);
        scratch.render_to_pixmap(&mut layer);
        self.scratch = Some(scratch);
        layer
    }

    /// `vello_cpu` font for `font`, parsed once per shared buffer.
    fn font_data(&mut self, font: &Font) -> vello_cpu::peniko::FontData {
        self.fonts
            .entry(font.key())
            .or_insert_with(|| {
                let blob = vello_cpu::peniko::Blob::from(font.bytes().to_vec());
                (font.clone(), vello_cpu::peniko::FontData::new(blob, 0))
            })
            .1
            .clone()
    }
}

impl Surface for CpuSurface {
    fn clear(&mut self) -> TableauResult<()> {
        self.states.reset();
        self.ctx.reset();
        if self.clear.a > 0 {
            self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            self.ctx.set_paint(paint_color(self.clear));
            self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(self.width),
                f64::from(self.height),
            ));
        }
        Ok(())
    }

    fn set_clear_color(&mut self, color: Rgba8) {
        self.clear = color;
    }

    fn save(&mut self) {
        self.states.save();
    }

    fn restore(&mut self) -> TableauResult<()> {
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
        let cpu_path = bezpath_to_cpu(path);
        self.with_state(|ctx, state| {
            ctx.set_paint(paint_color(state.color.apply(color)));
            ctx.fill_path(&cpu_path);
        })
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeStyle) -> TableauResult<()> {
        if stroke.width <= 0.0 {
            return Ok(());
        }
        let cpu_path = bezpath_to_cpu(path);
        let mut cpu_stroke = vello_cpu::kurbo::Stroke::new(stroke.width);
        if !stroke.dash.is_empty() {
            cpu_stroke = cpu_stroke.with_dashes(0.0, stroke.dash.iter().copied());
        }
        self.with_state(|ctx, state| {
            ctx.set_paint(paint_color(state.color.apply(stroke.color)));
            ctx.set_stroke(cpu_stroke);
            ctx.stroke_path(&cpu_path);
        })
    }

    fn draw_image(&mut self, image: &ImageData, dest: Rect) -> TableauResult<()> {
        if dest.width() <= 0.0 || dest.height() <= 0.0 {
            return Ok(());
        }
        let adjust = self.states.current().color;
        let pixmap = image_to_pixmap(image, adjust)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        let (w, h) = (f64::from(image.width), f64::from(image.height));

        // Stretch the image's pixel grid onto `dest`.
        let fit = Affine::translate(dest.origin().to_vec2())
            * Affine::scale_non_uniform(dest.width() / w, dest.height() / h);
        self.states.save();
        self.states.concat_transform(fit);
        let drawn = self.with_state(|ctx, _| {
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        });
        self.states.restore()?;
        drawn
    }

    fn draw_glyphs(&mut self, run: &GlyphRun) -> TableauResult<()> {
        if run.glyphs.is_empty() {
            return Ok(());
        }
        let font = self.font_data(&run.font);
        let glyphs = run.glyphs.iter().map(|g| vello_cpu::Glyph {
            id: g.id,
            x: g.x,
            y: g.y,
        });
        self.with_state(|ctx, state| {
            ctx.set_paint(paint_color(state.color.apply(run.color)));
            ctx.glyph_run(&font)
                .font_size(run.font_size)
                .fill_glyphs(glyphs);
        })
    }

    fn present(&mut self) -> TableauResult<()> {
        clear_pixmap(&mut self.pixmap, [0, 0, 0, 0]);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        Ok(())
    }
}

fn paint_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn push_layers(ctx: &mut vello_cpu::RenderContext, state: &SurfaceState) {
    if state.blend != BlendMode::Normal {
        ctx.push_blend_layer(blend_to_cpu(state.blend));
    }
    if state.alpha < 1.0 {
        ctx.push_opacity_layer(state.alpha as f32);
    }
}

fn pop_layers(ctx: &mut vello_cpu::RenderContext, state: &SurfaceState) {
    if state.alpha < 1.0 {
        ctx.pop_layer();
    }
    if state.blend != BlendMode::Normal {
        ctx.pop_layer();
    }
}

fn blend_to_cpu(mode: BlendMode) -> vello_cpu::peniko::BlendMode {
    use vello_cpu::peniko::{Compose, Mix};

    let mix = match mode {
        BlendMode::Normal => Mix::Normal,
        BlendMode::Multiply => Mix::Multiply,
        BlendMode::Screen => Mix::Screen,
        BlendMode::Overlay => Mix::Overlay,
        BlendMode::Darken => Mix::Darken,
        BlendMode::Lighten => Mix::Lighten,
        BlendMode::ColorDodge => Mix::ColorDodge,
        BlendMode::ColorBurn => Mix::ColorBurn,
        BlendMode::HardLight => Mix::HardLight,
        BlendMode::SoftLight => Mix::SoftLight,
        BlendMode::Difference => Mix::Difference,
        BlendMode::Exclusion => Mix::Exclusion,
        BlendMode::Hue => Mix::Hue,
        BlendMode::Saturation => Mix::Saturation,
        BlendMode::Color => Mix::Color,
        BlendMode::Luminosity => Mix::Luminosity,
    };
    vello_cpu::peniko::BlendMode::new(mix, Compose::SrcOver)
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Convert premultiplied bytes to a pixmap, applying `adjust` on the way.
fn image_to_pixmap(image: &ImageData, adjust: ColorAdjust) -> TableauResult<vello_cpu::Pixmap> {
    let w: u16 = image
        .width
        .try_into()
        .map_err(|_| TableauError::invalid_parameter("image width exceeds u16"))?;
    let h: u16 = image
        .height
        .try_into()
        .map_err(|_| TableauError::invalid_parameter("image height exceeds u16"))?;
    let bytes = image.rgba8_premul.as_slice();
    if bytes.len() != image.width as usize * image.height as usize * 4 {
        return Err(TableauError::invalid_parameter("image byte length mismatch"));
    }

    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            let [r, g, b, a] = if adjust.is_identity() || px[3] == 0 {
                [px[0], px[1], px[2], px[3]]
            } else {
                adjust.apply(unpremul(px)).premultiplied()
            };
            vello_cpu::peniko::color::PremulRgba8 { r, g, b, a }
        })
        .collect();
    Ok(pixels_to_pixmap(pixels, w, h))
}

/// Premultiplied RGBA8 bytes of a `width` x `height` frame as a pixmap.
fn premul_to_pixmap(bytes: &[u8], width: u16, height: u16) -> vello_cpu::Pixmap {
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
        .collect();
    pixels_to_pixmap(pixels, width, height)
}

fn pixels_to_pixmap(
    pixels: Vec<vello_cpu::peniko::color::PremulRgba8>,
    width: u16,
    height: u16,
) -> vello_cpu::Pixmap {
    let may_have_opacities = pixels.iter().any(|px| px.a != 255);
    vello_cpu::Pixmap::from_parts_with_opacity(pixels, width, height, may_have_opacities)
}

fn unpremul(px: &[u8]) -> Rgba8 {
    let a = u16::from(px[3]);
    let c = |v: u8| ((u16::from(v) * 255 + a / 2) / a).min(255) as u8;
    Rgba8::new(c(px[0]), c(px[1]), c(px[2]), px[3])
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
