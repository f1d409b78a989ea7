use std::path::Path;

use anyhow::Context;

use crate::{
    assets::decode::{ImageData, decode_image},
    foundation::core::{Point, Rect, Vec2, ensure_finite, ensure_non_negative},
    foundation::error::TableauResult,
    render::surface::{Renderable, Surface},
};

/// Raster image drawn into a destination rectangle.
///
/// Without an explicit size the picture is drawn at the image's natural pixel size.
#[derive(Clone, Debug, PartialEq)]
pub struct Picture {
    image: ImageData,
    origin: Point,
    size: Option<Vec2>,
}

impl Picture {
    /// Picture at the origin, natural size.
    pub fn from_image(image: ImageData) -> Self {
        Self {
            image,
            origin: Point::ZERO,
            size: None,
        }
    }

    /// Decode encoded bytes (PNG, JPEG, ...) synchronously.
    pub fn decode(bytes: &[u8]) -> TableauResult<Self> {
        Ok(Self::from_image(decode_image(bytes)?))
    }

    /// Read and decode an image file.
    pub fn open(path: impl AsRef<Path>) -> TableauResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        Self::decode(&bytes)
    }

    /// Place the top-left corner at (`x`, `y`).
    pub fn at(mut self, x: f64, y: f64) -> TableauResult<Self> {
        self.origin = Point::new(ensure_finite("picture x", x)?, ensure_finite("picture y", y)?);
        Ok(self)
    }

    /// Stretch the picture to `width` x `height`.
    pub fn sized(mut self, width: f64, height: f64) -> TableauResult<Self> {
        self.size = Some(Vec2::new(
            ensure_non_negative("picture width", width)?,
            ensure_non_negative("picture height", height)?,
        ));
        Ok(self)
    }

    /// Swap the displayed image, keeping position and any explicit size.
    pub fn replace(&mut self, image: ImageData) -> ImageData {
        std::mem::replace(&mut self.image, image)
    }

    /// Decode `bytes` and swap them in. On failure the current image stays.
    pub fn replace_with_bytes(&mut self, bytes: &[u8]) -> TableauResult<()> {
        let image = decode_image(bytes)?;
        self.replace(image);
        Ok(())
    }

    /// Current image.
    pub fn image(&self) -> &ImageData {
        &self.image
    }

    /// Destination rectangle in local coordinates.
    pub fn dest(&self) -> Rect {
        let size = self.size.unwrap_or_else(|| {
            Vec2::new(f64::from(self.image.width), f64::from(self.image.height))
        });
        Rect::from_origin_size(self.origin, size.to_size())
    }
}

impl Renderable for Picture {
    fn render(&self, surface: &mut dyn Surface) -> TableauResult<()> {
        surface.draw_image(&self.image, self.dest())
    }

    fn bounds(&self) -> Option<Rect> {
        Some(self.dest())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/drawables/picture.rs"]
mod tests;
