use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{TableauError, TableauResult};

/// Decoded raster image, premultiplied RGBA8, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes of premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl ImageData {
    /// Wrap already premultiplied pixels, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> TableauResult<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if width == 0 || height == 0 || rgba8_premul.len() != expected {
            return Err(TableauError::invalid_parameter(format!(
                "image buffer of {} bytes does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }
}

/// Decode any format the `image` crate understands into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> TableauResult<ImageData> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    ImageData::from_premul(width, height, rgba8_premul)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 127) / 255) as u8;
        }
    }
}

/// Inverse of premultiplication, for encoders that expect straight alpha.
pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
