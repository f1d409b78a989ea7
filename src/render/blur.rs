//! Separable gaussian blur over premultiplied RGBA8 buffers.

use crate::foundation::error::{TableauError, TableauResult};

/// Largest blur radius, in pixels, reached at filter intensity 1.
pub const MAX_BLUR_RADIUS: u32 = 16;

/// Radius for a `"blur"` filter intensity in `[0, 1]`.
pub fn blur_radius(intensity: f64) -> u32 {
    if !intensity.is_finite() || intensity <= 0.0 {
        return 0;
    }
    (intensity.min(1.0) * f64::from(MAX_BLUR_RADIUS)).round() as u32
}

/// Blur `src` (`width * height` premultiplied RGBA8 pixels) with a gaussian of `radius` pixels.
///
/// Sigma is half the radius. Edges clamp, so a flat image stays flat.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
) -> TableauResult<Vec<u8>> {
    let (w, h) = (width as usize, height as usize);
    let expected = w
        .checked_mul(h)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| TableauError::invalid_parameter("blur buffer size overflows"))?;
    if src.len() != expected {
        return Err(TableauError::invalid_parameter(format!(
            "blur buffer of {} bytes does not match {width}x{height}",
            src.len()
        )));
    }
    if radius == 0 || expected == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel(radius);
    let mut rows = vec![0u8; expected];
    let mut out = vec![0u8; expected];
    // Horizontal pass: neighbours are 1 pixel apart inside each row.
    for y in 0..h {
        let line = y * w;
        convolve(src, &mut rows, &kernel, w, |i| (line + i) * 4);
    }
    // Vertical pass: neighbours are one row apart inside each column.
    for x in 0..w {
        convolve(&rows, &mut out, &kernel, h, |i| (i * w + x) * 4);
    }
    Ok(out)
}

fn gaussian_kernel(radius: u32) -> Vec<f32> {
    let sigma = (radius as f32 / 2.0).max(0.5);
    let r = radius as i32;
    let mut weights: Vec<f32> = (-r..=r)
        .map(|i| {
            let x = i as f32;
            (-(x * x) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Convolve one line of `len` pixels; `offset(i)` is the byte offset of pixel `i`.
fn convolve(
    src: &[u8],
    dst: &mut [u8],
    kernel: &[f32],
    len: usize,
    offset: impl Fn(usize) -> usize,
) {
    let radius = (kernel.len() / 2) as isize;
    let last = len as isize - 1;
    for i in 0..len {
        let mut acc = [0f32; 4];
        for (k, &weight) in kernel.iter().enumerate() {
            let j = (i as isize + k as isize - radius).clamp(0, last) as usize;
            let at = offset(j);
            for (c, sum) in acc.iter_mut().enumerate() {
                *sum += weight * f32::from(src[at + c]);
            }
        }
        let at = offset(i);
        for (c, sum) in acc.iter().enumerate() {
            dst[at + c] = sum.round().clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
