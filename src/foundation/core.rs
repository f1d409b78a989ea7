use crate::foundation::error::{TableauError, TableauResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Straight (non-premultiplied) RGBA8 color.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Build a color from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> TableauResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| TableauError::invalid_parameter(format!("color '{s}' must start with '#'")))?;
        let digit = |c: char| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| TableauError::invalid_parameter(format!("invalid hex color '{s}'")))
        };
        let chars: Vec<char> = hex.chars().collect();
        match chars.len() {
            3 => {
                let r = digit(chars[0])?;
                let g = digit(chars[1])?;
                let b = digit(chars[2])?;
                Ok(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 | 8 => {
                let mut bytes = [255u8; 4];
                for (i, pair) in chars.chunks(2).enumerate() {
                    bytes[i] = (digit(pair[0])? << 4) | digit(pair[1])?;
                }
                Ok(Self::new(bytes[0], bytes[1], bytes[2], bytes[3]))
            }
            _ => Err(TableauError::invalid_parameter(format!(
                "invalid hex color '{s}'"
            ))),
        }
    }

    /// Premultiply the color channels by alpha.
    pub fn premultiplied(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

/// Reject NaN and infinities with a parameter error naming `what`.
pub(crate) fn ensure_finite(what: &str, v: f64) -> TableauResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TableauError::invalid_parameter(format!(
            "{what} must be finite, got {v}"
        )))
    }
}

/// Reject values outside `[lo, hi]` (and non-finite values).
pub(crate) fn ensure_range(what: &str, v: f64, lo: f64, hi: f64) -> TableauResult<f64> {
    let v = ensure_finite(what, v)?;
    if v < lo || v > hi {
        return Err(TableauError::invalid_parameter(format!(
            "{what} must be in [{lo}, {hi}], got {v}"
        )));
    }
    Ok(v)
}

/// Reject negative (and non-finite) values.
pub(crate) fn ensure_non_negative(what: &str, v: f64) -> TableauResult<f64> {
    let v = ensure_finite(what, v)?;
    if v < 0.0 {
        return Err(TableauError::invalid_parameter(format!(
            "{what} must be >= 0, got {v}"
        )));
    }
    Ok(v)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
