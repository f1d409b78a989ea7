//! Per-object transform state.
//!
//! A [`TransformState`] is a plain value record: one field per transform kind, holding the
//! *current, settled* configuration. Mutators overwrite fields (absolute semantics); nothing is
//! replayed per frame. Rendering turns the record into a local matrix plus surface style.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::foundation::core::{
    Affine, Rect, Vec2, ensure_finite, ensure_non_negative, ensure_range,
};
use crate::foundation::error::{TableauError, TableauResult};

/// Compositing mode used when an object is drawn over what is already on the surface.
///
/// Names follow the CSS `mix-blend-mode` vocabulary (`"color-dodge"`, `"soft-light"`, ...).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    /// Source over destination.
    #[default]
    Normal,
    /// Multiply.
    Multiply,
    /// Screen.
    Screen,
    /// Overlay.
    Overlay,
    /// Darken.
    Darken,
    /// Lighten.
    Lighten,
    /// Color dodge.
    ColorDodge,
    /// Color burn.
    ColorBurn,
    /// Hard light.
    HardLight,
    /// Soft light.
    SoftLight,
    /// Difference.
    Difference,
    /// Exclusion.
    Exclusion,
    /// Hue.
    Hue,
    /// Saturation.
    Saturation,
    /// Color.
    Color,
    /// Luminosity.
    Luminosity,
}

impl BlendMode {
    /// Every supported mode, in declaration order.
    pub const ALL: [BlendMode; 16] = [
        Self::Normal,
        Self::Multiply,
        Self::Screen,
        Self::Overlay,
        Self::Darken,
        Self::Lighten,
        Self::ColorDodge,
        Self::ColorBurn,
        Self::HardLight,
        Self::SoftLight,
        Self::Difference,
        Self::Exclusion,
        Self::Hue,
        Self::Saturation,
        Self::Color,
        Self::Luminosity,
    ];

    /// CSS name of the mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color-dodge",
            Self::ColorBurn => "color-burn",
            Self::HardLight => "hard-light",
            Self::SoftLight => "soft-light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Color => "color",
            Self::Luminosity => "luminosity",
        }
    }
}

impl FromStr for BlendMode {
    type Err = TableauError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| TableauError::invalid_parameter(format!("unknown blend mode '{s}'")))
    }
}

impl std::fmt::Display for BlendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color-space adjustment carried by the drawing surface.
///
/// `saturation` and `brightness` are multiplicative factors (1 = unchanged); `invert` blends
/// toward the inverted color (0 = unchanged, 1 = fully inverted).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorAdjust {
    /// Saturation factor, `>= 0`.
    pub saturation: f64,
    /// Brightness factor, `>= 0`.
    pub brightness: f64,
    /// Inversion amount in `[0, 1]`.
    pub invert: f64,
}

impl Default for ColorAdjust {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ColorAdjust {
    /// No adjustment.
    pub const IDENTITY: Self = Self {
        saturation: 1.0,
        brightness: 1.0,
        invert: 0.0,
    };

    /// Whether applying this adjustment changes nothing.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Compose a child adjustment on top of this one.
    pub fn then(self, inner: ColorAdjust) -> ColorAdjust {
        ColorAdjust {
            saturation: self.saturation * inner.saturation,
            brightness: self.brightness * inner.brightness,
            invert: self.invert.max(inner.invert),
        }
    }

    /// Apply the adjustment to a straight-alpha color.
    pub fn apply(&self, c: crate::foundation::core::Rgba8) -> crate::foundation::core::Rgba8 {
        if self.is_identity() {
            return c;
        }
        let [r, g, b] = [c.r, c.g, c.b].map(|v| f64::from(v) / 255.0);
        // Rec. 601 luma.
        let luma = 0.299 * r + 0.587 * g + 0.114 * b;
        let adjust = |v: f64| {
            let v = luma + (v - luma) * self.saturation;
            let v = v * self.brightness;
            let v = v + ((1.0 - v) - v) * self.invert;
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        };
        crate::foundation::core::Rgba8::new(adjust(r), adjust(g), adjust(b), c.a)
    }
}

/// Named post-processing effect with an intensity in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Filter {
    /// Effect name (for example `"blur"`).
    pub name: String,
    /// Effect intensity in `[0, 1]`.
    pub intensity: f64,
}

/// Transform operation kinds.
///
/// `Filter` and `Blend` are discrete; every other kind is animatable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    /// Translation.
    Move,
    /// Uniform scale.
    Scale,
    /// Rotation in degrees.
    Rotate,
    /// Axis flip.
    Mirror,
    /// Shear along x/y.
    Skew,
    /// Size delta (inflate and deflate share this kind).
    Inflate,
    /// Opacity.
    Opacity,
    /// Saturation.
    Saturation,
    /// Brightness.
    Brightness,
    /// Color inversion.
    InvertColor,
    /// Named filter.
    Filter,
    /// Blend mode.
    Blend,
}

impl TransformKind {
    /// Kinds the animation scheduler can interpolate, in advancement order.
    pub const ANIMATABLE: [TransformKind; 10] = [
        Self::Move,
        Self::Scale,
        Self::Rotate,
        Self::Mirror,
        Self::Skew,
        Self::Inflate,
        Self::Opacity,
        Self::Saturation,
        Self::Brightness,
        Self::InvertColor,
    ];

    /// Whether jobs of this kind can be enqueued.
    pub fn is_animatable(self) -> bool {
        !matches!(self, Self::Filter | Self::Blend)
    }
}

/// Accumulated visual configuration of one game object.
///
/// Fields are read through accessors and written only through the validating setters below,
/// so every value stays inside its domain.
///
/// ```compile_fail
/// let mut t = tableau::TransformState::default();
/// t.opacity = 7.5;
/// ```
///
/// ```
/// let mut t = tableau::TransformState::default();
/// assert!(t.set_opacity(7.5).is_err());
/// assert_eq!(t.opacity(), 1.0);
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TransformState {
    /// Absolute translation.
    pub(crate) translate: Vec2,
    /// Uniform scale factor, `>= 0`.
    pub(crate) scale: f64,
    /// Rotation in degrees, normalized to `[0, 360)`.
    pub(crate) rotation_deg: f64,
    /// Per-axis flip factors (`-1` flipped, `1` not flipped; animation passes through values in
    /// between).
    pub(crate) mirror: Vec2,
    /// Shear factors along x and y.
    pub(crate) skew: Vec2,
    /// Size delta in pixels; negative values deflate.
    pub(crate) inflate: f64,
    /// Opacity in `[0, 1]`.
    pub(crate) opacity: f64,
    /// Saturation factor, `>= 0`.
    pub(crate) saturation: f64,
    /// Brightness factor, `>= 0`.
    pub(crate) brightness: f64,
    /// Inversion amount in `[0, 1]`.
    pub(crate) invert: f64,
    /// Named filters and their intensities.
    pub(crate) filters: BTreeMap<String, f64>,
    /// Compositing mode.
    pub(crate) blend: BlendMode,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
            rotation_deg: 0.0,
            mirror: Vec2::new(1.0, 1.0),
            skew: Vec2::ZERO,
            inflate: 0.0,
            opacity: 1.0,
            saturation: 1.0,
            brightness: 1.0,
            invert: 0.0,
            filters: BTreeMap::new(),
            blend: BlendMode::Normal,
        }
    }
}

/// Normalize degrees into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if d >= 360.0 { 0.0 } else { d }
}

impl TransformState {
    /// Absolute translation.
    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    /// Uniform scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Rotation in degrees, in `[0, 360)`.
    pub fn rotation_deg(&self) -> f64 {
        self.rotation_deg
    }

    /// Per-axis flip factors.
    pub fn mirror(&self) -> Vec2 {
        self.mirror
    }

    /// Shear factors.
    pub fn skew(&self) -> Vec2 {
        self.skew
    }

    /// Size delta in pixels; negative when deflated.
    pub fn inflate(&self) -> f64 {
        self.inflate
    }

    /// Opacity in `[0, 1]`.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Saturation factor.
    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    /// Brightness factor.
    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    /// Inversion amount in `[0, 1]`.
    pub fn invert(&self) -> f64 {
        self.invert
    }

    /// Named filters and their intensities.
    pub fn filters(&self) -> &BTreeMap<String, f64> {
        &self.filters
    }

    /// Compositing mode.
    pub fn blend(&self) -> BlendMode {
        self.blend
    }

    /// Move to an absolute position.
    pub fn move_to(&mut self, x: f64, y: f64) -> TableauResult<&mut Self> {
        self.translate = Vec2::new(ensure_finite("move x", x)?, ensure_finite("move y", y)?);
        Ok(self)
    }

    /// Move relative to the current position.
    pub fn move_by(&mut self, dx: f64, dy: f64) -> TableauResult<&mut Self> {
        let d = Vec2::new(ensure_finite("move dx", dx)?, ensure_finite("move dy", dy)?);
        self.translate += d;
        Ok(self)
    }

    /// Set the uniform scale factor.
    pub fn set_scale(&mut self, factor: f64) -> TableauResult<&mut Self> {
        self.scale = ensure_non_negative("scale", factor)?;
        Ok(self)
    }

    /// Set the absolute rotation in degrees.
    pub fn set_rotation(&mut self, degrees: f64) -> TableauResult<&mut Self> {
        self.rotation_deg = normalize_degrees(ensure_finite("rotation", degrees)?);
        Ok(self)
    }

    /// Set which axes are flipped.
    pub fn set_mirror(&mut self, flip_x: bool, flip_y: bool) -> &mut Self {
        self.mirror = mirror_factors(flip_x, flip_y);
        self
    }

    /// Set the shear factors.
    pub fn set_skew(&mut self, x: f64, y: f64) -> TableauResult<&mut Self> {
        self.skew = Vec2::new(ensure_finite("skew x", x)?, ensure_finite("skew y", y)?);
        Ok(self)
    }

    /// Grow the drawable by `delta` pixels on every side.
    pub fn set_inflate(&mut self, delta: f64) -> TableauResult<&mut Self> {
        self.inflate = ensure_finite("inflate", delta)?;
        Ok(self)
    }

    /// Shrink the drawable by `delta` pixels on every side.
    pub fn deflate(&mut self, delta: f64) -> TableauResult<&mut Self> {
        self.inflate = -ensure_finite("deflate", delta)?;
        Ok(self)
    }

    /// Set opacity in `[0, 1]`.
    pub fn set_opacity(&mut self, factor: f64) -> TableauResult<&mut Self> {
        self.opacity = ensure_range("opacity", factor, 0.0, 1.0)?;
        Ok(self)
    }

    /// Set the saturation factor.
    pub fn set_saturation(&mut self, factor: f64) -> TableauResult<&mut Self> {
        self.saturation = ensure_non_negative("saturation", factor)?;
        Ok(self)
    }

    /// Set the brightness factor.
    pub fn set_brightness(&mut self, factor: f64) -> TableauResult<&mut Self> {
        self.brightness = ensure_non_negative("brightness", factor)?;
        Ok(self)
    }

    /// Set the inversion amount in `[0, 1]`.
    pub fn set_invert(&mut self, factor: f64) -> TableauResult<&mut Self> {
        self.invert = ensure_range("invert", factor, 0.0, 1.0)?;
        Ok(self)
    }

    /// Set a named filter; intensity `0` removes it.
    pub fn set_filter(&mut self, name: &str, intensity: f64) -> TableauResult<&mut Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TableauError::invalid_parameter("filter name must be non-empty"));
        }
        let intensity = ensure_range("filter intensity", intensity, 0.0, 1.0)?;
        if intensity == 0.0 {
            self.filters.remove(name);
        } else {
            self.filters.insert(name.to_owned(), intensity);
        }
        Ok(self)
    }

    /// Set the compositing mode.
    pub fn set_blend(&mut self, mode: BlendMode) -> &mut Self {
        self.blend = mode;
        self
    }

    /// Set the compositing mode from its CSS name.
    pub fn set_blend_named(&mut self, name: &str) -> TableauResult<&mut Self> {
        self.blend = name.parse()?;
        Ok(self)
    }

    /// Filters as an ordered list.
    pub fn filter_list(&self) -> Vec<Filter> {
        self.filters
            .iter()
            .map(|(name, &intensity)| Filter {
                name: name.clone(),
                intensity,
            })
            .collect()
    }

    /// Color adjustment contributed by this state.
    pub fn color_adjust(&self) -> ColorAdjust {
        ColorAdjust {
            saturation: self.saturation,
            brightness: self.brightness,
            invert: self.invert,
        }
    }

    /// Local matrix for a drawable with the given bounds.
    ///
    /// Rotation, skew, scale, mirror and inflate pivot around the bounds center (the origin
    /// when there are no bounds):
    /// `T(translate) * T(pivot) * R * Skew * S * T(-pivot)`.
    pub fn local_affine(&self, bounds: Option<Rect>) -> Affine {
        let pivot = bounds.map(|b| b.center().to_vec2()).unwrap_or(Vec2::ZERO);
        let (ix, iy) = bounds
            .map(|b| {
                (
                    inflate_factor(b.width(), self.inflate),
                    inflate_factor(b.height(), self.inflate),
                )
            })
            .unwrap_or((1.0, 1.0));

        let sx = self.scale * self.mirror.x * ix;
        let sy = self.scale * self.mirror.y * iy;

        Affine::translate(self.translate)
            * Affine::translate(pivot)
            * Affine::rotate(self.rotation_deg.to_radians())
            * Affine::skew(self.skew.x, self.skew.y)
            * Affine::scale_non_uniform(sx, sy)
            * Affine::translate(-pivot)
    }
}

pub(crate) fn mirror_factors(flip_x: bool, flip_y: bool) -> Vec2 {
    Vec2::new(
        if flip_x { -1.0 } else { 1.0 },
        if flip_y { -1.0 } else { 1.0 },
    )
}

fn inflate_factor(extent: f64, delta: f64) -> f64 {
    if extent.abs() < f64::EPSILON {
        return 1.0;
    }
    ((extent + 2.0 * delta) / extent).max(0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/state.rs"]
mod tests;
