use crate::{
    foundation::core::{Vec2, ensure_finite, ensure_non_negative, ensure_range},
    foundation::error::{TableauError, TableauResult},
    transform::state::{TransformKind, TransformState, mirror_factors, normalize_degrees},
};

/// Linear interpolation between two values of the same type.
pub trait Lerp: Sized {
    /// Interpolate from `a` (at `t = 0`) to `b` (at `t = 1`).
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// Value of one animatable transform field.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AnimValue {
    /// Scalar fields (scale, rotation, inflate, color factors).
    Scalar(f64),
    /// Two-component fields (translation, mirror, skew).
    Vector(Vec2),
}

impl Lerp for AnimValue {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        match (a, b) {
            (Self::Scalar(a), Self::Scalar(b)) => Self::Scalar(<f64 as Lerp>::lerp(a, b, t)),
            (Self::Vector(a), Self::Vector(b)) => Self::Vector(<Vec2 as Lerp>::lerp(a, b, t)),
            // Kinds never mix; hold the start value if they somehow do.
            (a, _) => *a,
        }
    }
}

/// End state of one animation job: the transform kind plus its typed target.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AnimTarget {
    /// Move to an absolute position.
    Move {
        /// Target x.
        x: f64,
        /// Target y.
        y: f64,
    },
    /// Scale to a factor.
    Scale(f64),
    /// Rotate to an angle in degrees. Values outside `[0, 360)` spin past the wrap point.
    Rotate(f64),
    /// Flip toward the given axes.
    Mirror {
        /// Flip horizontally.
        x: bool,
        /// Flip vertically.
        y: bool,
    },
    /// Shear to the given factors.
    Skew {
        /// Shear along x.
        x: f64,
        /// Shear along y.
        y: f64,
    },
    /// Grow by a size delta.
    Inflate(f64),
    /// Shrink by a size delta.
    Deflate(f64),
    /// Fade to an opacity.
    Opacity(f64),
    /// Saturate to a factor.
    Saturation(f64),
    /// Brighten to a factor.
    Brightness(f64),
    /// Invert by an amount.
    InvertColor(f64),
}

impl AnimTarget {
    /// Transform kind this target animates.
    pub fn kind(&self) -> TransformKind {
        match self {
            Self::Move { .. } => TransformKind::Move,
            Self::Scale(_) => TransformKind::Scale,
            Self::Rotate(_) => TransformKind::Rotate,
            Self::Mirror { .. } => TransformKind::Mirror,
            Self::Skew { .. } => TransformKind::Skew,
            Self::Inflate(_) | Self::Deflate(_) => TransformKind::Inflate,
            Self::Opacity(_) => TransformKind::Opacity,
            Self::Saturation(_) => TransformKind::Saturation,
            Self::Brightness(_) => TransformKind::Brightness,
            Self::InvertColor(_) => TransformKind::InvertColor,
        }
    }

    /// Interpolation end point.
    pub fn value(&self) -> AnimValue {
        match *self {
            Self::Move { x, y } | Self::Skew { x, y } => AnimValue::Vector(Vec2::new(x, y)),
            Self::Mirror { x, y } => AnimValue::Vector(mirror_factors(x, y)),
            Self::Deflate(d) => AnimValue::Scalar(-d),
            Self::Scale(v)
            | Self::Rotate(v)
            | Self::Inflate(v)
            | Self::Opacity(v)
            | Self::Saturation(v)
            | Self::Brightness(v)
            | Self::InvertColor(v) => AnimValue::Scalar(v),
        }
    }

    /// Check the target against the domain of its transform kind.
    pub fn validate(&self) -> TableauResult<()> {
        match *self {
            Self::Move { x, y } => {
                ensure_finite("move x", x)?;
                ensure_finite("move y", y)?;
            }
            Self::Skew { x, y } => {
                ensure_finite("skew x", x)?;
                ensure_finite("skew y", y)?;
            }
            Self::Mirror { .. } => {}
            Self::Scale(v) => {
                ensure_non_negative("scale", v)?;
            }
            Self::Rotate(v) => {
                ensure_finite("rotation", v)?;
            }
            Self::Inflate(v) => {
                ensure_finite("inflate", v)?;
            }
            Self::Deflate(v) => {
                ensure_finite("deflate", v)?;
            }
            Self::Opacity(v) => {
                ensure_range("opacity", v, 0.0, 1.0)?;
            }
            Self::Saturation(v) => {
                ensure_non_negative("saturation", v)?;
            }
            Self::Brightness(v) => {
                ensure_non_negative("brightness", v)?;
            }
            Self::InvertColor(v) => {
                ensure_range("invert", v, 0.0, 1.0)?;
            }
        }
        Ok(())
    }
}

/// How many times a job runs its full interpolation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Repeat {
    /// A finite number of cycles, at least one.
    Times(u32),
    /// Cycle until cancelled.
    Forever,
}

impl Default for Repeat {
    fn default() -> Self {
        Self::Times(1)
    }
}

impl Repeat {
    /// Validate against a job duration.
    pub fn validate(self, duration_ms: f64) -> TableauResult<()> {
        match self {
            Self::Times(0) => Err(TableauError::invalid_parameter(
                "repeat count must be >= 1",
            )),
            Self::Forever if duration_ms <= 0.0 => Err(TableauError::invalid_parameter(
                "an infinitely repeating animation needs a positive duration",
            )),
            _ => Ok(()),
        }
    }
}

/// Read the animatable field of `kind` from a transform state.
pub(crate) fn read_value(state: &TransformState, kind: TransformKind) -> TableauResult<AnimValue> {
    let v = match kind {
        TransformKind::Move => AnimValue::Vector(state.translate),
        TransformKind::Scale => AnimValue::Scalar(state.scale),
        TransformKind::Rotate => AnimValue::Scalar(state.rotation_deg),
        TransformKind::Mirror => AnimValue::Vector(state.mirror),
        TransformKind::Skew => AnimValue::Vector(state.skew),
        TransformKind::Inflate => AnimValue::Scalar(state.inflate),
        TransformKind::Opacity => AnimValue::Scalar(state.opacity),
        TransformKind::Saturation => AnimValue::Scalar(state.saturation),
        TransformKind::Brightness => AnimValue::Scalar(state.brightness),
        TransformKind::InvertColor => AnimValue::Scalar(state.invert),
        TransformKind::Filter | TransformKind::Blend => {
            return Err(TableauError::invalid_parameter(format!(
                "{kind:?} is not animatable"
            )));
        }
    };
    Ok(v)
}

/// Write an interpolated value into the field of `kind`, clamped to its domain.
pub(crate) fn write_value(state: &mut TransformState, kind: TransformKind, value: AnimValue) {
    match (kind, value) {
        (TransformKind::Move, AnimValue::Vector(v)) => state.translate = v,
        (TransformKind::Mirror, AnimValue::Vector(v)) => {
            state.mirror = Vec2::new(v.x.clamp(-1.0, 1.0), v.y.clamp(-1.0, 1.0));
        }
        (TransformKind::Skew, AnimValue::Vector(v)) => state.skew = v,
        (TransformKind::Scale, AnimValue::Scalar(v)) => state.scale = v.max(0.0),
        (TransformKind::Rotate, AnimValue::Scalar(v)) => state.rotation_deg = normalize_degrees(v),
        (TransformKind::Inflate, AnimValue::Scalar(v)) => state.inflate = v,
        (TransformKind::Opacity, AnimValue::Scalar(v)) => state.opacity = v.clamp(0.0, 1.0),
        (TransformKind::Saturation, AnimValue::Scalar(v)) => state.saturation = v.max(0.0),
        (TransformKind::Brightness, AnimValue::Scalar(v)) => state.brightness = v.max(0.0),
        (TransformKind::InvertColor, AnimValue::Scalar(v)) => state.invert = v.clamp(0.0, 1.0),
        (kind, value) => {
            tracing::warn!(?kind, ?value, "ignoring mismatched animation write");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/anim.rs"]
mod tests;
