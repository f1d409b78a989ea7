//! tableau is a minimal 2D scene-graph runtime.
//!
//! A host composes drawable entities into a named hierarchy, applies visual transforms and
//! timed animations to them, and renders them once per display refresh:
//!
//! - Build a [`Scene`] of groups and [`GameObject`]s wrapping [`Renderable`] drawables
//! - Set transform state directly or queue animations with [`Scene::animate`]
//! - Drive frames with [`Game::tick`] or [`Game::run`] onto any [`Surface`]
//!
//! Stock drawables ([`Shape`], [`Picture`], [`Text`]) and surfaces ([`RecordingSurface`],
//! [`CpuSurface`]) cover headless use and software rendering.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod animation;
pub(crate) mod drawables;
pub(crate) mod game;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod transform;

pub use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{TableauError, TableauResult};
pub use crate::foundation::ids::{JobId, NodeId};

pub use crate::animation::anim::{AnimTarget, AnimValue, Lerp, Repeat};
pub use crate::animation::scheduler::{AnimationJob, AnimationQueue, JobState};
pub use crate::assets::decode::{ImageData, decode_image, unpremultiply_rgba8_in_place};
pub use crate::assets::text::{Font, TextStyle};
pub use crate::drawables::picture::Picture;
pub use crate::drawables::shape::Shape;
pub use crate::drawables::text::Text;
pub use crate::game::frame_loop::{FrameCtx, FrameStats, Game, LoopState};
pub use crate::game::opts::{GameOpts, MAX_DELTA_ENV};
pub use crate::game::timer::{FixedStepTimer, FrameTimer, IntervalTimer};
pub use crate::render::blur::{MAX_BLUR_RADIUS, blur_radius, blur_rgba8_premul};
pub use crate::render::cpu::{BLUR_FILTER, CpuSurface, FrameRGBA};
pub use crate::render::recording::{DrawCommand, DrawOp, RecordingSurface};
pub use crate::render::surface::{
    Glyph, GlyphRun, Renderable, StateStack, StrokeStyle, Surface, SurfaceState,
};
pub use crate::scene::graph::{
    AnimationEvent, Descendants, GameObject, Node, NodeKind, ROOT_NAME, Scene,
};
pub use crate::transform::state::{
    BlendMode, ColorAdjust, Filter, TransformKind, TransformState, normalize_degrees,
};
