//! Frame loop driver.
//!
//! [`Game`] owns the scene, the drawing surface and the options. Each tick runs the fixed
//! pipeline: compute the delta, advance every animation reachable from the root, clear the
//! surface, run the host callback, render depth-first, present. All advancement happens
//! before any drawing.

use crate::{
    foundation::core::Rgba8,
    foundation::error::{TableauError, TableauResult},
    game::opts::GameOpts,
    game::timer::FrameTimer,
    render::surface::Surface,
    scene::graph::{AnimationEvent, Scene},
};

/// Whether the loop will render on the next tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Not running; ticks are ignored.
    Idle,
    /// Running; the next tick renders a frame.
    Scheduled,
}

/// Summary of one rendered frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameStats {
    /// Index of the frame, starting at 0.
    pub frame_index: u64,
    /// Clamped time since the previous frame, in milliseconds.
    pub delta_ms: f64,
    /// Objects drawn.
    pub drawn: usize,
    /// Animation jobs that completed during this frame's advance.
    pub completed: Vec<AnimationEvent>,
}

/// Per-frame view handed to the host callback.
pub struct FrameCtx<'a> {
    scene: &'a mut Scene,
    delta_ms: f64,
    frame_index: u64,
    completed: &'a [AnimationEvent],
    stop: bool,
}

impl FrameCtx<'_> {
    /// Clamped time since the previous frame, in milliseconds.
    pub fn delta_ms(&self) -> f64 {
        self.delta_ms
    }

    /// Index of the frame being built.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// The scene, already advanced for this frame.
    pub fn scene(&self) -> &Scene {
        self.scene
    }

    /// Mutable scene. Changes show up in this frame's render.
    pub fn scene_mut(&mut self) -> &mut Scene {
        self.scene
    }

    /// Jobs that completed during this frame's advance.
    pub fn completed(&self) -> &[AnimationEvent] {
        self.completed
    }

    /// Stop the loop after this frame has been rendered.
    pub fn stop(&mut self) {
        self.stop = true;
    }

    /// Whether [`FrameCtx::stop`] was called.
    pub fn stop_requested(&self) -> bool {
        self.stop
    }
}

/// Scene, surface and loop state.
pub struct Game<S: Surface> {
    scene: Scene,
    surface: S,
    opts: GameOpts,
    state: LoopState,
    last_ms: f64,
    frame_index: u64,
}

impl<S: Surface> Game<S> {
    /// Idle loop with an empty scene.
    pub fn new(mut surface: S, opts: GameOpts) -> TableauResult<Self> {
        opts.validate()?;
        if let Some([r, g, b, a]) = opts.clear_rgba {
            surface.set_clear_color(Rgba8::new(r, g, b, a));
        }
        Ok(Self {
            scene: Scene::new(),
            surface,
            opts,
            state: LoopState::Idle,
            last_ms: 0.0,
            frame_index: 0,
        })
    }

    /// The scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The drawing surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable drawing surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Options in effect.
    pub fn opts(&self) -> &GameOpts {
        &self.opts
    }

    /// Loop state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Whether the loop is scheduled.
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Scheduled
    }

    /// Frames rendered so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Give back the scene and the surface.
    pub fn into_parts(self) -> (Scene, S) {
        (self.scene, self.surface)
    }

    /// Schedule the loop with `now_ms` as the delta baseline. No-op while scheduled.
    pub fn start(&mut self, now_ms: f64) {
        if self.is_running() {
            return;
        }
        self.last_ms = if now_ms.is_finite() { now_ms } else { 0.0 };
        self.state = LoopState::Scheduled;
        tracing::debug!(now_ms = self.last_ms, "frame loop started");
    }

    /// Cancel the pending frame.
    pub fn stop(&mut self) {
        if self.is_running() {
            self.state = LoopState::Idle;
            tracing::debug!(frame = self.frame_index, "frame loop stopped");
        }
    }

    /// Run one frame at `now_ms`. Returns `Ok(None)` when the loop is idle.
    ///
    /// Callback errors come back unchanged and leave the loop scheduled. Surface errors are
    /// fatal: the loop goes idle before the error is returned.
    #[tracing::instrument(level = "trace", skip(self, callback), fields(frame = self.frame_index))]
    pub fn tick<F>(&mut self, now_ms: f64, mut callback: F) -> TableauResult<Option<FrameStats>>
    where
        F: FnMut(&mut FrameCtx<'_>) -> TableauResult<()>,
    {
        if !self.is_running() {
            return Ok(None);
        }

        let raw = now_ms - self.last_ms;
        let delta_ms = if raw.is_finite() {
            raw.clamp(0.0, self.opts.max_delta_ms)
        } else {
            0.0
        };
        if raw > self.opts.max_delta_ms {
            tracing::warn!(raw, clamped = delta_ms, "frame delta clamped");
        }
        if now_ms.is_finite() {
            self.last_ms = now_ms;
        }

        let completed = self.scene.advance(delta_ms);

        if let Err(err) = self.surface.clear() {
            return Err(self.fail(err));
        }

        let stop_requested = {
            let mut ctx = FrameCtx {
                scene: &mut self.scene,
                delta_ms,
                frame_index: self.frame_index,
                completed: &completed,
                stop: false,
            };
            callback(&mut ctx)?;
            ctx.stop
        };

        let drawn = match self.scene.render(&mut self.surface) {
            Ok(drawn) => drawn,
            Err(err) => return Err(self.fail(err)),
        };
        if let Err(err) = self.surface.present() {
            return Err(self.fail(err));
        }

        let stats = FrameStats {
            frame_index: self.frame_index,
            delta_ms,
            drawn,
            completed,
        };
        self.frame_index += 1;

        if stop_requested {
            self.stop();
        }
        Ok(Some(stats))
    }

    /// Drive the loop from `timer` until it goes idle or the timer runs out.
    ///
    /// Starts the loop at the timer's current time if it is idle. Returns the number of frames
    /// rendered.
    pub fn run<T, F>(&mut self, timer: &mut T, mut callback: F) -> TableauResult<u64>
    where
        T: FrameTimer + ?Sized,
        F: FnMut(&mut FrameCtx<'_>) -> TableauResult<()>,
    {
        self.start(timer.now_ms());
        let mut frames = 0;
        while self.is_running() {
            let Some(now_ms) = timer.next_frame() else {
                break;
            };
            if self.tick(now_ms, &mut callback)?.is_some() {
                frames += 1;
            }
        }
        Ok(frames)
    }

    fn fail(&mut self, err: TableauError) -> TableauError {
        if err.is_fatal() {
            tracing::warn!(%err, "surface failure, stopping frame loop");
            self.state = LoopState::Idle;
        }
        err
    }
}

#[cfg(test)]
#[path = "../../tests/unit/game/frame_loop.rs"]
mod tests;
