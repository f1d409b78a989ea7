use std::time::{Duration, Instant};

use crate::foundation::core::ensure_finite;
use crate::foundation::error::{TableauError, TableauResult};

/// Source of frame timestamps, in milliseconds on a monotonic clock.
///
/// This stands in for the display's refresh signal: the frame loop asks for the next timestamp
/// and ticks once per value.
pub trait FrameTimer {
    /// Current time on the timer's clock. Used as the loop's baseline when it starts.
    fn now_ms(&self) -> f64;

    /// Block until the next frame is due and return its timestamp, or `None` when no further
    /// frames will come.
    fn next_frame(&mut self) -> Option<f64>;
}

/// Wall-clock timer that sleeps until the next refresh at a fixed rate.
///
/// After a stall, missed deadlines are dropped rather than replayed in a burst.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    start: Instant,
    interval: Duration,
    next_deadline: Duration,
    limit: Option<u64>,
    produced: u64,
}

impl IntervalTimer {
    /// Timer ticking `fps` times per second.
    pub fn new(fps: f64) -> TableauResult<Self> {
        let fps = ensure_finite("fps", fps)?;
        if fps <= 0.0 {
            return Err(TableauError::invalid_parameter(format!(
                "fps must be positive, got {fps}"
            )));
        }
        let interval = Duration::from_secs_f64(1.0 / fps);
        Ok(Self {
            start: Instant::now(),
            interval,
            next_deadline: interval,
            limit: None,
            produced: 0,
        })
    }

    /// Stop after `frames` timestamps.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }

    /// Time between frames.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameTimer for IntervalTimer {
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    fn next_frame(&mut self) -> Option<f64> {
        if self.limit.is_some_and(|l| self.produced >= l) {
            return None;
        }
        self.produced += 1;

        let elapsed = self.start.elapsed();
        if self.next_deadline > elapsed {
            std::thread::sleep(self.next_deadline - elapsed);
        }
        let now = self.start.elapsed();

        self.next_deadline += self.interval;
        if self.next_deadline < now {
            self.next_deadline = now + self.interval;
        }
        Some(now.as_secs_f64() * 1000.0)
    }
}

/// Deterministic timer: advances a virtual clock by a fixed step per frame, never sleeps.
#[derive(Debug, Clone)]
pub struct FixedStepTimer {
    now_ms: f64,
    step_ms: f64,
    limit: Option<u64>,
    produced: u64,
}

impl FixedStepTimer {
    /// Timer stepping `step_ms` per frame, starting at 0.
    pub fn new(step_ms: f64) -> TableauResult<Self> {
        let step_ms = ensure_finite("frame step", step_ms)?;
        if step_ms <= 0.0 {
            return Err(TableauError::invalid_parameter(format!(
                "frame step must be positive, got {step_ms}"
            )));
        }
        Ok(Self {
            now_ms: 0.0,
            step_ms,
            limit: None,
            produced: 0,
        })
    }

    /// Timer matching a frame rate.
    pub fn from_fps(fps: f64) -> TableauResult<Self> {
        let fps = ensure_finite("fps", fps)?;
        if fps <= 0.0 {
            return Err(TableauError::invalid_parameter(format!(
                "fps must be positive, got {fps}"
            )));
        }
        Self::new(1000.0 / fps)
    }

    /// Stop after `frames` timestamps.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }

    /// Step between frames in milliseconds.
    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }
}

impl FrameTimer for FixedStepTimer {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn next_frame(&mut self) -> Option<f64> {
        if self.limit.is_some_and(|l| self.produced >= l) {
            return None;
        }
        self.produced += 1;
        self.now_ms = self.produced as f64 * self.step_ms;
        Some(self.now_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/game/timer.rs"]
mod tests;
