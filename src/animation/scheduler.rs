//! Per-object animation queue.
//!
//! Jobs are a tagged-variant list processed by one generic interpolation routine keyed on
//! [`TransformKind`]. Sequencing rules live in one place ([`AnimationQueue::advance`]):
//!
//! - jobs of the **same** kind run strictly one after another, in insertion order;
//! - jobs of **different** kinds run in parallel within a single advance.
//!
//! Interpolation is linear from the value captured when a job starts to its target.

use crate::{
    animation::anim::{AnimTarget, AnimValue, Lerp, Repeat, read_value, write_value},
    foundation::core::ensure_non_negative,
    foundation::error::{TableauError, TableauResult},
    foundation::ids::JobId,
    transform::state::{TransformKind, TransformState},
};

/// Lifecycle of one animation job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum JobState {
    /// Waiting behind an earlier job of the same kind, or not advanced yet.
    Pending,
    /// Interpolating.
    Running,
    /// Reached its target on the last cycle. Completed jobs leave the queue immediately.
    Completed,
}

/// One timed, interpolated transition of a single transform kind.
#[derive(Clone, Debug)]
pub struct AnimationJob {
    id: JobId,
    target: AnimTarget,
    duration_ms: f64,
    repeat: Repeat,
    elapsed_ms: f64,
    state: JobState,
    start: Option<AnimValue>,
    remaining: Repeat,
}

impl AnimationJob {
    pub(crate) fn new(
        id: JobId,
        target: AnimTarget,
        duration_ms: f64,
        repeat: Repeat,
    ) -> TableauResult<Self> {
        target.validate()?;
        let duration_ms = ensure_non_negative("animation duration", duration_ms)?;
        repeat.validate(duration_ms)?;
        Ok(Self {
            id,
            target,
            duration_ms,
            repeat,
            elapsed_ms: 0.0,
            state: JobState::Pending,
            start: None,
            remaining: repeat,
        })
    }

    /// Job identifier.
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Transform kind this job animates.
    pub fn kind(&self) -> TransformKind {
        self.target.kind()
    }

    /// Target of the interpolation.
    pub fn target(&self) -> AnimTarget {
        self.target
    }

    /// Duration of one cycle in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Repeat policy the job was enqueued with.
    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    /// Cycles left, including the one in progress.
    pub fn remaining(&self) -> Repeat {
        self.remaining
    }

    /// Progress inside the current cycle, in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Lifecycle state.
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Value captured when the job started running.
    pub fn start_value(&self) -> Option<AnimValue> {
        self.start
    }

    fn promote(&mut self, current: AnimValue) {
        self.start = Some(current);
        self.state = JobState::Running;
        self.elapsed_ms = 0.0;
    }

    /// Spend up to `budget_ms` on this job, writing the interpolated value into `state`.
    ///
    /// Returns the unspent time once the job has completed its last cycle, `None` while it is
    /// still running. Whole cycles that fit inside the budget are skipped arithmetically.
    fn step(&mut self, mut budget_ms: f64, state: &mut TransformState) -> Option<f64> {
        let kind = self.kind();
        let target = self.target.value();
        let start = self.start.unwrap_or(target);
        let dur = self.duration_ms;

        if dur > 0.0 && self.elapsed_ms + budget_ms < dur {
            self.elapsed_ms += budget_ms;
            let f = (self.elapsed_ms / dur).clamp(0.0, 1.0);
            write_value(state, kind, AnimValue::lerp(&start, &target, f));
            return None;
        }

        // The current cycle reaches f = 1.
        budget_ms -= (dur - self.elapsed_ms).max(0.0);
        self.elapsed_ms = 0.0;

        let left = match self.remaining {
            Repeat::Forever => {
                // Forever jobs always have dur > 0.
                let carry = budget_ms % dur;
                self.elapsed_ms = carry;
                write_value(state, kind, cycle_value(start, target, carry, dur));
                return None;
            }
            Repeat::Times(n) => n.saturating_sub(1),
        };

        if left == 0 || dur <= 0.0 {
            return Some(self.complete(budget_ms, state));
        }

        let whole = (budget_ms / dur).floor();
        if whole >= f64::from(left) {
            budget_ms -= f64::from(left) * dur;
            return Some(self.complete(budget_ms, state));
        }

        // whole < left, so it fits in u32.
        let skipped = whole as u32;
        budget_ms -= whole * dur;
        self.remaining = Repeat::Times(left - skipped);
        self.elapsed_ms = budget_ms;
        write_value(state, kind, cycle_value(start, target, budget_ms, dur));
        None
    }

    fn complete(&mut self, leftover_ms: f64, state: &mut TransformState) -> f64 {
        // Settle on the exact target rather than a lerp at f = 1.
        write_value(state, self.kind(), self.target.value());
        self.state = JobState::Completed;
        self.remaining = Repeat::Times(0);
        self.elapsed_ms = self.duration_ms;
        leftover_ms.max(0.0)
    }
}

/// Value shown after a cycle boundary: the target when the boundary falls exactly on this
/// advance, otherwise the carried-over progress into the next cycle.
fn cycle_value(start: AnimValue, target: AnimValue, carry_ms: f64, dur: f64) -> AnimValue {
    if carry_ms <= 0.0 {
        target
    } else {
        AnimValue::lerp(&start, &target, carry_ms / dur)
    }
}

/// Completion notification for one animation job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletedJob {
    /// Job identifier.
    pub job: JobId,
    /// Transform kind the job animated.
    pub kind: TransformKind,
}

/// Ordered queue of animation jobs attached to one game object.
#[derive(Clone, Debug, Default)]
pub struct AnimationQueue {
    jobs: Vec<AnimationJob>,
}

impl AnimationQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a job. Validation happens when the job is built.
    pub(crate) fn push(&mut self, job: AnimationJob) {
        self.jobs.push(job);
    }

    /// Jobs in insertion order.
    pub fn jobs(&self) -> &[AnimationJob] {
        &self.jobs
    }

    /// Job with the given id.
    pub fn get(&self, id: JobId) -> Option<&AnimationJob> {
        self.jobs.iter().find(|j| j.id == id)
    }

    /// Number of queued jobs (pending and running).
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether no job is queued.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// The job currently at the head of `kind`'s serial lane.
    pub fn active(&self, kind: TransformKind) -> Option<&AnimationJob> {
        self.jobs.iter().find(|j| j.kind() == kind)
    }

    /// Remove one job. The next job of the same kind starts from whatever value is settled.
    pub fn cancel(&mut self, id: JobId) -> TableauResult<AnimationJob> {
        let idx = self
            .jobs
            .iter()
            .position(|j| j.id == id)
            .ok_or_else(|| TableauError::not_found(format!("animation job {} not queued", id.0)))?;
        Ok(self.jobs.remove(idx))
    }

    /// Remove every job of one kind; returns how many were removed.
    pub fn cancel_kind(&mut self, kind: TransformKind) -> usize {
        let before = self.jobs.len();
        self.jobs.retain(|j| j.kind() != kind);
        before - self.jobs.len()
    }

    /// Remove every job; returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let n = self.jobs.len();
        self.jobs.clear();
        n
    }

    /// Advance all lanes by `delta_ms`.
    ///
    /// Interpolated values are written into a copy of `settled`; the copy is returned only when
    /// at least one job ran, so the caller swaps it in as a whole.
    pub(crate) fn advance(
        &mut self,
        settled: &TransformState,
        delta_ms: f64,
        completed: &mut Vec<CompletedJob>,
    ) -> Option<TransformState> {
        if self.jobs.is_empty() {
            return None;
        }

        let mut next = settled.clone();
        for kind in TransformKind::ANIMATABLE {
            self.advance_lane(kind, &mut next, delta_ms, completed);
        }
        Some(next)
    }

    fn advance_lane(
        &mut self,
        kind: TransformKind,
        next: &mut TransformState,
        delta_ms: f64,
        completed: &mut Vec<CompletedJob>,
    ) {
        let mut budget = delta_ms;
        while let Some(idx) = self.jobs.iter().position(|j| j.kind() == kind) {
            let job = &mut self.jobs[idx];
            if job.state == JobState::Pending {
                // Start from the value just settled by the previous job of this kind.
                match read_value(next, kind) {
                    Ok(current) => job.promote(current),
                    Err(err) => {
                        tracing::warn!(%err, "dropping animation job with unreadable kind");
                        self.jobs.remove(idx);
                        continue;
                    }
                }
            }

            match job.step(budget, next) {
                Some(leftover) => {
                    let done = self.jobs.remove(idx);
                    tracing::debug!(job = done.id.0, ?kind, "animation job completed");
                    completed.push(CompletedJob { job: done.id, kind });
                    budget = leftover;
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/scheduler.rs"]
mod tests;
