//! Tick-driven tween scheduler.
//!
//! The host calls [`Animator::tick`] once per display frame with a monotonic
//! timestamp in milliseconds. A tween's clock starts on the first tick that
//! runs it. Every live tween computes its progress, eases it,
//! and hands the interpolated value to its setter together with the caller's
//! context `C`, so setters can mutate shared state without interior mutability.

use std::cell::Cell;
use std::rc::Rc;

use crate::animation::ease::Ease;
use crate::animation::lerp::Lerp;
use crate::foundation::error::{MenuError, MenuResult};

type Step<C> = Box<dyn FnMut(&mut C, f64)>;
type Done<C> = Box<dyn FnOnce(&mut C)>;

/// Cancellation token for one scheduled tween.
///
/// After [`AnimationHandle::stop`] the tween's setter is never invoked again and
/// its completion callback never fires.
#[derive(Clone, Debug)]
pub struct AnimationHandle {
    id: u64,
    cancelled: Rc<Cell<bool>>,
    finished: Rc<Cell<bool>>,
}

impl AnimationHandle {
    /// Unique among handles issued by the same animator.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Cancel the tween. Idempotent.
    pub fn stop(&self) {
        self.cancelled.set(true);
    }

    /// `true` until the tween completes or is stopped.
    pub fn is_active(&self) -> bool {
        !self.cancelled.get() && !self.finished.get()
    }
}

struct Tween<C> {
    // Unset until the first tick that runs the tween.
    start_ms: Option<f64>,
    duration_ms: f64,
    ease: Ease,
    step: Step<C>,
    on_done: Option<Done<C>>,
    cancelled: Rc<Cell<bool>>,
    finished: Rc<Cell<bool>>,
}

impl<C> Tween<C> {
    fn progress(&mut self, now_ms: f64) -> f64 {
        let start = *self.start_ms.get_or_insert(now_ms);
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - start) / self.duration_ms).clamp(0.0, 1.0)
    }
}

/// Scheduler owning every in-flight tween for one context type.
pub struct Animator<C> {
    tweens: Vec<Tween<C>>,
    now_ms: f64,
    next_id: u64,
}

impl<C> Default for Animator<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for Animator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animator")
            .field("active", &self.tweens.len())
            .field("now_ms", &self.now_ms)
            .finish()
    }
}

impl<C> Animator<C> {
    /// Empty schedule with the clock at 0.
    pub fn new() -> Self {
        Self {
            tweens: Vec::new(),
            now_ms: 0.0,
            next_id: 0,
        }
    }

    /// Timestamp of the most recent tick.
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Tweens that have not finished or been stopped.
    pub fn active_count(&self) -> usize {
        self.tweens.iter().filter(|t| !t.cancelled.get()).count()
    }

    /// `true` when nothing is left to run.
    pub fn is_idle(&self) -> bool {
        self.active_count() == 0
    }

    /// Schedule a tween from `from` to `to` over `duration_ms`.
    pub fn animate<T, S>(
        &mut self,
        from: T,
        to: T,
        setter: S,
        duration_ms: f64,
        ease: Ease,
    ) -> MenuResult<AnimationHandle>
    where
        T: Lerp,
        S: FnMut(&mut C, T) + 'static,
    {
        self.schedule(from, to, setter, duration_ms, ease, None)
    }

    /// [`Animator::animate`] with a callback invoked once after the final
    /// setter call.
    pub fn animate_with_callback<T, S, D>(
        &mut self,
        from: T,
        to: T,
        setter: S,
        duration_ms: f64,
        ease: Ease,
        on_done: D,
    ) -> MenuResult<AnimationHandle>
    where
        T: Lerp,
        S: FnMut(&mut C, T) + 'static,
        D: FnOnce(&mut C) + 'static,
    {
        self.schedule(from, to, setter, duration_ms, ease, Some(Box::new(on_done)))
    }

    fn schedule<T, S>(
        &mut self,
        from: T,
        to: T,
        mut setter: S,
        duration_ms: f64,
        ease: Ease,
        on_done: Option<Done<C>>,
    ) -> MenuResult<AnimationHandle>
    where
        T: Lerp,
        S: FnMut(&mut C, T) + 'static,
    {
        if !T::lerp_compatible(&from, &to) {
            return Err(MenuError::animation(
                "tween start and end values have different lengths",
            ));
        }
        if duration_ms.is_nan() {
            return Err(MenuError::animation("tween duration must not be NaN"));
        }

        let id = self.next_id;
        self.next_id += 1;
        let cancelled = Rc::new(Cell::new(false));
        let finished = Rc::new(Cell::new(false));

        self.tweens.push(Tween {
            start_ms: None,
            duration_ms,
            ease,
            step: Box::new(move |ctx, eased| setter(ctx, T::lerp(&from, &to, eased))),
            on_done,
            cancelled: Rc::clone(&cancelled),
            finished: Rc::clone(&finished),
        });

        Ok(AnimationHandle {
            id,
            cancelled,
            finished,
        })
    }

    /// Advance every live tween to `now_ms`.
    ///
    /// A tween scheduled since the previous tick starts at `now_ms` and runs
    /// its first step at progress 0, so idle time before it was scheduled
    /// never counts towards it. Stopped tweens are dropped before their step
    /// runs. Tweens that reach full progress run their final step, then their
    /// callback, then leave the schedule. The clock never moves backwards.
    pub fn tick(&mut self, now_ms: f64, ctx: &mut C) {
        self.now_ms = self.now_ms.max(now_ms);
        let now = self.now_ms;

        // Each tween is checked for cancellation right before it runs, so a
        // setter earlier in this tick may stop a later one.
        let mut i = 0;
        while i < self.tweens.len() {
            if self.tweens[i].cancelled.get() {
                self.tweens.remove(i);
                continue;
            }

            let tween = &mut self.tweens[i];
            let progress = tween.progress(now);
            (tween.step)(ctx, tween.ease.apply(progress));

            if progress < 1.0 {
                i += 1;
                continue;
            }

            let mut tween = self.tweens.remove(i);
            tween.finished.set(true);
            if let Some(done) = tween.on_done.take() {
                if !tween.cancelled.get() {
                    done(ctx);
                }
            }
        }
    }

    /// Tick at a fixed frame interval until no tweens remain or `max_ms` of
    /// clock time has elapsed. Returns the final clock value.
    pub fn run_to_completion(&mut self, ctx: &mut C, frame_ms: f64, max_ms: f64) -> f64 {
        let frame_ms = if frame_ms > 0.0 { frame_ms } else { 16.0 };
        let deadline = self.now_ms + max_ms;
        while !self.is_idle() && self.now_ms < deadline {
            let next = (self.now_ms + frame_ms).min(deadline);
            self.tick(next, ctx);
        }
        self.now_ms
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/animator.rs"]
mod tests;
