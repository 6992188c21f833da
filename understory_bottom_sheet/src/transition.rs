// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offset transitions: a single cancellable animation slot driven by host frames.
//!
//! ## Model
//!
//! - A [`Transition`] animates the sheet offset from one value to another over a
//!   fixed duration, shaped by an [`Interpolator`].
//! - [`TransitionDriver`] owns at most one transition. Starting a new one cancels
//!   the current one first, synchronously; there is never a queue.
//! - Each transition carries a [`CancellationToken`]. Whoever handles a
//!   [`TransitionEnd`] must check the token before finalizing any state, so a
//!   superseded transition never touches state its successor now owns.
//! - The host calls [`TransitionDriver::tick`] once per frame with a monotonic
//!   timestamp. A transition's clock starts at the first frame it sees.
//!
//! ```
//! use understory_bottom_sheet::{Interpolator, TransitionDriver, TransitionKind};
//!
//! let mut driver = TransitionDriver::new(250, Interpolator::Linear);
//! let (token, superseded) = driver.start(TransitionKind::Expand, 0.0, 100.0);
//! assert!(superseded.is_none());
//!
//! assert_eq!(driver.tick(1_000).unwrap().value, 0.0);
//! assert_eq!(driver.tick(1_125).unwrap().value, 50.0);
//! let last = driver.tick(1_250).unwrap();
//! assert_eq!(last.value, 100.0);
//! assert!(last.ended.is_some());
//! assert!(!token.is_cancelled());
//! assert!(!driver.is_active());
//! ```

use alloc::rc::Rc;
use core::cell::Cell;

use crate::state::SheetState;

/// Shared flag recording that a transition was cancelled.
///
/// Cloning shares the flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the token cancelled. Idempotent.
    pub fn cancel(&self) {
        self.0.set(true);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Which resting state a transition heads for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Toward the peek offset.
    Peek,
    /// Toward the maximum offset.
    Expand,
    /// Toward zero, detaching the content on completion.
    Dismiss,
}

impl TransitionKind {
    /// The state a sheet rests in once this transition completes.
    #[must_use]
    pub fn target_state(self) -> SheetState {
        match self {
            Self::Peek => SheetState::Peeked,
            Self::Expand => SheetState::Expanded,
            Self::Dismiss => SheetState::Hidden,
        }
    }
}

/// Easing curve applied to a transition's linear progress.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Interpolator {
    /// No easing.
    Linear,
    /// Starts fast and slows down: `1 - (1 - t)^(2 * factor)`.
    Decelerate(f64),
}

impl Interpolator {
    /// Maps linear progress in `[0, 1]` to eased progress in `[0, 1]`.
    #[must_use]
    pub fn interpolate(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Decelerate(factor) if factor == 1.0 => 1.0 - (1.0 - t) * (1.0 - t),
            Self::Decelerate(factor) => 1.0 - libm::pow(1.0 - t, 2.0 * factor),
        }
    }
}

/// One offset animation.
#[derive(Clone, Debug)]
pub struct Transition {
    kind: TransitionKind,
    from: f64,
    to: f64,
    duration_ms: u64,
    interpolator: Interpolator,
    started_at: Option<u64>,
    token: CancellationToken,
}

impl Transition {
    /// The kind of this transition.
    #[must_use]
    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    /// Offset at the start of the transition.
    #[must_use]
    pub fn start_value(&self) -> f64 {
        self.from
    }

    /// Offset at the end of the transition.
    #[must_use]
    pub fn end_value(&self) -> f64 {
        self.to
    }

    /// The transition's cancellation token.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Returns `(value, finished)` at `now_ms`, starting the clock if needed.
    fn sample(&mut self, now_ms: u64) -> (f64, bool) {
        let started_at = *self.started_at.get_or_insert(now_ms);
        let elapsed = now_ms.saturating_sub(started_at);
        if elapsed >= self.duration_ms {
            return (self.to, true);
        }
        let t = elapsed as f64 / self.duration_ms as f64;
        let eased = self.interpolator.interpolate(t);
        (self.from + (self.to - self.from) * eased, false)
    }

    fn into_end(self) -> TransitionEnd {
        TransitionEnd {
            kind: self.kind,
            token: self.token,
        }
    }
}

/// A transition left the driver, either by completing or by being cancelled.
#[derive(Clone, Debug)]
pub struct TransitionEnd {
    /// Kind of the transition that ended.
    pub kind: TransitionKind,
    /// Its token; cancelled if the transition was superseded or aborted.
    pub token: CancellationToken,
}

impl TransitionEnd {
    /// Returns `true` when the transition ran to completion.
    #[must_use]
    pub fn completed(&self) -> bool {
        !self.token.is_cancelled()
    }
}

/// Result of advancing the active transition by one frame.
#[derive(Clone, Debug)]
pub struct TransitionFrame {
    /// Kind of the active transition.
    pub kind: TransitionKind,
    /// Offset for this frame.
    pub value: f64,
    /// Set on the frame where the transition completed.
    pub ended: Option<TransitionEnd>,
}

/// Owner of the single active transition.
#[derive(Clone, Debug)]
pub struct TransitionDriver {
    active: Option<Transition>,
    duration_ms: u64,
    interpolator: Interpolator,
}

impl TransitionDriver {
    /// Creates an idle driver whose transitions last `duration_ms`.
    #[must_use]
    pub fn new(duration_ms: u64, interpolator: Interpolator) -> Self {
        Self {
            active: None,
            duration_ms,
            interpolator,
        }
    }

    /// Returns `true` while a transition is in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The transition in flight, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Transition> {
        self.active.as_ref()
    }

    /// Cancels the transition in flight, returning its end record.
    pub fn cancel(&mut self) -> Option<TransitionEnd> {
        let transition = self.active.take()?;
        transition.token.cancel();
        log::trace!("cancelled {:?} transition", transition.kind);
        Some(transition.into_end())
    }

    /// Starts a transition, cancelling any transition already in flight.
    ///
    /// Returns the new transition's token and the end record of the one it superseded.
    pub fn start(
        &mut self,
        kind: TransitionKind,
        from: f64,
        to: f64,
    ) -> (CancellationToken, Option<TransitionEnd>) {
        let superseded = self.cancel();
        debug_assert!(
            self.active.is_none(),
            "a transition must be cancelled before another starts"
        );
        let token = CancellationToken::new();
        log::trace!("starting {kind:?} transition {from} -> {to}");
        self.active = Some(Transition {
            kind,
            from,
            to,
            duration_ms: self.duration_ms,
            interpolator: self.interpolator,
            started_at: None,
            token: token.clone(),
        });
        (token, superseded)
    }

    /// Advances the active transition to `now_ms`.
    ///
    /// Returns `None` when idle. On the completing frame the transition is removed
    /// and its [`TransitionEnd`] is returned with an uncancelled token.
    pub fn tick(&mut self, now_ms: u64) -> Option<TransitionFrame> {
        let transition = self.active.as_mut()?;
        let kind = transition.kind;
        let (value, finished) = transition.sample(now_ms);
        let ended = if finished {
            self.active.take().map(|t| {
                log::trace!("finished {kind:?} transition");
                t.into_end()
            })
        } else {
            None
        };
        Some(TransitionFrame { kind, value, ended })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_clones_share_state() {
        let token = CancellationToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn decelerate_front_loads_progress() {
        let d = Interpolator::Decelerate(1.6);
        assert_eq!(d.interpolate(0.0), 0.0);
        assert_eq!(d.interpolate(1.0), 1.0);
        assert!(d.interpolate(0.5) > 0.5);
        assert!(d.interpolate(0.25) < d.interpolate(0.5));
    }

    #[test]
    fn unit_decelerate_is_quadratic() {
        let d = Interpolator::Decelerate(1.0);
        assert_eq!(d.interpolate(0.5), 0.75);
    }

    #[test]
    fn interpolate_clamps_input() {
        assert_eq!(Interpolator::Linear.interpolate(-1.0), 0.0);
        assert_eq!(Interpolator::Linear.interpolate(2.0), 1.0);
    }

    #[test]
    fn starting_supersedes_and_cancels_previous() {
        let mut driver = TransitionDriver::new(250, Interpolator::Linear);
        let (first, _) = driver.start(TransitionKind::Expand, 0.0, 100.0);
        let (second, superseded) = driver.start(TransitionKind::Dismiss, 40.0, 0.0);

        let superseded = superseded.expect("expand transition was in flight");
        assert_eq!(superseded.kind, TransitionKind::Expand);
        assert!(!superseded.completed());
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(driver.active().map(Transition::kind), Some(TransitionKind::Dismiss));
    }

    #[test]
    fn clock_starts_at_first_frame() {
        let mut driver = TransitionDriver::new(100, Interpolator::Linear);
        driver.start(TransitionKind::Peek, 0.0, 200.0);
        assert_eq!(driver.tick(5_000).map(|f| f.value), Some(0.0));
        assert_eq!(driver.tick(5_050).map(|f| f.value), Some(100.0));
    }

    #[test]
    fn completion_clears_slot_and_reports_end() {
        let mut driver = TransitionDriver::new(100, Interpolator::Decelerate(1.6));
        let (token, _) = driver.start(TransitionKind::Dismiss, 300.0, 0.0);
        driver.tick(0);
        let frame = driver.tick(100).expect("transition active");
        assert_eq!(frame.value, 0.0);
        let end = frame.ended.expect("transition completed");
        assert!(end.completed());
        assert!(!token.is_cancelled());
        assert!(driver.tick(200).is_none());
    }

    #[test]
    fn cancel_when_idle_is_none() {
        let mut driver = TransitionDriver::new(100, Interpolator::Linear);
        assert!(driver.cancel().is_none());
    }

    #[test]
    fn target_states() {
        assert_eq!(TransitionKind::Peek.target_state(), SheetState::Peeked);
        assert_eq!(TransitionKind::Expand.target_state(), SheetState::Expanded);
        assert_eq!(TransitionKind::Dismiss.target_state(), SheetState::Hidden);
    }
}
