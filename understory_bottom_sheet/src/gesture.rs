// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture tracking: ownership, deltas, and velocity for one pointer gesture.
//!
//! ## Usage
//!
//! 1) On pointer-down call [`GestureTracker::begin`] with the sheet's offset and
//!    state. This replaces the [`GestureSnapshot`] wholesale, resets ownership,
//!    and clears the velocity estimator.
//! 2) Feed every sample (including the down) to [`GestureTracker::record`].
//! 3) While ownership is [`DragOwnership::Undecided`], call
//!    [`GestureTracker::classify`]; the first axis to exceed the touch slop wins
//!    and the decision is fixed until the next down.
//! 4) With [`DragOwnership::Sheet`], [`GestureTracker::candidate_offset`] gives
//!    the offset the finger asks for, before [`apply_resistance`].
//! 5) On release, [`resolve_release`] picks the resting state from velocity, or
//!    from position when the release is too slow to count as a fling.
//!
//! Deltas are measured against the down snapshot rather than the previous sample
//! so that precision is not lost across many small moves.
//!
//! ## Minimal example
//!
//! ```
//! use understory_bottom_sheet::{DragOwnership, GestureTracker, PointerSample, SheetState};
//!
//! let mut tracker = GestureTracker::new(8.0);
//! let down = PointerSample::down(100.0, 900.0, 0);
//! tracker.begin(&down, 300.0, SheetState::Peeked);
//! tracker.record(&down);
//!
//! // A small move stays undecided.
//! let nudge = PointerSample::moved(102.0, 896.0, 8);
//! assert_eq!(tracker.classify(&nudge), DragOwnership::Undecided);
//!
//! // Moving 20 px up claims the gesture for the sheet and re-baselines at that sample.
//! let drag = PointerSample::moved(102.0, 880.0, 16);
//! assert_eq!(tracker.classify(&drag), DragOwnership::Sheet);
//! let further = PointerSample::moved(102.0, 850.0, 24);
//! assert_eq!(tracker.candidate_offset(&further), 330.0);
//! ```

use kurbo::{Point, Vec2};

use crate::state::SheetState;
use crate::transition::TransitionKind;
use crate::velocity::VelocityTracker;

/// Phase of a pointer event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// The pointer went down; starts a gesture.
    Down,
    /// The pointer moved while down.
    Move,
    /// The pointer was released; ends a gesture.
    Up,
    /// The platform aborted the gesture.
    Cancel,
}

/// One pointer event in container coordinates (or content-local, once redispatched).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerSample {
    /// Event phase.
    pub phase: PointerPhase,
    /// Position; y grows downward.
    pub position: Point,
    /// Monotonic timestamp in milliseconds.
    pub time_ms: u64,
}

impl PointerSample {
    /// Creates a sample.
    #[must_use]
    pub fn new(phase: PointerPhase, position: Point, time_ms: u64) -> Self {
        Self {
            phase,
            position,
            time_ms,
        }
    }

    /// A pointer-down at `(x, y)`.
    #[must_use]
    pub fn down(x: f64, y: f64, time_ms: u64) -> Self {
        Self::new(PointerPhase::Down, Point::new(x, y), time_ms)
    }

    /// A pointer-move to `(x, y)`.
    #[must_use]
    pub fn moved(x: f64, y: f64, time_ms: u64) -> Self {
        Self::new(PointerPhase::Move, Point::new(x, y), time_ms)
    }

    /// A pointer-up at `(x, y)`.
    #[must_use]
    pub fn up(x: f64, y: f64, time_ms: u64) -> Self {
        Self::new(PointerPhase::Up, Point::new(x, y), time_ms)
    }

    /// A cancel at `(x, y)`.
    #[must_use]
    pub fn cancel(x: f64, y: f64, time_ms: u64) -> Self {
        Self::new(PointerPhase::Cancel, Point::new(x, y), time_ms)
    }

    /// The same event with a different phase.
    #[must_use]
    pub fn with_phase(self, phase: PointerPhase) -> Self {
        Self { phase, ..self }
    }

    /// The same event at a different position.
    #[must_use]
    pub fn with_position(self, position: Point) -> Self {
        Self { position, ..self }
    }
}

/// What was true when the pointer went down.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GestureSnapshot {
    /// Down position, moved forward whenever the gesture is re-baselined.
    pub down: Point,
    /// Sheet offset at down (or at the last re-baseline).
    pub offset: f64,
    /// Sheet state at down.
    pub state: SheetState,
}

/// Who handles the movement of the current gesture.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragOwnership {
    /// Neither axis has exceeded the touch slop yet.
    #[default]
    Undecided,
    /// Vertical movement won: the sheet drags.
    Sheet,
    /// Horizontal movement won: the gesture goes to the nested content.
    Content,
}

/// Per-gesture tracking state.
#[derive(Clone, Debug)]
pub struct GestureTracker {
    snapshot: Option<GestureSnapshot>,
    ownership: DragOwnership,
    velocity: VelocityTracker,
    touch_slop: f64,
}

impl GestureTracker {
    /// Creates a tracker with the given touch slop.
    #[must_use]
    pub fn new(touch_slop: f64) -> Self {
        Self {
            snapshot: None,
            ownership: DragOwnership::Undecided,
            velocity: VelocityTracker::new(),
            touch_slop,
        }
    }

    /// Starts a new gesture. Nothing from earlier gestures survives.
    pub fn begin(&mut self, sample: &PointerSample, offset: f64, state: SheetState) {
        self.snapshot = Some(GestureSnapshot {
            down: sample.position,
            offset,
            state,
        });
        self.ownership = DragOwnership::Undecided;
        self.velocity.clear();
    }

    /// Feeds a sample to the velocity estimator.
    pub fn record(&mut self, sample: &PointerSample) {
        self.velocity.add(sample.time_ms, sample.position.y);
    }

    /// Forgets the current gesture.
    pub fn reset(&mut self) {
        self.snapshot = None;
        self.ownership = DragOwnership::Undecided;
        self.velocity.clear();
    }

    /// The snapshot of the current gesture.
    #[must_use]
    pub fn snapshot(&self) -> Option<&GestureSnapshot> {
        self.snapshot.as_ref()
    }

    /// Current ownership.
    #[must_use]
    pub fn ownership(&self) -> DragOwnership {
        self.ownership
    }

    /// Movement from the down position to `sample`, positive upward and leftward.
    #[must_use]
    pub fn delta(&self, sample: &PointerSample) -> Vec2 {
        self.snapshot
            .map_or(Vec2::ZERO, |snapshot| snapshot.down - sample.position)
    }

    /// Decides ownership if still undecided, and returns the current ownership.
    ///
    /// Vertical movement beyond the slop wins over horizontal; when the sheet
    /// claims the gesture the down position moves to `sample` so the sheet does
    /// not jump by the slop distance.
    pub fn classify(&mut self, sample: &PointerSample) -> DragOwnership {
        if self.ownership != DragOwnership::Undecided {
            return self.ownership;
        }
        let delta = self.delta(sample);
        if delta.y.abs() > self.touch_slop {
            self.ownership = DragOwnership::Sheet;
            if let Some(snapshot) = self.snapshot.as_mut() {
                snapshot.down = sample.position;
            }
            log::trace!("gesture claimed by sheet at {:?}", sample.position);
        } else if delta.x.abs() > self.touch_slop {
            self.ownership = DragOwnership::Content;
            log::trace!("gesture claimed by content at {:?}", sample.position);
        }
        self.ownership
    }

    /// Re-baselines the gesture at `sample` with the sheet at `offset`, and
    /// restarts velocity estimation as if the drag began here.
    pub fn rebaseline(&mut self, sample: &PointerSample, offset: f64) {
        if let Some(snapshot) = self.snapshot.as_mut() {
            snapshot.down.y = sample.position.y;
            snapshot.offset = offset;
        }
        self.velocity.clear();
    }

    /// Offset requested by the finger: offset at down plus upward movement.
    #[must_use]
    pub fn candidate_offset(&self, sample: &PointerSample) -> f64 {
        self.snapshot
            .map_or(0.0, |snapshot| snapshot.offset + self.delta(sample).y)
    }

    /// Vertical velocity in px/s, capped at `max` either way; negative is upward.
    #[must_use]
    pub fn velocity_y(&self, max: f64) -> f64 {
        self.velocity.velocity_with_max(max)
    }
}

/// Slows dragging below the peek offset to a quarter of finger speed.
///
/// Returns `peek - (peek - candidate) / 4` when `candidate < peek`, otherwise
/// `candidate` unchanged.
///
/// ```
/// use understory_bottom_sheet::apply_resistance;
///
/// assert_eq!(apply_resistance(0.0, 200.0), 150.0);
/// assert_eq!(apply_resistance(260.0, 200.0), 260.0);
/// ```
#[must_use]
pub fn apply_resistance(candidate: f64, peek: f64) -> f64 {
    if candidate < peek {
        peek - (peek - candidate) / 4.0
    } else {
        candidate
    }
}

/// Chooses where a released, non-dismissing drag settles.
///
/// Slower than `min_fling_velocity`: expand when `offset` is strictly past half the
/// container height, peek otherwise (ties peek). Otherwise by direction: upward
/// (negative) velocity expands, downward peeks.
///
/// ```
/// use understory_bottom_sheet::{resolve_release, TransitionKind};
///
/// assert_eq!(resolve_release(-80.0, 50.0, 10.0, 1000.0), TransitionKind::Expand);
/// assert_eq!(resolve_release(5.0, 50.0, 500.0, 1000.0), TransitionKind::Peek);
/// ```
#[must_use]
pub fn resolve_release(
    velocity_y: f64,
    min_fling_velocity: f64,
    offset: f64,
    container_height: f64,
) -> TransitionKind {
    if velocity_y.abs() < min_fling_velocity {
        if offset > container_height / 2.0 {
            TransitionKind::Expand
        } else {
            TransitionKind::Peek
        }
    } else if velocity_y < 0.0 {
        TransitionKind::Expand
    } else {
        TransitionKind::Peek
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_at(offset: f64, state: SheetState) -> GestureTracker {
        let mut tracker = GestureTracker::new(8.0);
        let down = PointerSample::down(50.0, 500.0, 0);
        tracker.begin(&down, offset, state);
        tracker.record(&down);
        tracker
    }

    #[test]
    fn begin_resets_everything() {
        let mut tracker = tracker_at(100.0, SheetState::Peeked);
        tracker.classify(&PointerSample::moved(50.0, 400.0, 10));
        tracker.record(&PointerSample::moved(50.0, 400.0, 10));
        assert_eq!(tracker.ownership(), DragOwnership::Sheet);

        let down = PointerSample::down(10.0, 10.0, 100);
        tracker.begin(&down, 42.0, SheetState::Expanded);
        assert_eq!(tracker.ownership(), DragOwnership::Undecided);
        assert_eq!(tracker.velocity_y(8_000.0), 0.0);
        assert_eq!(
            tracker.snapshot(),
            Some(&GestureSnapshot {
                down: Point::new(10.0, 10.0),
                offset: 42.0,
                state: SheetState::Expanded,
            })
        );
    }

    #[test]
    fn movement_within_slop_is_undecided() {
        let mut tracker = tracker_at(100.0, SheetState::Peeked);
        assert_eq!(
            tracker.classify(&PointerSample::moved(58.0, 492.0, 5)),
            DragOwnership::Undecided
        );
    }

    #[test]
    fn vertical_wins_over_horizontal() {
        let mut tracker = tracker_at(100.0, SheetState::Peeked);
        assert_eq!(
            tracker.classify(&PointerSample::moved(80.0, 470.0, 5)),
            DragOwnership::Sheet
        );
        // Re-baselined: no jump by the slop distance.
        assert_eq!(
            tracker.candidate_offset(&PointerSample::moved(80.0, 470.0, 5)),
            100.0
        );
    }

    #[test]
    fn horizontal_movement_goes_to_content_and_sticks() {
        let mut tracker = tracker_at(100.0, SheetState::Peeked);
        assert_eq!(
            tracker.classify(&PointerSample::moved(70.0, 502.0, 5)),
            DragOwnership::Content
        );
        assert_eq!(
            tracker.classify(&PointerSample::moved(70.0, 300.0, 10)),
            DragOwnership::Content
        );
    }

    #[test]
    fn candidate_follows_finger_upward() {
        let mut tracker = tracker_at(100.0, SheetState::Peeked);
        tracker.classify(&PointerSample::moved(50.0, 480.0, 5));
        assert_eq!(
            tracker.candidate_offset(&PointerSample::moved(50.0, 430.0, 10)),
            150.0
        );
        assert_eq!(
            tracker.candidate_offset(&PointerSample::moved(50.0, 530.0, 10)),
            50.0
        );
    }

    #[test]
    fn rebaseline_moves_origin_and_clears_velocity() {
        let mut tracker = tracker_at(100.0, SheetState::Expanded);
        tracker.classify(&PointerSample::moved(50.0, 480.0, 5));
        tracker.record(&PointerSample::moved(50.0, 480.0, 5));
        tracker.record(&PointerSample::moved(50.0, 470.0, 10));
        tracker.rebaseline(&PointerSample::moved(50.0, 470.0, 10), 300.0);
        assert_eq!(tracker.velocity_y(8_000.0), 0.0);
        assert_eq!(
            tracker.candidate_offset(&PointerSample::moved(50.0, 480.0, 15)),
            290.0
        );
    }

    #[test]
    fn untracked_gesture_has_no_delta() {
        let tracker = GestureTracker::new(8.0);
        assert_eq!(
            tracker.delta(&PointerSample::moved(1.0, 2.0, 0)),
            Vec2::ZERO
        );
    }

    #[test]
    fn resistance_quarter_speed_below_peek() {
        assert_eq!(apply_resistance(0.0, 200.0), 150.0);
        assert_eq!(apply_resistance(200.0, 200.0), 200.0);
        let near = apply_resistance(199.0, 200.0);
        assert!(near > 199.0 && near < 200.0);
        let far = apply_resistance(-400.0, 200.0);
        assert_eq!(far, 50.0);
    }

    #[test]
    fn fast_upward_release_expands_regardless_of_position() {
        assert_eq!(resolve_release(-80.0, 50.0, 1.0, 1000.0), TransitionKind::Expand);
    }

    #[test]
    fn fast_downward_release_peeks_regardless_of_position() {
        assert_eq!(resolve_release(80.0, 50.0, 999.0, 1000.0), TransitionKind::Peek);
    }

    #[test]
    fn slow_release_at_exact_midpoint_peeks() {
        assert_eq!(resolve_release(5.0, 50.0, 500.0, 1000.0), TransitionKind::Peek);
        assert_eq!(resolve_release(5.0, 50.0, 500.1, 1000.0), TransitionKind::Expand);
    }

    #[test]
    fn threshold_velocity_counts_as_fling() {
        assert_eq!(resolve_release(-50.0, 50.0, 0.0, 1000.0), TransitionKind::Expand);
    }
}
