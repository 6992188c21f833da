// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The presentation state machine.
//!
//! [`BottomSheet`] owns the canonical [`SheetState`], the single offset value, and
//! the one active transition. Hosts drive it with three kinds of calls:
//!
//! - input: [`BottomSheet::handle_pointer`] and [`BottomSheet::handle_back`],
//! - frames: [`BottomSheet::on_pre_draw`] and [`BottomSheet::on_frame`],
//! - layout: [`BottomSheet::set_container`] and [`BottomSheet::content_layout_changed`].
//!
//! After any of them, [`BottomSheet::visuals`] holds what the host should draw.
//!
//! ## State changes
//!
//! - `Hidden -> Preparing` synchronously on [`BottomSheet::show`].
//! - `Preparing -> Peeked` on the first [`BottomSheet::on_pre_draw`] after showing.
//! - `Peeked <-> Expanded` from gestures or [`BottomSheet::expand`] / [`BottomSheet::peek`].
//!   The state changes when the transition starts.
//! - `* -> Hidden` when a dismiss transition completes. Cancelled transitions never
//!   finalize anything.
//!
//! Listeners are notified only when the state value actually changes.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::fmt;

use kurbo::{Rect, Size};

use crate::config::{ConfigError, DisplayMetrics, SheetConfig};
use crate::content::{LayerHint, SheetContent};
use crate::geometry::SheetGeometry;
use crate::gesture::{
    DragOwnership, GestureTracker, PointerPhase, PointerSample, apply_resistance, resolve_release,
};
use crate::listeners::{DismissListener, SheetListeners, StateListener};
use crate::state::SheetState;
use crate::transformer::{DimTransformer, TransformContext, ViewTransformer};
use crate::transition::{Interpolator, TransitionDriver, TransitionEnd, TransitionKind};

/// Lowest offset a drag can move a showing sheet to.
const MIN_DRAG_OFFSET: f64 = 1.0;

/// What the host should draw for the current offset.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SheetVisuals {
    /// Current sheet offset.
    pub offset: f64,
    /// Vertical translation of the sheet content: `container height - offset`.
    pub sheet_translation: f64,
    /// Opacity of the dim layer over the underlying content.
    pub dim_alpha: f64,
    /// Whether the dim layer is drawn at all.
    pub dim_visible: bool,
    /// Region of the underlying content left uncovered by the sheet.
    pub content_clip: Rect,
}

impl SheetVisuals {
    fn hidden(container: Size) -> Self {
        Self {
            offset: 0.0,
            sheet_translation: container.height,
            dim_alpha: 0.0,
            dim_visible: false,
            content_clip: Rect::from_origin_size((0.0, 0.0), container),
        }
    }
}

struct PendingShow<C> {
    content: C,
    transformer: Option<Box<dyn ViewTransformer>>,
}

/// A headless bottom sheet presenting one content at a time.
pub struct BottomSheet<C: SheetContent> {
    config: SheetConfig,
    geometry: SheetGeometry,
    state: SheetState,
    offset: f64,
    driver: TransitionDriver,
    tracker: GestureTracker,
    has_intercepted: bool,
    content: Option<C>,
    default_transformer: Box<dyn ViewTransformer>,
    transformer: Option<Box<dyn ViewTransformer>>,
    listeners: Rc<SheetListeners>,
    pending_show: Option<PendingShow<C>>,
    peek_after_draw: bool,
    tracking_resize: bool,
    current_content_height: f64,
    visuals: SheetVisuals,
}

impl<C: SheetContent> fmt::Debug for BottomSheet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BottomSheet")
            .field("state", &self.state)
            .field("offset", &self.offset)
            .field("config", &self.config)
            .field("geometry", &self.geometry)
            .field("driver", &self.driver)
            .field("has_content", &self.content.is_some())
            .field("has_pending_show", &self.pending_show.is_some())
            .field("visuals", &self.visuals)
            .finish_non_exhaustive()
    }
}

impl<C: SheetContent> BottomSheet<C> {
    /// Creates a hidden sheet with the default configuration.
    ///
    /// The display is used as the initial container until [`set_container`](Self::set_container)
    /// is called.
    #[must_use]
    pub fn new(display: DisplayMetrics) -> Self {
        Self::build(display, SheetConfig::default())
    }

    /// Creates a hidden sheet with a validated configuration.
    pub fn with_config(display: DisplayMetrics, config: SheetConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(display, config))
    }

    fn build(display: DisplayMetrics, config: SheetConfig) -> Self {
        let geometry = SheetGeometry::new(display, config.tablet);
        let visuals = SheetVisuals::hidden(geometry.container());
        Self {
            driver: TransitionDriver::new(
                config.animation_duration_ms,
                Interpolator::Decelerate(config.decelerate_factor),
            ),
            tracker: GestureTracker::new(config.touch_slop),
            config,
            geometry,
            state: SheetState::Hidden,
            offset: 0.0,
            has_intercepted: false,
            content: None,
            default_transformer: Box::new(DimTransformer::default()),
            transformer: None,
            listeners: Rc::new(SheetListeners::default()),
            pending_show: None,
            peek_after_draw: false,
            tracking_resize: false,
            current_content_height: 0.0,
            visuals,
        }
    }

    /// The current configuration.
    #[must_use]
    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// The current geometry.
    #[must_use]
    pub fn geometry(&self) -> &SheetGeometry {
        &self.geometry
    }

    /// The current presentation state.
    #[must_use]
    pub fn state(&self) -> SheetState {
        self.state
    }

    /// The current offset.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Returns `true` unless the sheet is hidden.
    #[must_use]
    pub fn is_showing(&self) -> bool {
        self.state.is_showing()
    }

    /// Returns `true` while a transition is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.driver.is_active()
    }

    /// Returns `true` while a dismiss transition is in flight.
    #[must_use]
    pub fn is_dismissing(&self) -> bool {
        self.driver
            .active()
            .is_some_and(|t| t.kind() == TransitionKind::Dismiss)
    }

    /// The presented content, if any.
    #[must_use]
    pub fn content(&self) -> Option<&C> {
        self.content.as_ref()
    }

    /// Mutable access to the presented content, if any.
    pub fn content_mut(&mut self) -> Option<&mut C> {
        self.content.as_mut()
    }

    /// What the host should draw for the current offset.
    #[must_use]
    pub fn visuals(&self) -> &SheetVisuals {
        &self.visuals
    }

    /// Shared handle to the listener registries.
    ///
    /// Listeners may capture a clone to deregister themselves during notification.
    #[must_use]
    pub fn listeners(&self) -> Rc<SheetListeners> {
        self.listeners.clone()
    }

    /// Registers a state-change listener. Returns `false` if already registered.
    pub fn add_state_listener(&self, listener: Rc<StateListener>) -> bool {
        self.listeners.add_state_listener(listener)
    }

    /// Deregisters a state-change listener.
    pub fn remove_state_listener(&self, listener: &Rc<StateListener>) -> bool {
        self.listeners.remove_state_listener(listener)
    }

    /// Registers a dismissal listener. Returns `false` if already registered.
    pub fn add_dismiss_listener(&self, listener: Rc<DismissListener>) -> bool {
        self.listeners.add_dismiss_listener(listener)
    }

    /// Deregisters a dismissal listener.
    pub fn remove_dismiss_listener(&self, listener: &Rc<DismissListener>) -> bool {
        self.listeners.remove_dismiss_listener(listener)
    }

    /// Sets a custom peek offset; `0` restores the default.
    pub fn set_peek_offset(&mut self, peek: f64) {
        self.geometry.set_custom_peek(peek);
    }

    /// The offset of the peeked state.
    #[must_use]
    pub fn peek_offset(&self) -> f64 {
        self.geometry.peek_offset()
    }

    /// The largest offset the sheet may reach with the current content.
    #[must_use]
    pub fn max_offset(&self) -> f64 {
        self.geometry.max_offset()
    }

    /// Sets whether touches outside the sheet are intercepted and dismiss it.
    pub fn set_content_touch_interception(&mut self, intercept: bool) {
        self.config.intercept_content_touch = intercept;
    }

    /// Sets whether the underlying content is dimmed.
    pub fn set_dim_content_enabled(&mut self, enabled: bool) {
        self.config.dim_content = enabled;
    }

    /// Sets the transformer used when [`show`](Self::show) is called without one.
    pub fn set_default_transformer(&mut self, transformer: Box<dyn ViewTransformer>) {
        self.default_transformer = transformer;
    }

    /// Presents `content`.
    ///
    /// When something is already showing it is dismissed first and `content` is
    /// shown once that dismissal completes. A later show replaces a queued one,
    /// and a plain [`dismiss`](Self::dismiss) discards it.
    pub fn show(&mut self, content: C, transformer: Option<Box<dyn ViewTransformer>>) {
        if self.state != SheetState::Hidden {
            log::debug!("show requested while {}; queued behind dismissal", self.state);
            self.animate_dismiss(Some(PendingShow {
                content,
                transformer,
            }));
            return;
        }
        log::debug!("showing sheet content");
        self.set_state(SheetState::Preparing);

        if self.geometry.has_tablet_bounds() {
            self.geometry.apply_tablet_bounds();
        }
        let height = content.measured_height();
        self.geometry.set_content_height(Some(height));
        self.content = Some(content);

        self.offset = 0.0;
        self.visuals = SheetVisuals::hidden(self.geometry.container());
        self.transformer = transformer;

        self.peek_after_draw = true;
        self.current_content_height = height;
        self.tracking_resize = true;
    }

    /// Animates the sheet out. No-op when hidden, but still discards a queued show.
    pub fn dismiss(&mut self) {
        self.animate_dismiss(None);
    }

    /// Animates to the expanded state. No-op while hidden or dismissing.
    pub fn expand(&mut self) {
        if self.accepts_programmatic_transition() {
            self.animate_expand();
        }
    }

    /// Animates to the peeked state. No-op while hidden or dismissing.
    pub fn peek(&mut self) {
        if self.accepts_programmatic_transition() {
            self.animate_peek();
        }
    }

    fn accepts_programmatic_transition(&self) -> bool {
        self.content.is_some() && self.state.is_showing() && !self.is_dismissing()
    }

    /// Handles a back request. Returns `true` when consumed.
    ///
    /// An expanded sheet returns to peek when `peek_on_dismiss` is set; otherwise
    /// the sheet is dismissed.
    pub fn handle_back(&mut self) -> bool {
        if !self.is_showing() {
            return false;
        }
        if self.state == SheetState::Expanded && self.config.peek_on_dismiss {
            self.animate_peek();
        } else {
            self.dismiss();
        }
        true
    }

    /// Runs the one-shot continuation scheduled by [`show`](Self::show).
    ///
    /// Call once the newly attached content has been drawn; the first peek
    /// starts here so it never animates against stale measurements.
    pub fn on_pre_draw(&mut self) {
        if !core::mem::take(&mut self.peek_after_draw) {
            return;
        }
        if self.content.is_some() && self.state == SheetState::Preparing {
            self.animate_peek();
        } else {
            log::debug!("deferred peek skipped: content detached");
        }
    }

    /// Advances the active transition to `now_ms`.
    ///
    /// Returns `true` while another frame is needed.
    pub fn on_frame(&mut self, now_ms: u64) -> bool {
        if let Some(frame) = self.driver.tick(now_ms) {
            self.translate(frame.value);
            if let Some(end) = frame.ended {
                self.finish_transition(end);
            }
        }
        self.driver.is_active()
    }

    /// Updates the container size and top padding.
    pub fn set_container(&mut self, size: Size, top_padding: f64) {
        log::debug!("container laid out at {size:?}, top padding {top_padding}");
        self.geometry.set_container(size, top_padding);
        self.refresh_frame_visuals();
    }

    /// Re-reads the content's measured height after it laid out again.
    ///
    /// Shrinking drops an expanded sheet back to peeked and follows the new
    /// height; growing while peeked follows the new height and promotes to
    /// expanded once it reaches the maximum. Ignored once a dismissal has started.
    pub fn content_layout_changed(&mut self) {
        if !self.tracking_resize {
            return;
        }
        let Some(content) = self.content.as_ref() else {
            return;
        };
        let height = content.measured_height();
        self.geometry.set_content_height(Some(height));
        log::debug!(
            "content resized {} -> {height}",
            self.current_content_height
        );

        if self.state != SheetState::Hidden {
            if height < self.current_content_height {
                if self.state == SheetState::Expanded {
                    self.set_state(SheetState::Peeked);
                }
                self.translate(height);
            } else if self.current_content_height > 0.0
                && height > self.current_content_height
                && self.state == SheetState::Peeked
            {
                if height == self.geometry.max_offset() {
                    self.set_state(SheetState::Expanded);
                }
                self.translate(height);
            }
        }
        self.current_content_height = height;
    }

    /// The host detached the sheet: stops the active transition and forgets the gesture.
    pub fn detach(&mut self) {
        if let Some(end) = self.driver.cancel() {
            self.finish_transition(end);
        }
        self.tracker.reset();
    }

    /// Handles one pointer event in container coordinates.
    ///
    /// Returns `true` when the sheet consumed the event. Unconsumed events belong
    /// to whatever lies beneath the sheet. Events arriving while a transition is
    /// in flight are refused.
    pub fn handle_pointer(&mut self, sample: PointerSample) -> bool {
        if sample.phase == PointerPhase::Down {
            self.has_intercepted = self.is_showing()
                && (self.config.intercept_content_touch
                    || self.geometry.is_on_sheet(sample.position, self.offset));
        }
        if !self.is_showing() || self.is_animating() || !self.has_intercepted {
            if sample.phase == PointerPhase::Down {
                self.tracker.reset();
            }
            return false;
        }

        if sample.phase == PointerPhase::Down {
            self.tracker.begin(&sample, self.offset, self.state);
        } else if self.tracker.snapshot().is_none() {
            return false;
        }
        self.tracker.record(&sample);

        if self.tracker.ownership() == DragOwnership::Undecided
            && self.tracker.classify(&sample) == DragOwnership::Sheet
            && self.state == SheetState::Peeked
        {
            self.dispatch_to_content(sample.with_phase(PointerPhase::Cancel));
        }

        if self.tracker.ownership() == DragOwnership::Sheet {
            self.drag(sample);
        } else {
            let outside = self.geometry.is_outside_sheet(sample.position, self.offset);
            if sample.phase == PointerPhase::Up && outside && self.config.intercept_content_touch {
                log::debug!("released outside the sheet");
                self.dismiss();
                return true;
            }
            self.dispatch_to_content(sample);
        }
        true
    }

    fn drag(&mut self, sample: PointerSample) {
        let max = self.geometry.max_offset();
        let peek = self.geometry.peek_offset();
        let mut candidate = self.tracker.candidate_offset(&sample);

        let scrolling_down = self.tracker.delta(&sample).y < 0.0;
        if self.state == SheetState::Expanded && scrolling_down && !self.content_can_scroll_up(&sample) {
            self.tracker.rebaseline(&sample, self.offset);
            self.set_state(SheetState::Peeked);
            self.set_layer_hint(LayerHint::Offscreen);
            candidate = self.offset;
            self.dispatch_to_content(sample.with_phase(PointerPhase::Cancel));
        }

        if self.state == SheetState::Peeked && candidate > max {
            self.translate(max);
            self.dispatch_to_content(sample.with_phase(PointerPhase::Down));
            self.set_state(SheetState::Expanded);
            self.set_layer_hint(LayerHint::None);
        }

        if self.state == SheetState::Expanded {
            self.dispatch_to_content(sample);
            return;
        }

        // Only a finished dismissal may bring the offset to 0.
        let applied = apply_resistance(candidate, peek);
        self.translate(applied.max(MIN_DRAG_OFFSET));

        match sample.phase {
            PointerPhase::Cancel => {
                let down_state = self.tracker.snapshot().map(|s| s.state);
                if down_state == Some(SheetState::Expanded) {
                    self.animate_expand();
                } else {
                    self.animate_peek();
                }
            }
            PointerPhase::Up => {
                if applied < peek {
                    self.dismiss();
                } else {
                    let velocity = self.tracker.velocity_y(self.config.max_fling_velocity);
                    match resolve_release(
                        velocity,
                        self.config.min_fling_velocity,
                        self.offset,
                        self.geometry.container().height,
                    ) {
                        TransitionKind::Expand => self.animate_expand(),
                        _ => self.animate_peek(),
                    }
                }
            }
            PointerPhase::Down | PointerPhase::Move => {}
        }
    }

    fn content_can_scroll_up(&self, sample: &PointerSample) -> bool {
        let at = self.geometry.to_content(sample.position, self.offset);
        self.content
            .as_ref()
            .is_some_and(|content| content.can_scroll_up(at))
    }

    fn dispatch_to_content(&mut self, sample: PointerSample) {
        let local = self.geometry.to_content(sample.position, self.offset);
        if let Some(content) = self.content.as_mut() {
            log::trace!("redispatching {:?} to content at {local:?}", sample.phase);
            content.dispatch_pointer(sample.with_position(local));
        }
    }

    fn set_layer_hint(&mut self, hint: LayerHint) {
        if !self.config.use_layer_while_animating {
            return;
        }
        if let Some(content) = self.content.as_mut() {
            content.set_layer_hint(hint);
        }
    }

    fn set_state(&mut self, state: SheetState) {
        if state == self.state {
            return;
        }
        log::debug!("sheet state {} -> {state}", self.state);
        self.state = state;
        self.listeners.notify_state(state);
    }

    fn animate_peek(&mut self) {
        self.set_layer_hint(LayerHint::Offscreen);
        self.start_transition(TransitionKind::Peek, self.geometry.peek_offset());
        self.set_state(SheetState::Peeked);
    }

    fn animate_expand(&mut self) {
        self.set_layer_hint(LayerHint::None);
        self.start_transition(TransitionKind::Expand, self.geometry.max_offset());
        self.set_state(SheetState::Expanded);
    }

    fn animate_dismiss(&mut self, then: Option<PendingShow<C>>) {
        if self.state == SheetState::Hidden {
            self.pending_show = None;
            return;
        }
        log::debug!("dismissing sheet from {}", self.state);
        self.pending_show = then;
        self.tracking_resize = false;
        self.peek_after_draw = false;
        self.start_transition(TransitionKind::Dismiss, 0.0);
        self.geometry.reset_horizontal_bounds();
    }

    fn start_transition(&mut self, kind: TransitionKind, to: f64) {
        let (_, superseded) = self.driver.start(kind, self.offset, to);
        if let Some(end) = superseded {
            self.finish_transition(end);
        }
    }

    fn finish_transition(&mut self, end: TransitionEnd) {
        if !end.completed() {
            return;
        }
        if end.kind == TransitionKind::Dismiss {
            self.finish_dismiss();
        }
    }

    fn finish_dismiss(&mut self) {
        self.offset = 0.0;
        self.set_state(SheetState::Hidden);
        self.set_layer_hint(LayerHint::None);
        self.content = None;
        self.geometry.set_content_height(None);
        self.visuals = SheetVisuals::hidden(self.geometry.container());
        self.tracker.reset();

        log::debug!("sheet dismissed");
        self.listeners.notify_dismissed();

        self.transformer = None;
        if let Some(PendingShow {
            content,
            transformer,
        }) = self.pending_show.take()
        {
            log::debug!("running queued show");
            self.show(content, transformer);
        }
    }

    /// Moves the sheet to `offset`, clamped to `[0, max_offset]`.
    fn translate(&mut self, offset: f64) {
        self.offset = offset.min(self.geometry.max_offset()).max(0.0);
        self.refresh_frame_visuals();

        let ctx = self.transform_context();
        let transformer = self
            .transformer
            .as_deref_mut()
            .unwrap_or(self.default_transformer.as_mut());
        transformer.transform_view(&ctx);
        if self.config.dim_content {
            let alpha = transformer.dim_alpha(&ctx);
            self.visuals.dim_alpha = alpha;
            self.visuals.dim_visible = alpha > 0.0;
        }
    }

    fn refresh_frame_visuals(&mut self) {
        self.visuals.offset = self.offset;
        self.visuals.sheet_translation = self.geometry.sheet_top(self.offset);
        self.visuals.content_clip = self.geometry.content_clip(self.offset);
    }

    fn transform_context(&self) -> TransformContext {
        TransformContext {
            offset: self.offset,
            max_offset: self.geometry.max_offset(),
            peek_offset: self.geometry.peek_offset(),
            container: self.geometry.container(),
            content_height: self.geometry.content_height().unwrap_or(0.0),
        }
    }
}
