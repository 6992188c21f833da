// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_bottom_sheet --heading-base-level=0

//! Understory Bottom Sheet: a headless bottom sheet state machine.
//!
//! A bottom sheet is a panel that slides up from the bottom edge of a container.
//! It rests either *peeked* (partially raised) or *expanded* (fully raised), can be
//! dragged between the two, flung, or dragged down to be dismissed, and dims the
//! content beneath it while raised.
//!
//! This crate owns the decisions, not the pixels. A host feeds it pointer events,
//! frame ticks, and layout measurements; it answers with a single offset and the
//! [`SheetVisuals`] derived from it. The pieces:
//!
//! - **Geometry** ([`SheetGeometry`]): maximum and peek offsets from container and
//!   content measurements, plus the horizontal band of a fixed-width tablet layout.
//! - **Gestures** ([`GestureTracker`], [`VelocityTracker`]): drag ownership by touch
//!   slop, deltas against a down snapshot, impulse velocity estimation, and the
//!   [`apply_resistance`] / [`resolve_release`] decision helpers.
//! - **Transitions** ([`TransitionDriver`]): one cancellable offset animation at a
//!   time, guarded by a [`CancellationToken`].
//! - **Transformers** ([`ViewTransformer`]): offset-driven dim and custom effects.
//! - **Listeners** ([`SheetListeners`]): copy-on-write state and dismissal observers.
//! - **The sheet** ([`BottomSheet`]): the presentation state machine tying it together.
//!
//! ## Quick Start
//!
//! ```rust
//! use kurbo::Size;
//! use understory_bottom_sheet::{BottomSheet, DisplayMetrics, SheetContent, SheetState};
//!
//! struct Menu;
//!
//! impl SheetContent for Menu {
//!     fn measured_height(&self) -> f64 {
//!         600.0
//!     }
//! }
//!
//! let mut sheet = BottomSheet::new(DisplayMetrics::new(400.0, 1000.0));
//! sheet.set_container(Size::new(400.0, 1000.0), 0.0);
//! sheet.set_peek_offset(200.0);
//!
//! sheet.show(Menu, None);
//! assert_eq!(sheet.state(), SheetState::Preparing);
//!
//! // The first peek waits until the content has been drawn once.
//! sheet.on_pre_draw();
//! let mut now = 0;
//! while sheet.on_frame(now) {
//!     now += 16;
//! }
//! assert_eq!(sheet.state(), SheetState::Peeked);
//! assert_eq!(sheet.offset(), 200.0);
//!
//! sheet.dismiss();
//! while sheet.on_frame(now) {
//!     now += 16;
//! }
//! assert_eq!(sheet.state(), SheetState::Hidden);
//! assert_eq!(sheet.offset(), 0.0);
//! ```
//!
//! ## Logging
//!
//! State changes and show/dismiss requests are logged at `debug` level through the
//! [`log`] facade; transition and gesture routing details at `trace`. The crate
//! never installs a logger.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. Float math that `core` lacks comes
//! from `libm`.
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`.
//! - `libm`: forwards to `kurbo/libm` for `no_std` builds.

#![no_std]

extern crate alloc;

mod config;
mod content;
mod geometry;
mod gesture;
mod listeners;
mod sheet;
mod state;
mod transformer;
mod transition;
mod velocity;

pub use config::{ConfigError, DisplayMetrics, SheetConfig, TabletLayout};
pub use content::{LayerHint, SheetContent};
pub use geometry::SheetGeometry;
pub use gesture::{
    DragOwnership, GestureSnapshot, GestureTracker, PointerPhase, PointerSample, apply_resistance,
    resolve_release,
};
pub use listeners::{DismissListener, ListenerSet, SheetListeners, StateListener};
pub use sheet::{BottomSheet, SheetVisuals};
pub use state::SheetState;
pub use transformer::{DimTransformer, MAX_DIM_ALPHA, TransformContext, ViewTransformer};
pub use transition::{
    CancellationToken, Interpolator, Transition, TransitionDriver, TransitionEnd, TransitionFrame,
    TransitionKind,
};
pub use velocity::{ASSUME_STOPPED_MS, HORIZON_MS, VelocityTracker};
