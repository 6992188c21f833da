// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The presented content, as seen by the sheet.
//!
//! The sheet does not own a view tree. Whatever the host presents implements
//! [`SheetContent`], which answers the few questions the sheet needs (measured
//! height, whether nested scrollable content can scroll further up) and receives
//! the pointer events the sheet routes or synthesizes for it.

use kurbo::Point;

use crate::gesture::PointerSample;

/// Compositing hint for the sheet content while it moves.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayerHint {
    /// Draw normally.
    #[default]
    None,
    /// Render into an offscreen layer so that translation does not repaint.
    Offscreen,
}

/// Content presented inside a [`BottomSheet`](crate::BottomSheet).
pub trait SheetContent {
    /// Current measured height of the content in logical pixels.
    fn measured_height(&self) -> f64;

    /// Receives a pointer event in content-local coordinates.
    ///
    /// Events may be synthesized by the sheet: a `Cancel` when the sheet takes
    /// over a gesture, a `Down` when an upward drag hands scrolling over to the
    /// content. Returns whether the content consumed it.
    fn dispatch_pointer(&mut self, event: PointerSample) -> bool {
        let _ = event;
        false
    }

    /// Whether nested scrollable content under `at` (content-local) can scroll
    /// further toward its start.
    fn can_scroll_up(&self, at: Point) -> bool {
        let _ = at;
        false
    }

    /// Receives a compositing hint.
    fn set_layer_hint(&mut self, hint: LayerHint) {
        let _ = hint;
    }
}
