// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sheet geometry: derived extents from container and content measurements.
//!
//! Offsets are measured from the bottom edge of the container, growing toward
//! the top. An offset of `0` is fully hidden; the sheet's top edge sits at
//! `container.height - offset` in container coordinates.
//!
//! ## Rules
//!
//! - `max_offset` is `container.height - top_padding` when the content exactly fills
//!   the container (or no content is attached), otherwise the content height.
//! - `peek_offset` is the custom peek when one is set, otherwise the smaller of the
//!   content height and the display's default peek keyline.
//! - With a [`TabletLayout`], a fixed-width sheet is centered horizontally and touches
//!   outside that band count as outside the sheet.
//!
//! Every result saturates: nothing is negative and nothing exceeds the container.
//!
//! ```
//! use kurbo::Size;
//! use understory_bottom_sheet::{DisplayMetrics, SheetGeometry};
//!
//! let mut geometry = SheetGeometry::new(DisplayMetrics::new(400.0, 1000.0), None);
//! geometry.set_container(Size::new(400.0, 1000.0), 24.0);
//!
//! geometry.set_content_height(Some(1000.0));
//! assert_eq!(geometry.max_offset(), 976.0);
//!
//! geometry.set_content_height(Some(300.0));
//! assert_eq!(geometry.max_offset(), 300.0);
//! assert_eq!(geometry.peek_offset(), 300.0);
//! ```

use kurbo::{Point, Rect, Size};

use crate::config::{DisplayMetrics, TabletLayout};

/// Derived sheet extents for the current container and content measurements.
#[derive(Clone, Debug)]
pub struct SheetGeometry {
    container: Size,
    top_padding: f64,
    content_height: Option<f64>,
    custom_peek: f64,
    peek_keyline: f64,
    tablet: Option<TabletLayout>,
    tablet_bounds_applied: bool,
    sheet_start_x: f64,
    sheet_end_x: f64,
}

impl SheetGeometry {
    /// Creates geometry for a display, initially using the display as the container.
    #[must_use]
    pub fn new(display: DisplayMetrics, tablet: Option<TabletLayout>) -> Self {
        Self {
            container: Size::new(display.width.max(0.0), display.height.max(0.0)),
            top_padding: 0.0,
            content_height: None,
            custom_peek: 0.0,
            peek_keyline: display.default_peek_keyline(),
            tablet,
            tablet_bounds_applied: false,
            sheet_start_x: 0.0,
            sheet_end_x: display.width.max(0.0),
        }
    }

    /// Updates the container size and its top padding.
    pub fn set_container(&mut self, size: Size, top_padding: f64) {
        let width_changed = self.container.width != size.width;
        self.container = Size::new(size.width.max(0.0), size.height.max(0.0));
        self.top_padding = top_padding.clamp(0.0, self.container.height);
        if width_changed {
            if self.tablet_bounds_applied {
                self.apply_tablet_bounds();
            } else {
                self.reset_horizontal_bounds();
            }
        }
    }

    /// Returns the container size.
    #[must_use]
    pub fn container(&self) -> Size {
        self.container
    }

    /// Sets the measured height of the attached content, or `None` when detached.
    pub fn set_content_height(&mut self, height: Option<f64>) {
        self.content_height = height.map(|h| h.max(0.0));
    }

    /// Returns the measured content height, if content is attached.
    #[must_use]
    pub fn content_height(&self) -> Option<f64> {
        self.content_height
    }

    /// The default peek keyline derived from the display at construction.
    #[must_use]
    pub fn peek_keyline(&self) -> f64 {
        self.peek_keyline
    }

    /// Returns `true` when the content fills the whole container, or is absent.
    #[must_use]
    pub fn is_full_height(&self) -> bool {
        self.content_height
            .is_none_or(|height| height == self.container.height)
    }

    /// The largest offset the sheet may reach.
    #[must_use]
    pub fn max_offset(&self) -> f64 {
        match self.content_height {
            Some(height) if height != self.container.height => {
                height.clamp(0.0, self.container.height)
            }
            _ => (self.container.height - self.top_padding).max(0.0),
        }
    }

    /// The peek offset used when no custom peek is set.
    #[must_use]
    pub fn default_peek_offset(&self) -> f64 {
        match self.content_height {
            Some(height) if height <= self.peek_keyline => height,
            _ => self.peek_keyline,
        }
    }

    /// The offset of the peeked resting state.
    #[must_use]
    pub fn peek_offset(&self) -> f64 {
        if self.custom_peek != 0.0 {
            self.custom_peek
        } else {
            self.default_peek_offset()
        }
    }

    /// Sets a custom peek offset. `0` restores the default.
    ///
    /// Negative and non-finite values are treated as `0`.
    pub fn set_custom_peek(&mut self, peek: f64) {
        self.custom_peek = if peek.is_finite() { peek.max(0.0) } else { 0.0 };
    }

    /// Returns `true` when a tablet layout is configured.
    #[must_use]
    pub fn has_tablet_bounds(&self) -> bool {
        self.tablet.is_some()
    }

    /// Centers the fixed-width tablet sheet; no-op without a tablet layout.
    pub fn apply_tablet_bounds(&mut self) {
        if let Some(tablet) = self.tablet {
            let width = self.container.width;
            let spacing = (width - tablet.sheet_width).max(0.0);
            self.sheet_start_x = spacing / 2.0;
            self.sheet_end_x = width - self.sheet_start_x;
            self.tablet_bounds_applied = true;
        }
    }

    /// Resets the horizontal bounds to the full container width.
    pub fn reset_horizontal_bounds(&mut self) {
        self.tablet_bounds_applied = false;
        self.sheet_start_x = 0.0;
        self.sheet_end_x = self.container.width;
    }

    /// Returns the horizontal `(start, end)` band occupied by the sheet.
    #[must_use]
    pub fn horizontal_bounds(&self) -> (f64, f64) {
        (self.sheet_start_x, self.sheet_end_x)
    }

    /// Returns `true` when `x` falls inside the sheet's horizontal band.
    ///
    /// Without a tablet layout the whole width is sheet.
    #[must_use]
    pub fn is_x_in_sheet(&self, x: f64) -> bool {
        !self.has_tablet_bounds() || (x >= self.sheet_start_x && x <= self.sheet_end_x)
    }

    /// The y coordinate of the sheet's top edge for `offset`.
    #[must_use]
    pub fn sheet_top(&self, offset: f64) -> f64 {
        self.container.height - offset
    }

    /// Returns `true` when `point` lies above the sheet or beside it.
    #[must_use]
    pub fn is_outside_sheet(&self, point: Point, offset: f64) -> bool {
        point.y < self.sheet_top(offset) || !self.is_x_in_sheet(point.x)
    }

    /// Returns `true` when `point` lies strictly below the sheet's top edge and
    /// within its horizontal band.
    #[must_use]
    pub fn is_on_sheet(&self, point: Point, offset: f64) -> bool {
        point.y > self.sheet_top(offset) && self.is_x_in_sheet(point.x)
    }

    /// Converts a container point into the content's local coordinate space.
    #[must_use]
    pub fn to_content(&self, point: Point, offset: f64) -> Point {
        let dx = if self.has_tablet_bounds() {
            self.sheet_start_x
        } else {
            0.0
        };
        Point::new(point.x - dx, point.y - self.sheet_top(offset))
    }

    /// The region of underlying content left uncovered by the sheet at `offset`.
    #[must_use]
    pub fn content_clip(&self, offset: f64) -> Rect {
        let bottom = (self.container.height - libm::ceil(offset)).max(0.0);
        Rect::new(0.0, 0.0, self.container.width, bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> SheetGeometry {
        let mut geometry = SheetGeometry::new(DisplayMetrics::new(900.0, 1600.0), None);
        geometry.set_container(Size::new(900.0, 1600.0), 40.0);
        geometry
    }

    #[test]
    fn full_height_content_is_capped_below_padding() {
        let mut g = geometry();
        g.set_content_height(Some(1600.0));
        assert!(g.is_full_height());
        assert_eq!(g.max_offset(), 1560.0);
    }

    #[test]
    fn shorter_content_caps_at_its_own_height() {
        let mut g = geometry();
        g.set_content_height(Some(700.0));
        assert!(!g.is_full_height());
        assert_eq!(g.max_offset(), 700.0);
    }

    #[test]
    fn absent_content_behaves_as_full_height() {
        let g = geometry();
        assert!(g.is_full_height());
        assert_eq!(g.max_offset(), 1560.0);
        assert_eq!(g.default_peek_offset(), g.peek_keyline());
    }

    #[test]
    fn default_peek_is_min_of_content_and_keyline() {
        let mut g = geometry();
        // 1600 - 900 / (16 / 9) = 1093.75
        let keyline = g.peek_keyline();
        assert!((keyline - 1093.75).abs() < 1e-9);

        g.set_content_height(Some(500.0));
        assert_eq!(g.peek_offset(), 500.0);

        g.set_content_height(Some(1400.0));
        assert_eq!(g.peek_offset(), keyline);
    }

    #[test]
    fn custom_peek_overrides_and_zero_restores() {
        let mut g = geometry();
        g.set_content_height(Some(1400.0));
        g.set_custom_peek(200.0);
        assert_eq!(g.peek_offset(), 200.0);
        g.set_custom_peek(0.0);
        assert_eq!(g.peek_offset(), g.peek_keyline());
        g.set_custom_peek(-5.0);
        assert_eq!(g.peek_offset(), g.peek_keyline());
    }

    #[test]
    fn without_tablet_every_x_is_in_sheet() {
        let g = geometry();
        assert!(g.is_x_in_sheet(-10.0));
        assert!(g.is_x_in_sheet(5000.0));
    }

    #[test]
    fn tablet_bounds_center_the_sheet() {
        let mut g = SheetGeometry::new(
            DisplayMetrics::new(1200.0, 800.0),
            Some(TabletLayout::new(600.0)),
        );
        g.apply_tablet_bounds();
        assert_eq!(g.horizontal_bounds(), (300.0, 900.0));
        assert!(g.is_x_in_sheet(300.0));
        assert!(!g.is_x_in_sheet(299.0));
        assert!(!g.is_x_in_sheet(901.0));

        let local = g.to_content(Point::new(350.0, 700.0), 200.0);
        assert_eq!(local, Point::new(50.0, 100.0));

        g.reset_horizontal_bounds();
        assert_eq!(g.horizontal_bounds(), (0.0, 1200.0));
    }

    #[test]
    fn tablet_wider_than_container_saturates() {
        let mut g = SheetGeometry::new(
            DisplayMetrics::new(400.0, 800.0),
            Some(TabletLayout::new(600.0)),
        );
        g.apply_tablet_bounds();
        assert_eq!(g.horizontal_bounds(), (0.0, 400.0));
    }

    #[test]
    fn outside_checks_use_sheet_top() {
        let g = geometry();
        // Sheet top at 1600 - 400 = 1200.
        assert!(g.is_outside_sheet(Point::new(10.0, 1100.0), 400.0));
        assert!(!g.is_outside_sheet(Point::new(10.0, 1300.0), 400.0));
        assert!(g.is_on_sheet(Point::new(10.0, 1300.0), 400.0));
        assert!(!g.is_on_sheet(Point::new(10.0, 1200.0), 400.0));
    }

    #[test]
    fn clip_rounds_offset_up() {
        let g = geometry();
        assert_eq!(g.content_clip(99.2), Rect::new(0.0, 0.0, 900.0, 1500.0));
        assert_eq!(g.content_clip(0.0), Rect::new(0.0, 0.0, 900.0, 1600.0));
    }
}
