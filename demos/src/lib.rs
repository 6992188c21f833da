// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the bottom sheet demos.
//!
//! The demos run without a window: a [`Host`] plays the part of the UI framework,
//! forwarding scripted pointer events and advancing a fake frame clock.

use understory_bottom_sheet::{BottomSheet, LayerHint, PointerSample, SheetContent};

/// Frame interval of the fake clock, in milliseconds.
pub const FRAME_MS: u64 = 16;

/// Sheet content that logs what the sheet sends it.
#[derive(Debug)]
pub struct LoggingPanel {
    /// Name used in log lines.
    pub name: &'static str,
    /// Reported measured height.
    pub height: f64,
    /// Whether nested scrollable content can scroll further up.
    pub scrolled: bool,
}

impl LoggingPanel {
    /// Creates a panel that is scrolled to its top.
    pub fn new(name: &'static str, height: f64) -> Self {
        Self {
            name,
            height,
            scrolled: false,
        }
    }
}

impl SheetContent for LoggingPanel {
    fn measured_height(&self) -> f64 {
        self.height
    }

    fn dispatch_pointer(&mut self, event: PointerSample) -> bool {
        log::info!(
            "[{}] {:?} at ({:.0}, {:.0})",
            self.name,
            event.phase,
            event.position.x,
            event.position.y
        );
        true
    }

    fn can_scroll_up(&self, _at: kurbo::Point) -> bool {
        self.scrolled
    }

    fn set_layer_hint(&mut self, hint: LayerHint) {
        log::info!("[{}] layer hint {hint:?}", self.name);
    }
}

/// A fake host: owns the frame clock and forwards events.
#[derive(Debug, Default)]
pub struct Host {
    now: u64,
}

impl Host {
    /// Current timestamp in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Advances the clock by one frame without drawing.
    pub fn idle(&mut self, frames: u64) {
        self.now += frames * FRAME_MS;
    }

    /// Draws once (running the sheet's pre-draw hook) and then frames until idle.
    pub fn draw_until_idle<C: SheetContent>(&mut self, sheet: &mut BottomSheet<C>) {
        sheet.on_pre_draw();
        while sheet.on_frame(self.now) {
            self.now += FRAME_MS;
        }
        let visuals = sheet.visuals();
        log::info!(
            "settled: state={} offset={:.1} dim={:.2} clip={:?}",
            sheet.state(),
            visuals.offset,
            visuals.dim_alpha,
            visuals.content_clip
        );
    }

    /// Sends a vertical drag from `from_y` to `to_y` at `x`, one move per frame, then releases.
    pub fn drag<C: SheetContent>(
        &mut self,
        sheet: &mut BottomSheet<C>,
        x: f64,
        from_y: f64,
        to_y: f64,
        steps: u32,
    ) {
        sheet.handle_pointer(PointerSample::down(x, from_y, self.now));
        for step in 1..=steps {
            self.now += FRAME_MS;
            let y = from_y + (to_y - from_y) * f64::from(step) / f64::from(steps);
            sheet.handle_pointer(PointerSample::moved(x, y, self.now));
        }
        self.now += FRAME_MS;
        sheet.handle_pointer(PointerSample::up(x, to_y, self.now));
        log::info!(
            "released: state={} offset={:.1}",
            sheet.state(),
            sheet.offset()
        );
    }
}
