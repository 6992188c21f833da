// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless bottom sheet.
//!
//! Show a sheet, drag it to expanded and back, then dismiss it by tapping above it.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example headless_sheet`

use std::rc::Rc;

use kurbo::Size;
use understory_bottom_sheet::{BottomSheet, DisplayMetrics, PointerSample, SheetState};
use understory_demos::{Host, LoggingPanel};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut sheet = BottomSheet::new(DisplayMetrics::new(1080.0, 1920.0));
    sheet.set_container(Size::new(1080.0, 1920.0), 72.0);
    sheet.set_peek_offset(600.0);

    sheet.add_state_listener(Rc::new(|state: SheetState| {
        log::info!("listener: state is now {state}");
    }));
    sheet.add_dismiss_listener(Rc::new(|| log::info!("listener: dismissed")));

    let mut host = Host::default();
    sheet.show(LoggingPanel::new("menu", 1400.0), None);
    host.draw_until_idle(&mut sheet);

    // Drag up well past the top of the content: the sheet expands.
    host.drag(&mut sheet, 540.0, 1700.0, 200.0, 12);
    host.draw_until_idle(&mut sheet);

    // Drag down from the top of the content: the sheet detaches and returns to peek.
    host.drag(&mut sheet, 540.0, 700.0, 1200.0, 12);
    host.draw_until_idle(&mut sheet);

    // Tap above the sheet.
    host.idle(10);
    sheet.handle_pointer(PointerSample::down(540.0, 300.0, host.now()));
    host.idle(1);
    sheet.handle_pointer(PointerSample::up(540.0, 300.0, host.now()));
    host.draw_until_idle(&mut sheet);

    assert_eq!(sheet.state(), SheetState::Hidden);
}
