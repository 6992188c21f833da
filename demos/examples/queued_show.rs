// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Queued presentations.
//!
//! Showing a second sheet while one is presented dismisses the first and shows the
//! second only once that dismissal has finished. Content that grows to full height
//! while peeked is promoted to expanded.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example queued_show`

use kurbo::Size;
use understory_bottom_sheet::{BottomSheet, DisplayMetrics, SheetState};
use understory_demos::{Host, LoggingPanel};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut sheet = BottomSheet::new(DisplayMetrics::new(720.0, 1280.0));
    sheet.set_container(Size::new(720.0, 1280.0), 0.0);

    let mut host = Host::default();
    sheet.show(LoggingPanel::new("share", 500.0), None);
    host.draw_until_idle(&mut sheet);

    sheet.show(LoggingPanel::new("details", 300.0), None);
    log::info!(
        "still presenting {:?} while it dismisses",
        sheet.content().map(|c| c.name)
    );
    host.draw_until_idle(&mut sheet);
    host.draw_until_idle(&mut sheet);
    assert_eq!(sheet.content().map(|c| c.name), Some("details"));

    if let Some(panel) = sheet.content_mut() {
        panel.height = 1280.0;
    }
    sheet.content_layout_changed();
    log::info!("after growing: state={} offset={}", sheet.state(), sheet.offset());
    assert_eq!(sheet.state(), SheetState::Expanded);

    assert!(sheet.handle_back());
    host.draw_until_idle(&mut sheet);
}
