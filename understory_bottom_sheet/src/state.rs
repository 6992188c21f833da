// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation states of a bottom sheet.

use core::fmt;

/// The canonical presentation state of a [`BottomSheet`](crate::BottomSheet).
///
/// ```text
/// Hidden ──show──▶ Preparing ──first frame──▶ Peeked ◀──▶ Expanded
///   ▲                                           │            │
///   └──────────────── dismiss completes ◀───────┴────────────┘
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SheetState {
    /// Nothing is presented. Initial state, and re-entered after every dismissal.
    #[default]
    Hidden,
    /// A show was requested and the content has not been drawn yet.
    Preparing,
    /// Resting partially raised, at the peek offset.
    Peeked,
    /// Resting fully raised, at the maximum offset.
    Expanded,
}

impl SheetState {
    /// Returns `true` for every state except [`SheetState::Hidden`].
    #[must_use]
    pub fn is_showing(self) -> bool {
        self != Self::Hidden
    }

    /// Returns `true` for the two states a sheet can rest in while presented.
    #[must_use]
    pub fn is_resting(self) -> bool {
        matches!(self, Self::Peeked | Self::Expanded)
    }
}

impl fmt::Display for SheetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hidden => "hidden",
            Self::Preparing => "preparing",
            Self::Peeked => "peeked",
            Self::Expanded => "expanded",
        };
        f.write_str(name)
    }
}
