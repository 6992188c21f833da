// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sheet configuration and validation.
//!
//! [`SheetConfig`] carries the platform thresholds (touch slop, fling velocity),
//! animation timing, and the behavioral toggles of a sheet. All fields are public
//! and have defaults matching common touch platforms; use the `with_*` helpers to
//! override individual values and [`SheetConfig::validate`] to check them.
//!
//! ```
//! use understory_bottom_sheet::{SheetConfig, TabletLayout};
//!
//! let config = SheetConfig::default()
//!     .with_touch_slop(12.0)
//!     .with_tablet(TabletLayout::new(480.0));
//! assert!(config.validate().is_ok());
//! ```

use core::fmt;

/// Size of the physical display, used to derive the default peek keyline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DisplayMetrics {
    /// Display width in logical pixels.
    pub width: f64,
    /// Display height in logical pixels.
    pub height: f64,
}

impl DisplayMetrics {
    /// Creates display metrics from a width and height.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Offset at which a sheet taller than this keyline rests when peeked.
    ///
    /// Leaves a 16:9 region of the display above the sheet. Saturates at zero
    /// for landscape displays.
    #[must_use]
    pub fn default_peek_keyline(&self) -> f64 {
        (self.height - self.width / (16.0 / 9.0)).max(0.0)
    }
}

/// Fixed-width, horizontally centered sheet layout for wide screens.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TabletLayout {
    /// Width of the sheet in logical pixels.
    pub sheet_width: f64,
}

impl TabletLayout {
    /// Creates a tablet layout with the given sheet width.
    #[must_use]
    pub const fn new(sheet_width: f64) -> Self {
        Self { sheet_width }
    }
}

/// Behavior and timing configuration for a [`BottomSheet`](crate::BottomSheet).
#[derive(Clone, Debug, PartialEq)]
pub struct SheetConfig {
    /// Distance a pointer must travel before a gesture is assigned an owner.
    pub touch_slop: f64,
    /// Release velocity (px/s) below which the resting state is picked by position.
    pub min_fling_velocity: f64,
    /// Release velocities (px/s) are capped at this magnitude.
    pub max_fling_velocity: f64,
    /// Duration of every peek, expand, and dismiss transition.
    pub animation_duration_ms: u64,
    /// Factor of the decelerate interpolator, `1 - (1 - t)^(2 * factor)`.
    pub decelerate_factor: f64,
    /// Whether touches outside the sheet are intercepted (and dismiss it on release).
    pub intercept_content_touch: bool,
    /// Whether the content beneath the sheet is dimmed.
    pub dim_content: bool,
    /// Whether layer hints are sent to the content around transitions.
    pub use_layer_while_animating: bool,
    /// Whether a back request while expanded returns to peek instead of dismissing.
    pub peek_on_dismiss: bool,
    /// Fixed-width layout for wide screens; `None` uses the full container width.
    pub tablet: Option<TabletLayout>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            touch_slop: 8.0,
            min_fling_velocity: 50.0,
            max_fling_velocity: 8_000.0,
            animation_duration_ms: 250,
            decelerate_factor: 1.6,
            intercept_content_touch: true,
            dim_content: true,
            use_layer_while_animating: true,
            peek_on_dismiss: false,
            tablet: None,
        }
    }
}

impl SheetConfig {
    /// Sets the touch slop.
    #[must_use]
    pub fn with_touch_slop(mut self, touch_slop: f64) -> Self {
        self.touch_slop = touch_slop;
        self
    }

    /// Sets the minimum fling velocity.
    #[must_use]
    pub fn with_min_fling_velocity(mut self, velocity: f64) -> Self {
        self.min_fling_velocity = velocity;
        self
    }

    /// Sets the maximum fling velocity.
    #[must_use]
    pub fn with_max_fling_velocity(mut self, velocity: f64) -> Self {
        self.max_fling_velocity = velocity;
        self
    }

    /// Sets the transition duration in milliseconds.
    #[must_use]
    pub fn with_animation_duration_ms(mut self, duration_ms: u64) -> Self {
        self.animation_duration_ms = duration_ms;
        self
    }

    /// Sets whether a back request while expanded peeks instead of dismissing.
    #[must_use]
    pub fn with_peek_on_dismiss(mut self, peek_on_dismiss: bool) -> Self {
        self.peek_on_dismiss = peek_on_dismiss;
        self
    }

    /// Enables the fixed-width tablet layout.
    #[must_use]
    pub fn with_tablet(mut self, tablet: TabletLayout) -> Self {
        self.tablet = Some(tablet);
        self
    }

    /// Checks that every numeric field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.touch_slop.is_finite() || self.touch_slop < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "touch_slop",
                value: self.touch_slop,
            });
        }
        if !self.min_fling_velocity.is_finite() || self.min_fling_velocity < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "min_fling_velocity",
                value: self.min_fling_velocity,
            });
        }
        if !self.max_fling_velocity.is_finite()
            || self.max_fling_velocity <= 0.0
            || self.max_fling_velocity < self.min_fling_velocity
        {
            return Err(ConfigError::InvalidValue {
                field: "max_fling_velocity",
                value: self.max_fling_velocity,
            });
        }
        if self.animation_duration_ms == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if !self.decelerate_factor.is_finite() || self.decelerate_factor <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "decelerate_factor",
                value: self.decelerate_factor,
            });
        }
        if let Some(tablet) = self.tablet {
            if !tablet.sheet_width.is_finite() || tablet.sheet_width <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: "tablet.sheet_width",
                    value: tablet.sheet_width,
                });
            }
        }
        Ok(())
    }
}

/// A [`SheetConfig`] field holds a value the sheet cannot work with.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A numeric field is negative, non-finite, or otherwise out of range.
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// `animation_duration_ms` is zero.
    ZeroDuration,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, value } => {
                write!(f, "invalid sheet configuration: `{field}` = {value}")
            }
            Self::ZeroDuration => f.write_str("invalid sheet configuration: zero animation duration"),
        }
    }
}

impl core::error::Error for ConfigError {}
