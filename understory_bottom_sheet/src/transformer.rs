// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View transformers: offset-driven visual side effects.
//!
//! A [`ViewTransformer`] maps the sheet's current offset to the opacity of the dim
//! layer drawn over the underlying content, and gets a hook to apply any other
//! offset-driven transform (scaling the background, parallax, and so on).
//!
//! Both methods are invoked on every offset change, so they must be deterministic
//! for a given [`TransformContext`].
//!
//! ```
//! use kurbo::Size;
//! use understory_bottom_sheet::{DimTransformer, TransformContext, ViewTransformer};
//!
//! let ctx = TransformContext {
//!     offset: 500.0,
//!     max_offset: 1000.0,
//!     peek_offset: 400.0,
//!     container: Size::new(600.0, 1000.0),
//!     content_height: 1000.0,
//! };
//! assert_eq!(DimTransformer::default().dim_alpha(&ctx), 0.35);
//! ```

use kurbo::Size;

/// Opacity of the dim layer when the sheet is at its maximum offset.
pub const MAX_DIM_ALPHA: f64 = 0.7;

/// Inputs to a [`ViewTransformer`] for one offset value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransformContext {
    /// Current sheet offset.
    pub offset: f64,
    /// Maximum offset for the current content.
    pub max_offset: f64,
    /// Offset of the peeked state.
    pub peek_offset: f64,
    /// Size of the container hosting the sheet.
    pub container: Size,
    /// Measured height of the presented content.
    pub content_height: f64,
}

impl TransformContext {
    /// Fraction of the maximum offset reached, in `[0, 1]`.
    ///
    /// Returns `0` when the maximum offset is not positive.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.max_offset > 0.0 {
            (self.offset / self.max_offset).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Maps sheet offsets to visual effects on the content beneath the sheet.
pub trait ViewTransformer {
    /// Opacity of the dim layer for this offset.
    ///
    /// Defaults to a linear ramp reaching [`MAX_DIM_ALPHA`] at the maximum offset.
    fn dim_alpha(&self, ctx: &TransformContext) -> f64 {
        ctx.progress() * MAX_DIM_ALPHA
    }

    /// Applies any additional offset-driven transform. Defaults to doing nothing.
    fn transform_view(&mut self, ctx: &TransformContext) {
        let _ = ctx;
    }
}

/// The default transformer: linear dim, no other transform.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DimTransformer {
    max_alpha: Option<f64>,
}

impl DimTransformer {
    /// Creates a linear dim transformer peaking at `max_alpha` instead of [`MAX_DIM_ALPHA`].
    #[must_use]
    pub fn with_max_alpha(max_alpha: f64) -> Self {
        Self {
            max_alpha: Some(max_alpha.clamp(0.0, 1.0)),
        }
    }
}

impl ViewTransformer for DimTransformer {
    fn dim_alpha(&self, ctx: &TransformContext) -> f64 {
        ctx.progress() * self.max_alpha.unwrap_or(MAX_DIM_ALPHA)
    }
}
