// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scrim compositing: the dimming overlay behind a sliding panel.
//!
//! The scrim alpha follows the slide percent along a linear curve from the
//! configured end alpha (panel nearly gone) to the start alpha (panel at
//! rest). Slide percents at or below the scrim threshold pin the alpha to the
//! end value:
//!
//! ```text
//! p'    = max(0, (percent - threshold) / (1 - threshold))
//! alpha = p' * (start_alpha - end_alpha) + end_alpha
//! ```
//!
//! The overlay is only visible in the band the panel has uncovered, so
//! [`dirty_region`] reports that band for repainting.

use kurbo::{Rect, Size, Vec2};

use crate::config::{Argb, SlideConfig};
use crate::position::SlidePosition;

/// Convert an alpha in `[0, 1]` into an 8-bit channel value.
///
/// Values outside the range saturate.
#[expect(
    clippy::cast_possible_truncation,
    reason = "the value is clamped to the u8 range before the cast"
)]
pub fn to_alpha_u8(alpha: f64) -> u8 {
    (alpha * 255.0).clamp(0.0, 255.0) as u8
}

/// Color and alpha to fill the scrim with.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrimPaint {
    /// Configured scrim color; its own alpha channel is ignored.
    pub color: Argb,
    /// Current alpha in `[0, 1]`.
    pub alpha: f64,
}

impl ScrimPaint {
    /// The scrim color with its alpha channel set from [`ScrimPaint::alpha`].
    pub fn argb(&self) -> Argb {
        self.color.with_alpha(to_alpha_u8(self.alpha))
    }
}

/// Tracks the scrim curve and the most recently applied alpha.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrimCompositor {
    color: Argb,
    start_alpha: f64,
    end_alpha: f64,
    threshold: f64,
    enabled: bool,
    alpha: f64,
}

impl ScrimCompositor {
    /// Create a compositor for `config`, starting at the start alpha.
    pub fn new(config: &SlideConfig) -> Self {
        Self {
            color: config.scrim_color(),
            start_alpha: config.scrim_start_alpha(),
            end_alpha: config.scrim_end_alpha(),
            threshold: config.scrim_threshold(),
            enabled: config.is_scrim_enabled(),
            alpha: config.scrim_start_alpha(),
        }
    }

    /// Whether [`ScrimCompositor::apply`] updates the alpha.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Alpha for a given slide `percent`, without updating state.
    ///
    /// A threshold of `1.0` leaves no room for the curve: the result is the
    /// start alpha at `percent >= 1` and the end alpha below it.
    pub fn alpha_for(&self, percent: f64) -> f64 {
        let span = 1.0 - self.threshold;
        let progress = if span > 0.0 {
            ((percent - self.threshold) / span).max(0.0)
        } else if percent >= 1.0 {
            1.0
        } else {
            0.0
        };
        progress * (self.start_alpha - self.end_alpha) + self.end_alpha
    }

    /// Recompute the alpha for `percent`.
    ///
    /// Returns the new alpha, or `None` when the scrim is disabled, in which
    /// case the previous alpha is kept.
    pub fn apply(&mut self, percent: f64) -> Option<f64> {
        if !self.enabled {
            return None;
        }
        self.alpha = self.alpha_for(percent);
        Some(self.alpha)
    }

    /// Most recently applied alpha.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Paint for the current alpha.
    pub fn paint(&self) -> ScrimPaint {
        ScrimPaint {
            color: self.color,
            alpha: self.alpha,
        }
    }
}

/// The band between the panel bounds and the leading edge of the panel that
/// the scrim covers.
///
/// `offset` is the panel's displacement from rest and `bounds` the size of
/// both the panel and the area it slides within. Bidirectional positions pick
/// the side the panel has moved away from; [`SlidePosition::Free`] uses the
/// vertical band whenever the panel is displaced vertically, and the
/// horizontal band otherwise.
///
/// The same rectangle is what a renderer fills with [`ScrimPaint`].
pub fn dirty_region(position: SlidePosition, offset: Vec2, bounds: Size) -> Rect {
    let surface = Rect::from_origin_size(offset.to_point(), bounds);
    let left = Rect::new(0.0, 0.0, surface.x0, bounds.height);
    let right = Rect::new(surface.x1, 0.0, bounds.width, bounds.height);
    let top = Rect::new(0.0, 0.0, bounds.width, surface.y0);
    let bottom = Rect::new(0.0, surface.y1, bounds.width, bounds.height);

    let horizontal = if offset.x > 0.0 { left } else { right };
    let vertical = if offset.y > 0.0 { top } else { bottom };
    match position {
        SlidePosition::Left => left,
        SlidePosition::Right => right,
        SlidePosition::Top => top,
        SlidePosition::Bottom => bottom,
        SlidePosition::Horizontal | SlidePosition::LeftFacebook => horizontal,
        SlidePosition::Vertical => vertical,
        SlidePosition::Free if offset.y != 0.0 => vertical,
        SlidePosition::Free => horizontal,
    }
}
