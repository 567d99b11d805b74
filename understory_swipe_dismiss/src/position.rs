// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slide positions and the drag policy each one applies.
//!
//! A [`SlidePosition`] names the screen edge (or edges) a panel can be dragged
//! away from. Every position answers the same questions for the controller:
//!
//! - may a drag that started here be captured ([`SlidePosition::can_capture`],
//!   [`SlidePosition::is_edge_touch`]),
//! - where may the panel legally move ([`SlidePosition::clamp`]),
//! - how far along the dismissal is it ([`SlidePosition::percent`]),
//! - where should it settle once released ([`SlidePosition::classify_release`]),
//! - is it back at rest ([`SlidePosition::is_at_rest`]).
//!
//! All offsets are measured from the panel's rest position, in the same units
//! as the panel bounds. Velocities are in those units per second.
//!
//! ## Release classification
//!
//! Releases are classified per governed axis:
//!
//! 1. A clean fling (speed above the velocity threshold while the cross-axis
//!    speed is not) in a legal dismiss direction dismisses.
//! 2. Otherwise a release moving in a legal dismiss direction, or a release
//!    with no velocity at all, dismisses when the offset is past the distance
//!    threshold on that side.
//! 3. Everything else snaps back to rest.
//!
//! ```
//! use kurbo::{Size, Vec2};
//! use understory_swipe_dismiss::{ReleaseThresholds, SlidePosition};
//!
//! let bounds = Size::new(1000.0, 2000.0);
//! let thresholds = ReleaseThresholds { velocity: 5.0, distance: 0.4 };
//!
//! // Half way across with no velocity: past the 40% threshold, so dismiss.
//! let target = SlidePosition::Left.classify_release(
//!     Vec2::new(500.0, 0.0),
//!     Vec2::ZERO,
//!     bounds,
//!     &thresholds,
//! );
//! assert_eq!(target, Vec2::new(1000.0, 0.0));
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Size, Vec2};

bitflags::bitflags! {
    /// Screen edges a drag can be initiated from.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        /// Left edge of the panel bounds.
        const LEFT   = 0b0000_0001;
        /// Right edge of the panel bounds.
        const RIGHT  = 0b0000_0010;
        /// Top edge of the panel bounds.
        const TOP    = 0b0000_0100;
        /// Bottom edge of the panel bounds.
        const BOTTOM = 0b0000_1000;
    }
}

impl Edges {
    /// Edges whose band of width `edge_size * extent` contains `point`.
    ///
    /// Each band is open on its inner side: a point exactly `edge_size * extent`
    /// away from an edge is not in that edge's band.
    pub fn touched(point: Point, bounds: Size, edge_size: f64) -> Self {
        let band_x = edge_size * bounds.width;
        let band_y = edge_size * bounds.height;
        let mut edges = Self::empty();
        edges.set(Self::LEFT, point.x < band_x);
        edges.set(Self::RIGHT, point.x > bounds.width - band_x);
        edges.set(Self::TOP, point.y < band_y);
        edges.set(Self::BOTTOM, point.y > bounds.height - band_y);
        edges
    }
}

/// The direction(s) a panel can be slid away in.
///
/// The position is fixed for the lifetime of a controller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SlidePosition {
    /// Drag rightwards, away from the left edge.
    #[default]
    Left,
    /// Drag leftwards, away from the right edge.
    Right,
    /// Drag downwards, away from the top edge.
    Top,
    /// Drag upwards, away from the bottom edge.
    Bottom,
    /// Drag either left or right.
    Horizontal,
    /// Drag either up or down.
    Vertical,
    /// Drag rightwards like [`SlidePosition::Left`], with a limited leftward
    /// overscroll once the panel has been pulled right during the gesture.
    LeftFacebook,
    /// Drag in any direction; dismissal is decided on the vertical axis.
    Free,
}

/// Progress of a slide, where `1.0` is at rest and `0.0` is fully dismissed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SlidePercent {
    /// Progress reported to the listener.
    pub slide: f64,
    /// Progress that drives the scrim alpha.
    ///
    /// Equal to `slide` for every position except [`SlidePosition::Free`],
    /// where the scrim follows the vertical axis only.
    pub scrim: f64,
}

impl SlidePercent {
    /// Progress that is the same for the listener and the scrim.
    pub const fn uniform(percent: f64) -> Self {
        Self {
            slide: percent,
            scrim: percent,
        }
    }
}

/// Thresholds consulted when a drag is released.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ReleaseThresholds {
    /// Speed above which a clean fling dismisses regardless of distance.
    pub velocity: f64,
    /// Fraction of the governed extent that a slow release must exceed.
    pub distance: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Dismiss {
    Positive,
    Negative,
    Either,
}

impl Dismiss {
    const fn positive(self) -> bool {
        matches!(self, Self::Positive | Self::Either)
    }

    const fn negative(self) -> bool {
        matches!(self, Self::Negative | Self::Either)
    }
}

impl SlidePosition {
    /// Every position, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Left,
        Self::Right,
        Self::Top,
        Self::Bottom,
        Self::Horizontal,
        Self::Vertical,
        Self::LeftFacebook,
        Self::Free,
    ];

    /// Edges a drag driver should track for this position.
    pub const fn tracked_edges(self) -> Edges {
        match self {
            Self::Left => Edges::LEFT,
            Self::Right => Edges::RIGHT,
            Self::Top => Edges::TOP,
            Self::Bottom => Edges::BOTTOM,
            Self::Horizontal | Self::LeftFacebook => Edges::LEFT.union(Edges::RIGHT),
            Self::Vertical => Edges::TOP.union(Edges::BOTTOM),
            Self::Free => Edges::all(),
        }
    }

    /// Edges a touch must start on for an edge-only drag to be captured.
    ///
    /// This matches [`SlidePosition::tracked_edges`] except for
    /// [`SlidePosition::LeftFacebook`], which only starts from the left edge.
    pub const fn capture_edges(self) -> Edges {
        match self {
            Self::LeftFacebook => Edges::LEFT,
            _ => self.tracked_edges(),
        }
    }

    /// Whether `point` lies in one of this position's edge bands.
    pub fn is_edge_touch(self, point: Point, bounds: Size, edge_size: f64) -> bool {
        Edges::touched(point, bounds, edge_size).intersects(self.capture_edges())
    }

    /// Whether a drag may be captured.
    ///
    /// When `edge_only` is set the drag must have started on one of the
    /// capture edges.
    pub const fn can_capture(self, edge_only: bool, started_at_edge: bool) -> bool {
        !edge_only || started_at_edge
    }

    /// Legal `(min, max)` offsets on `axis`, or `None` when this position
    /// does not move along it.
    fn range(self, axis: Axis, bounds: Size, scroll_allowance: bool) -> Option<(f64, f64)> {
        let w = bounds.width;
        let h = bounds.height;
        match (self, axis) {
            (Self::Left, Axis::Horizontal) => Some((0.0, w)),
            (Self::Right, Axis::Horizontal) => Some((-w, 0.0)),
            (Self::Horizontal | Self::Free, Axis::Horizontal) => Some((-w, w)),
            (Self::LeftFacebook, Axis::Horizontal) if scroll_allowance => Some((-(w / 2.0), w)),
            (Self::LeftFacebook, Axis::Horizontal) => Some((0.0, w)),
            (Self::Top, Axis::Vertical) => Some((0.0, h)),
            (Self::Bottom, Axis::Vertical) => Some((-h, 0.0)),
            (Self::Vertical | Self::Free, Axis::Vertical) => Some((-h, h)),
            _ => None,
        }
    }

    /// Restrict `offset` to the legal range of this position.
    ///
    /// Axes the position does not move along are pinned to zero.
    /// `scroll_allowance` only affects [`SlidePosition::LeftFacebook`], where it
    /// widens the lower bound to `-width / 2`.
    pub fn clamp(self, offset: Vec2, bounds: Size, scroll_allowance: bool) -> Vec2 {
        let x = self
            .range(Axis::Horizontal, bounds, scroll_allowance)
            .map_or(0.0, |(min, max)| clamp(offset.x, min, max));
        let y = self
            .range(Axis::Vertical, bounds, scroll_allowance)
            .map_or(0.0, |(min, max)| clamp(offset.y, min, max));
        Vec2::new(x, y)
    }

    /// Slide progress for `offset`.
    pub fn percent(self, offset: Vec2, bounds: Size) -> SlidePercent {
        let horizontal = axis_percent(offset.x, bounds.width);
        let vertical = axis_percent(offset.y, bounds.height);
        match self {
            Self::Left | Self::Right | Self::Horizontal | Self::LeftFacebook => {
                SlidePercent::uniform(horizontal)
            }
            Self::Top | Self::Bottom | Self::Vertical => SlidePercent::uniform(vertical),
            Self::Free => SlidePercent {
                slide: (horizontal + vertical) / 2.0,
                scrim: vertical,
            },
        }
    }

    /// Pick the offset a released panel should settle at.
    ///
    /// Returns either the rest offset on the governed axis or a full
    /// `±extent` dismissal. The non-governed axis keeps its current offset,
    /// except for [`SlidePosition::Free`] which returns to zero horizontally
    /// when it snaps back.
    pub fn classify_release(
        self,
        offset: Vec2,
        velocity: Vec2,
        bounds: Size,
        thresholds: &ReleaseThresholds,
    ) -> Vec2 {
        let horizontal = |dismiss| {
            settle_axis(
                offset.x,
                velocity.x,
                velocity.y,
                bounds.width,
                thresholds,
                dismiss,
            )
        };
        let vertical = |dismiss| {
            settle_axis(
                offset.y,
                velocity.y,
                velocity.x,
                bounds.height,
                thresholds,
                dismiss,
            )
        };
        match self {
            Self::Left | Self::LeftFacebook => Vec2::new(horizontal(Dismiss::Positive), offset.y),
            Self::Right => Vec2::new(horizontal(Dismiss::Negative), offset.y),
            Self::Horizontal => Vec2::new(horizontal(Dismiss::Either), offset.y),
            Self::Top => Vec2::new(offset.x, vertical(Dismiss::Positive)),
            Self::Bottom => Vec2::new(offset.x, vertical(Dismiss::Negative)),
            Self::Vertical => Vec2::new(offset.x, vertical(Dismiss::Either)),
            Self::Free => {
                let y = vertical(Dismiss::Either);
                let x = if y == 0.0 { 0.0 } else { offset.x };
                Vec2::new(x, y)
            }
        }
    }

    /// Whether `offset` is exactly at rest on the governed axis (or both axes
    /// for [`SlidePosition::Free`]).
    pub fn is_at_rest(self, offset: Vec2) -> bool {
        match self {
            Self::Left | Self::Right | Self::Horizontal | Self::LeftFacebook => offset.x == 0.0,
            Self::Top | Self::Bottom | Self::Vertical => offset.y == 0.0,
            Self::Free => offset.x == 0.0 && offset.y == 0.0,
        }
    }
}

/// `max(min, min(max, value))`; never panics, even for inverted bounds.
fn clamp(value: f64, min: f64, max: f64) -> f64 {
    min.max(max.min(value))
}

fn axis_percent(offset: f64, extent: f64) -> f64 {
    if extent <= 0.0 {
        return 1.0;
    }
    clamp(1.0 - offset.abs() / extent, 0.0, 1.0)
}

fn settle_axis(
    offset: f64,
    velocity: f64,
    cross_velocity: f64,
    extent: f64,
    thresholds: &ReleaseThresholds,
    dismiss: Dismiss,
) -> f64 {
    let distance = extent * thresholds.distance;
    let fling = velocity.abs() > thresholds.velocity && cross_velocity.abs() <= thresholds.velocity;
    if velocity > 0.0 {
        if dismiss.positive() && (fling || offset > distance) {
            return extent;
        }
    } else if velocity < 0.0 {
        if dismiss.negative() && (fling || offset < -distance) {
            return -extent;
        }
    } else if dismiss.positive() && offset > distance {
        return extent;
    } else if dismiss.negative() && offset < -distance {
        return -extent;
    }
    0.0
}
