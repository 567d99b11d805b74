// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag driver seam.
//!
//! A drag driver is the host-side service that decides when a touch stream
//! turns into a drag (touch slop, edge tracking) and animates the panel to a
//! settle target frame by frame. The controller only needs the narrow
//! contract of [`DragDriver`]; easing curves and velocity tracking stay on the
//! host side.

use kurbo::{Point, Vec2};
use thiserror::Error;

/// Phase of a pointer event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// Pointer pressed.
    Down,
    /// Pointer moved while pressed.
    Move,
    /// Pointer released.
    Up,
    /// Pointer stream cancelled by the platform.
    Cancel,
}

/// A single pointer sample as seen by the controller and its driver.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Event phase.
    pub phase: PointerPhase,
    /// Position in panel coordinates.
    pub position: Point,
    /// Velocity in units per second; only meaningful on release.
    pub velocity: Vec2,
    /// Timestamp in milliseconds.
    pub time: u64,
}

impl PointerEvent {
    /// A pointer-down sample.
    pub const fn down(position: Point, time: u64) -> Self {
        Self {
            phase: PointerPhase::Down,
            position,
            velocity: Vec2::ZERO,
            time,
        }
    }

    /// A pointer-move sample.
    pub const fn moved(position: Point, time: u64) -> Self {
        Self {
            phase: PointerPhase::Move,
            position,
            velocity: Vec2::ZERO,
            time,
        }
    }

    /// A pointer-up sample with the release velocity.
    pub const fn up(position: Point, velocity: Vec2, time: u64) -> Self {
        Self {
            phase: PointerPhase::Up,
            position,
            velocity,
            time,
        }
    }

    /// A cancellation sample.
    pub const fn cancel(position: Point, time: u64) -> Self {
        Self {
            phase: PointerPhase::Cancel,
            position,
            velocity: Vec2::ZERO,
            time,
        }
    }
}

/// Failures a driver may report for a pointer event.
///
/// The controller never propagates these; a rejected event is treated as
/// "do not intercept" or discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DriverError {
    /// The driver declined to handle the event.
    #[error("drag driver rejected the event")]
    Rejected,
    /// The event was inconsistent with the driver's tracking state, for
    /// example a move for a pointer it never saw go down.
    #[error("pointer event is invalid for the current drag")]
    InvalidEvent,
}

/// One frame of a settle animation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SettleStep {
    /// The panel moved to this offset and the animation continues.
    Moving(Vec2),
    /// The animation ended with the panel at this offset.
    Finished(Vec2),
}

/// Host-provided drag and settle capability.
pub trait DragDriver {
    /// Whether the driver wants to take over the pointer stream starting
    /// with `event`.
    fn should_intercept(&mut self, event: &PointerEvent) -> Result<bool, DriverError>;

    /// Feed a pointer event to the driver's tracking (velocity, slop).
    fn process_event(&mut self, event: &PointerEvent) -> Result<(), DriverError>;

    /// Start animating from `from` towards `target`.
    ///
    /// Returns `false` when there is nothing to animate, in which case the
    /// settle is complete immediately.
    fn settle_to(&mut self, from: Vec2, target: Vec2) -> bool;

    /// Advance the running settle by one frame.
    fn continue_settling(&mut self) -> SettleStep;

    /// Cancel any tracking or animation in progress.
    fn abort(&mut self);
}
