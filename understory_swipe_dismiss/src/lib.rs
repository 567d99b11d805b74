// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_swipe_dismiss --heading-base-level=0

//! Understory Swipe Dismiss: gesture decisions for panels dismissed by dragging.
//!
//! ## Overview
//!
//! A panel (an activity, a sheet, a drawer) rests at offset zero. The user drags it
//! towards one or more screen edges; on release it either settles back to rest or slides
//! fully off screen. Behind the panel a scrim dims the content underneath, fading as the
//! panel leaves.
//!
//! This crate makes the decisions and leaves the rest to the host:
//!
//! - [`SlideConfig`] holds the validated, immutable settings.
//! - [`SlidePosition`] is the per-edge drag policy: capture, clamping, progress, and
//!   release classification.
//! - [`ScrimCompositor`] maps progress to a scrim alpha; [`dirty_region`] names the band
//!   to repaint.
//! - [`SlideController`] runs the `Idle → Dragging → Settling → Idle` state machine and
//!   reports to a [`SlideListener`].
//!
//! Touch slop, velocity tracking, and settle animation belong to the host's
//! [`DragDriver`]. Rendering and window management are out of scope.
//!
//! ## Example
//!
//! A driver that settles in a single frame, and a left-edge panel dragged past the
//! distance threshold:
//!
//! ```rust
//! use kurbo::{Point, Size, Vec2};
//! use understory_swipe_dismiss::{
//!     Completion, DragDriver, DragState, DriverError, PointerEvent, SettleStatus,
//!     SettleStep, SlideConfig, SlideController,
//! };
//!
//! #[derive(Default)]
//! struct Snap(Option<Vec2>);
//!
//! impl DragDriver for Snap {
//!     fn should_intercept(&mut self, _: &PointerEvent) -> Result<bool, DriverError> {
//!         Ok(true)
//!     }
//!     fn process_event(&mut self, _: &PointerEvent) -> Result<(), DriverError> {
//!         Ok(())
//!     }
//!     fn settle_to(&mut self, from: Vec2, target: Vec2) -> bool {
//!         self.0 = Some(target);
//!         from != target
//!     }
//!     fn continue_settling(&mut self) -> SettleStep {
//!         SettleStep::Finished(self.0.take().unwrap_or_default())
//!     }
//!     fn abort(&mut self) {
//!         self.0 = None;
//!     }
//! }
//!
//! let mut panel = SlideController::new(SlideConfig::default(), Snap::default(), ());
//! panel.set_bounds(Size::new(1000.0, 2000.0));
//!
//! panel.on_pointer_down(Point::new(10.0, 500.0), 0);
//! panel.on_pointer_move(Point::new(510.0, 500.0), 16);
//! assert_eq!(panel.state(), DragState::Dragging);
//!
//! // Released half way across: past the 40% threshold.
//! assert_eq!(panel.on_pointer_up(Point::new(510.0, 500.0), Vec2::ZERO, 32), None);
//! assert_eq!(panel.state(), DragState::Settling);
//!
//! let done = panel.on_settle_tick(48);
//! assert_eq!(done, SettleStatus::Complete(Completion::Closed { handled: false }));
//! assert_eq!(panel.offset(), Vec2::new(1000.0, 0.0));
//! ```
//!
//! ## Logging
//!
//! Decisions are reported through the [`log`] facade: position updates at `trace`, state
//! transitions and skipped settles at `debug`, and driver rejections at `warn`.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod controller;
pub mod driver;
pub mod position;
pub mod scrim;

pub use config::{
    Argb, ConfigError, DriverSetup, MIN_FLING_VELOCITY, SlideConfig, SlideConfigBuilder,
};
pub use controller::{
    Completion, DragState, SettleStatus, SlideController, SlideError, SlideListener,
};
pub use driver::{DragDriver, DriverError, PointerEvent, PointerPhase, SettleStep};
pub use position::{Edges, ReleaseThresholds, SlidePercent, SlidePosition};
pub use scrim::{ScrimCompositor, ScrimPaint, dirty_region, to_alpha_u8};
