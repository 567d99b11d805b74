// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gesture controller: pointer events in, slide callbacks out.
//!
//! [`SlideController`] owns the drag state of one panel. The host feeds it
//! pointer events and frame ticks; the controller gates them (lock,
//! touch-disabled regions, edge-only capture), moves the panel through the
//! active [`SlidePosition`] policy, drives the scrim, and reports progress to a
//! [`SlideListener`].
//!
//! ## State machine
//!
//! ```text
//! Idle --down + move--> Dragging --up/cancel--> Settling --settle done--> Idle
//! ```
//!
//! Every release passes through [`DragState::Settling`]. The settle animation
//! is skipped (and the controller returns to [`DragState::Idle`] within the
//! same call) when:
//!
//! - quick dismiss is enabled and the drag was shorter than its time guard,
//! - the release dismisses and dismiss-right-away is enabled, or
//! - the driver reports that there is nothing to animate.
//!
//! Whether the panel ended open or closed is decided once, on that final
//! transition to idle, and reported both to the listener and as a
//! [`Completion`]. [`SlideController::lock`] aborts any drag without reporting
//! either.
//!
//! ## Timestamps
//!
//! All operations take a caller-supplied timestamp in milliseconds. The
//! controller never reads a clock.

use kurbo::{Point, Rect, Size, Vec2};
use log::{debug, trace, warn};
use thiserror::Error;

use crate::config::{ConfigError, SlideConfig};
use crate::driver::{DragDriver, PointerEvent, PointerPhase, SettleStep};
use crate::position::{SlidePercent, SlidePosition};
use crate::scrim::{ScrimCompositor, ScrimPaint, dirty_region};

/// Drag state of a panel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragState {
    /// Not moving.
    #[default]
    Idle,
    /// Following the pointer.
    Dragging,
    /// Animating towards a settle target after release.
    Settling,
}

/// Callbacks produced by a [`SlideController`].
///
/// Every method has a no-op default.
pub trait SlideListener {
    /// The drag state changed.
    fn on_state_changed(&mut self, _state: DragState) {}

    /// The panel moved; `percent` is `1.0` at rest and `0.0` fully dismissed.
    fn on_slide_change(&mut self, _percent: f64) {}

    /// The scrim alpha was recomputed.
    fn on_apply_scrim(&mut self, _alpha: f64) {}

    /// A gesture ended with the panel back at rest.
    fn on_opened(&mut self) {}

    /// A gesture ended with the panel away from rest.
    ///
    /// Return `true` if the dismissal was handled; `false` asks the host to
    /// perform its default dismissal (see [`Completion::needs_default_dismiss`]).
    fn on_closed(&mut self) -> bool {
        false
    }
}

impl SlideListener for () {}

/// How a gesture ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Completion {
    /// The panel is back at rest.
    Opened,
    /// The panel was dismissed.
    Closed {
        /// What [`SlideListener::on_closed`] returned.
        handled: bool,
    },
}

impl Completion {
    /// Whether the host should run its default dismissal action.
    pub const fn needs_default_dismiss(self) -> bool {
        matches!(self, Self::Closed { handled: false })
    }
}

/// Result of a frame tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SettleStatus {
    /// No settle animation is running.
    Inactive,
    /// The settle animation continues; tick again next frame.
    Settling,
    /// The settle animation finished on this tick.
    Complete(Completion),
}

/// Misuse of a [`SlideController`].
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum SlideError {
    /// A late configuration was supplied after the panel was laid out.
    #[error("configuration is locked after the first layout")]
    ConfigLocked,
    /// The supplied configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Gesture {
    last: Point,
}

/// Swipe-to-dismiss controller for a single panel.
#[derive(Debug)]
pub struct SlideController<D, L> {
    config: SlideConfig,
    driver: D,
    listener: L,
    scrim: ScrimCompositor,
    bounds: Size,
    laid_out: bool,
    state: DragState,
    offset: Vec2,
    locked: bool,
    edge_touched: bool,
    drag_start_time: Option<u64>,
    scroll_allowance: bool,
    gesture: Option<Gesture>,
}

impl<D: DragDriver, L: SlideListener> SlideController<D, L> {
    /// Create a controller with zero bounds; call
    /// [`SlideController::set_bounds`] once the panel is laid out.
    pub fn new(config: SlideConfig, driver: D, listener: L) -> Self {
        let scrim = ScrimCompositor::new(&config);
        Self {
            config,
            driver,
            listener,
            scrim,
            bounds: Size::ZERO,
            laid_out: false,
            state: DragState::Idle,
            offset: Vec2::ZERO,
            locked: false,
            edge_touched: false,
            drag_start_time: None,
            scroll_allowance: false,
            gesture: None,
        }
    }

    /// Replace the configuration before the first layout.
    ///
    /// The slide position is fixed once the panel has been laid out; use a
    /// new controller to switch positions afterwards.
    pub fn set_late_config(&mut self, config: SlideConfig) -> Result<(), SlideError> {
        if self.laid_out {
            return Err(SlideError::ConfigLocked);
        }
        self.scrim = ScrimCompositor::new(&config);
        self.config = config;
        Ok(())
    }

    /// Update the panel bounds, which are also the drag extents.
    pub fn set_bounds(&mut self, bounds: Size) {
        self.bounds = bounds;
        self.laid_out = true;
    }

    /// Current configuration.
    pub fn config(&self) -> &SlideConfig {
        &self.config
    }

    /// Current panel bounds.
    pub fn bounds(&self) -> Size {
        self.bounds
    }

    /// Current drag state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Current panel offset from rest.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Slide progress at the current offset.
    pub fn percent(&self) -> SlidePercent {
        self.config.position().percent(self.offset, self.bounds)
    }

    /// Whether gesture processing is disabled.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether the last touch-down landed on a capture edge.
    ///
    /// Only tracked when the configuration is edge-only.
    pub fn is_edge_touched(&self) -> bool {
        self.edge_touched
    }

    /// Most recently applied scrim alpha.
    pub fn scrim_alpha(&self) -> f64 {
        self.scrim.alpha()
    }

    /// Paint for the scrim at its current alpha.
    pub fn scrim_paint(&self) -> ScrimPaint {
        self.scrim.paint()
    }

    /// Region the scrim covers at the current offset.
    pub fn dirty_region(&self) -> Rect {
        dirty_region(self.config.position(), self.offset, self.bounds)
    }

    /// The drag driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The drag driver, mutably.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// The listener.
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// The listener, mutably.
    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Disable gesture processing and abort any drag in progress.
    ///
    /// The panel stays where it is and neither open nor closed is reported.
    pub fn lock(&mut self) {
        self.driver.abort();
        self.locked = true;
        self.reset_gesture();
    }

    /// Re-enable gesture processing, aborting any driver activity.
    pub fn unlock(&mut self) {
        self.driver.abort();
        self.locked = false;
        self.reset_gesture();
    }

    /// Dispatch a pointer event to the matching handler.
    ///
    /// Returns whether the controller consumed the event.
    pub fn on_pointer_event(&mut self, event: &PointerEvent) -> bool {
        match event.phase {
            PointerPhase::Down => self.on_pointer_down(event.position, event.time),
            PointerPhase::Move => self.on_pointer_move(event.position, event.time),
            PointerPhase::Up => {
                let dragging = self.is_dragging();
                self.on_pointer_up(event.position, event.velocity, event.time);
                dragging
            }
            PointerPhase::Cancel => {
                let dragging = self.is_dragging();
                self.on_pointer_cancel(event.time);
                dragging
            }
        }
    }

    /// Handle a pointer press.
    ///
    /// Returns whether the driver wants to intercept the pointer stream.
    /// Presses inside a touch-disabled region are never intercepted and the
    /// rest of that gesture is ignored.
    pub fn on_pointer_down(&mut self, position: Point, time: u64) -> bool {
        if self.state == DragState::Dragging {
            // A press without a release for the previous one.
            self.on_pointer_cancel(time);
        }
        self.gesture = None;
        if self.locked {
            return false;
        }
        if !position.is_finite() {
            debug!("discarding non-finite pointer down at {position:?}");
            return false;
        }
        if self.config.is_touch_disabled(position) {
            debug!("pointer down at {position:?} in a touch-disabled region");
            return false;
        }
        if self.config.is_edge_only() {
            self.edge_touched =
                self.config
                    .position()
                    .is_edge_touch(position, self.bounds, self.config.edge_size());
        }
        let event = PointerEvent::down(position, time);
        match self.driver.should_intercept(&event) {
            Ok(intercept) => {
                self.gesture = Some(Gesture { last: position });
                intercept
            }
            Err(err) => {
                warn!("drag driver rejected pointer down: {err}");
                false
            }
        }
    }

    /// Handle pointer motion.
    ///
    /// Returns whether the controller consumed the event by dragging.
    pub fn on_pointer_move(&mut self, position: Point, time: u64) -> bool {
        if self.locked {
            return false;
        }
        let Some(gesture) = self.gesture else {
            return false;
        };
        if !position.is_finite() {
            debug!("discarding non-finite pointer move at {position:?}");
            return false;
        }
        let event = PointerEvent::moved(position, time);
        if let Err(err) = self.driver.process_event(&event) {
            debug!("discarding pointer move: {err}");
            return false;
        }
        self.gesture = Some(Gesture { last: position });

        if self.state != DragState::Dragging {
            let slide = self.config.position();
            if !slide.can_capture(self.config.is_edge_only(), self.edge_touched) {
                return false;
            }
            if self.state == DragState::Settling {
                self.driver.abort();
            }
            self.set_state(DragState::Dragging);
        }

        let proposed = self.offset + (position - gesture.last);
        let clamped = self
            .config
            .position()
            .clamp(proposed, self.bounds, self.scroll_allowance);
        if clamped != self.offset {
            self.move_to(clamped, time);
        }
        true
    }

    /// Handle a pointer release with the release `velocity`.
    ///
    /// Returns the completion if the gesture ended without a settle
    /// animation; otherwise the host drives [`SlideController::on_settle_tick`]
    /// until it reports completion.
    pub fn on_pointer_up(
        &mut self,
        position: Point,
        velocity: Vec2,
        time: u64,
    ) -> Option<Completion> {
        if self.locked || self.gesture.is_none() {
            return None;
        }
        if !(position.is_finite() && velocity.is_finite()) {
            debug!("discarding non-finite up at {position:?} ({velocity:?})");
            return None;
        }
        let event = PointerEvent::up(position, velocity, time);
        if let Err(err) = self.driver.process_event(&event) {
            debug!("discarding pointer up: {err}");
            return None;
        }
        self.gesture = None;
        if self.state != DragState::Dragging {
            return None;
        }
        self.release(velocity, time)
    }

    /// Handle a cancelled pointer stream as a release with no velocity.
    pub fn on_pointer_cancel(&mut self, time: u64) -> Option<Completion> {
        let gesture = self.gesture.take()?;
        if self.locked {
            return None;
        }
        let event = PointerEvent::cancel(gesture.last, time);
        if let Err(err) = self.driver.process_event(&event) {
            debug!("drag driver rejected cancel: {err}");
        }
        if self.state != DragState::Dragging {
            return None;
        }
        self.release(Vec2::ZERO, time)
    }

    /// Advance a running settle animation by one frame.
    pub fn on_settle_tick(&mut self, time: u64) -> SettleStatus {
        if self.state != DragState::Settling {
            return SettleStatus::Inactive;
        }
        match self.driver.continue_settling() {
            SettleStep::Moving(offset) => {
                if offset != self.offset {
                    self.move_to(offset, time);
                }
                SettleStatus::Settling
            }
            SettleStep::Finished(offset) => {
                if offset != self.offset {
                    self.move_to(offset, time);
                }
                SettleStatus::Complete(self.finish())
            }
        }
    }

    fn is_dragging(&self) -> bool {
        !self.locked && self.state == DragState::Dragging
    }

    fn release(&mut self, velocity: Vec2, time: u64) -> Option<Completion> {
        self.set_state(DragState::Settling);
        let slide = self.config.position();
        let target = slide.classify_release(
            self.offset,
            velocity,
            self.bounds,
            &self.config.release_thresholds(),
        );
        self.scroll_allowance = false;
        debug!(
            "released at {:?} with velocity {velocity:?}, settle target {target:?}",
            self.offset
        );

        if self.config.quick_dismiss() {
            let held = self
                .drag_start_time
                .map_or(0, |start| time.saturating_sub(start));
            if held < self.config.time_quick_dismiss() {
                debug!(
                    "drag held for {held}ms, under the {}ms quick dismiss guard",
                    self.config.time_quick_dismiss()
                );
                return Some(self.finish());
            }
        }
        if !slide.is_at_rest(target) && self.config.is_dismiss_right_away() {
            debug!("dismissing right away without settling");
            return Some(self.finish());
        }
        if self.driver.settle_to(self.offset, target) {
            None
        } else {
            Some(self.finish())
        }
    }

    fn move_to(&mut self, offset: Vec2, time: u64) {
        let slide = self.config.position();
        self.offset = offset;
        if self.drag_start_time.is_none() {
            self.drag_start_time = Some(time);
        }
        if slide == SlidePosition::LeftFacebook && offset.x > 0.0 {
            self.scroll_allowance = true;
        }
        let percent = slide.percent(offset, self.bounds);
        trace!("offset {offset:?}, percent {percent:?}");
        self.listener.on_slide_change(percent.slide);
        if let Some(alpha) = self.scrim.apply(percent.scrim) {
            self.listener.on_apply_scrim(alpha);
        }
    }

    fn finish(&mut self) -> Completion {
        self.set_state(DragState::Idle);
        self.drag_start_time = None;
        self.scroll_allowance = false;
        if self.config.position().is_at_rest(self.offset) {
            self.listener.on_opened();
            Completion::Opened
        } else {
            let handled = self.listener.on_closed();
            Completion::Closed { handled }
        }
    }

    fn reset_gesture(&mut self) {
        self.gesture = None;
        self.drag_start_time = None;
        self.scroll_allowance = false;
        self.set_state(DragState::Idle);
    }

    fn set_state(&mut self, state: DragState) {
        if self.state == state {
            return;
        }
        debug!("drag state {:?} -> {state:?}", self.state);
        self.state = state;
        self.listener.on_state_changed(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Argb;
    use crate::driver::DriverError;
    use alloc::vec::Vec;

    const BOUNDS: Size = Size::new(1000.0, 2000.0);

    #[derive(Debug, Default)]
    struct TestDriver {
        reject_down: bool,
        reject_moves: bool,
        reject_ups: bool,
        settles: Vec<(Vec2, Vec2)>,
        target: Option<Vec2>,
        current: Vec2,
        frames_left: u32,
        aborts: usize,
        processed: Vec<PointerPhase>,
    }

    impl DragDriver for TestDriver {
        fn should_intercept(&mut self, _event: &PointerEvent) -> Result<bool, DriverError> {
            if self.reject_down {
                Err(DriverError::Rejected)
            } else {
                Ok(true)
            }
        }

        fn process_event(&mut self, event: &PointerEvent) -> Result<(), DriverError> {
            if self.reject_moves && event.phase == PointerPhase::Move {
                return Err(DriverError::InvalidEvent);
            }
            if self.reject_ups && event.phase == PointerPhase::Up {
                return Err(DriverError::Rejected);
            }
            self.processed.push(event.phase);
            Ok(())
        }

        fn settle_to(&mut self, from: Vec2, target: Vec2) -> bool {
            self.current = from;
            if from == target {
                return false;
            }
            self.settles.push((from, target));
            self.target = Some(target);
            self.frames_left = 3;
            true
        }

        fn continue_settling(&mut self) -> SettleStep {
            let Some(target) = self.target else {
                return SettleStep::Finished(self.current);
            };
            if self.frames_left > 1 {
                self.frames_left -= 1;
                self.current = self.current + (target - self.current) / 2.0;
                SettleStep::Moving(self.current)
            } else {
                self.target = None;
                self.current = target;
                SettleStep::Finished(target)
            }
        }

        fn abort(&mut self) {
            self.aborts += 1;
            self.target = None;
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    enum Event {
        State(DragState),
        Slide(f64),
        Scrim(f64),
        Opened,
        Closed,
    }

    #[derive(Debug, Default)]
    struct Recorder {
        events: Vec<Event>,
        handle_close: bool,
    }

    impl Recorder {
        fn states(&self) -> Vec<DragState> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::State(s) => Some(*s),
                    _ => None,
                })
                .collect()
        }

        fn count(&self, event: &Event) -> usize {
            self.events.iter().filter(|e| *e == event).count()
        }

        fn slides(&self) -> Vec<f64> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Slide(p) => Some(*p),
                    _ => None,
                })
                .collect()
        }

        fn scrims(&self) -> usize {
            self.events
                .iter()
                .filter(|e| matches!(e, Event::Scrim(_)))
                .count()
        }
    }

    impl SlideListener for Recorder {
        fn on_state_changed(&mut self, state: DragState) {
            self.events.push(Event::State(state));
        }

        fn on_slide_change(&mut self, percent: f64) {
            self.events.push(Event::Slide(percent));
        }

        fn on_apply_scrim(&mut self, alpha: f64) {
            self.events.push(Event::Scrim(alpha));
        }

        fn on_opened(&mut self) {
            self.events.push(Event::Opened);
        }

        fn on_closed(&mut self) -> bool {
            self.events.push(Event::Closed);
            self.handle_close
        }
    }

    type Controller = SlideController<TestDriver, Recorder>;

    fn controller(config: SlideConfig) -> Controller {
        let mut c = SlideController::new(config, TestDriver::default(), Recorder::default());
        c.set_bounds(BOUNDS);
        c
    }

    fn drag(
        c: &mut Controller,
        from: impl Into<Point>,
        to: impl Into<Point>,
        start: u64,
        end: u64,
    ) {
        c.on_pointer_down(from.into(), start);
        c.on_pointer_move(to.into(), end);
    }

    fn release(c: &mut Controller, at: Point, time: u64) -> Option<Completion> {
        c.on_pointer_up(at, Vec2::ZERO, time)
    }

    fn settle(c: &mut Controller) -> Completion {
        for frame in 0..100 {
            if let SettleStatus::Complete(done) = c.on_settle_tick(1000 + frame) {
                return done;
            }
        }
        panic!("settle never completed");
    }

    #[test]
    fn slow_release_past_threshold_dismisses() {
        let mut c = controller(SlideConfig::default());
        drag(&mut c, (10.0, 500.0), (510.0, 500.0), 0, 16);
        assert_eq!(c.state(), DragState::Dragging);
        assert_eq!(c.offset(), Vec2::new(500.0, 0.0));
        assert!((c.percent().slide - 0.5).abs() < 1e-12);

        assert_eq!(release(&mut c, Point::new(510.0, 500.0), 100), None);
        assert_eq!(c.state(), DragState::Settling);
        assert_eq!(
            c.driver().settles,
            [(Vec2::new(500.0, 0.0), Vec2::new(1000.0, 0.0))]
        );

        let done = settle(&mut c);
        assert_eq!(done, Completion::Closed { handled: false });
        assert!(done.needs_default_dismiss());
        assert_eq!(c.state(), DragState::Idle);
        assert_eq!(c.offset(), Vec2::new(1000.0, 0.0));
        assert_eq!(c.listener().count(&Event::Closed), 1);
        assert_eq!(c.listener().count(&Event::Opened), 0);
        assert_eq!(
            c.listener().states(),
            [DragState::Dragging, DragState::Settling, DragState::Idle]
        );
    }

    #[test]
    fn slow_release_short_of_threshold_snaps_back() {
        let mut c = controller(SlideConfig::default());
        drag(&mut c, (10.0, 500.0), (310.0, 500.0), 0, 16);
        assert_eq!(c.offset(), Vec2::new(300.0, 0.0));
        assert_eq!(release(&mut c, Point::new(310.0, 500.0), 100), None);
        assert_eq!(c.driver().settles, [(Vec2::new(300.0, 0.0), Vec2::ZERO)]);

        assert_eq!(settle(&mut c), Completion::Opened);
        assert_eq!(c.offset(), Vec2::ZERO);
        assert_eq!(c.listener().count(&Event::Opened), 1);
        assert_eq!(c.listener().count(&Event::Closed), 0);
        assert_eq!(c.listener().slides().last(), Some(&1.0));
    }

    #[test]
    fn fling_dismisses_right_panel() {
        let config = SlideConfig::builder()
            .position(SlidePosition::Right)
            .build()
            .unwrap();
        let mut c = controller(config);
        drag(&mut c, (900.0, 500.0), (800.0, 500.0), 0, 16);
        assert_eq!(c.offset(), Vec2::new(-100.0, 0.0));
        c.on_pointer_up(Point::new(800.0, 500.0), Vec2::new(-8.0, 0.0), 50);
        assert_eq!(
            c.driver().settles,
            [(Vec2::new(-100.0, 0.0), Vec2::new(-1000.0, 0.0))]
        );
    }

    #[test]
    fn drag_is_clamped_to_legal_range() {
        let mut c = controller(SlideConfig::default());
        c.on_pointer_down(Point::new(500.0, 500.0), 0);
        assert!(c.on_pointer_move(Point::new(300.0, 800.0), 10));
        assert_eq!(c.offset(), Vec2::ZERO);
        assert!(c.listener().slides().is_empty());
        c.on_pointer_move(Point::new(2000.0, 800.0), 20);
        assert_eq!(c.offset(), Vec2::new(1000.0, 0.0));
        // Moving back is tracked from the clamped position.
        c.on_pointer_move(Point::new(1900.0, 800.0), 30);
        assert_eq!(c.offset(), Vec2::new(900.0, 0.0));
    }

    #[test]
    fn quick_dismiss_skips_settle() {
        let config = SlideConfig::builder()
            .quick_dismiss(true, 300)
            .build()
            .unwrap();
        let mut c = controller(config);
        drag(&mut c, (10.0, 500.0), (710.0, 500.0), 0, 10);
        let done = c.on_pointer_up(Point::new(710.0, 500.0), Vec2::new(50.0, 0.0), 200);
        assert_eq!(done, Some(Completion::Closed { handled: false }));
        assert!(c.driver().settles.is_empty());
        assert_eq!(c.state(), DragState::Idle);
        assert_eq!(c.offset(), Vec2::new(700.0, 0.0));
        assert_eq!(
            c.listener().states(),
            [DragState::Dragging, DragState::Settling, DragState::Idle]
        );
    }

    #[test]
    fn quick_dismiss_guard_expires() {
        let config = SlideConfig::builder()
            .quick_dismiss(true, 300)
            .build()
            .unwrap();
        let mut c = controller(config);
        drag(&mut c, (10.0, 500.0), (710.0, 500.0), 0, 10);
        assert_eq!(release(&mut c, Point::new(710.0, 500.0), 310), None);
        assert_eq!(c.driver().settles.len(), 1);
        assert_eq!(settle(&mut c), Completion::Closed { handled: false });
    }

    #[test]
    fn dismiss_right_away_skips_settle_only_for_dismissal() {
        let config = SlideConfig::builder()
            .position(SlidePosition::Top)
            .dismiss_right_away(true)
            .build()
            .unwrap();
        let mut c = controller(config.clone());
        drag(&mut c, (500.0, 10.0), (500.0, 910.0), 0, 16);
        let done = c.on_pointer_up(Point::new(500.0, 910.0), Vec2::ZERO, 100);
        assert_eq!(done, Some(Completion::Closed { handled: false }));
        assert!(c.driver().settles.is_empty());
        assert_eq!(c.offset(), Vec2::new(0.0, 900.0));

        let mut c = controller(config);
        drag(&mut c, (500.0, 10.0), (500.0, 110.0), 0, 16);
        assert_eq!(release(&mut c, Point::new(500.0, 110.0), 100), None);
        assert_eq!(settle(&mut c), Completion::Opened);
    }

    #[test]
    fn handled_close_needs_no_default_dismiss() {
        let mut c = controller(SlideConfig::default());
        c.listener_mut().handle_close = true;
        drag(&mut c, (10.0, 500.0), (910.0, 500.0), 0, 16);
        c.on_pointer_up(Point::new(910.0, 500.0), Vec2::ZERO, 100);
        let done = settle(&mut c);
        assert_eq!(done, Completion::Closed { handled: true });
        assert!(!done.needs_default_dismiss());
    }

    #[test]
    fn locked_controller_ignores_gestures() {
        let mut c = controller(SlideConfig::default());
        c.lock();
        assert!(c.is_locked());
        assert!(!c.on_pointer_down(Point::new(10.0, 500.0), 0));
        assert!(!c.on_pointer_move(Point::new(510.0, 500.0), 16));
        assert_eq!(release(&mut c, Point::new(510.0, 500.0), 50), None);
        assert_eq!(c.offset(), Vec2::ZERO);
        assert!(c.listener().events.is_empty());

        c.unlock();
        assert!(!c.is_locked());
        drag(&mut c, (10.0, 500.0), (510.0, 500.0), 100, 116);
        assert_eq!(c.offset(), Vec2::new(500.0, 0.0));
    }

    #[test]
    fn lock_mid_drag_aborts_without_completion() {
        let mut c = controller(SlideConfig::default());
        drag(&mut c, (10.0, 500.0), (510.0, 500.0), 0, 16);
        c.lock();
        assert_eq!(c.state(), DragState::Idle);
        assert_eq!(c.driver().aborts, 1);
        assert_eq!(c.listener().count(&Event::Opened), 0);
        assert_eq!(c.listener().count(&Event::Closed), 0);
        assert_eq!(c.on_settle_tick(100), SettleStatus::Inactive);
    }

    #[test]
    fn touch_disabled_region_blocks_gesture() {
        let config = SlideConfig::builder()
            .touch_disabled_regions([Rect::new(0.0, 0.0, 1000.0, 200.0)])
            .build()
            .unwrap();
        let mut c = controller(config);
        assert!(!c.on_pointer_down(Point::new(100.0, 100.0), 0));
        assert!(!c.on_pointer_move(Point::new(600.0, 100.0), 16));
        assert_eq!(c.state(), DragState::Idle);
        assert_eq!(c.offset(), Vec2::ZERO);

        assert!(c.on_pointer_down(Point::new(100.0, 500.0), 100));
        assert!(c.on_pointer_move(Point::new(600.0, 500.0), 116));
        assert_eq!(c.offset(), Vec2::new(500.0, 0.0));
    }

    #[test]
    fn edge_only_requires_edge_touch() {
        let config = SlideConfig::builder()
            .edge_only(true)
            .edge_size(0.1)
            .build()
            .unwrap();
        let mut c = controller(config);
        c.on_pointer_down(Point::new(500.0, 500.0), 0);
        assert!(!c.is_edge_touched());
        assert!(!c.on_pointer_move(Point::new(800.0, 500.0), 16));
        assert_eq!(c.state(), DragState::Idle);
        c.on_pointer_up(Point::new(800.0, 500.0), Vec2::ZERO, 30);

        c.on_pointer_down(Point::new(50.0, 500.0), 100);
        assert!(c.is_edge_touched());
        assert!(c.on_pointer_move(Point::new(350.0, 500.0), 116));
        assert_eq!(c.offset(), Vec2::new(300.0, 0.0));
    }

    #[test]
    fn driver_rejecting_down_prevents_capture() {
        let mut c = controller(SlideConfig::default());
        c.driver_mut().reject_down = true;
        assert!(!c.on_pointer_down(Point::new(10.0, 500.0), 0));
        assert!(!c.on_pointer_move(Point::new(510.0, 500.0), 16));
        assert_eq!(c.state(), DragState::Idle);
    }

    #[test]
    fn lock_while_settling_stops_without_completion() {
        let mut c = controller(SlideConfig::default());
        drag(&mut c, (10.0, 500.0), (310.0, 500.0), 0, 16);
        assert_eq!(release(&mut c, Point::new(310.0, 500.0), 32), None);
        assert_eq!(c.on_settle_tick(48), SettleStatus::Settling);
        let stopped = c.offset();

        c.lock();
        assert_eq!(c.state(), DragState::Idle);
        assert_eq!(c.driver().aborts, 1);
        assert_eq!(c.on_settle_tick(64), SettleStatus::Inactive);
        assert_eq!(c.offset(), stopped);
        assert_eq!(c.listener().count(&Event::Opened), 0);
        assert_eq!(c.listener().count(&Event::Closed), 0);
        assert_eq!(
            c.listener().states(),
            [DragState::Dragging, DragState::Settling, DragState::Idle]
        );
    }

    #[test]
    fn rejected_up_keeps_dragging() {
        let mut c = controller(SlideConfig::default());
        let end = Point::new(510.0, 500.0);
        drag(&mut c, (10.0, 500.0), end, 0, 16);

        c.driver_mut().reject_ups = true;
        assert_eq!(release(&mut c, end, 32), None);
        assert_eq!(c.state(), DragState::Dragging);
        assert_eq!(c.offset(), Vec2::new(500.0, 0.0));
        assert!(c.driver().settles.is_empty());

        let nan = Vec2::new(f64::NAN, 0.0);
        assert_eq!(c.on_pointer_up(end, nan, 40), None);
        assert_eq!(c.state(), DragState::Dragging);

        // The gesture is still live, so a clean release is honored.
        c.driver_mut().reject_ups = false;
        assert_eq!(release(&mut c, end, 48), None);
        assert_eq!(c.state(), DragState::Settling);
        assert_eq!(settle(&mut c), Completion::Closed { handled: false });
    }

    #[test]
    fn second_press_releases_previous_drag() {
        let mut c = controller(SlideConfig::default());
        drag(&mut c, (10.0, 500.0), (110.0, 500.0), 0, 16);

        assert!(c.on_pointer_down(Point::new(600.0, 500.0), 32));
        assert_eq!(c.state(), DragState::Settling);
        assert_eq!(c.driver().settles, [(Vec2::new(100.0, 0.0), Vec2::ZERO)]);
        let last = c.driver().processed.last().copied();
        assert_eq!(last, Some(PointerPhase::Cancel));

        // The new press catches the settling panel on its first move.
        assert!(c.on_pointer_move(Point::new(650.0, 500.0), 48));
        assert_eq!(c.state(), DragState::Dragging);
        assert_eq!(c.driver().aborts, 1);
        assert_eq!(c.offset(), Vec2::new(150.0, 0.0));
        assert_eq!(c.listener().count(&Event::Opened), 0);
    }

    #[test]
    fn rejected_move_is_discarded() {
        let mut c = controller(SlideConfig::default());
        drag(&mut c, (10.0, 500.0), (110.0, 500.0), 0, 16);
        c.driver_mut().reject_moves = true;
        assert!(!c.on_pointer_move(Point::new(610.0, 500.0), 32));
        assert_eq!(c.offset(), Vec2::new(100.0, 0.0));
        assert_eq!(c.state(), DragState::Dragging);
    }

    #[test]
    fn non_finite_move_is_discarded() {
        let mut c = controller(SlideConfig::default());
        drag(&mut c, (10.0, 500.0), (110.0, 500.0), 0, 16);
        assert!(!c.on_pointer_move(Point::new(f64::NAN, 500.0), 32));
        assert_eq!(c.offset(), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn scrim_follows_slide_when_enabled() {
        let mut c = controller(SlideConfig::default());
        drag(&mut c, (10.0, 500.0), (510.0, 500.0), 0, 16);
        assert_eq!(c.listener().scrims(), 1);
        assert!((c.scrim_alpha() - 0.4).abs() < 1e-12);
        assert_eq!(c.dirty_region(), Rect::new(0.0, 0.0, 500.0, 2000.0));
        let paint = c.scrim_paint();
        assert_eq!(paint.color, Argb::BLACK);
        assert!((paint.alpha - 0.4).abs() < 1e-12);
        assert_eq!(paint.argb(), Argb(0x6600_0000));

        let config = SlideConfig::builder().enable_scrim(false).build().unwrap();
        let mut c = controller(config);
        drag(&mut c, (10.0, 500.0), (510.0, 500.0), 0, 16);
        assert_eq!(c.listener().scrims(), 0);
        assert_eq!(c.listener().slides().len(), 1);
    }

    #[test]
    fn free_reports_mean_percent_and_vertical_scrim() {
        let config = SlideConfig::builder()
            .position(SlidePosition::Free)
            .scrim_start_alpha(1.0)
            .build()
            .unwrap();
        let mut c = controller(config);
        drag(&mut c, (500.0, 500.0), (700.0, 1500.0), 0, 16);
        assert_eq!(c.offset(), Vec2::new(200.0, 1000.0));
        let slide = c.listener().slides()[0];
        assert!((slide - 0.65).abs() < 1e-12);
        assert!((c.scrim_alpha() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn left_facebook_allowance_resets_on_release() {
        let config = SlideConfig::builder()
            .position(SlidePosition::LeftFacebook)
            .build()
            .unwrap();
        let mut c = controller(config);
        c.on_pointer_down(Point::new(100.0, 500.0), 0);
        c.on_pointer_move(Point::new(200.0, 500.0), 16);
        assert_eq!(c.offset(), Vec2::new(100.0, 0.0));
        c.on_pointer_move(Point::new(-800.0, 500.0), 32);
        assert_eq!(c.offset(), Vec2::new(-500.0, 0.0));
        c.on_pointer_up(Point::new(-800.0, 500.0), Vec2::ZERO, 48);
        assert_eq!(settle(&mut c), Completion::Opened);

        c.on_pointer_down(Point::new(500.0, 500.0), 2000);
        c.on_pointer_move(Point::new(200.0, 500.0), 2016);
        assert_eq!(c.offset(), Vec2::ZERO);
    }

    #[test]
    fn cancel_releases_with_zero_velocity() {
        let mut c = controller(SlideConfig::default());
        drag(&mut c, (10.0, 500.0), (110.0, 500.0), 0, 16);
        assert_eq!(c.on_pointer_cancel(50), None);
        assert_eq!(c.driver().settles, [(Vec2::new(100.0, 0.0), Vec2::ZERO)]);
        let last = c.driver().processed.last().copied();
        assert_eq!(last, Some(PointerPhase::Cancel));
        assert_eq!(settle(&mut c), Completion::Opened);
    }

    #[test]
    fn pointer_events_dispatch_to_handlers() {
        let mut c = controller(SlideConfig::default());
        let start = Point::new(10.0, 500.0);
        let end = Point::new(610.0, 500.0);
        assert!(c.on_pointer_event(&PointerEvent::down(start, 0)));
        assert!(c.on_pointer_event(&PointerEvent::moved(end, 16)));
        assert!(c.on_pointer_event(&PointerEvent::up(end, Vec2::ZERO, 32)));
        assert_eq!(c.state(), DragState::Settling);
        assert!(!c.on_pointer_event(&PointerEvent::cancel(end, 40)));
    }

    #[test]
    fn late_config_only_before_layout() {
        let mut c = SlideController::new(SlideConfig::default(), TestDriver::default(), ());
        let top = SlideConfig::builder()
            .position(SlidePosition::Top)
            .build()
            .unwrap();
        assert_eq!(c.set_late_config(top.clone()), Ok(()));
        assert_eq!(c.config().position(), SlidePosition::Top);
        c.set_bounds(BOUNDS);
        assert_eq!(c.set_late_config(top), Err(SlideError::ConfigLocked));
    }

    #[test]
    fn settle_tick_is_inactive_outside_settling() {
        let mut c = controller(SlideConfig::default());
        assert_eq!(c.on_settle_tick(0), SettleStatus::Inactive);
        drag(&mut c, (10.0, 500.0), (110.0, 500.0), 0, 16);
        assert_eq!(c.on_settle_tick(20), SettleStatus::Inactive);
        assert_eq!(c.state(), DragState::Dragging);
    }

    #[test]
    fn catching_a_settling_panel_resumes_drag() {
        let mut c = controller(SlideConfig::default());
        drag(&mut c, (10.0, 500.0), (310.0, 500.0), 0, 16);
        c.on_pointer_up(Point::new(310.0, 500.0), Vec2::ZERO, 32);
        assert_eq!(c.on_settle_tick(48), SettleStatus::Settling);
        let caught = c.offset();
        c.on_pointer_down(Point::new(400.0, 500.0), 64);
        c.on_pointer_move(Point::new(450.0, 500.0), 80);
        assert_eq!(c.state(), DragState::Dragging);
        assert_eq!(c.driver().aborts, 1);
        assert_eq!(c.offset(), caught + Vec2::new(50.0, 0.0));
        assert_eq!(c.listener().count(&Event::Opened), 0);
    }
}
