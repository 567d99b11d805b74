// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swipe-to-dismiss: drive a panel through a few scripted gestures.
//!
//! This example shows how to combine:
//! - a host-side `DragDriver` that eases the panel towards its settle target,
//! - a `SlideListener` that prints slide progress and the scrim alpha,
//! - the frame loop that ticks `on_settle_tick` until the gesture completes.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example swipe_dismiss_trace`

use kurbo::{Point, Size, Vec2};
use understory_swipe_dismiss::{
    Completion, DragDriver, DragState, DriverError, PointerEvent, SettleStatus, SettleStep,
    SlideConfig, SlideController, SlideError, SlideListener, SlidePosition, to_alpha_u8,
};

/// Eases a fixed fraction of the remaining distance each frame.
#[derive(Debug, Default)]
struct EasingDriver {
    current: Vec2,
    target: Option<Vec2>,
}

impl DragDriver for EasingDriver {
    fn should_intercept(&mut self, _event: &PointerEvent) -> Result<bool, DriverError> {
        Ok(true)
    }

    fn process_event(&mut self, event: &PointerEvent) -> Result<(), DriverError> {
        if event.position.is_finite() {
            Ok(())
        } else {
            Err(DriverError::InvalidEvent)
        }
    }

    fn settle_to(&mut self, from: Vec2, target: Vec2) -> bool {
        self.current = from;
        self.target = Some(target);
        from != target
    }

    fn continue_settling(&mut self) -> SettleStep {
        let Some(target) = self.target else {
            return SettleStep::Finished(self.current);
        };
        let remaining = target - self.current;
        if remaining.hypot() < 1.0 {
            self.target = None;
            self.current = target;
            SettleStep::Finished(target)
        } else {
            self.current += remaining * 0.35;
            SettleStep::Moving(self.current)
        }
    }

    fn abort(&mut self) {
        self.target = None;
    }
}

/// Prints every callback.
struct Printer;

impl SlideListener for Printer {
    fn on_state_changed(&mut self, state: DragState) {
        println!("  state   -> {state:?}");
    }

    fn on_slide_change(&mut self, percent: f64) {
        println!("  slide   {percent:.3}");
    }

    fn on_apply_scrim(&mut self, alpha: f64) {
        println!("  scrim   {alpha:.3} (0x{:02X})", to_alpha_u8(alpha));
    }

    fn on_opened(&mut self) {
        println!("  opened");
    }

    fn on_closed(&mut self) -> bool {
        println!("  closed");
        false
    }
}

fn run_gesture(
    panel: &mut SlideController<EasingDriver, Printer>,
    label: &str,
    path: &[Point],
    velocity: Vec2,
) {
    println!("\n== {label} ==");
    let mut time = 0;
    let Some((first, rest)) = path.split_first() else {
        return;
    };
    panel.on_pointer_down(*first, time);
    for point in rest {
        time += 16;
        panel.on_pointer_move(*point, time);
    }
    let last = path.last().copied().unwrap_or(*first);
    time += 16;
    let mut completion = panel.on_pointer_up(last, velocity, time);
    while completion.is_none() {
        time += 16;
        match panel.on_settle_tick(time) {
            SettleStatus::Complete(done) => completion = Some(done),
            SettleStatus::Settling => {}
            SettleStatus::Inactive => break,
        }
    }
    match completion {
        Some(done @ Completion::Closed { .. }) if done.needs_default_dismiss() => {
            println!("  host dismisses the panel at {:?}", panel.offset());
        }
        Some(done) => println!("  finished: {done:?}"),
        None => println!("  gesture was not captured"),
    }
}

fn main() -> Result<(), SlideError> {
    env_logger::init();

    let bounds = Size::new(400.0, 800.0);

    let mut panel = SlideController::new(SlideConfig::default(), EasingDriver::default(), Printer);
    panel.set_late_config(
        SlideConfig::builder()
            .position(SlidePosition::Left)
            .scrim_start_alpha(0.6)
            .build()?,
    )?;
    panel.set_bounds(bounds);

    run_gesture(
        &mut panel,
        "short drag snaps back",
        &[Point::new(20.0, 300.0), Point::new(80.0, 300.0), Point::new(120.0, 300.0)],
        Vec2::ZERO,
    );
    run_gesture(
        &mut panel,
        "slow drag past 40% dismisses",
        &[Point::new(20.0, 300.0), Point::new(120.0, 300.0), Point::new(220.0, 300.0)],
        Vec2::ZERO,
    );

    let vertical = SlideConfig::builder()
        .position(SlidePosition::Vertical)
        .scrim_threshold(0.5)
        .build()?;
    let mut sheet = SlideController::new(vertical, EasingDriver::default(), Printer);
    sheet.set_bounds(bounds);
    run_gesture(
        &mut sheet,
        "upward fling dismisses a vertical sheet",
        &[Point::new(200.0, 600.0), Point::new(200.0, 560.0)],
        Vec2::new(0.0, -1200.0),
    );

    sheet.lock();
    run_gesture(
        &mut sheet,
        "locked sheet ignores the pointer",
        &[Point::new(200.0, 600.0), Point::new(200.0, 300.0)],
        Vec2::ZERO,
    );
    Ok(())
}
