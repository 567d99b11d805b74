// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable configuration for a swipe-to-dismiss panel.
//!
//! Build a [`SlideConfig`] once through [`SlideConfig::builder`]. Values that
//! fall outside their documented range are rejected by
//! [`SlideConfigBuilder::build`] rather than clamped.
//!
//! ```
//! use understory_swipe_dismiss::{SlideConfig, SlidePosition};
//!
//! let config = SlideConfig::builder()
//!     .position(SlidePosition::Top)
//!     .distance_threshold(0.3)
//!     .scrim_start_alpha(1.0)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.position(), SlidePosition::Top);
//!
//! assert!(SlideConfig::builder().scrim_end_alpha(1.5).build().is_err());
//! ```

use kurbo::{Point, Rect};
use smallvec::SmallVec;
use thiserror::Error;

use crate::position::{Edges, ReleaseThresholds, SlidePosition};

/// Minimum fling velocity handed to drag drivers, in density-independent
/// units per second.
pub const MIN_FLING_VELOCITY: f64 = 400.0;

/// Opaque ARGB color token.
///
/// The gesture core never interprets colors beyond swapping the alpha channel
/// of the scrim color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Argb(pub u32);

impl Argb {
    /// Opaque black.
    pub const BLACK: Self = Self(0xFF00_0000);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self(0);

    /// Alpha channel.
    pub const fn alpha(self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    /// Same color with the alpha channel replaced.
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self((self.0 & 0x00FF_FFFF) | ((alpha as u32) << 24))
    }
}

/// A configuration value that failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A value that must lie within `[0, 1]` did not.
    #[error("{field} must be within [0, 1], got {value}")]
    UnitRange {
        /// Name of the offending setting.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// The distance threshold must lie strictly between 0 and 1.
    #[error("distance threshold must be within (0, 1), got {0}")]
    DistanceThreshold(f64),
    /// The velocity threshold must be finite and non-negative.
    #[error("velocity threshold must be finite and >= 0, got {0}")]
    VelocityThreshold(f64),
    /// The drag sensitivity must be finite and positive.
    #[error("sensitivity must be finite and positive, got {0}")]
    Sensitivity(f64),
    /// The touch size must be finite.
    #[error("touch size must be finite, got {0}")]
    TouchSize(f64),
}

/// Everything a host needs to configure its drag driver for a panel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DriverSetup {
    /// Edges the driver should track for edge drags.
    pub tracked_edges: Edges,
    /// Touch sensitivity multiplier.
    pub sensitivity: f64,
    /// Touch area size; negative means "driver default".
    pub touch_size: f64,
    /// Minimum fling velocity in pixels per second.
    pub min_fling_velocity: f64,
}

/// Immutable swipe-to-dismiss configuration.
///
/// See [`SlideConfigBuilder`] for the meaning and defaults of each setting.
#[derive(Clone, Debug, PartialEq)]
pub struct SlideConfig {
    primary_color: Option<Argb>,
    secondary_color: Option<Argb>,
    touch_size: f64,
    sensitivity: f64,
    scrim_color: Argb,
    scrim_start_alpha: f64,
    scrim_end_alpha: f64,
    scrim_threshold: f64,
    velocity_threshold: f64,
    distance_threshold: f64,
    edge_only: bool,
    edge_size: f64,
    touch_disabled_regions: SmallVec<[Rect; 4]>,
    position: SlidePosition,
    enable_scrim: bool,
    quick_dismiss: bool,
    time_quick_dismiss: u64,
    dismiss_right_away: bool,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            primary_color: None,
            secondary_color: None,
            touch_size: -1.0,
            sensitivity: 1.0,
            scrim_color: Argb::BLACK,
            scrim_start_alpha: 0.8,
            scrim_end_alpha: 0.0,
            scrim_threshold: 0.0,
            velocity_threshold: 5.0,
            distance_threshold: 0.4,
            edge_only: false,
            edge_size: 0.18,
            touch_disabled_regions: SmallVec::new(),
            position: SlidePosition::Left,
            enable_scrim: true,
            quick_dismiss: false,
            time_quick_dismiss: 0,
            dismiss_right_away: false,
        }
    }
}

impl SlideConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> SlideConfigBuilder {
        SlideConfigBuilder::default()
    }

    /// Color of the screen being returned to, if provided.
    pub fn primary_color(&self) -> Option<Argb> {
        self.primary_color
    }

    /// Color of the screen being dismissed, if provided.
    pub fn secondary_color(&self) -> Option<Argb> {
        self.secondary_color
    }

    /// Touch area size for the drag driver.
    pub fn touch_size(&self) -> f64 {
        self.touch_size
    }

    /// Touch sensitivity for the drag driver.
    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Scrim color; its alpha channel is replaced while compositing.
    pub fn scrim_color(&self) -> Argb {
        self.scrim_color
    }

    /// Scrim alpha with the panel at rest.
    pub fn scrim_start_alpha(&self) -> f64 {
        self.scrim_start_alpha
    }

    /// Scrim alpha with the panel nearly dismissed.
    pub fn scrim_end_alpha(&self) -> f64 {
        self.scrim_end_alpha
    }

    /// Slide percent at or below which the scrim sits at its end alpha.
    pub fn scrim_threshold(&self) -> f64 {
        self.scrim_threshold
    }

    /// Fling speed that dismisses regardless of distance.
    pub fn velocity_threshold(&self) -> f64 {
        self.velocity_threshold
    }

    /// Fraction of the extent a slow release must cross to dismiss.
    pub fn distance_threshold(&self) -> f64 {
        self.distance_threshold
    }

    /// Thresholds used to classify releases.
    pub fn release_thresholds(&self) -> ReleaseThresholds {
        ReleaseThresholds {
            velocity: self.velocity_threshold,
            distance: self.distance_threshold,
        }
    }

    /// Whether drags must start on an edge.
    pub fn is_edge_only(&self) -> bool {
        self.edge_only
    }

    /// Edge band size as a fraction of the extent.
    pub fn edge_size(&self) -> f64 {
        self.edge_size
    }

    /// Edge band size for an extent of `size`.
    pub fn edge_extent(&self, size: f64) -> f64 {
        self.edge_size * size
    }

    /// Regions where a touch-down never starts a drag.
    pub fn touch_disabled_regions(&self) -> &[Rect] {
        &self.touch_disabled_regions
    }

    /// Whether `point` lies strictly inside any touch-disabled region.
    pub fn is_touch_disabled(&self, point: Point) -> bool {
        self.touch_disabled_regions
            .iter()
            .any(|region| strictly_contains(region, point))
    }

    /// Slide position.
    pub fn position(&self) -> SlidePosition {
        self.position
    }

    /// Whether scrim alpha is computed at all.
    pub fn is_scrim_enabled(&self) -> bool {
        self.enable_scrim
    }

    /// Whether short drags end in place on release instead of settling.
    pub fn quick_dismiss(&self) -> bool {
        self.quick_dismiss
    }

    /// Drag duration in milliseconds below which a release skips the settle,
    /// when [`SlideConfig::quick_dismiss`] is set.
    pub fn time_quick_dismiss(&self) -> u64 {
        self.time_quick_dismiss
    }

    /// Whether a dismissing release skips the settle animation.
    pub fn is_dismiss_right_away(&self) -> bool {
        self.dismiss_right_away
    }

    /// Drag driver settings for a display with the given pixel `density`.
    pub fn driver_setup(&self, density: f64) -> DriverSetup {
        DriverSetup {
            tracked_edges: self.position.tracked_edges(),
            sensitivity: self.sensitivity,
            touch_size: self.touch_size,
            min_fling_velocity: MIN_FLING_VELOCITY * density,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        unit_range("scrim start alpha", self.scrim_start_alpha)?;
        unit_range("scrim end alpha", self.scrim_end_alpha)?;
        unit_range("scrim threshold", self.scrim_threshold)?;
        unit_range("edge size", self.edge_size)?;
        if !(self.distance_threshold > 0.0 && self.distance_threshold < 1.0) {
            return Err(ConfigError::DistanceThreshold(self.distance_threshold));
        }
        if !(self.velocity_threshold.is_finite() && self.velocity_threshold >= 0.0) {
            return Err(ConfigError::VelocityThreshold(self.velocity_threshold));
        }
        if !(self.sensitivity.is_finite() && self.sensitivity > 0.0) {
            return Err(ConfigError::Sensitivity(self.sensitivity));
        }
        if !self.touch_size.is_finite() {
            return Err(ConfigError::TouchSize(self.touch_size));
        }
        Ok(())
    }
}

fn strictly_contains(rect: &Rect, point: Point) -> bool {
    point.x > rect.x0 && point.x < rect.x1 && point.y > rect.y0 && point.y < rect.y1
}

fn unit_range(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::UnitRange { field, value })
    }
}

/// Builder for [`SlideConfig`].
#[derive(Clone, Debug, Default)]
pub struct SlideConfigBuilder {
    config: SlideConfig,
}

impl SlideConfigBuilder {
    /// Color of the screen being returned to.
    pub fn primary_color(mut self, color: Argb) -> Self {
        self.config.primary_color = Some(color);
        self
    }

    /// Color of the screen being dismissed.
    pub fn secondary_color(mut self, color: Argb) -> Self {
        self.config.secondary_color = Some(color);
        self
    }

    /// Touch area size for the drag driver. Defaults to `-1.0` (driver default).
    pub fn touch_size(mut self, size: f64) -> Self {
        self.config.touch_size = size;
        self
    }

    /// Touch sensitivity for the drag driver. Defaults to `1.0`.
    pub fn sensitivity(mut self, sensitivity: f64) -> Self {
        self.config.sensitivity = sensitivity;
        self
    }

    /// Scrim color. Defaults to opaque black.
    pub fn scrim_color(mut self, color: Argb) -> Self {
        self.config.scrim_color = color;
        self
    }

    /// Scrim alpha at rest, in `[0, 1]`. Defaults to `0.8`.
    pub fn scrim_start_alpha(mut self, alpha: f64) -> Self {
        self.config.scrim_start_alpha = alpha;
        self
    }

    /// Scrim alpha when nearly dismissed, in `[0, 1]`. Defaults to `0.0`.
    pub fn scrim_end_alpha(mut self, alpha: f64) -> Self {
        self.config.scrim_end_alpha = alpha;
        self
    }

    /// Slide percent below which the scrim holds its end alpha, in `[0, 1]`.
    /// Defaults to `0.0`.
    pub fn scrim_threshold(mut self, threshold: f64) -> Self {
        self.config.scrim_threshold = threshold;
        self
    }

    /// Fling speed that dismisses regardless of distance. Defaults to `5.0`.
    pub fn velocity_threshold(mut self, threshold: f64) -> Self {
        self.config.velocity_threshold = threshold;
        self
    }

    /// Fraction of the extent a slow release must cross, in `(0, 1)`.
    /// Defaults to `0.4`.
    pub fn distance_threshold(mut self, threshold: f64) -> Self {
        self.config.distance_threshold = threshold;
        self
    }

    /// Only capture drags that start on an edge. Defaults to `false`.
    pub fn edge_only(mut self, edge_only: bool) -> Self {
        self.config.edge_only = edge_only;
        self
    }

    /// Edge band as a fraction of the extent, in `[0, 1]`. Defaults to `0.18`.
    pub fn edge_size(mut self, edge_size: f64) -> Self {
        self.config.edge_size = edge_size;
        self
    }

    /// Regions where a touch-down never starts a drag.
    pub fn touch_disabled_regions(mut self, regions: impl IntoIterator<Item = Rect>) -> Self {
        self.config.touch_disabled_regions = regions.into_iter().collect();
        self
    }

    /// Slide position. Defaults to [`SlidePosition::Left`].
    pub fn position(mut self, position: SlidePosition) -> Self {
        self.config.position = position;
        self
    }

    /// Compute scrim alpha while dragging. Defaults to `true`.
    pub fn enable_scrim(mut self, enable: bool) -> Self {
        self.config.enable_scrim = enable;
        self
    }

    /// End drags shorter than `millis` in place on release, without settling.
    /// Defaults to disabled.
    pub fn quick_dismiss(mut self, enable: bool, millis: u64) -> Self {
        self.config.quick_dismiss = enable;
        self.config.time_quick_dismiss = millis;
        self
    }

    /// Skip the settle animation for dismissing releases. Defaults to `false`.
    pub fn dismiss_right_away(mut self, enable: bool) -> Self {
        self.config.dismiss_right_away = enable;
        self
    }

    /// Validate and produce the configuration.
    pub fn build(self) -> Result<SlideConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
