// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validated intent settings.
//!
//! [`Settings`] is plain data with read-only accessors. The only way to change
//! it is [`Settings::apply`] with a [`SettingsUpdate`], which compares each
//! provided field against the current value, clamps numeric fields into their
//! [`limits`], and reports what actually changed as [`SettingsChanges`].
//!
//! ```
//! use understory_intent::settings::{Settings, SettingsChanges, SettingsUpdate, limits};
//!
//! let mut settings = Settings::default();
//! let changed = settings.apply(SettingsUpdate {
//!     tab_offset: Some(100),
//!     enable_tab_prediction: Some(true),
//!     ..SettingsUpdate::default()
//! });
//!
//! // Tab prediction was already on, so only the offset changed, clamped to its maximum.
//! assert_eq!(changed, SettingsChanges::TAB_OFFSET);
//! assert_eq!(settings.tab_offset(), limits::TAB_OFFSET.max);
//! ```

use crate::geometry::HitSlop;

/// Inclusive range and default for one numeric setting.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Limit<T> {
    /// Smallest accepted value.
    pub min: T,
    /// Largest accepted value.
    pub max: T,
    /// Value used by [`Settings::default`].
    pub default: T,
}

impl<T: PartialOrd + Copy> Limit<T> {
    /// Clamp `value` into `min..=max`.
    ///
    /// Values that compare as neither below nor above (for example `NaN`)
    /// fall back to the default.
    #[must_use]
    pub fn clamp(&self, value: T) -> T {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else if value >= self.min && value <= self.max {
            value
        } else {
            self.default
        }
    }
}

/// Clamp ranges and defaults for every numeric setting.
pub mod limits {
    use super::Limit;

    /// Number of pointer samples kept for trajectory prediction.
    pub const POSITION_HISTORY_SIZE: Limit<usize> = Limit {
        min: 2,
        max: 30,
        default: 8,
    };

    /// How far ahead the pointer trajectory is extrapolated, in milliseconds.
    pub const TRAJECTORY_PREDICTION_TIME: Limit<u32> = Limit {
        min: 10,
        max: 200,
        default: 120,
    };

    /// Distance the pointer is projected along the scroll direction, in pixels.
    pub const SCROLL_MARGIN: Limit<f64> = Limit {
        min: 30.0,
        max: 300.0,
        default: 150.0,
    };

    /// Number of focus stops beyond the focused element that are predicted.
    pub const TAB_OFFSET: Limit<usize> = Limit {
        min: 0,
        max: 20,
        default: 2,
    };
}

bitflags::bitflags! {
    /// Which settings changed in one [`Settings::apply`] call.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SettingsChanges: u16 {
        /// `position_history_size` changed.
        const POSITION_HISTORY_SIZE      = 1 << 0;
        /// `trajectory_prediction_time` changed.
        const TRAJECTORY_PREDICTION_TIME = 1 << 1;
        /// `scroll_margin` changed.
        const SCROLL_MARGIN              = 1 << 2;
        /// `tab_offset` changed.
        const TAB_OFFSET                 = 1 << 3;
        /// `enable_mouse_prediction` changed.
        const MOUSE_PREDICTION           = 1 << 4;
        /// `enable_tab_prediction` changed.
        const TAB_PREDICTION             = 1 << 5;
        /// `enable_scroll_prediction` changed.
        const SCROLL_PREDICTION          = 1 << 6;
        /// `debug` changed.
        const DEBUG                      = 1 << 7;
        /// `default_hit_slop` changed.
        const DEFAULT_HIT_SLOP           = 1 << 8;
    }
}

/// Global intent settings.
///
/// Values are always within their [`limits`]. With the `serde` feature,
/// deserialization goes through [`SettingsUpdate`] and is clamped the same way.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "SettingsUpdate")
)]
pub struct Settings {
    position_history_size: usize,
    trajectory_prediction_time: u32,
    scroll_margin: f64,
    tab_offset: usize,
    enable_mouse_prediction: bool,
    enable_tab_prediction: bool,
    enable_scroll_prediction: bool,
    debug: bool,
    default_hit_slop: HitSlop,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            position_history_size: limits::POSITION_HISTORY_SIZE.default,
            trajectory_prediction_time: limits::TRAJECTORY_PREDICTION_TIME.default,
            scroll_margin: limits::SCROLL_MARGIN.default,
            tab_offset: limits::TAB_OFFSET.default,
            enable_mouse_prediction: true,
            enable_tab_prediction: true,
            enable_scroll_prediction: true,
            debug: false,
            default_hit_slop: HitSlop::ZERO,
        }
    }
}

/// A partial settings change. `None` fields are left alone.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SettingsUpdate {
    /// See [`Settings::position_history_size`].
    pub position_history_size: Option<usize>,
    /// See [`Settings::trajectory_prediction_time`].
    pub trajectory_prediction_time: Option<u32>,
    /// See [`Settings::scroll_margin`].
    pub scroll_margin: Option<f64>,
    /// See [`Settings::tab_offset`].
    pub tab_offset: Option<usize>,
    /// See [`Settings::enable_mouse_prediction`].
    pub enable_mouse_prediction: Option<bool>,
    /// See [`Settings::enable_tab_prediction`].
    pub enable_tab_prediction: Option<bool>,
    /// See [`Settings::enable_scroll_prediction`].
    pub enable_scroll_prediction: Option<bool>,
    /// See [`Settings::debug`].
    pub debug: Option<bool>,
    /// See [`Settings::default_hit_slop`].
    pub default_hit_slop: Option<HitSlop>,
}

impl Settings {
    /// Pointer samples kept for trajectory prediction.
    #[must_use]
    pub fn position_history_size(&self) -> usize {
        self.position_history_size
    }

    /// Trajectory look-ahead in milliseconds.
    #[must_use]
    pub fn trajectory_prediction_time(&self) -> u32 {
        self.trajectory_prediction_time
    }

    /// Scroll projection distance in pixels.
    #[must_use]
    pub fn scroll_margin(&self) -> f64 {
        self.scroll_margin
    }

    /// Focus stops predicted beyond the focused element.
    #[must_use]
    pub fn tab_offset(&self) -> usize {
        self.tab_offset
    }

    /// Whether pointer trajectory prediction is on.
    #[must_use]
    pub fn enable_mouse_prediction(&self) -> bool {
        self.enable_mouse_prediction
    }

    /// Whether tab prediction is on.
    #[must_use]
    pub fn enable_tab_prediction(&self) -> bool {
        self.enable_tab_prediction
    }

    /// Whether scroll prediction is on.
    #[must_use]
    pub fn enable_scroll_prediction(&self) -> bool {
        self.enable_scroll_prediction
    }

    /// Whether diagnostics are logged.
    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Hit slop for elements registered without their own.
    #[must_use]
    pub fn default_hit_slop(&self) -> HitSlop {
        self.default_hit_slop
    }

    /// Apply a partial update and report which fields changed.
    ///
    /// Numeric values are clamped before comparison. In debug mode (after the
    /// update's own `debug` field is applied) each clamp logs a warning.
    pub fn apply(&mut self, update: SettingsUpdate) -> SettingsChanges {
        let mut changed = SettingsChanges::empty();

        if let Some(debug) = update.debug {
            if debug != self.debug {
                self.debug = debug;
                changed |= SettingsChanges::DEBUG;
            }
        }
        let debug = self.debug;

        if let Some(value) = update.position_history_size {
            let value = clamped(
                "position_history_size",
                limits::POSITION_HISTORY_SIZE,
                value,
                debug,
            );
            if value != self.position_history_size {
                self.position_history_size = value;
                changed |= SettingsChanges::POSITION_HISTORY_SIZE;
            }
        }

        if let Some(value) = update.trajectory_prediction_time {
            let value = clamped(
                "trajectory_prediction_time",
                limits::TRAJECTORY_PREDICTION_TIME,
                value,
                debug,
            );
            if value != self.trajectory_prediction_time {
                self.trajectory_prediction_time = value;
                changed |= SettingsChanges::TRAJECTORY_PREDICTION_TIME;
            }
        }

        if let Some(value) = update.scroll_margin {
            let value = clamped("scroll_margin", limits::SCROLL_MARGIN, value, debug);
            if value != self.scroll_margin {
                self.scroll_margin = value;
                changed |= SettingsChanges::SCROLL_MARGIN;
            }
        }

        if let Some(value) = update.tab_offset {
            let value = clamped("tab_offset", limits::TAB_OFFSET, value, debug);
            if value != self.tab_offset {
                self.tab_offset = value;
                changed |= SettingsChanges::TAB_OFFSET;
            }
        }

        if let Some(value) = update.enable_mouse_prediction {
            if value != self.enable_mouse_prediction {
                self.enable_mouse_prediction = value;
                changed |= SettingsChanges::MOUSE_PREDICTION;
            }
        }

        if let Some(value) = update.enable_tab_prediction {
            if value != self.enable_tab_prediction {
                self.enable_tab_prediction = value;
                changed |= SettingsChanges::TAB_PREDICTION;
            }
        }

        if let Some(value) = update.enable_scroll_prediction {
            if value != self.enable_scroll_prediction {
                self.enable_scroll_prediction = value;
                changed |= SettingsChanges::SCROLL_PREDICTION;
            }
        }

        if let Some(slop) = update.default_hit_slop {
            let value = slop.clamped();
            if debug && value != slop {
                tracing::warn!(setting = "default_hit_slop", ?slop, ?value, "setting clamped");
            }
            if value != self.default_hit_slop {
                self.default_hit_slop = value;
                changed |= SettingsChanges::DEFAULT_HIT_SLOP;
            }
        }

        changed
    }
}

impl From<SettingsUpdate> for Settings {
    /// Defaults overridden by `update`, clamped as by [`Settings::apply`].
    fn from(update: SettingsUpdate) -> Self {
        let mut settings = Self::default();
        settings.apply(update);
        settings
    }
}

fn clamped<T>(name: &'static str, limit: Limit<T>, requested: T, debug: bool) -> T
where
    T: PartialOrd + Copy + core::fmt::Debug,
{
    let value = limit.clamp(requested);
    if debug && value != requested {
        tracing::warn!(
            setting = name,
            ?requested,
            ?value,
            min = ?limit.min,
            max = ?limit.max,
            "setting clamped"
        );
    }
    value
}
