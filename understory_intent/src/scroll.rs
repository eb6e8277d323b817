// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll direction prediction.
//!
//! When the page scrolls, tracked elements move under a stationary pointer.
//! Comparing one element's old and new bounds tells which way the content is
//! travelling; projecting the pointer by a margin in that direction gives a
//! short segment that can be hit-tested like a pointer trajectory.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_intent::scroll::{ScrollDirection, project_scroll_point, scroll_direction};
//!
//! // The element moved up by 40 px: the page scrolled down.
//! let old = Rect::new(0.0, 100.0, 50.0, 150.0);
//! let new = Rect::new(0.0, 60.0, 50.0, 110.0);
//! let direction = scroll_direction(old, new);
//! assert_eq!(direction, Some(ScrollDirection::Down));
//!
//! let projected = project_scroll_point(Point::new(10.0, 10.0), ScrollDirection::Down, 150.0);
//! assert_eq!(projected, Point::new(10.0, 160.0));
//! ```

use kurbo::{Point, Rect};

/// Movements at or below this many pixels are treated as noise.
pub const SCROLL_THRESHOLD: f64 = 1.0;

/// Direction the page is scrolling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    /// Content moves down; the viewport travels up.
    Up,
    /// Content moves up; the viewport travels down.
    Down,
    /// Content moves right; the viewport travels left.
    Left,
    /// Content moves left; the viewport travels right.
    Right,
}

/// Classify the scroll direction from an element's old and new bounds.
///
/// Vertical movement takes priority over horizontal movement. Returns `None`
/// when neither axis moved by more than [`SCROLL_THRESHOLD`].
#[must_use]
pub fn scroll_direction(old: Rect, new: Rect) -> Option<ScrollDirection> {
    let delta_top = new.y0 - old.y0;
    let delta_left = new.x0 - old.x0;

    if delta_top < -SCROLL_THRESHOLD {
        Some(ScrollDirection::Down)
    } else if delta_top > SCROLL_THRESHOLD {
        Some(ScrollDirection::Up)
    } else if delta_left < -SCROLL_THRESHOLD {
        Some(ScrollDirection::Right)
    } else if delta_left > SCROLL_THRESHOLD {
        Some(ScrollDirection::Left)
    } else {
        None
    }
}

/// Returns `true` if `old → new` looks like scrolling: the rectangle moved
/// without changing size.
///
/// Resizes and first layouts change an element's size and are not treated as
/// scroll movement.
#[must_use]
pub fn is_scroll_translation(old: Rect, new: Rect) -> bool {
    old.width() == new.width() && old.height() == new.height() && old != new
}

/// Move `point` by `margin` in the scroll direction.
#[must_use]
pub fn project_scroll_point(point: Point, direction: ScrollDirection, margin: f64) -> Point {
    match direction {
        ScrollDirection::Up => Point::new(point.x, point.y - margin),
        ScrollDirection::Down => Point::new(point.x, point.y + margin),
        ScrollDirection::Left => Point::new(point.x - margin, point.y),
        ScrollDirection::Right => Point::new(point.x + margin, point.y),
    }
}

/// A detected scroll direction and the projected pointer position.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollPrediction {
    /// Detected direction.
    pub direction: ScrollDirection,
    /// Pointer position pushed `margin` pixels along `direction`.
    pub point: Point,
}

/// Per-frame scroll prediction cache.
///
/// The first element that reports movement in a frame decides the direction
/// for the whole frame, including the "no movement" outcome. Call
/// [`ScrollPredictor::end_frame`] once the frame's bounds notifications have
/// been delivered.
#[derive(Clone, Debug, Default)]
pub struct ScrollPredictor {
    frame: Option<Option<ScrollPrediction>>,
}

impl ScrollPredictor {
    /// Create a predictor with an empty frame cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return this frame's prediction, computing it from `old`/`new` if the
    /// frame has none yet.
    ///
    /// The second value is `true` when the prediction was computed by this
    /// call rather than read from the cache.
    pub fn predict(
        &mut self,
        old: Rect,
        new: Rect,
        pointer: Point,
        margin: f64,
    ) -> (Option<ScrollPrediction>, bool) {
        if let Some(cached) = self.frame {
            return (cached, false);
        }
        let prediction = scroll_direction(old, new).map(|direction| ScrollPrediction {
            direction,
            point: project_scroll_point(pointer, direction, margin),
        });
        self.frame = Some(prediction);
        (prediction, true)
    }

    /// The prediction cached for the current frame, if one was computed.
    #[must_use]
    pub fn cached(&self) -> Option<Option<ScrollPrediction>> {
        self.frame
    }

    /// Forget the cached prediction so the next frame recomputes it.
    pub fn end_frame(&mut self) {
        self.frame = None;
    }
}
