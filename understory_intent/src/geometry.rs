// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry helpers for intent hit testing.
//!
//! All functions here are pure and operate on Kurbo types in the same
//! coordinate space as the host's element bounds (typically device pixels).
//!
//! - [`expand`]: grow a rectangle by a [`HitSlop`].
//! - [`point_in_rect`]: inclusive containment test.
//! - [`segment_intersects_rect`]: Liang–Barsky clipping of a segment against a rectangle.
//! - [`rects_equal`]: exact equality, used to skip redundant bounds writes.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_intent::geometry::{HitSlop, expand, point_in_rect, segment_intersects_rect};
//!
//! let rect = Rect::new(100.0, 100.0, 200.0, 200.0);
//! let expanded = expand(rect, HitSlop::uniform(10.0));
//! assert_eq!(expanded, Rect::new(90.0, 90.0, 210.0, 210.0));
//!
//! assert!(point_in_rect(Point::new(210.0, 90.0), expanded));
//! assert!(segment_intersects_rect(
//!     Point::new(0.0, 150.0),
//!     Point::new(300.0, 150.0),
//!     rect,
//! ));
//! ```

use kurbo::{Point, Rect};

/// Smallest allowed hit slop on any side.
pub const MIN_HIT_SLOP: f64 = 0.0;

/// Largest allowed hit slop on any side.
pub const MAX_HIT_SLOP: f64 = 2000.0;

/// Extra margin added around an element's natural bounds.
///
/// Each side is clamped into [`MIN_HIT_SLOP`]..=[`MAX_HIT_SLOP`] when applied.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitSlop {
    /// Margin above the element.
    pub top: f64,
    /// Margin left of the element.
    pub left: f64,
    /// Margin right of the element.
    pub right: f64,
    /// Margin below the element.
    pub bottom: f64,
}

impl HitSlop {
    /// No extra margin.
    pub const ZERO: Self = Self::uniform(0.0);

    /// The same margin on every side.
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            left: value,
            right: value,
            bottom: value,
        }
    }

    /// Returns a copy with every side clamped into the allowed range.
    ///
    /// `NaN` sides become [`MIN_HIT_SLOP`].
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            top: clamp_side(self.top),
            left: clamp_side(self.left),
            right: clamp_side(self.right),
            bottom: clamp_side(self.bottom),
        }
    }
}

impl From<f64> for HitSlop {
    fn from(value: f64) -> Self {
        Self::uniform(value)
    }
}

fn clamp_side(value: f64) -> f64 {
    if value.is_nan() {
        MIN_HIT_SLOP
    } else {
        value.clamp(MIN_HIT_SLOP, MAX_HIT_SLOP)
    }
}

/// Outset `rect` by `slop` on each side.
#[must_use]
pub fn expand(rect: Rect, slop: HitSlop) -> Rect {
    let slop = slop.clamped();
    Rect::new(
        rect.x0 - slop.left,
        rect.y0 - slop.top,
        rect.x1 + slop.right,
        rect.y1 + slop.bottom,
    )
}

/// Returns `true` if `point` lies inside `rect`, edges included.
///
/// Unlike [`Rect::contains`], the right and bottom edges count as inside.
#[must_use]
pub fn point_in_rect(point: Point, rect: Rect) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Returns `true` if any part of the segment `p1 → p2` lies within `rect`.
///
/// This is Liang–Barsky parametric clipping: the segment is parameterized as
/// `p1 + t * (p2 - p1)` for `t` in `[0, 1]` and clipped against the four
/// half-planes of the rectangle. The segment hits when the clipped interval
/// is non-empty. A zero-length segment degenerates to [`point_in_rect`].
#[must_use]
pub fn segment_intersects_rect(p1: Point, p2: Point, rect: Rect) -> bool {
    let d = p2 - p1;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    let edges = [
        (-d.x, p1.x - rect.x0),
        (d.x, rect.x1 - p1.x),
        (-d.y, p1.y - rect.y0),
        (d.y, rect.y1 - p1.y),
    ];

    for (p, q) in edges {
        if p == 0.0 {
            // Parallel to this edge: reject when outside its half-plane.
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return false;
            }
            if r > t0 {
                t0 = r;
            }
        } else {
            if r < t0 {
                return false;
            }
            if r < t1 {
                t1 = r;
            }
        }
    }

    t0 <= t1
}

/// Exact field-wise rectangle equality.
#[must_use]
pub fn rects_equal(a: Rect, b: Rect) -> bool {
    a.x0 == b.x0 && a.y0 == b.y0 && a.x1 == b.x1 && a.y1 == b.y1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains_rect(outer: Rect, inner: Rect) -> bool {
        outer.x0 <= inner.x0 && outer.y0 <= inner.y0 && outer.x1 >= inner.x1 && outer.y1 >= inner.y1
    }

    #[test]
    fn expand_uniform_slop() {
        let rect = Rect::new(100.0, 100.0, 200.0, 200.0);
        assert_eq!(
            expand(rect, HitSlop::from(10.0)),
            Rect::new(90.0, 90.0, 210.0, 210.0)
        );
    }

    #[test]
    fn expand_per_side_slop() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let slop = HitSlop {
            top: 1.0,
            left: 2.0,
            right: 3.0,
            bottom: 4.0,
        };
        assert_eq!(expand(rect, slop), Rect::new(-2.0, -1.0, 13.0, 14.0));
    }

    #[test]
    fn expand_clamps_slop() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let slop = HitSlop {
            top: -5.0,
            left: f64::NAN,
            right: 5_000.0,
            bottom: 0.0,
        };
        assert_eq!(
            expand(rect, slop),
            Rect::new(0.0, 0.0, 10.0 + MAX_HIT_SLOP, 10.0)
        );
    }

    #[test]
    fn expand_always_contains_original() {
        let rects = [
            Rect::new(0.0, 0.0, 0.0, 0.0),
            Rect::new(-50.0, -20.0, 10.0, 30.0),
            Rect::new(100.0, 100.0, 200.0, 200.0),
        ];
        for rect in rects {
            for s in [0.0, 0.5, 1.0, 10.0, 250.0, MAX_HIT_SLOP, 1e9] {
                let expanded = expand(rect, HitSlop::uniform(s));
                assert!(
                    contains_rect(expanded, rect),
                    "expand({rect:?}, {s}) = {expanded:?} does not contain the original"
                );
            }
        }
    }

    #[test]
    fn point_in_rect_is_inclusive() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(point_in_rect(Point::new(0.0, 0.0), rect));
        assert!(point_in_rect(Point::new(10.0, 10.0), rect));
        assert!(point_in_rect(Point::new(10.0, 5.0), rect));
        assert!(point_in_rect(Point::new(5.0, 5.0), rect));
        assert!(!point_in_rect(Point::new(10.1, 5.0), rect));
        assert!(!point_in_rect(Point::new(5.0, -0.1), rect));
    }

    #[test]
    fn segment_crossing_rect() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(segment_intersects_rect(
            Point::new(0.0, 0.0),
            Point::new(30.0, 30.0),
            rect
        ));
        assert!(segment_intersects_rect(
            Point::new(0.0, 15.0),
            Point::new(30.0, 15.0),
            rect
        ));
    }

    #[test]
    fn segment_stopping_short_misses() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(!segment_intersects_rect(
            Point::new(0.0, 15.0),
            Point::new(9.0, 15.0),
            rect
        ));
        assert!(!segment_intersects_rect(
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            rect
        ));
    }

    #[test]
    fn segment_passing_diagonally_beside_rect_misses() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(!segment_intersects_rect(
            Point::new(0.0, 12.0),
            Point::new(12.0, 0.0),
            rect
        ));
    }

    #[test]
    fn axis_parallel_segments() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        // Vertical (dx = 0).
        assert!(segment_intersects_rect(
            Point::new(15.0, 0.0),
            Point::new(15.0, 100.0),
            rect
        ));
        assert!(!segment_intersects_rect(
            Point::new(25.0, 0.0),
            Point::new(25.0, 100.0),
            rect
        ));
        // Horizontal along the bottom edge counts.
        assert!(segment_intersects_rect(
            Point::new(0.0, 20.0),
            Point::new(100.0, 20.0),
            rect
        ));
    }

    #[test]
    fn zero_length_segment_is_point_test() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        let inside = Point::new(12.0, 12.0);
        let outside = Point::new(2.0, 2.0);
        let corner = Point::new(20.0, 20.0);
        assert!(segment_intersects_rect(inside, inside, rect));
        assert!(segment_intersects_rect(corner, corner, rect));
        assert!(!segment_intersects_rect(outside, outside, rect));
    }

    #[test]
    fn segment_test_is_symmetric() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        let points = [
            Point::new(0.0, 0.0),
            Point::new(15.0, 15.0),
            Point::new(30.0, 15.0),
            Point::new(15.0, -5.0),
            Point::new(25.0, 25.0),
            Point::new(9.0, 21.0),
        ];
        for &a in &points {
            for &b in &points {
                assert_eq!(
                    segment_intersects_rect(a, b, rect),
                    segment_intersects_rect(b, a, rect),
                    "asymmetric result for {a:?} and {b:?}"
                );
                if point_in_rect(a, rect) || point_in_rect(b, rect) {
                    assert!(
                        segment_intersects_rect(a, b, rect),
                        "segment {a:?} -> {b:?} has an endpoint inside but missed"
                    );
                }
            }
        }
    }

    #[test]
    fn rects_equal_is_exact() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rects_equal(a, a));
        assert!(!rects_equal(a, Rect::new(0.0, 0.0, 10.0, 10.000_001)));
    }
}
