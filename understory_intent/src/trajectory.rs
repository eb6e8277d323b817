// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer trajectory prediction.
//!
//! The predictor keeps a short FIFO of recent pointer samples and extrapolates
//! linearly from the oldest to the newest retained sample. Using the whole
//! window rather than the last two samples smooths out pointer jitter at the
//! cost of reacting a little later to sharp turns.
//!
//! ```
//! use kurbo::Point;
//! use understory_intent::trajectory::TrajectoryState;
//!
//! let mut trajectory = TrajectoryState::new();
//! trajectory.update(Point::new(0.0, 0.0), 1_000, 8, 100);
//! let predicted = trajectory.update(Point::new(100.0, 0.0), 1_016, 8, 100);
//!
//! // 100 px in 16 ms, projected 100 ms ahead of the last sample.
//! assert!((predicted.x - 725.0).abs() < 1e-9);
//! assert_eq!(predicted.y, 0.0);
//! ```

use alloc::collections::VecDeque;

use kurbo::Point;

/// One recorded pointer position.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerSample {
    /// Pointer position.
    pub point: Point,
    /// Host timestamp in milliseconds.
    pub time: u64,
}

/// Record `point` at `now` and extrapolate where the pointer will be
/// `prediction_time` milliseconds later.
///
/// The history is trimmed from the front so that it holds at most
/// `history_size` samples. With fewer than two samples, or when the oldest and
/// newest samples share a timestamp, `point` is returned unchanged.
pub fn predict_next_position(
    point: Point,
    now: u64,
    history: &mut VecDeque<PointerSample>,
    history_size: usize,
    prediction_time: u32,
) -> Point {
    history.push_back(PointerSample { point, time: now });
    trim_history(history, history_size);

    if history.len() < 2 {
        return point;
    }
    let (Some(oldest), Some(newest)) = (history.front(), history.back()) else {
        return point;
    };
    let dt = newest.time.saturating_sub(oldest.time);
    if dt == 0 {
        return point;
    }

    let velocity = (newest.point - oldest.point) / dt as f64;
    point + velocity * f64::from(prediction_time)
}

fn trim_history(history: &mut VecDeque<PointerSample>, history_size: usize) {
    while history.len() > history_size {
        history.pop_front();
    }
}

/// Pointer history plus the latest current and predicted points.
#[derive(Clone, Debug, Default)]
pub struct TrajectoryState {
    positions: VecDeque<PointerSample>,
    current: Option<Point>,
    predicted: Option<Point>,
}

impl TrajectoryState {
    /// Create an empty trajectory with no known pointer position.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer move and return the predicted point.
    ///
    /// See [`predict_next_position`] for the extrapolation rules.
    pub fn update(
        &mut self,
        point: Point,
        now: u64,
        history_size: usize,
        prediction_time: u32,
    ) -> Point {
        let predicted = predict_next_position(
            point,
            now,
            &mut self.positions,
            history_size,
            prediction_time,
        );
        self.current = Some(point);
        self.predicted = Some(predicted);
        predicted
    }

    /// Record a pointer move without extrapolating.
    ///
    /// The sample still enters the history so that prediction has data to
    /// work with as soon as it is enabled again.
    pub fn record(&mut self, point: Point, now: u64, history_size: usize) {
        self.positions.push_back(PointerSample { point, time: now });
        trim_history(&mut self.positions, history_size);
        self.current = Some(point);
        self.predicted = Some(point);
    }

    /// Drop the oldest samples until at most `history_size` remain.
    pub fn trim_to(&mut self, history_size: usize) {
        trim_history(&mut self.positions, history_size);
    }

    /// Collapse the predicted point onto the current point.
    pub fn reset_prediction(&mut self) {
        self.predicted = self.current;
    }

    /// Forget all samples and points.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.current = None;
        self.predicted = None;
    }

    /// The last recorded pointer position, if any.
    #[must_use]
    pub fn current(&self) -> Option<Point> {
        self.current
    }

    /// The last predicted pointer position, if any.
    #[must_use]
    pub fn predicted(&self) -> Option<Point> {
        self.predicted
    }

    /// Retained samples, oldest first.
    pub fn samples(&self) -> impl ExactSizeIterator<Item = &PointerSample> + '_ {
        self.positions.iter()
    }

    /// Number of retained samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if no samples are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
