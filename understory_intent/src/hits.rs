// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Callback hit kinds and counters.

use crate::scroll::ScrollDirection;

/// Which pointer signal fired a callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MouseHit {
    /// The pointer is inside the expanded bounds.
    Hover,
    /// The extrapolated pointer path crosses the expanded bounds.
    Trajectory,
}

/// Direction of sequential focus navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TabDirection {
    /// Tab.
    Forwards,
    /// Shift+Tab.
    Reverse,
}

/// Why a callback fired.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitType {
    /// Pointer hover or trajectory.
    Mouse(MouseHit),
    /// Focus is within the tab offset of the element.
    Tab(TabDirection),
    /// The projected scroll path crosses the element.
    Scroll(ScrollDirection),
}

/// Pointer hit counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MouseHits {
    /// Callbacks fired by hovering.
    pub hover: u64,
    /// Callbacks fired by trajectory prediction.
    pub trajectory: u64,
}

/// Tab hit counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabHits {
    /// Callbacks fired while tabbing forwards.
    pub forwards: u64,
    /// Callbacks fired while tabbing backwards.
    pub reverse: u64,
}

/// Scroll hit counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollHits {
    /// Callbacks fired while scrolling up.
    pub up: u64,
    /// Callbacks fired while scrolling down.
    pub down: u64,
    /// Callbacks fired while scrolling left.
    pub left: u64,
    /// Callbacks fired while scrolling right.
    pub right: u64,
}

/// Monotonic callback counters, kept per element and globally.
///
/// ```
/// use understory_intent::{CallbackHits, HitType, MouseHit};
///
/// let mut hits = CallbackHits::default();
/// hits.record(HitType::Mouse(MouseHit::Hover));
/// hits.record(HitType::Mouse(MouseHit::Hover));
/// assert_eq!(hits.mouse.hover, 2);
/// assert_eq!(hits.total, 2);
/// assert_eq!(hits.count(HitType::Mouse(MouseHit::Trajectory)), 0);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallbackHits {
    /// Pointer hits.
    pub mouse: MouseHits,
    /// Tab hits.
    pub tab: TabHits,
    /// Scroll hits.
    pub scroll: ScrollHits,
    /// Sum of every counter above.
    pub total: u64,
}

impl CallbackHits {
    /// Count one callback of the given type.
    pub fn record(&mut self, hit: HitType) {
        *self.slot_mut(hit) += 1;
        self.total += 1;
    }

    /// Current count for one hit type.
    #[must_use]
    pub fn count(&self, hit: HitType) -> u64 {
        match hit {
            HitType::Mouse(MouseHit::Hover) => self.mouse.hover,
            HitType::Mouse(MouseHit::Trajectory) => self.mouse.trajectory,
            HitType::Tab(TabDirection::Forwards) => self.tab.forwards,
            HitType::Tab(TabDirection::Reverse) => self.tab.reverse,
            HitType::Scroll(ScrollDirection::Up) => self.scroll.up,
            HitType::Scroll(ScrollDirection::Down) => self.scroll.down,
            HitType::Scroll(ScrollDirection::Left) => self.scroll.left,
            HitType::Scroll(ScrollDirection::Right) => self.scroll.right,
        }
    }

    fn slot_mut(&mut self, hit: HitType) -> &mut u64 {
        match hit {
            HitType::Mouse(MouseHit::Hover) => &mut self.mouse.hover,
            HitType::Mouse(MouseHit::Trajectory) => &mut self.mouse.trajectory,
            HitType::Tab(TabDirection::Forwards) => &mut self.tab.forwards,
            HitType::Tab(TabDirection::Reverse) => &mut self.tab.reverse,
            HitType::Scroll(ScrollDirection::Up) => &mut self.scroll.up,
            HitType::Scroll(ScrollDirection::Down) => &mut self.scroll.down,
            HitType::Scroll(ScrollDirection::Left) => &mut self.scroll.left,
            HitType::Scroll(ScrollDirection::Right) => &mut self.scroll.right,
        }
    }
}
