// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracked elements and their interaction state machine.
//!
//! Each registered element is handled by one of two policies, chosen by
//! [`TrackedElement::unregister_on_callback`]:
//!
//! - **Single-fire**: no persisted interaction state. With prediction on, the
//!   first move whose current-to-predicted segment touches the element fires
//!   it; with prediction off, the first hover does. The manager then drops
//!   the element.
//! - **Persistent**: edge-triggered. The callback fires when hover goes from
//!   `false` to `true`, or when a trajectory/scroll hit starts. An active hit
//!   expires [`TRAJECTORY_HIT_EXPIRATION_MS`] after it was last confirmed.
//!
//! The methods here only compute transitions and return the [`HitType`] to
//! fire; invoking callbacks and counting hits is the manager's job.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use kurbo::{Point, Rect};

use crate::geometry::{HitSlop, expand, point_in_rect, rects_equal, segment_intersects_rect};
use crate::hits::{CallbackHits, HitType, MouseHit};
use crate::scroll::ScrollDirection;

/// How long a trajectory hit stays active without re-confirmation.
pub const TRAJECTORY_HIT_EXPIRATION_MS: u64 = 200;

/// An element callback.
pub type Callback = Box<dyn FnMut()>;

/// Options for [`IntentManager::register`](crate::IntentManager::register).
#[derive(Clone, Debug, PartialEq)]
pub struct RegisterOptions {
    /// Per-element hit slop. `None` follows the global default.
    pub hit_slop: Option<HitSlop>,
    /// Diagnostic label.
    pub name: String,
    /// Drop the element after its first callback.
    pub unregister_on_callback: bool,
}

impl Default for RegisterOptions {
    fn default() -> Self {
        Self {
            hit_slop: None,
            name: String::new(),
            unregister_on_callback: true,
        }
    }
}

impl RegisterOptions {
    /// Single-fire options with no name and the default hit slop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit hit slop.
    #[must_use]
    pub fn hit_slop(mut self, slop: impl Into<HitSlop>) -> Self {
        self.hit_slop = Some(slop.into());
        self
    }

    /// Set the diagnostic name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Keep the element registered after its callback fires.
    #[must_use]
    pub fn persistent(mut self) -> Self {
        self.unregister_on_callback = false;
        self
    }
}

/// Natural and expanded bounds of an element.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementBounds {
    original: Rect,
    expanded: Rect,
    hit_slop: HitSlop,
}

impl ElementBounds {
    /// Bounds for `original` grown by `hit_slop`.
    #[must_use]
    pub fn new(original: Rect, hit_slop: HitSlop) -> Self {
        let hit_slop = hit_slop.clamped();
        Self {
            original,
            expanded: expand(original, hit_slop),
            hit_slop,
        }
    }

    /// Bounds as reported by the host.
    #[must_use]
    pub fn original(&self) -> Rect {
        self.original
    }

    /// Bounds after hit slop; this is what hit tests use.
    #[must_use]
    pub fn expanded(&self) -> Rect {
        self.expanded
    }

    /// Hit slop currently applied.
    #[must_use]
    pub fn hit_slop(&self) -> HitSlop {
        self.hit_slop
    }

    /// Replace the natural bounds. Returns `false` if they were unchanged.
    pub fn set_original(&mut self, original: Rect) -> bool {
        if rects_equal(self.original, original) {
            return false;
        }
        self.original = original;
        self.expanded = expand(original, self.hit_slop);
        true
    }

    /// Replace the hit slop. Returns `false` if it was unchanged.
    pub fn set_hit_slop(&mut self, hit_slop: HitSlop) -> bool {
        let hit_slop = hit_slop.clamped();
        if hit_slop == self.hit_slop {
            return false;
        }
        self.hit_slop = hit_slop;
        self.expanded = expand(self.original, hit_slop);
        true
    }
}

/// A pending expiration for an active trajectory hit.
///
/// Replacing or dropping the handle cancels the expiration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpirationHandle {
    /// Host time (ms) at which the hit clears.
    pub deadline: u64,
}

/// Trajectory hit state of a persistent element.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrajectoryHitData {
    /// A predicted hit is active.
    pub is_trajectory_hit: bool,
    /// Host time of the transition that started the active hit.
    pub hit_time: Option<u64>,
    /// When the active hit clears unless re-confirmed.
    pub expiration: Option<ExpirationHandle>,
}

impl TrajectoryHitData {
    fn start(&mut self, now: u64) {
        self.is_trajectory_hit = true;
        self.hit_time = Some(now);
        self.expiration = Some(ExpirationHandle {
            deadline: now.saturating_add(TRAJECTORY_HIT_EXPIRATION_MS),
        });
    }

    fn confirm(&mut self, now: u64) {
        self.expiration = Some(ExpirationHandle {
            deadline: now.saturating_add(TRAJECTORY_HIT_EXPIRATION_MS),
        });
    }

    /// Clear the hit and cancel its expiration.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Clear the hit if its deadline is at or before `now`.
    pub(crate) fn expire(&mut self, now: u64) -> bool {
        match self.expiration {
            Some(handle) if handle.deadline <= now => {
                self.clear();
                true
            }
            _ => false,
        }
    }
}

/// One registered element.
pub struct TrackedElement {
    callback: Callback,
    pub(crate) bounds: ElementBounds,
    pub(crate) uses_default_hit_slop: bool,
    pub(crate) is_hovering: bool,
    pub(crate) trajectory_hit: TrajectoryHitData,
    pub(crate) is_intersecting_viewport: bool,
    pub(crate) unregister_on_callback: bool,
    pub(crate) name: String,
    pub(crate) callback_hits: CallbackHits,
}

impl fmt::Debug for TrackedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedElement")
            .field("name", &self.name)
            .field("bounds", &self.bounds)
            .field("uses_default_hit_slop", &self.uses_default_hit_slop)
            .field("is_hovering", &self.is_hovering)
            .field("trajectory_hit", &self.trajectory_hit)
            .field("is_intersecting_viewport", &self.is_intersecting_viewport)
            .field("unregister_on_callback", &self.unregister_on_callback)
            .field("callback_hits", &self.callback_hits)
            .finish_non_exhaustive()
    }
}

impl TrackedElement {
    pub(crate) fn new(
        callback: Callback,
        rect: Rect,
        options: RegisterOptions,
        default_hit_slop: HitSlop,
    ) -> Self {
        let uses_default_hit_slop = options.hit_slop.is_none();
        let slop = options.hit_slop.unwrap_or(default_hit_slop);
        Self {
            callback,
            bounds: ElementBounds::new(rect, slop),
            uses_default_hit_slop,
            is_hovering: false,
            trajectory_hit: TrajectoryHitData::default(),
            is_intersecting_viewport: true,
            unregister_on_callback: options.unregister_on_callback,
            name: options.name,
            callback_hits: CallbackHits::default(),
        }
    }

    /// Diagnostic label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Natural and expanded bounds.
    #[must_use]
    pub fn bounds(&self) -> &ElementBounds {
        &self.bounds
    }

    /// Whether the element follows the global default hit slop.
    #[must_use]
    pub fn uses_default_hit_slop(&self) -> bool {
        self.uses_default_hit_slop
    }

    /// Whether the last known pointer position is inside the expanded bounds.
    #[must_use]
    pub fn is_hovering(&self) -> bool {
        self.is_hovering
    }

    /// Trajectory hit state.
    #[must_use]
    pub fn trajectory_hit(&self) -> &TrajectoryHitData {
        &self.trajectory_hit
    }

    /// Whether the element participates in per-move hit testing.
    #[must_use]
    pub fn is_intersecting_viewport(&self) -> bool {
        self.is_intersecting_viewport
    }

    /// Whether the element is dropped after its first callback.
    #[must_use]
    pub fn unregister_on_callback(&self) -> bool {
        self.unregister_on_callback
    }

    /// Callbacks fired for this element, by type.
    #[must_use]
    pub fn callback_hits(&self) -> &CallbackHits {
        &self.callback_hits
    }

    /// Count `hit` and run the user callback.
    pub(crate) fn invoke(&mut self, hit: HitType) {
        self.callback_hits.record(hit);
        (self.callback)();
    }

    /// Evaluate a pointer move.
    pub(crate) fn on_pointer_move(
        &mut self,
        current: Point,
        predicted: Point,
        prediction_enabled: bool,
        now: u64,
    ) -> Option<HitType> {
        let expanded = self.bounds.expanded;
        let hovering = point_in_rect(current, expanded);

        if self.unregister_on_callback {
            self.is_hovering = hovering;
            // With prediction on, the segment test also covers a pointer
            // that is already inside.
            return if prediction_enabled {
                segment_intersects_rect(current, predicted, expanded)
                    .then_some(HitType::Mouse(MouseHit::Trajectory))
            } else {
                hovering.then_some(HitType::Mouse(MouseHit::Hover))
            };
        }

        let was_hovering = core::mem::replace(&mut self.is_hovering, hovering);
        if hovering {
            return (!was_hovering).then_some(HitType::Mouse(MouseHit::Hover));
        }
        if !prediction_enabled || !segment_intersects_rect(current, predicted, expanded) {
            return None;
        }
        if self.trajectory_hit.is_trajectory_hit {
            self.trajectory_hit.confirm(now);
            return None;
        }
        self.trajectory_hit.start(now);
        Some(HitType::Mouse(MouseHit::Trajectory))
    }

    /// Evaluate a projected scroll segment after the element moved.
    pub(crate) fn on_scroll(
        &mut self,
        current: Point,
        projected: Point,
        direction: ScrollDirection,
        now: u64,
    ) -> Option<HitType> {
        if !segment_intersects_rect(current, projected, self.bounds.expanded) {
            return None;
        }
        let hit = HitType::Scroll(direction);
        if self.unregister_on_callback {
            return Some(hit);
        }
        if self.is_hovering || self.trajectory_hit.is_trajectory_hit {
            return None;
        }
        self.trajectory_hit.start(now);
        Some(hit)
    }

    /// Recompute `is_hovering` for a pointer at `current`.
    pub(crate) fn sync_hovering(&mut self, current: Point) {
        self.is_hovering = point_in_rect(current, self.bounds.expanded);
    }

    /// Plain hover test against the current bounds.
    pub(crate) fn on_hover_check(&mut self, current: Point) -> Option<HitType> {
        let hovering = point_in_rect(current, self.bounds.expanded);
        let was_hovering = core::mem::replace(&mut self.is_hovering, hovering);
        let fire = if self.unregister_on_callback {
            hovering
        } else {
            hovering && !was_hovering
        };
        fire.then_some(HitType::Mouse(MouseHit::Hover))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;

    fn element(persistent: bool) -> (TrackedElement, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut options = RegisterOptions::new().name("target");
        if persistent {
            options = options.persistent();
        }
        let el = TrackedElement::new(
            Box::new(move || counter.set(counter.get() + 1)),
            Rect::new(100.0, 100.0, 200.0, 200.0),
            options,
            HitSlop::ZERO,
        );
        (el, calls)
    }

    const FAR: Point = Point::new(0.0, 150.0);
    const TOWARDS: Point = Point::new(300.0, 150.0);
    const AWAY: Point = Point::new(-300.0, 150.0);
    const INSIDE: Point = Point::new(150.0, 150.0);

    #[test]
    fn bounds_track_slop_and_rect_changes() {
        let mut bounds = ElementBounds::new(
            Rect::new(100.0, 100.0, 200.0, 200.0),
            HitSlop::uniform(10.0),
        );
        assert_eq!(bounds.expanded(), Rect::new(90.0, 90.0, 210.0, 210.0));

        assert!(!bounds.set_original(Rect::new(100.0, 100.0, 200.0, 200.0)));
        assert!(bounds.set_original(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(bounds.expanded(), Rect::new(-10.0, -10.0, 20.0, 20.0));

        assert!(bounds.set_hit_slop(HitSlop::ZERO));
        assert_eq!(bounds.expanded(), bounds.original());
        assert!(!bounds.set_hit_slop(HitSlop::uniform(-1.0)));
    }

    #[test]
    fn single_fire_hit_kind_follows_prediction_setting() {
        let (mut el, _) = element(false);
        assert_eq!(
            el.on_pointer_move(INSIDE, INSIDE, true, 0),
            Some(HitType::Mouse(MouseHit::Trajectory))
        );
        assert_eq!(
            el.on_pointer_move(INSIDE, INSIDE, false, 0),
            Some(HitType::Mouse(MouseHit::Hover))
        );
        assert!(el.is_hovering());
    }

    #[test]
    fn single_fire_trajectory_needs_prediction() {
        let (mut el, _) = element(false);
        assert_eq!(el.on_pointer_move(FAR, TOWARDS, false, 0), None);
        assert_eq!(
            el.on_pointer_move(FAR, TOWARDS, true, 0),
            Some(HitType::Mouse(MouseHit::Trajectory))
        );
        assert_eq!(el.on_pointer_move(FAR, AWAY, true, 0), None);
    }

    #[test]
    fn persistent_hover_fires_on_entry_only() {
        let (mut el, _) = element(true);
        assert_eq!(
            el.on_pointer_move(INSIDE, INSIDE, true, 0),
            Some(HitType::Mouse(MouseHit::Hover))
        );
        for t in 1..10 {
            assert_eq!(el.on_pointer_move(INSIDE, INSIDE, true, t), None);
        }
        assert_eq!(el.on_pointer_move(FAR, FAR, true, 20), None);
        assert!(!el.is_hovering());
        assert_eq!(
            el.on_pointer_move(INSIDE, INSIDE, true, 30),
            Some(HitType::Mouse(MouseHit::Hover))
        );
    }

    #[test]
    fn persistent_trajectory_fires_once_and_is_reconfirmed() {
        let (mut el, _) = element(true);
        assert_eq!(
            el.on_pointer_move(FAR, TOWARDS, true, 1_000),
            Some(HitType::Mouse(MouseHit::Trajectory))
        );
        assert_eq!(el.trajectory_hit().hit_time, Some(1_000));
        assert_eq!(
            el.trajectory_hit().expiration,
            Some(ExpirationHandle { deadline: 1_200 })
        );

        assert_eq!(el.on_pointer_move(FAR, TOWARDS, true, 1_100), None);
        assert_eq!(el.trajectory_hit().hit_time, Some(1_000));
        assert_eq!(
            el.trajectory_hit().expiration,
            Some(ExpirationHandle { deadline: 1_300 })
        );

        assert!(!el.trajectory_hit.expire(1_299));
        assert!(el.trajectory_hit.expire(1_300));
        assert_eq!(*el.trajectory_hit(), TrajectoryHitData::default());

        assert_eq!(
            el.on_pointer_move(FAR, TOWARDS, true, 1_400),
            Some(HitType::Mouse(MouseHit::Trajectory))
        );
    }

    #[test]
    fn persistent_trajectory_suppressed_while_hovering() {
        let (mut el, _) = element(true);
        el.on_pointer_move(INSIDE, TOWARDS, true, 0);
        assert_eq!(el.on_pointer_move(INSIDE, TOWARDS, true, 1), None);
        assert!(!el.trajectory_hit().is_trajectory_hit);
    }

    #[test]
    fn scroll_hit_marks_persistent_element() {
        let (mut el, _) = element(true);
        let hit = el.on_scroll(FAR, TOWARDS, ScrollDirection::Right, 5);
        assert_eq!(hit, Some(HitType::Scroll(ScrollDirection::Right)));
        assert!(el.trajectory_hit().is_trajectory_hit);
        assert_eq!(el.on_scroll(FAR, TOWARDS, ScrollDirection::Right, 6), None);
    }

    #[test]
    fn hover_check_respects_policy() {
        let (mut single, _) = element(false);
        assert!(single.on_hover_check(INSIDE).is_some());
        assert!(single.on_hover_check(INSIDE).is_some());

        let (mut persistent, _) = element(true);
        assert!(persistent.on_hover_check(INSIDE).is_some());
        assert!(persistent.on_hover_check(INSIDE).is_none());
        assert!(persistent.on_hover_check(FAR).is_none());
    }

    #[test]
    fn invoke_counts_and_calls() {
        let (mut el, calls) = element(true);
        el.invoke(HitType::Mouse(MouseHit::Hover));
        el.invoke(HitType::Scroll(ScrollDirection::Up));
        assert_eq!(calls.get(), 2);
        assert_eq!(el.callback_hits().total, 2);
        assert_eq!(el.callback_hits().scroll.up, 1);
    }
}
