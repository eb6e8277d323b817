// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observation hooks for debug tooling and analytics.
//!
//! Two hooks exist:
//!
//! - The global callback hook ([`CallbackHook`]) runs after every element
//!   callback, with the element's and the global counters.
//! - An [`IntentObserver`] receives a stream of [`IntentEvent`]s describing
//!   everything the manager does. Debug overlays attach one through
//!   [`IntentManager::attach_observer`](crate::IntentManager::attach_observer);
//!   while attached, the manager keeps its listeners installed even with no
//!   elements registered so the overlay keeps seeing pointer activity.
//!
//! Any `FnMut(&IntentEvent<'_, K>)` closure is an observer, as is any type
//! implementing [`IntentObserver`] directly:
//!
//! ```
//! use understory_intent::{IntentEvent, IntentObserver};
//!
//! #[derive(Default)]
//! struct Registrations(usize);
//!
//! impl IntentObserver<u32> for Registrations {
//!     fn on_event(&mut self, event: &IntentEvent<'_, u32>) {
//!         if matches!(event, IntentEvent::ElementRegistered { .. }) {
//!             self.0 += 1;
//!         }
//!     }
//! }
//!
//! let mut observer = Registrations::default();
//! observer.on_event(&IntentEvent::ElementRegistered { handle: 7, name: "nav" });
//! assert_eq!(observer.0, 1);
//! ```

use alloc::boxed::Box;

use kurbo::Point;

use crate::element::ElementBounds;
use crate::hits::{CallbackHits, HitType};
use crate::scroll::ScrollPrediction;
use crate::settings::{Settings, SettingsChanges};

/// Why an element left the registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnregisterReason {
    /// The host asked for it.
    Manual,
    /// A single-fire element ran its callback.
    CallbackFired,
    /// The element is no longer part of the UI tree.
    Disconnected,
}

/// Something the manager did.
#[derive(Clone, Debug)]
pub enum IntentEvent<'a, K> {
    /// An element was added.
    ElementRegistered {
        /// Element handle.
        handle: K,
        /// Diagnostic name.
        name: &'a str,
    },
    /// An element was removed.
    ElementUnregistered {
        /// Element handle.
        handle: K,
        /// Why it was removed.
        reason: UnregisterReason,
    },
    /// An element's bounds or viewport state changed.
    BoundsChanged {
        /// Element handle.
        handle: K,
        /// New bounds.
        bounds: ElementBounds,
        /// Whether the element is in the viewport.
        is_intersecting_viewport: bool,
    },
    /// An element callback ran.
    CallbackFired {
        /// Element handle.
        handle: K,
        /// Diagnostic name.
        name: &'a str,
        /// What triggered it.
        hit: HitType,
    },
    /// The pointer moved.
    MouseTrajectory {
        /// Pointer position.
        current: Point,
        /// Extrapolated position (equal to `current` with prediction off).
        predicted: Point,
    },
    /// A scroll direction was detected for the current frame.
    ScrollTrajectory {
        /// Pointer position.
        current: Point,
        /// Detected direction and projected point.
        prediction: ScrollPrediction,
    },
    /// An element's trajectory hit expired without re-confirmation.
    TrajectoryHitExpired {
        /// Element handle.
        handle: K,
    },
    /// Settings changed.
    SettingsChanged {
        /// Which fields changed.
        changes: SettingsChanges,
        /// Settings after the change.
        settings: &'a Settings,
    },
}

/// Receiver for [`IntentEvent`]s.
pub trait IntentObserver<K> {
    /// Handle one event.
    fn on_event(&mut self, event: &IntentEvent<'_, K>);
}

impl<K, F> IntentObserver<K> for F
where
    F: FnMut(&IntentEvent<'_, K>),
{
    fn on_event(&mut self, event: &IntentEvent<'_, K>) {
        self(event);
    }
}

/// Arguments to the global callback hook.
#[derive(Clone, Debug)]
pub struct CallbackFired<'a, K> {
    /// Element whose callback ran.
    pub handle: K,
    /// Diagnostic name of the element.
    pub name: &'a str,
    /// What triggered the callback.
    pub hit: HitType,
    /// The element's counters, including this hit.
    pub element_hits: &'a CallbackHits,
    /// Global counters, including this hit.
    pub global_hits: &'a CallbackHits,
}

/// Hook run after every element callback.
pub type CallbackHook<K> = Box<dyn FnMut(&CallbackFired<'_, K>)>;
