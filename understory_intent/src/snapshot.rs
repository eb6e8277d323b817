// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only snapshots for debug overlays.

use alloc::string::String;
use alloc::vec::Vec;

use crate::element::{ElementBounds, TrackedElement, TrajectoryHitData};
use crate::hits::CallbackHits;
use crate::settings::Settings;

/// State of one element at snapshot time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementSnapshot<K> {
    /// Element handle.
    pub handle: K,
    /// Diagnostic name.
    pub name: String,
    /// Natural and expanded bounds.
    pub bounds: ElementBounds,
    /// Pointer is inside the expanded bounds.
    pub is_hovering: bool,
    /// Trajectory hit state.
    pub trajectory_hit: TrajectoryHitData,
    /// Element is in the viewport.
    pub is_intersecting_viewport: bool,
    /// Element is single-fire.
    pub unregister_on_callback: bool,
    /// Callbacks fired for this element.
    pub callback_hits: CallbackHits,
}

impl<K: Copy> ElementSnapshot<K> {
    pub(crate) fn capture(handle: K, element: &TrackedElement) -> Self {
        Self {
            handle,
            name: element.name.clone(),
            bounds: element.bounds,
            is_hovering: element.is_hovering,
            trajectory_hit: element.trajectory_hit,
            is_intersecting_viewport: element.is_intersecting_viewport,
            unregister_on_callback: element.unregister_on_callback,
            callback_hits: element.callback_hits,
        }
    }
}

/// Everything a debug overlay needs to draw the manager's state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot<K> {
    /// Registered elements, in no particular order.
    pub elements: Vec<ElementSnapshot<K>>,
    /// Current settings.
    pub settings: Settings,
    /// Global callback counters.
    pub callback_hits: CallbackHits,
    /// Whether environment listeners are installed.
    pub listeners_installed: bool,
}

impl<K: PartialEq> Snapshot<K> {
    /// Find an element by handle.
    #[must_use]
    pub fn element(&self, handle: &K) -> Option<&ElementSnapshot<K>> {
        self.elements.iter().find(|e| e.handle == *handle)
    }
}
