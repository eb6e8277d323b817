// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for the integration tests.

#![allow(dead_code, reason = "not every test file uses every fixture")]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use kurbo::Rect;
use understory_intent::{
    Environment, HitType, IntentEvent, IntentObserver, ScrollDirection, SettingsChanges,
    UnregisterReason,
};

/// A scripted page: element geometry, liveness and tab order set by the test.
#[derive(Debug, Default)]
pub struct Page {
    pub bounds: HashMap<u32, Rect>,
    pub disconnected: Vec<u32>,
    pub tab_order: Vec<u32>,
    pub installs: u32,
    pub removals: u32,
    pub focus_queries: Cell<u32>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `id` at `rect`.
    pub fn with(mut self, id: u32, rect: Rect) -> Self {
        self.bounds.insert(id, rect);
        self
    }

    /// Use `ids` as the tab order.
    pub fn tab_order(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.tab_order = ids.into_iter().collect();
        self
    }
}

impl Environment<u32> for Page {
    fn bounds(&self, handle: &u32) -> Rect {
        self.bounds.get(handle).copied().unwrap_or(Rect::ZERO)
    }

    fn is_connected(&self, handle: &u32) -> bool {
        !self.disconnected.contains(handle)
    }

    fn focusable_elements(&self, out: &mut Vec<u32>) {
        self.focus_queries.set(self.focus_queries.get() + 1);
        out.extend_from_slice(&self.tab_order);
    }

    fn install_listeners(&mut self) {
        self.installs += 1;
    }

    fn remove_listeners(&mut self) {
        self.removals += 1;
    }
}

/// A callback that counts its invocations.
pub fn counter() -> (impl FnMut() + 'static, Rc<Cell<u32>>) {
    let calls = Rc::new(Cell::new(0));
    let inner = calls.clone();
    (move || inner.set(inner.get() + 1), calls)
}

/// Owned copy of an [`IntentEvent`].
#[derive(Clone, Debug, PartialEq)]
pub enum Logged {
    Registered(u32),
    Unregistered(u32, UnregisterReason),
    BoundsChanged(u32, bool),
    Fired(u32, HitType),
    Mouse,
    Scroll(ScrollDirection),
    Expired(u32),
    Settings(SettingsChanges),
}

/// Observer that appends every event to a shared log.
#[derive(Clone, Debug, Default)]
pub struct EventLog(pub Rc<RefCell<Vec<Logged>>>);

impl EventLog {
    pub fn take(&self) -> Vec<Logged> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    /// Logged events other than pointer trajectory updates.
    pub fn take_significant(&self) -> Vec<Logged> {
        self.take()
            .into_iter()
            .filter(|e| *e != Logged::Mouse)
            .collect()
    }
}

impl IntentObserver<u32> for EventLog {
    fn on_event(&mut self, event: &IntentEvent<'_, u32>) {
        let logged = match event {
            IntentEvent::ElementRegistered { handle, .. } => Logged::Registered(*handle),
            IntentEvent::ElementUnregistered { handle, reason } => {
                Logged::Unregistered(*handle, *reason)
            }
            IntentEvent::BoundsChanged {
                handle,
                is_intersecting_viewport,
                ..
            } => Logged::BoundsChanged(*handle, *is_intersecting_viewport),
            IntentEvent::CallbackFired { handle, hit, .. } => Logged::Fired(*handle, *hit),
            IntentEvent::MouseTrajectory { .. } => Logged::Mouse,
            IntentEvent::ScrollTrajectory { prediction, .. } => {
                Logged::Scroll(prediction.direction)
            }
            IntentEvent::TrajectoryHitExpired { handle } => Logged::Expired(*handle),
            IntentEvent::SettingsChanged { changes, .. } => Logged::Settings(*changes),
        };
        self.0.borrow_mut().push(logged);
    }
}
