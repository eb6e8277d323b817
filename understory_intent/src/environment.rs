// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host environment seam.
//!
//! [`IntentManager`](crate::IntentManager) never talks to a UI toolkit
//! directly. Everything it needs from the host (element geometry, liveness,
//! focus order, and the ability to start and stop event delivery) goes
//! through [`Environment`]. Events themselves flow the other way: the host
//! calls the manager's `on_*` entry points.

use alloc::vec::Vec;

use kurbo::Rect;

/// What the intent manager needs from the host UI.
///
/// `K` is the host's element handle. It must be cheap to copy and compare;
/// typical choices are node ids or generational indices.
pub trait Environment<K> {
    /// Whether the host can supply geometry and events at all.
    ///
    /// When this returns `false`, registration is a no-op and returns an inert
    /// [`Registration`](crate::Registration).
    fn is_available(&self) -> bool {
        true
    }

    /// Current bounds of `handle` in the pointer's coordinate space.
    fn bounds(&self, handle: &K) -> Rect;

    /// Whether `handle` is still part of the UI tree.
    fn is_connected(&self, handle: &K) -> bool;

    /// Append every focusable element to `out`, in sequential tab order.
    ///
    /// `out` is cleared by the caller before this is invoked.
    fn focusable_elements(&self, out: &mut Vec<K>);

    /// Start delivering pointer, key, focus, structural and bounds events.
    fn install_listeners(&mut self);

    /// Stop delivering the events started by [`Environment::install_listeners`].
    fn remove_listeners(&mut self);
}

/// An environment with no UI attached.
///
/// Useful for server-side rendering or tests: every registration is inert and
/// no listeners are ever installed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Detached;

impl<K> Environment<K> for Detached {
    fn is_available(&self) -> bool {
        false
    }

    fn bounds(&self, _handle: &K) -> Rect {
        Rect::ZERO
    }

    fn is_connected(&self, _handle: &K) -> bool {
        false
    }

    fn focusable_elements(&self, _out: &mut Vec<K>) {}

    fn install_listeners(&mut self) {}

    fn remove_listeners(&mut self) {}
}
