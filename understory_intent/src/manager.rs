// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The intent manager: element registry, interaction engine and lifecycle.
//!
//! [`IntentManager`] owns every registered element and the cross-element
//! predictors (pointer trajectory, focus order, per-frame scroll direction).
//! The host forwards raw events through the `on_*` methods; each call runs
//! the relevant predictor, updates element state, and fires callbacks before
//! returning.
//!
//! Time is supplied by the host as milliseconds on any monotonic clock. Active
//! trajectory hits expire through [`IntentManager::advance_time`]; hosts with a
//! real timer can arm it from [`IntentManager::next_expiration`].

use alloc::boxed::Box;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::element::{RegisterOptions, TrackedElement};
use crate::environment::Environment;
use crate::focus_order::FocusOrder;
use crate::hits::{CallbackHits, HitType, TabDirection};
use crate::observer::{CallbackFired, CallbackHook, IntentEvent, IntentObserver, UnregisterReason};
use crate::scroll::{ScrollPredictor, is_scroll_translation};
use crate::settings::{Settings, SettingsChanges, SettingsUpdate};
use crate::snapshot::{ElementSnapshot, Snapshot};
use crate::trajectory::TrajectoryState;

/// A key press, as far as intent prediction cares.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Tab, with Shift reversing the direction.
    Tab {
        /// Shift was held.
        shift: bool,
    },
    /// Any other key.
    Other,
}

/// Result of [`IntentManager::register`].
///
/// A registration from an unavailable environment is *inert*: it refers to no
/// element and unregistering it does nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Registration<K> {
    handle: Option<K>,
}

impl<K: Copy + Eq + Hash> Registration<K> {
    /// The registered handle, or `None` if inert.
    #[must_use]
    pub fn handle(&self) -> Option<K> {
        self.handle
    }

    /// Returns `true` if nothing was registered.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.handle.is_none()
    }

    /// Unregister the element from `manager`.
    ///
    /// Returns `false` if the registration was inert or the element is
    /// already gone.
    pub fn unregister<E: Environment<K>>(self, manager: &mut IntentManager<K, E>) -> bool {
        match self.handle {
            Some(handle) => manager.unregister(&handle),
            None => false,
        }
    }
}

/// Predicts user intent toward registered elements and fires their callbacks.
///
/// See the [crate documentation](crate) for an overview.
pub struct IntentManager<K, E> {
    env: E,
    elements: HashMap<K, TrackedElement>,
    settings: Settings,
    callback_hits: CallbackHits,
    on_any_callback_fired: Option<CallbackHook<K>>,
    observer: Option<Box<dyn IntentObserver<K>>>,
    trajectory: TrajectoryState,
    scroll: ScrollPredictor,
    focus_order: FocusOrder<K>,
    pending_tab: Option<TabDirection>,
    listeners_installed: bool,
    now: u64,
}

impl<K: fmt::Debug, E: fmt::Debug> fmt::Debug for IntentManager<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentManager")
            .field("env", &self.env)
            .field("elements", &self.elements)
            .field("settings", &self.settings)
            .field("callback_hits", &self.callback_hits)
            .field("trajectory", &self.trajectory)
            .field("scroll", &self.scroll)
            .field("focus_order", &self.focus_order)
            .field("pending_tab", &self.pending_tab)
            .field("listeners_installed", &self.listeners_installed)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

/// Borrowed pieces of the manager needed to fire a callback while an element
/// is mutably borrowed from the registry.
struct Dispatch<'a, K> {
    global: &'a mut CallbackHits,
    hook: &'a mut Option<CallbackHook<K>>,
    observer: &'a mut Option<Box<dyn IntentObserver<K>>>,
}

impl<K: Copy> Dispatch<'_, K> {
    fn fire(&mut self, handle: K, element: &mut TrackedElement, hit: HitType) {
        self.global.record(hit);
        element.invoke(hit);
        tracing::trace!(name = element.name(), ?hit, "intent callback fired");
        if let Some(hook) = self.hook.as_mut() {
            hook(&CallbackFired {
                handle,
                name: element.name(),
                hit,
                element_hits: element.callback_hits(),
                global_hits: &*self.global,
            });
        }
        notify(
            self.observer,
            &IntentEvent::CallbackFired {
                handle,
                name: element.name(),
                hit,
            },
        );
    }
}

fn notify<K>(observer: &mut Option<Box<dyn IntentObserver<K>>>, event: &IntentEvent<'_, K>) {
    if let Some(observer) = observer.as_mut() {
        observer.on_event(event);
    }
}

impl<K, E> IntentManager<K, E>
where
    K: Copy + Eq + Hash,
    E: Environment<K>,
{
    /// Create a manager with default settings.
    pub fn new(env: E) -> Self {
        Self::with_settings(env, Settings::default())
    }

    /// Create a manager with the given settings.
    pub fn with_settings(env: E, settings: Settings) -> Self {
        Self {
            env,
            elements: HashMap::new(),
            settings,
            callback_hits: CallbackHits::default(),
            on_any_callback_fired: None,
            observer: None,
            trajectory: TrajectoryState::new(),
            scroll: ScrollPredictor::new(),
            focus_order: FocusOrder::new(),
            pending_tab: None,
            listeners_installed: false,
            now: 0,
        }
    }

    /// The host environment.
    #[must_use]
    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Mutable access to the host environment.
    pub fn environment_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Callbacks fired across all elements, by type.
    #[must_use]
    pub fn callback_hits(&self) -> &CallbackHits {
        &self.callback_hits
    }

    /// Pointer history and the latest prediction.
    #[must_use]
    pub fn trajectory(&self) -> &TrajectoryState {
        &self.trajectory
    }

    /// Cached focus order.
    #[must_use]
    pub fn focus_order(&self) -> &FocusOrder<K> {
        &self.focus_order
    }

    /// Whether environment listeners are currently installed.
    #[must_use]
    pub fn listeners_installed(&self) -> bool {
        self.listeners_installed
    }

    /// Number of registered elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if no elements are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns `true` if `handle` is registered.
    #[must_use]
    pub fn is_registered(&self, handle: &K) -> bool {
        self.elements.contains_key(handle)
    }

    /// The tracked state of `handle`.
    #[must_use]
    pub fn element(&self, handle: &K) -> Option<&TrackedElement> {
        self.elements.get(handle)
    }

    /// Registered handles, in no particular order.
    pub fn handles(&self) -> impl Iterator<Item = K> + '_ {
        self.elements.keys().copied()
    }

    /// Earliest pending trajectory-hit expiration, if any.
    #[must_use]
    pub fn next_expiration(&self) -> Option<u64> {
        self.elements
            .values()
            .filter_map(|e| e.trajectory_hit.expiration)
            .map(|h| h.deadline)
            .min()
    }

    /// Copy out the state a debug overlay needs.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<K> {
        Snapshot {
            elements: self
                .elements
                .iter()
                .map(|(handle, element)| ElementSnapshot::capture(*handle, element))
                .collect(),
            settings: self.settings.clone(),
            callback_hits: self.callback_hits,
            listeners_installed: self.listeners_installed,
        }
    }

    /// Install a hook run after every element callback, replacing any
    /// previous one.
    pub fn set_on_any_callback_fired(&mut self, hook: Option<CallbackHook<K>>) {
        self.on_any_callback_fired = hook;
    }

    /// Attach a debug observer, replacing any previous one.
    ///
    /// While an observer is attached, listeners stay installed even when the
    /// registry empties.
    pub fn attach_observer(&mut self, observer: Box<dyn IntentObserver<K>>) {
        self.observer = Some(observer);
    }

    /// Detach the debug observer.
    ///
    /// If no elements remain registered the listeners are removed.
    pub fn detach_observer(&mut self) -> Option<Box<dyn IntentObserver<K>>> {
        let observer = self.observer.take();
        self.release_listeners_if_idle();
        observer
    }

    /// Start tracking `handle`.
    ///
    /// Bounds are read from the environment immediately. Registering a handle
    /// that is already tracked leaves it untouched. When the environment is
    /// unavailable nothing is tracked and the returned registration is inert.
    pub fn register(
        &mut self,
        handle: K,
        callback: impl FnMut() + 'static,
        options: RegisterOptions,
    ) -> Registration<K> {
        if !self.env.is_available() {
            return Registration { handle: None };
        }
        if self.elements.contains_key(&handle) {
            return Registration {
                handle: Some(handle),
            };
        }

        let rect = self.env.bounds(&handle);
        let element = TrackedElement::new(
            Box::new(callback),
            rect,
            options,
            self.settings.default_hit_slop(),
        );
        tracing::debug!(
            name = element.name(),
            single_fire = element.unregister_on_callback,
            "intent element registered"
        );
        notify(
            &mut self.observer,
            &IntentEvent::ElementRegistered {
                handle,
                name: element.name(),
            },
        );
        self.elements.insert(handle, element);
        self.install_listeners();

        Registration {
            handle: Some(handle),
        }
    }

    /// Stop tracking `handle`. Returns `false` if it was not registered.
    pub fn unregister(&mut self, handle: &K) -> bool {
        self.remove_element(handle, UnregisterReason::Manual)
    }

    /// Apply a partial settings update.
    ///
    /// Numeric values are clamped into range. The returned flags name every
    /// field whose value actually changed.
    pub fn alter_settings(&mut self, update: SettingsUpdate) -> SettingsChanges {
        let changes = self.settings.apply(update);
        if changes.is_empty() {
            return changes;
        }

        if changes.contains(SettingsChanges::POSITION_HISTORY_SIZE) {
            self.trajectory
                .trim_to(self.settings.position_history_size());
        }

        if changes.contains(SettingsChanges::DEFAULT_HIT_SLOP) {
            let slop = self.settings.default_hit_slop();
            for element in self.elements.values_mut() {
                if element.uses_default_hit_slop {
                    element.bounds.set_hit_slop(slop);
                }
            }
        }

        let mouse_off = changes.contains(SettingsChanges::MOUSE_PREDICTION)
            && !self.settings.enable_mouse_prediction();
        let scroll_off = changes.contains(SettingsChanges::SCROLL_PREDICTION)
            && !self.settings.enable_scroll_prediction();
        if mouse_off {
            self.trajectory.reset_prediction();
        }
        if scroll_off {
            self.scroll.end_frame();
        }
        if mouse_off || scroll_off {
            for element in self.elements.values_mut() {
                element.trajectory_hit.clear();
            }
        }

        if changes.contains(SettingsChanges::TAB_PREDICTION)
            && !self.settings.enable_tab_prediction()
        {
            self.pending_tab = None;
        }

        tracing::debug!(?changes, "intent settings changed");
        notify(
            &mut self.observer,
            &IntentEvent::SettingsChanged {
                changes,
                settings: &self.settings,
            },
        );
        changes
    }

    /// Handle a pointer move to `point` at host time `now`.
    pub fn on_pointer_move(&mut self, point: Point, now: u64) {
        self.advance_time(now);

        let prediction_enabled = self.settings.enable_mouse_prediction();
        let history_size = self.settings.position_history_size();
        let predicted = if prediction_enabled {
            self.trajectory.update(
                point,
                now,
                history_size,
                self.settings.trajectory_prediction_time(),
            )
        } else {
            self.trajectory.record(point, now, history_size);
            point
        };
        notify(
            &mut self.observer,
            &IntentEvent::MouseTrajectory {
                current: point,
                predicted,
            },
        );

        let mut dispatch = Dispatch {
            global: &mut self.callback_hits,
            hook: &mut self.on_any_callback_fired,
            observer: &mut self.observer,
        };
        let mut fired: SmallVec<[K; 4]> = SmallVec::new();
        for (handle, element) in &mut self.elements {
            if !element.is_intersecting_viewport {
                continue;
            }
            if let Some(hit) = element.on_pointer_move(point, predicted, prediction_enabled, now) {
                dispatch.fire(*handle, element, hit);
                if element.unregister_on_callback {
                    fired.push(*handle);
                }
            }
        }

        for handle in fired {
            self.remove_element(&handle, UnregisterReason::CallbackFired);
        }
    }

    /// Handle a key press.
    ///
    /// Tab records a pending direction for the next focus change; any other
    /// key discards it.
    pub fn on_key_down(&mut self, key: Key) {
        self.pending_tab = match key {
            Key::Tab { shift } if self.settings.enable_tab_prediction() => Some(if shift {
                TabDirection::Reverse
            } else {
                TabDirection::Forwards
            }),
            _ => None,
        };
    }

    /// Handle focus moving to `focused`.
    ///
    /// Only a focus change directly following a Tab press predicts anything:
    /// the focused element and the next `tab_offset` stops in the tab
    /// direction fire if they are tracked.
    pub fn on_focus_changed(&mut self, focused: K) {
        let Some(direction) = self.pending_tab.take() else {
            return;
        };
        if !self.settings.enable_tab_prediction() || self.elements.is_empty() {
            return;
        }

        self.focus_order.ensure(&self.env);
        let Some(index) = self.focus_order.locate(&focused, direction) else {
            return;
        };

        let mut targets: SmallVec<[K; 8]> = SmallVec::new();
        for step in 0..=self.settings.tab_offset() {
            let slot = match direction {
                TabDirection::Forwards => index.checked_add(step),
                TabDirection::Reverse => index.checked_sub(step),
            };
            let Some(handle) = slot.and_then(|i| self.focus_order.get(i)) else {
                break;
            };
            if self.elements.contains_key(handle) {
                targets.push(*handle);
            }
        }

        let hit = HitType::Tab(direction);
        let mut dispatch = Dispatch {
            global: &mut self.callback_hits,
            hook: &mut self.on_any_callback_fired,
            observer: &mut self.observer,
        };
        let mut fired: SmallVec<[K; 8]> = SmallVec::new();
        for handle in targets {
            let Some(element) = self.elements.get_mut(&handle) else {
                continue;
            };
            dispatch.fire(handle, element, hit);
            if element.unregister_on_callback {
                fired.push(handle);
            }
        }

        for handle in fired {
            self.remove_element(&handle, UnregisterReason::CallbackFired);
        }
    }

    /// Handle a change to the UI tree structure.
    ///
    /// The focus order is recomputed on next use and elements no longer
    /// connected are unregistered.
    pub fn on_structure_changed(&mut self) {
        self.focus_order.invalidate();

        let disconnected: SmallVec<[K; 4]> = self
            .elements
            .keys()
            .filter(|handle| !self.env.is_connected(handle))
            .copied()
            .collect();
        for handle in disconnected {
            self.remove_element(&handle, UnregisterReason::Disconnected);
        }
    }

    /// Handle new bounds for `handle` at host time `now`.
    ///
    /// When the element is in the viewport and slid to a new position without
    /// resizing, the move is treated as scrolling: the pointer is projected by
    /// `scroll_margin` in the scroll direction and tested against the element.
    /// With scroll prediction off, a plain hover test runs instead. Either way
    /// the element's hover state follows its new bounds.
    ///
    /// The scroll direction is computed once per frame from the first element
    /// that moved. Call [`end_frame`](Self::end_frame) after each batch of
    /// bounds changes; without it every later frame reuses that direction.
    pub fn on_bounds_changed(
        &mut self,
        handle: K,
        rect: Rect,
        is_intersecting_viewport: bool,
        now: u64,
    ) {
        self.advance_time(now);
        let now = self.now;
        let Some(element) = self.elements.get_mut(&handle) else {
            return;
        };

        let old = element.bounds.original();
        let viewport_changed = element.is_intersecting_viewport != is_intersecting_viewport;
        element.is_intersecting_viewport = is_intersecting_viewport;
        let moved = element.bounds.set_original(rect);
        if moved || viewport_changed {
            notify(
                &mut self.observer,
                &IntentEvent::BoundsChanged {
                    handle,
                    bounds: element.bounds,
                    is_intersecting_viewport,
                },
            );
        }

        if !moved {
            return;
        }
        let Some(current) = self.trajectory.current() else {
            return;
        };

        let scrolled = is_intersecting_viewport && is_scroll_translation(old, rect);
        let hit = if !scrolled {
            None
        } else if self.settings.enable_scroll_prediction() {
            match self
                .scroll
                .predict(old, rect, current, self.settings.scroll_margin())
            {
                (Some(prediction), fresh) => {
                    if fresh {
                        notify(
                            &mut self.observer,
                            &IntentEvent::ScrollTrajectory {
                                current,
                                prediction,
                            },
                        );
                    }
                    element.on_scroll(current, prediction.point, prediction.direction, now)
                }
                (None, _) => None,
            }
        } else {
            element.on_hover_check(current)
        };
        element.sync_hovering(current);
        let Some(hit) = hit else {
            return;
        };

        let single_fire = element.unregister_on_callback;
        Dispatch {
            global: &mut self.callback_hits,
            hook: &mut self.on_any_callback_fired,
            observer: &mut self.observer,
        }
        .fire(handle, element, hit);
        if single_fire {
            self.remove_element(&handle, UnregisterReason::CallbackFired);
        }
    }

    /// Mark the end of a frame's bounds notifications.
    ///
    /// The next bounds change recomputes the scroll direction.
    pub fn end_frame(&mut self) {
        self.scroll.end_frame();
    }

    /// Advance host time to `now`, expiring trajectory hits whose deadline
    /// has passed.
    pub fn advance_time(&mut self, now: u64) {
        self.now = self.now.max(now);
        let now = self.now;
        for (handle, element) in &mut self.elements {
            if element.trajectory_hit.expire(now) {
                tracing::trace!(name = element.name(), "trajectory hit expired");
                notify(
                    &mut self.observer,
                    &IntentEvent::TrajectoryHitExpired { handle: *handle },
                );
            }
        }
    }

    fn remove_element(&mut self, handle: &K, reason: UnregisterReason) -> bool {
        let Some(element) = self.elements.remove(handle) else {
            return false;
        };
        tracing::debug!(name = element.name(), ?reason, "intent element unregistered");
        notify(
            &mut self.observer,
            &IntentEvent::ElementUnregistered {
                handle: *handle,
                reason,
            },
        );
        self.release_listeners_if_idle();
        true
    }

    fn install_listeners(&mut self) {
        if self.listeners_installed {
            return;
        }
        self.env.install_listeners();
        self.listeners_installed = true;
        tracing::debug!("intent listeners installed");
    }

    fn release_listeners_if_idle(&mut self) {
        if !self.listeners_installed || !self.elements.is_empty() || self.observer.is_some() {
            return;
        }
        self.env.remove_listeners();
        self.listeners_installed = false;
        self.trajectory.clear();
        self.pending_tab = None;
        self.scroll.end_frame();
        self.focus_order.invalidate();
        tracing::debug!("intent listeners removed");
    }
}
