// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_intent --heading-base-level=0

//! Understory Intent: predict which UI element the user is about to interact with.
//!
//! Prefetching a link's target, warming a menu, or loading a preview is most
//! useful *before* the click. This crate watches pointer motion, keyboard
//! focus traversal, and page scrolling, and fires a per-element callback the
//! moment any of them predicts an interaction with that element.
//!
//! Three predictors feed one interaction engine:
//!
//! - **Pointer trajectory**: recent pointer samples are extrapolated linearly
//!   into the near future; if the segment from the current to the predicted
//!   position crosses an element's (slop-expanded) bounds, the element fires.
//!   Plain hover fires too.
//! - **Tab offset**: after a Tab press, the newly focused element and the next
//!   `tab_offset` focus stops in the same direction fire.
//! - **Scroll projection**: when tracked elements slide under a stationary
//!   pointer, the pointer is projected `scroll_margin` pixels in the scroll
//!   direction and tested like a trajectory.
//!
//! Elements are either *single-fire* (the default: the first prediction fires
//! the callback and the element is dropped) or *persistent* (edge-triggered,
//! with trajectory hits expiring after
//! [`TRAJECTORY_HIT_EXPIRATION_MS`](element::TRAJECTORY_HIT_EXPIRATION_MS)).
//!
//! ## Integration
//!
//! The crate does not talk to any UI toolkit. The host implements
//! [`Environment`] for its element handle type (geometry, liveness, tab
//! order, listener install/remove) and forwards events to
//! [`IntentManager`]'s `on_*` methods with a millisecond timestamp.
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Rect};
//! use understory_intent::{Environment, IntentManager, RegisterOptions};
//!
//! struct Page;
//!
//! impl Environment<u32> for Page {
//!     fn bounds(&self, _link: &u32) -> Rect {
//!         Rect::new(100.0, 100.0, 200.0, 200.0)
//!     }
//!     fn is_connected(&self, _link: &u32) -> bool {
//!         true
//!     }
//!     fn focusable_elements(&self, out: &mut Vec<u32>) {
//!         out.push(1);
//!     }
//!     fn install_listeners(&mut self) {}
//!     fn remove_listeners(&mut self) {}
//! }
//!
//! let prefetched = Rc::new(Cell::new(false));
//! let flag = prefetched.clone();
//!
//! let mut intent = IntentManager::new(Page);
//! intent.register(1_u32, move || flag.set(true), RegisterOptions::new().name("docs-link"));
//! assert!(intent.listeners_installed());
//!
//! // The pointer heads right at 1 px/ms; 120 ms ahead it is inside the link.
//! intent.on_pointer_move(Point::new(0.0, 150.0), 0);
//! intent.on_pointer_move(Point::new(16.0, 150.0), 16);
//!
//! assert!(prefetched.get());
//! assert_eq!(intent.callback_hits().mouse.trajectory, 1);
//! // Single-fire elements are dropped after their callback.
//! assert!(intent.is_empty());
//! assert!(!intent.listeners_installed());
//! ```
//!
//! Hosts that deliver bounds changes pass the frame's timestamp, call
//! [`IntentManager::end_frame`] after each batch so that the scroll direction
//! is recomputed per frame, and [`IntentManager::advance_time`] from a timer
//! (see [`IntentManager::next_expiration`]) so persistent elements' trajectory
//! hits expire even when the pointer is idle.
//!
//! ## Configuration
//!
//! [`Settings`] holds the tuning knobs with fixed clamp ranges (see
//! [`settings::limits`]); change them through
//! [`IntentManager::alter_settings`]. Debug tooling can read a [`Snapshot`]
//! or attach an [`IntentObserver`].
//!
//! ## Features
//!
//! - `std` (default): forward `std` to `kurbo` and `tracing`.
//! - `libm`: use `libm` for `kurbo` float math in `no_std` builds.
//! - `serde`: derive `Serialize`/`Deserialize` for settings, snapshots and counters.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod element;
pub mod environment;
pub mod focus_order;
pub mod geometry;
pub mod hits;
pub mod observer;
pub mod scroll;
pub mod settings;
pub mod snapshot;
pub mod trajectory;

mod manager;

pub use element::{Callback, ElementBounds, RegisterOptions, TrackedElement};
pub use environment::{Detached, Environment};
pub use geometry::HitSlop;
pub use hits::{CallbackHits, HitType, MouseHit, TabDirection};
pub use manager::{IntentManager, Key, Registration};
pub use observer::{CallbackFired, CallbackHook, IntentEvent, IntentObserver, UnregisterReason};
pub use scroll::ScrollDirection;
pub use settings::{Settings, SettingsChanges, SettingsUpdate};
pub use snapshot::{ElementSnapshot, Snapshot};
