// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless host environment for the `understory_intent` demos.
//!
//! [`DemoPage`] is a scrollable document of labelled rectangles. It plays the
//! role a UI toolkit would: it answers geometry and focus-order queries and
//! reports viewport-relative bounds after scrolling.

use kurbo::{Rect, Vec2};
use tracing_subscriber::EnvFilter;
use understory_intent::{Environment, IntentManager};

/// Height of the visible viewport, in pixels.
pub const VIEWPORT_HEIGHT: f64 = 600.0;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, defaulting to debug
/// output from the intent crate.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,understory_intent=debug")),
        )
        .with_target(false)
        .init();
}

/// One element of the demo document.
#[derive(Clone, Debug)]
pub struct DemoElement {
    /// Element id, used as the intent handle.
    pub id: u32,
    /// Human-readable label.
    pub label: &'static str,
    /// Bounds in document coordinates.
    pub rect: Rect,
    /// Whether the element is a tab stop.
    pub focusable: bool,
}

/// A scrollable page of [`DemoElement`]s.
#[derive(Debug, Default)]
pub struct DemoPage {
    elements: Vec<DemoElement>,
    scroll_y: f64,
    listening: bool,
}

impl DemoPage {
    /// An empty page scrolled to the top.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element; tab order follows insertion order.
    pub fn with(mut self, id: u32, label: &'static str, rect: Rect, focusable: bool) -> Self {
        self.elements.push(DemoElement {
            id,
            label,
            rect,
            focusable,
        });
        self
    }

    /// Label of `id`, or `"?"` if unknown.
    pub fn label(&self, id: u32) -> &'static str {
        self.elements
            .iter()
            .find(|e| e.id == id)
            .map_or("?", |e| e.label)
    }

    /// Remove `id` from the document.
    pub fn remove(&mut self, id: u32) {
        self.elements.retain(|e| e.id != id);
    }

    /// Whether the intent manager currently has listeners installed.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    fn viewport_rect(&self, element: &DemoElement) -> Rect {
        element.rect - Vec2::new(0.0, self.scroll_y)
    }

    fn is_visible(rect: Rect) -> bool {
        rect.y1 >= 0.0 && rect.y0 <= VIEWPORT_HEIGHT
    }
}

impl Environment<u32> for DemoPage {
    fn bounds(&self, handle: &u32) -> Rect {
        self.elements
            .iter()
            .find(|e| e.id == *handle)
            .map_or(Rect::ZERO, |e| self.viewport_rect(e))
    }

    fn is_connected(&self, handle: &u32) -> bool {
        self.elements.iter().any(|e| e.id == *handle)
    }

    fn focusable_elements(&self, out: &mut Vec<u32>) {
        out.extend(self.elements.iter().filter(|e| e.focusable).map(|e| e.id));
    }

    fn install_listeners(&mut self) {
        tracing::info!("page listeners attached");
        self.listening = true;
    }

    fn remove_listeners(&mut self) {
        tracing::info!("page listeners detached");
        self.listening = false;
    }
}

/// Scroll the page by `dy` pixels and deliver one frame of bounds updates at
/// host time `now`.
pub fn scroll_by(intent: &mut IntentManager<u32, DemoPage>, dy: f64, now: u64) {
    let page = intent.environment_mut();
    page.scroll_y += dy;
    let updates: Vec<(u32, Rect)> = page
        .elements
        .iter()
        .map(|e| (e.id, page.viewport_rect(e)))
        .collect();

    for (id, rect) in updates {
        intent.on_bounds_changed(id, rect, DemoPage::is_visible(rect), now);
    }
    intent.end_frame();
}
