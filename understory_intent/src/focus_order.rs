// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sequential focus order with a predictive index lookup.
//!
//! Tab prediction needs the index of the newly focused element in the
//! host's tab order. Almost every focus change driven by the Tab key moves
//! exactly one stop, so [`FocusOrder::locate`] first checks the neighbor of
//! the last resolved index and only scans the whole order on a miss.
//!
//! The order itself is computed lazily from the [`Environment`] and cached
//! until [`FocusOrder::invalidate`] bumps the generation counter.

use alloc::vec::Vec;

use crate::environment::Environment;
use crate::hits::TabDirection;

/// Cached tab order of focusable elements.
#[derive(Clone, Debug)]
pub struct FocusOrder<K> {
    elements: Vec<K>,
    generation: u64,
    computed_at: Option<u64>,
    last_index: Option<usize>,
}

impl<K> Default for FocusOrder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> FocusOrder<K> {
    /// Create an empty, not-yet-computed focus order.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            generation: 0,
            computed_at: None,
            last_index: None,
        }
    }

    /// Mark the cached order stale; the next [`FocusOrder::ensure`] recomputes it.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Current invalidation generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` if the cached order matches the current generation.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.computed_at == Some(self.generation)
    }

    /// The cached order. May be stale; see [`FocusOrder::is_fresh`].
    #[must_use]
    pub fn elements(&self) -> &[K] {
        &self.elements
    }

    /// The index resolved by the most recent successful [`FocusOrder::locate`].
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.last_index
    }

    /// Element at `index` in the cached order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&K> {
        self.elements.get(index)
    }

    /// Recompute the order from `env` if it is stale.
    pub fn ensure<E: Environment<K>>(&mut self, env: &E) {
        if self.is_fresh() {
            return;
        }
        self.elements.clear();
        env.focusable_elements(&mut self.elements);
        self.computed_at = Some(self.generation);
        if self.last_index.is_some_and(|i| i >= self.elements.len()) {
            self.last_index = None;
        }
    }
}

impl<K: PartialEq> FocusOrder<K> {
    /// Find `target` in the cached order.
    ///
    /// The slot adjacent to the last resolved index in `direction` is checked
    /// first; if it does not hold `target` the whole order is scanned. A found
    /// index becomes the new last index.
    pub fn locate(&mut self, target: &K, direction: TabDirection) -> Option<usize> {
        let predicted = self.last_index.and_then(|last| match direction {
            TabDirection::Forwards => last.checked_add(1),
            TabDirection::Reverse => last.checked_sub(1),
        });

        let found = match predicted {
            Some(i) if self.elements.get(i) == Some(target) => Some(i),
            _ => self.elements.iter().position(|k| k == target),
        };
        if found.is_some() {
            self.last_index = found;
        }
        found
    }
}
