//! Per-function numbering of anonymous values (the slot tracker).
//!
//! Block labels and anonymous non-void instruction results draw from one
//! sequential namespace, assigned strictly in traversal order. The tracker
//! is reset by the builder at the start of every function; its state must
//! never span two functions.

use ahash::AHashMap;

use crate::ir::ValueId;

/// Slot returned by [`SlotTracker::slot_index`] for unassigned values.
///
/// Numbering starts at 0, so the first registered value of a function (its
/// entry block label) is indistinguishable from "unassigned" by index alone.
/// Inherited behavior; only operand fallback rendering is affected.
pub const UNASSIGNED: u32 = 0;

/// Assigns stable small integers to values that lack a symbolic name.
#[derive(Debug, Default)]
pub struct SlotTracker {
    slots: AHashMap<ValueId, u32>,
    next: u32,
}

impl SlotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all assignments and restarts numbering.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.next = 0;
    }

    /// Assigns the next sequential slot to `value` if it has none yet.
    /// Repeat calls with the same value are no-ops.
    pub fn add(&mut self, value: ValueId) {
        if !self.slots.contains_key(&value) {
            self.slots.insert(value, self.next);
            self.next += 1;
        }
    }

    /// The slot assigned to `value`, or [`UNASSIGNED`] if it has none.
    pub fn slot_index(&self, value: ValueId) -> u32 {
        self.slots.get(&value).copied().unwrap_or(UNASSIGNED)
    }

    /// Number of values assigned since the last reset.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
