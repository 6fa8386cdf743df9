use crate::id::ItemTypeId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Item stacks
// ---------------------------------------------------------------------------

/// A stack of identical items occupying one slot.
///
/// A count of zero means "no items"; zero-count stacks are normalized to
/// [`ItemStack::EMPTY`] so pool comparisons stay well-defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: ItemTypeId,
    pub count: u32,
}

impl ItemStack {
    /// The canonical empty stack.
    pub const EMPTY: ItemStack = ItemStack {
        item: ItemTypeId(0),
        count: 0,
    };

    /// Create a stack, normalizing a zero count to [`ItemStack::EMPTY`].
    pub fn new(item: ItemTypeId, count: u32) -> Self {
        if count == 0 {
            Self::EMPTY
        } else {
            Self { item, count }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for ItemStack {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ---------------------------------------------------------------------------
// Slot pools
// ---------------------------------------------------------------------------

/// A fixed-length, ordered sequence of item-stack slots.
///
/// Pools are value-semantic: speculative operations clone the pool, mutate
/// the copy, and commit by replacing the original. The insert/extract pair
/// supports a `simulate` mode that computes the outcome without mutating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPool {
    slots: Vec<ItemStack>,
}

impl SlotPool {
    /// Create a pool of `slot_count` empty slots.
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![ItemStack::EMPTY; slot_count],
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The stack currently in `slot`.
    pub fn stack(&self, slot: usize) -> ItemStack {
        self.slots[slot]
    }

    /// Overwrite `slot` with `stack`, normalizing zero counts.
    pub fn set_stack(&mut self, slot: usize, stack: ItemStack) {
        self.slots[slot] = ItemStack::new(stack.item, stack.count);
    }

    /// Insert `stack` into `slot`, merging with a same-type stack up to
    /// `limit` items. Returns the remainder that did not fit.
    #[must_use = "the remainder holds items that did not fit"]
    pub fn insert(&mut self, slot: usize, stack: ItemStack, limit: u32, simulate: bool) -> ItemStack {
        if stack.is_empty() {
            return ItemStack::EMPTY;
        }
        let existing = self.slots[slot];
        if !existing.is_empty() && existing.item != stack.item {
            return stack;
        }
        if existing.count >= limit {
            return stack;
        }
        let accepted = stack.count.min(limit - existing.count);
        if !simulate {
            self.slots[slot] = ItemStack::new(stack.item, existing.count + accepted);
        }
        ItemStack::new(stack.item, stack.count - accepted)
    }

    /// Insert `stack` into the first slots that accept it, in slot order.
    /// Returns the remainder that fit nowhere.
    #[must_use = "the remainder holds items that fit nowhere"]
    pub fn insert_into_any(&mut self, stack: ItemStack, limit: u32) -> ItemStack {
        let mut remaining = stack;
        for slot in 0..self.slots.len() {
            if remaining.is_empty() {
                break;
            }
            remaining = self.insert(slot, remaining, limit, false);
        }
        remaining
    }

    /// Extract up to `count` items from `slot`. Returns the extracted stack,
    /// which may be smaller than requested or empty.
    #[must_use = "dropping the extracted stack destroys items"]
    pub fn extract(&mut self, slot: usize, count: u32, simulate: bool) -> ItemStack {
        let existing = self.slots[slot];
        if existing.is_empty() || count == 0 {
            return ItemStack::EMPTY;
        }
        let taken = count.min(existing.count);
        if !simulate {
            self.slots[slot] = ItemStack::new(existing.item, existing.count - taken);
        }
        ItemStack::new(existing.item, taken)
    }

    /// True when every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(ItemStack::is_empty)
    }

    /// Total items of `item` across all slots.
    pub fn count_of(&self, item: ItemTypeId) -> u32 {
        self.slots
            .iter()
            .filter(|s| !s.is_empty() && s.item == item)
            .map(|s| s.count)
            .sum()
    }

    /// Total items across all slots and types.
    pub fn total(&self) -> u32 {
        self.slots.iter().map(|s| s.count).sum()
    }

    pub fn slots(&self) -> &[ItemStack] {
        &self.slots
    }
}
