//! Fuel selection and consumption.

use crate::item::{ItemStack, SlotPool};
use crate::registry::Registry;

/// Heat granted by consuming one unit of fuel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnBudget {
    /// Ticks of burn time added to the furnace.
    pub burn_time_granted: u32,
    /// The consumed item's burn value, retained for progress display.
    pub burn_value: u32,
}

/// Read-only planning check: true iff any fuel slot holds an item with a
/// positive burn value.
pub fn can_consume_fuel(registry: &Registry, fuel: &SlotPool) -> bool {
    fuel.slots()
        .iter()
        .any(|stack| !stack.is_empty() && registry.burn_value(stack.item) > 0)
}

/// Consume one unit from the first burnable fuel slot. If the fuel item
/// defines a remainder, the spent container is written straight into the
/// now-empty slot, bypassing ordinary slot-validity rules. When the slot
/// still holds fuel (a stacked container fuel), the container spills to any
/// open slot instead; a container that fits nowhere lands in `overflow`,
/// never destroyed.
pub fn consume_fuel(
    registry: &Registry,
    fuel: &mut SlotPool,
    overflow: &mut Vec<ItemStack>,
) -> Option<BurnBudget> {
    for slot in 0..fuel.slot_count() {
        let stack = fuel.stack(slot);
        if stack.is_empty() {
            continue;
        }
        let burn = registry.burn_value(stack.item);
        if burn == 0 {
            continue;
        }
        let _ = fuel.extract(slot, 1, false);
        if let Some(remainder) = registry.remainder(stack.item) {
            let container = ItemStack::new(remainder, 1);
            let leftover = if fuel.stack(slot).is_empty() {
                fuel.set_stack(slot, container);
                ItemStack::EMPTY
            } else {
                fuel.insert_into_any(container, registry.max_stack(remainder))
            };
            if !leftover.is_empty() {
                overflow.push(leftover);
            }
        }
        return Some(BurnBudget {
            burn_time_granted: burn,
            burn_value: burn,
        });
    }
    None
}
