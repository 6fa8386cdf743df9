//! Output-capacity simulation.
//!
//! Cook progress must not run to completion if the results cannot be
//! stored, so the room check inserts every claimed recipe's result stacks
//! into a value copy of the output pool and reports whether anything was
//! left over. Real state is never touched.

use crate::allocation::ClaimedRecipe;
use crate::item::SlotPool;
use crate::registry::Registry;

/// True iff every claimed recipe's full result stacks fit in a copy of the
/// current output pool, inserted in claim order then result order.
pub fn has_room(registry: &Registry, claims: &[ClaimedRecipe], output: &SlotPool) -> bool {
    let mut simulator = output.clone();
    for claim in claims {
        let Some(recipe) = registry.get_recipe(claim.recipe) else {
            return false;
        };
        for result in &recipe.results {
            let limit = registry.max_stack(result.item);
            let remainder = simulator.insert_into_any(*result, limit);
            if !remainder.is_empty() {
                return false;
            }
        }
    }
    true
}
