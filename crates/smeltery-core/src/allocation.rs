//! Greedy multi-recipe claim allocation over the shared input pool.
//!
//! Each recompute builds a fresh working copy of the input pool and walks
//! the ranked recipe list, repeatedly claiming batches. A claim attempt is
//! speculative: it runs against a disposable copy of the unused-input state
//! and is committed only when every ingredient requirement is fully
//! satisfied, so a failed attempt consumes nothing.

use crate::id::RecipeId;
use crate::item::{ItemStack, SlotPool};
use crate::registry::{RecipeDef, Registry};
use serde::{Deserialize, Serialize};

/// One committed match of a recipe against the input pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedRecipe {
    pub recipe: RecipeId,
    /// Exactly the stacks this claim extracted, in extraction order. The
    /// committer derives remaining (container) items from these.
    pub consumed: Vec<ItemStack>,
}

/// The working set produced by one recompute: the residual unclaimed input
/// plus the ordered list of claimed recipe instances.
///
/// Invariant: per item type, the quantity in `unused` plus the quantity
/// across all claims' `consumed` lists equals the quantity in the input
/// pool at recompute time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    unused: SlotPool,
    claims: Vec<ClaimedRecipe>,
}

impl Allocation {
    /// An allocation with no claims and an empty input snapshot.
    pub fn empty(input_slots: usize) -> Self {
        Self {
            unused: SlotPool::new(input_slots),
            claims: Vec::new(),
        }
    }

    /// Build the allocation for the current input pool. Recipes are tried
    /// in ranked order; each recipe claims batches until the global claim
    /// cap is reached, the unused input is exhausted, or an attempt fails.
    pub fn recompute(
        registry: &Registry,
        ranked: &[RecipeId],
        input: &SlotPool,
        max_simultaneous: u32,
    ) -> Self {
        let mut unused = input.clone();
        let mut claims: Vec<ClaimedRecipe> = Vec::new();

        'recipes: for &recipe_id in ranked {
            let Some(recipe) = registry.get_recipe(recipe_id) else {
                continue;
            };
            while (claims.len() as u32) < max_simultaneous && !unused.is_empty() {
                match try_claim(recipe, &unused) {
                    Some((remaining, consumed)) => {
                        unused = remaining;
                        claims.push(ClaimedRecipe {
                            recipe: recipe_id,
                            consumed,
                        });
                    }
                    None => continue 'recipes,
                }
            }
            if claims.len() as u32 >= max_simultaneous {
                break;
            }
        }

        Self { unused, claims }
    }

    /// Input slots not reserved by any claim.
    pub fn unused(&self) -> &SlotPool {
        &self.unused
    }

    pub fn claims(&self) -> &[ClaimedRecipe] {
        &self.claims
    }

    pub fn claim_count(&self) -> usize {
        self.claims.len()
    }

    pub fn has_claims(&self) -> bool {
        !self.claims.is_empty()
    }

    /// Decompose into the unused pool and the claim list; used by the
    /// crafting committer, which replaces the real input pool with the
    /// post-insertion unused state.
    pub fn into_parts(self) -> (SlotPool, Vec<ClaimedRecipe>) {
        (self.unused, self.claims)
    }
}

/// One speculative claim attempt. Works on a disposable copy of `unused`:
/// for each ingredient requirement, scan slots in order and extract up to
/// the required quantity per slot. Returns the post-claim pool and the
/// consumed stacks only if every requirement was fully satisfied; otherwise
/// the copy is dropped and nothing real was consumed.
fn try_claim(recipe: &RecipeDef, unused: &SlotPool) -> Option<(SlotPool, Vec<ItemStack>)> {
    let mut scratch = unused.clone();
    let mut consumed: Vec<ItemStack> = Vec::new();

    for ingredient in &recipe.ingredients {
        let mut needed = ingredient.count;
        for slot in 0..scratch.slot_count() {
            if needed == 0 {
                break;
            }
            let stack = scratch.stack(slot);
            if stack.is_empty() || !ingredient.matches(stack.item) {
                continue;
            }
            let taken = scratch.extract(slot, needed, false);
            needed -= taken.count;
            if !taken.is_empty() {
                consumed.push(taken);
            }
        }
        if needed > 0 {
            return None;
        }
    }

    Some((scratch, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specificity::rank_recipes;
    use crate::test_utils::*;

    #[test]
    fn single_recipe_claims_once() {
        let reg = test_registry();
        let ranked = rank_recipes(&reg);
        let input = pool_of(9, &[(iron_ore(), 1)]);

        let alloc = Allocation::recompute(&reg, &ranked, &input, 1);
        assert_eq!(alloc.claim_count(), 1);
        assert_eq!(alloc.claims()[0].recipe, reg.recipe_id("smelt_iron").unwrap());
        assert_eq!(alloc.claims()[0].consumed, vec![ItemStack::new(iron_ore(), 1)]);
        assert!(alloc.unused().is_empty());
    }

    #[test]
    fn claim_cap_bounds_batches() {
        let reg = test_registry();
        let ranked = rank_recipes(&reg);
        let input = pool_of(9, &[(iron_ore(), 10)]);

        let alloc = Allocation::recompute(&reg, &ranked, &input, 3);
        assert_eq!(alloc.claim_count(), 3);
        assert_eq!(alloc.unused().count_of(iron_ore()), 7);
    }

    #[test]
    fn failed_attempt_consumes_nothing() {
        let reg = test_registry();
        let ranked = rank_recipes(&reg);
        // Alloy needs 2 iron ore + 1 gold ore; only the iron is present.
        let input = pool_of(9, &[(iron_ore(), 2)]);

        let alloc = Allocation::recompute(&reg, &ranked, &input, 4);
        // smelt_iron still claims both ores one batch at a time.
        assert_eq!(alloc.claim_count(), 2);
        let per_type: u32 = alloc
            .claims()
            .iter()
            .flat_map(|c| c.consumed.iter())
            .map(|s| s.count)
            .sum();
        assert_eq!(per_type + alloc.unused().total(), 2);
    }

    #[test]
    fn higher_specificity_recipe_claims_shared_item_first() {
        let reg = test_registry();
        let ranked = rank_recipes(&reg);
        // Exactly enough iron ore for the alloy (which also needs gold ore);
        // the alloy outranks plain smelting and wins the shared ore.
        let input = pool_of(9, &[(iron_ore(), 2), (gold_ore(), 1)]);

        let alloc = Allocation::recompute(&reg, &ranked, &input, 1);
        assert_eq!(alloc.claim_count(), 1);
        assert_eq!(alloc.claims()[0].recipe, reg.recipe_id("iron_gold_alloy").unwrap());
        assert!(alloc.unused().is_empty());
    }

    #[test]
    fn requirement_aggregates_across_slots() {
        let reg = test_registry();
        let ranked = rank_recipes(&reg);
        // 2 iron ore split across two slots plus the gold ore: the alloy's
        // iron requirement is satisfied by partial extraction per slot.
        let mut input = SlotPool::new(9);
        input.set_stack(0, ItemStack::new(iron_ore(), 1));
        input.set_stack(4, ItemStack::new(iron_ore(), 1));
        input.set_stack(7, ItemStack::new(gold_ore(), 1));

        let alloc = Allocation::recompute(&reg, &ranked, &input, 1);
        assert_eq!(alloc.claim_count(), 1);
        assert_eq!(alloc.claims()[0].recipe, reg.recipe_id("iron_gold_alloy").unwrap());
    }

    #[test]
    fn conservation_across_recompute() {
        let reg = test_registry();
        let ranked = rank_recipes(&reg);
        let input = pool_of(9, &[(iron_ore(), 5), (gold_ore(), 2), (coal(), 3)]);

        let alloc = Allocation::recompute(&reg, &ranked, &input, 8);
        for item in [iron_ore(), gold_ore(), coal()] {
            let claimed: u32 = alloc
                .claims()
                .iter()
                .flat_map(|c| c.consumed.iter())
                .filter(|s| s.item == item)
                .map(|s| s.count)
                .sum();
            assert_eq!(
                claimed + alloc.unused().count_of(item),
                input.count_of(item),
                "conservation violated for {item:?}"
            );
        }
    }

    #[test]
    fn empty_input_claims_nothing() {
        let reg = test_registry();
        let ranked = rank_recipes(&reg);
        let input = SlotPool::new(9);

        let alloc = Allocation::recompute(&reg, &ranked, &input, 4);
        assert_eq!(alloc.claim_count(), 0);
        assert!(alloc.unused().is_empty());
    }

    #[test]
    fn broad_ingredient_matches_any_listed_type() {
        let reg = test_registry();
        let ranked = rank_recipes(&reg);
        // any_ore_slag accepts iron or gold ore; give it gold only.
        let input = pool_of(9, &[(gold_ore(), 4)]);

        let alloc = Allocation::recompute(&reg, &ranked, &input, 8);
        // smelt_gold is more specific and claims 4 single-ore batches before
        // the broad slag recipe sees anything.
        assert!(alloc
            .claims()
            .iter()
            .all(|c| c.recipe == reg.recipe_id("smelt_gold").unwrap()));
    }
}
