//! Recipe specificity ranking.
//!
//! Recipes with more ingredients and narrower (less substitutable)
//! ingredients are tried first during allocation, so a broad recipe cannot
//! starve a specific one by greedily consuming shared items.

use crate::fixed::Fixed64;
use crate::id::RecipeId;
use crate::registry::{RecipeDef, Registry};
use std::cmp::Reverse;

/// Specificity score for one recipe against an item universe of
/// `item_universe` distinct types.
///
/// `score = round(experience * 10) + Σ floor(100 * count * matchFactor)`
/// where `matchFactor = (U - m) / (U - 1)` for an ingredient matching `m`
/// item types: 1 when the ingredient is unique, approaching 0 as it matches
/// the whole universe. An ingredient matching no item types contributes
/// nothing.
///
/// Ingredient weights are computed in plain integer arithmetic, which is
/// both exact (integer division of non-negative operands is the floor) and
/// total for any `u32` quantity. The experience term stays in `Fixed64`;
/// registration bounds experience so the multiply cannot overflow.
pub fn specificity(recipe: &RecipeDef, item_universe: usize) -> i64 {
    // Registry::build rejects catalogs with recipes and fewer than two item
    // types; the clamp keeps the arithmetic total for direct callers.
    let universe = (item_universe as i64).max(2);

    let mut score: i64 = (recipe.experience * Fixed64::from_num(10))
        .round()
        .to_num::<i64>();

    for ingredient in &recipe.ingredients {
        if ingredient.matching.is_empty() {
            continue;
        }
        let matching = (ingredient.matching.len() as i64).min(universe);
        let weight = 100 * i128::from(ingredient.count) * i128::from(universe - matching)
            / i128::from(universe - 1);
        score += weight as i64;
    }
    score
}

/// Rank every catalog recipe by descending specificity. Stable: ties keep
/// registration order. Re-derived from the injected registry at every
/// recompute, so a catalog reload between ticks takes effect immediately.
pub fn rank_recipes(registry: &Registry) -> Vec<RecipeId> {
    let universe = registry.item_count();
    let mut ranked: Vec<(RecipeId, i64)> = registry
        .recipes()
        .map(|(id, def)| (id, specificity(def, universe)))
        .collect();
    ranked.sort_by_key(|&(_, score)| Reverse(score));
    ranked.into_iter().map(|(id, _)| id).collect()
}
