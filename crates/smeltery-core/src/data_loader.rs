//! Data-driven catalog loading from JSON.
//!
//! Feature-gated behind `data-loader`. Deserializes item and recipe
//! definitions into a [`RegistryBuilder`]. A malformed recipe is rejected
//! and logged, not fatal: the rest of the catalog still loads, matching
//! how data packs tolerate individual bad entries.

use crate::fixed::f64_to_fixed64;
use crate::item::ItemStack;
use crate::registry::{
    Ingredient, RegistryBuilder, RegistryError, DEFAULT_MAX_STACK, MAX_RECIPE_EXPERIENCE,
};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during data loading. Per-recipe problems are not
/// errors; they land in [`CatalogLoad::rejected`].
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("item {item}: unknown remainder item {remainder}")]
    UnknownRemainder { item: String, remainder: String },
    #[error("duplicate item name: {0}")]
    DuplicateItem(String),
}

/// A recipe excluded from the catalog, with the reason.
#[derive(Debug)]
pub struct RejectedRecipe {
    pub name: String,
    pub reason: String,
}

/// The outcome of a catalog load: the populated builder plus every recipe
/// that was rejected along the way.
#[derive(Debug)]
pub struct CatalogLoad {
    pub builder: RegistryBuilder,
    pub rejected: Vec<RejectedRecipe>,
}

// ---------------------------------------------------------------------------
// JSON data structures
// ---------------------------------------------------------------------------

/// Top-level catalog data structure for JSON deserialization.
#[derive(Debug, serde::Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub items: Vec<ItemData>,
    #[serde(default)]
    pub recipes: Vec<RecipeData>,
}

/// JSON representation of an item type.
#[derive(Debug, serde::Deserialize)]
pub struct ItemData {
    pub name: String,
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    #[serde(default)]
    pub burn_value: u32,
    /// Item left behind when this one is consumed, by name. May reference
    /// an item defined later in the file.
    #[serde(default)]
    pub remainder: Option<String>,
}

fn default_max_stack() -> u32 {
    DEFAULT_MAX_STACK
}

/// JSON representation of a recipe. `result` is the single-result shorthand;
/// `results` is the general form and wins when both are present.
#[derive(Debug, serde::Deserialize)]
pub struct RecipeData {
    pub name: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientData>,
    #[serde(default)]
    pub result: Option<StackData>,
    #[serde(default)]
    pub results: Vec<StackData>,
    #[serde(default)]
    pub experience: f64,
}

/// JSON representation of an ingredient requirement. Either `item` (one
/// type) or `any_of` (substitutable types).
#[derive(Debug, serde::Deserialize)]
pub struct IngredientData {
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub any_of: Vec<String>,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

/// JSON representation of an item stack.
#[derive(Debug, serde::Deserialize)]
pub struct StackData {
    pub item: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

// ---------------------------------------------------------------------------
// Loading functions
// ---------------------------------------------------------------------------

/// Load a catalog from a JSON string. `input_slots` bounds recipe width,
/// matching the furnace the catalog will serve.
pub fn load_catalog_json(json: &str, input_slots: usize) -> Result<CatalogLoad, DataLoadError> {
    let data: CatalogData = serde_json::from_str(json)?;
    build_catalog(data, input_slots)
}

/// Load a catalog from JSON bytes.
pub fn load_catalog_json_bytes(
    bytes: &[u8],
    input_slots: usize,
) -> Result<CatalogLoad, DataLoadError> {
    let data: CatalogData = serde_json::from_slice(bytes)?;
    build_catalog(data, input_slots)
}

fn build_catalog(data: CatalogData, input_slots: usize) -> Result<CatalogLoad, DataLoadError> {
    let mut builder = RegistryBuilder::new(input_slots);

    // Phase 1: register every item without its remainder, so remainders can
    // reference items in any order.
    for item in &data.items {
        if builder.item_id(&item.name).is_some() {
            return Err(DataLoadError::DuplicateItem(item.name.clone()));
        }
        builder.register_item(&item.name, item.max_stack, item.burn_value, None);
    }

    // Phase 2: resolve remainder references by name.
    for item in &data.items {
        let Some(remainder_name) = &item.remainder else {
            continue;
        };
        let remainder =
            builder
                .item_id(remainder_name)
                .ok_or_else(|| DataLoadError::UnknownRemainder {
                    item: item.name.clone(),
                    remainder: remainder_name.clone(),
                })?;
        // The item was registered in phase 1, so the lookup cannot fail.
        let _ = builder.mutate_item(&item.name, |def| def.remainder = Some(remainder));
    }

    // Phase 3: register recipes. A bad recipe is logged and skipped.
    let mut rejected = Vec::new();
    for recipe in &data.recipes {
        if let Err(reason) = register_one_recipe(&mut builder, recipe) {
            log::warn!("rejecting recipe {}: {reason}", recipe.name);
            rejected.push(RejectedRecipe {
                name: recipe.name.clone(),
                reason,
            });
        }
    }

    Ok(CatalogLoad { builder, rejected })
}

fn register_one_recipe(builder: &mut RegistryBuilder, recipe: &RecipeData) -> Result<(), String> {
    // Bound the raw float before it reaches fixed-point conversion.
    if !recipe.experience.is_finite()
        || recipe.experience < 0.0
        || recipe.experience > f64::from(MAX_RECIPE_EXPERIENCE)
    {
        return Err(format!("experience {} out of range", recipe.experience));
    }

    let mut ingredients = Vec::with_capacity(recipe.ingredients.len());
    for (index, data) in recipe.ingredients.iter().enumerate() {
        let names: Vec<&String> = match (&data.item, data.any_of.is_empty()) {
            (Some(item), true) => vec![item],
            (None, false) => data.any_of.iter().collect(),
            (Some(_), false) => {
                return Err(format!("ingredient {index} sets both item and any_of"));
            }
            (None, true) => {
                return Err(format!("ingredient {index} names no item types"));
            }
        };
        let mut matching = Vec::with_capacity(names.len());
        for name in names {
            let id = builder
                .item_id(name)
                .ok_or_else(|| format!("unknown item: {name}"))?;
            matching.push(id);
        }
        ingredients.push(Ingredient::any_of(matching, data.count));
    }

    let result_data: Vec<&StackData> = if !recipe.results.is_empty() {
        recipe.results.iter().collect()
    } else {
        recipe.result.iter().collect()
    };
    let mut results = Vec::with_capacity(result_data.len());
    for data in result_data {
        let id = builder
            .item_id(&data.item)
            .ok_or_else(|| format!("unknown item: {}", data.item))?;
        results.push(ItemStack::new(id, data.count));
    }

    builder
        .register_recipe(
            &recipe.name,
            &recipe.group,
            ingredients,
            results,
            f64_to_fixed64(recipe.experience),
        )
        .map_err(|e: RegistryError| e.to_string())?;
    Ok(())
}

// ===========================================================================
// Tests
// ===========================================================================
