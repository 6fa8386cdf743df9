use crate::fixed::Fixed64;
use crate::id::{ItemTypeId, RecipeId};
use crate::item::ItemStack;
use std::collections::HashMap;

/// Default per-slot stack limit for item types that don't override it.
pub const DEFAULT_MAX_STACK: u32 = 64;

/// Upper bound on recipe experience. Keeps the specificity ranking's
/// fixed-point `experience * 10` term well inside the `Fixed64` range.
pub const MAX_RECIPE_EXPERIENCE: u32 = 1_000_000;

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// An item type definition in the catalog.
#[derive(Debug, Clone)]
pub struct ItemTypeDef {
    pub name: String,
    /// Per-slot stack limit.
    pub max_stack: u32,
    /// Ticks of heat granted when burned as fuel. 0 = not fuel.
    pub burn_value: u32,
    /// Item left behind when this item is consumed (a bucket emptied of
    /// lava, for example). Applies to fuel and to smelted ingredients.
    pub remainder: Option<ItemTypeId>,
}

/// An unordered ingredient requirement: `count` units of any mix of the
/// item types in `matching`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub matching: Vec<ItemTypeId>,
    pub count: u32,
}

impl Ingredient {
    pub fn of(item: ItemTypeId, count: u32) -> Self {
        Self {
            matching: vec![item],
            count,
        }
    }

    pub fn any_of(matching: Vec<ItemTypeId>, count: u32) -> Self {
        Self { matching, count }
    }

    pub fn matches(&self, item: ItemTypeId) -> bool {
        self.matching.contains(&item)
    }
}

/// An immutable recipe definition: unordered ingredient requirements, the
/// result stacks crafted per batch, and the experience awarded.
#[derive(Debug, Clone)]
pub struct RecipeDef {
    pub name: String,
    pub group: String,
    pub ingredients: Vec<Ingredient>,
    pub results: Vec<ItemStack>,
    pub experience: Fixed64,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("recipe {0}: no ingredients")]
    NoIngredients(String),
    #[error("recipe {name}: too many ingredients, the max is {max}")]
    TooManyIngredients { name: String, max: usize },
    #[error("recipe {0}: empty result list")]
    EmptyResults(String),
    #[error("recipe {recipe}: ingredient {index} matches no item types")]
    EmptyIngredient { recipe: String, index: usize },
    #[error("recipe {recipe}: zero quantity in {position}")]
    ZeroQuantity { recipe: String, position: String },
    #[error("recipe {0}: experience must be between 0 and {MAX_RECIPE_EXPERIENCE}")]
    ExperienceOutOfRange(String),
    #[error("invalid item reference: {0:?}")]
    InvalidItemRef(ItemTypeId),
    #[error("catalog must register at least two item types to rank recipes")]
    UniverseTooSmall,
    #[error("not found: {0}")]
    NotFound(String),
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for constructing an immutable [`Registry`].
/// Recipes are validated as they are registered; item references are
/// validated when the catalog is finalized.
#[derive(Debug)]
pub struct RegistryBuilder {
    input_slots: usize,
    items: Vec<ItemTypeDef>,
    item_name_to_id: HashMap<String, ItemTypeId>,
    recipes: Vec<RecipeDef>,
    recipe_name_to_id: HashMap<String, RecipeId>,
}

impl RegistryBuilder {
    /// `input_slots` bounds how many ingredient requirements one recipe may
    /// carry: more requirements than input slots could never be satisfied.
    pub fn new(input_slots: usize) -> Self {
        Self {
            input_slots,
            items: Vec::new(),
            item_name_to_id: HashMap::new(),
            recipes: Vec::new(),
            recipe_name_to_id: HashMap::new(),
        }
    }

    /// Register an item type. Returns its ID.
    pub fn register_item(
        &mut self,
        name: &str,
        max_stack: u32,
        burn_value: u32,
        remainder: Option<ItemTypeId>,
    ) -> ItemTypeId {
        let id = ItemTypeId(self.items.len() as u32);
        self.items.push(ItemTypeDef {
            name: name.to_string(),
            max_stack,
            burn_value,
            remainder,
        });
        self.item_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Register a plain (non-fuel) item with the default stack limit.
    pub fn register_simple_item(&mut self, name: &str) -> ItemTypeId {
        self.register_item(name, DEFAULT_MAX_STACK, 0, None)
    }

    /// Register a multi-ingredient recipe. Rejects malformed recipes with a
    /// descriptive error; a rejected recipe is simply not part of the catalog.
    pub fn register_recipe(
        &mut self,
        name: &str,
        group: &str,
        ingredients: Vec<Ingredient>,
        results: Vec<ItemStack>,
        experience: Fixed64,
    ) -> Result<RecipeId, RegistryError> {
        if ingredients.is_empty() {
            return Err(RegistryError::NoIngredients(name.to_string()));
        }
        if ingredients.len() > self.input_slots {
            return Err(RegistryError::TooManyIngredients {
                name: name.to_string(),
                max: self.input_slots,
            });
        }
        if results.is_empty() {
            return Err(RegistryError::EmptyResults(name.to_string()));
        }
        for (index, ingredient) in ingredients.iter().enumerate() {
            if ingredient.matching.is_empty() {
                return Err(RegistryError::EmptyIngredient {
                    recipe: name.to_string(),
                    index,
                });
            }
            if ingredient.count == 0 {
                return Err(RegistryError::ZeroQuantity {
                    recipe: name.to_string(),
                    position: format!("ingredient {index}"),
                });
            }
        }
        for (index, result) in results.iter().enumerate() {
            if result.count == 0 {
                return Err(RegistryError::ZeroQuantity {
                    recipe: name.to_string(),
                    position: format!("result {index}"),
                });
            }
        }
        if experience < Fixed64::ZERO || experience > Fixed64::from_num(MAX_RECIPE_EXPERIENCE) {
            return Err(RegistryError::ExperienceOutOfRange(name.to_string()));
        }

        let id = RecipeId(self.recipes.len() as u32);
        self.recipes.push(RecipeDef {
            name: name.to_string(),
            group: group.to_string(),
            ingredients,
            results,
            experience,
        });
        self.recipe_name_to_id.insert(name.to_string(), id);
        Ok(id)
    }

    /// Adapter for the legacy single-ingredient smelting shape: one
    /// ingredient in, one result stack out. Normalizes into the same
    /// [`RecipeDef`] the multi-ingredient path uses.
    pub fn register_smelting_recipe(
        &mut self,
        name: &str,
        group: &str,
        ingredient: Ingredient,
        result: ItemStack,
        experience: Fixed64,
    ) -> Result<RecipeId, RegistryError> {
        self.register_recipe(name, group, vec![ingredient], vec![result], experience)
    }

    /// Mutate an existing item type by name.
    pub fn mutate_item<F>(&mut self, name: &str, f: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut ItemTypeDef),
    {
        let id = self
            .item_name_to_id
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        f(&mut self.items[id.0 as usize]);
        Ok(())
    }

    /// Lookup item type ID by name.
    pub fn item_id(&self, name: &str) -> Option<ItemTypeId> {
        self.item_name_to_id.get(name).copied()
    }

    /// Lookup recipe ID by name.
    pub fn recipe_id(&self, name: &str) -> Option<RecipeId> {
        self.recipe_name_to_id.get(name).copied()
    }

    /// Finalize and build the immutable registry.
    pub fn build(self) -> Result<Registry, RegistryError> {
        // All item references must resolve.
        let item_count = self.items.len();
        let valid = |id: ItemTypeId| (id.0 as usize) < item_count;
        for item in &self.items {
            if let Some(remainder) = item.remainder {
                if !valid(remainder) {
                    return Err(RegistryError::InvalidItemRef(remainder));
                }
            }
        }
        for recipe in &self.recipes {
            for ingredient in &recipe.ingredients {
                for &item in &ingredient.matching {
                    if !valid(item) {
                        return Err(RegistryError::InvalidItemRef(item));
                    }
                }
            }
            for result in &recipe.results {
                if !valid(result.item) {
                    return Err(RegistryError::InvalidItemRef(result.item));
                }
            }
        }

        // Specificity ranking divides by (universe - 1); a catalog that
        // carries recipes needs at least two item types.
        if !self.recipes.is_empty() && item_count < 2 {
            return Err(RegistryError::UniverseTooSmall);
        }

        Ok(Registry {
            input_slots: self.input_slots,
            items: self.items,
            item_name_to_id: self.item_name_to_id,
            recipes: self.recipes,
            recipe_name_to_id: self.recipe_name_to_id,
        })
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Immutable recipe catalog. Frozen after build. Reloading replaces the
/// whole value between ticks; the core re-derives its ranking from whatever
/// registry is injected at recompute time.
#[derive(Debug)]
pub struct Registry {
    input_slots: usize,
    items: Vec<ItemTypeDef>,
    item_name_to_id: HashMap<String, ItemTypeId>,
    recipes: Vec<RecipeDef>,
    recipe_name_to_id: HashMap<String, RecipeId>,
}

impl Registry {
    pub fn get_item(&self, id: ItemTypeId) -> Option<&ItemTypeDef> {
        self.items.get(id.0 as usize)
    }

    pub fn get_recipe(&self, id: RecipeId) -> Option<&RecipeDef> {
        self.recipes.get(id.0 as usize)
    }

    pub fn item_id(&self, name: &str) -> Option<ItemTypeId> {
        self.item_name_to_id.get(name).copied()
    }

    pub fn recipe_id(&self, name: &str) -> Option<RecipeId> {
        self.recipe_name_to_id.get(name).copied()
    }

    /// Size of the item-type universe, used by specificity ranking.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn input_slots(&self) -> usize {
        self.input_slots
    }

    /// All recipes in registration order.
    pub fn recipes(&self) -> impl Iterator<Item = (RecipeId, &RecipeDef)> {
        self.recipes
            .iter()
            .enumerate()
            .map(|(i, def)| (RecipeId(i as u32), def))
    }

    /// Per-slot stack limit for `item`.
    pub fn max_stack(&self, item: ItemTypeId) -> u32 {
        self.get_item(item)
            .map(|def| def.max_stack)
            .unwrap_or(DEFAULT_MAX_STACK)
    }

    /// Ticks of heat `item` grants as fuel. 0 = not fuel.
    pub fn burn_value(&self, item: ItemTypeId) -> u32 {
        self.get_item(item).map(|def| def.burn_value).unwrap_or(0)
    }

    /// The item left behind when one unit of `item` is consumed.
    pub fn remainder(&self, item: ItemTypeId) -> Option<ItemTypeId> {
        self.get_item(item).and_then(|def| def.remainder)
    }
}
