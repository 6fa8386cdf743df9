//! Shared fixtures for unit and integration tests.

use crate::config::SmelterConfig;
use crate::fixed::f64_to_fixed64;
use crate::id::ItemTypeId;
use crate::item::{ItemStack, SlotPool};
use crate::registry::{Ingredient, Registry, RegistryBuilder};

// Item IDs follow registration order in `test_registry`.

pub fn iron_ore() -> ItemTypeId {
    ItemTypeId(0)
}
pub fn gold_ore() -> ItemTypeId {
    ItemTypeId(1)
}
pub fn iron_ingot() -> ItemTypeId {
    ItemTypeId(2)
}
pub fn gold_ingot() -> ItemTypeId {
    ItemTypeId(3)
}
pub fn alloy_ingot() -> ItemTypeId {
    ItemTypeId(4)
}
pub fn slag() -> ItemTypeId {
    ItemTypeId(5)
}
pub fn coal() -> ItemTypeId {
    ItemTypeId(6)
}
pub fn lava_bucket() -> ItemTypeId {
    ItemTypeId(7)
}
pub fn bucket() -> ItemTypeId {
    ItemTypeId(8)
}
pub fn milk_bucket() -> ItemTypeId {
    ItemTypeId(9)
}
pub fn cheese() -> ItemTypeId {
    ItemTypeId(10)
}
/// Fuel granting only 5 ticks, for burn-out scenarios.
pub fn short_fuel() -> ItemTypeId {
    ItemTypeId(11)
}

/// A small catalog covering every test-relevant shape: plain smelting,
/// multi-ingredient, a broad (substitutable) ingredient, a container
/// ingredient, container fuel, and a deliberately short-lived fuel.
///
/// Expected specificity scores in a 12-type universe:
/// iron_gold_alloy 320 > smelt_gold 110 > smelt_iron 107 > boil_milk 105
/// > any_ore_slag 91.
pub fn test_registry() -> Registry {
    let mut b = RegistryBuilder::new(9);

    let iron_ore = b.register_simple_item("iron_ore");
    let gold_ore = b.register_simple_item("gold_ore");
    let iron_ingot = b.register_simple_item("iron_ingot");
    let gold_ingot = b.register_simple_item("gold_ingot");
    let alloy_ingot = b.register_simple_item("alloy_ingot");
    let slag = b.register_simple_item("slag");
    b.register_item("coal", 64, 1600, None);
    b.register_item("lava_bucket", 1, 20000, None);
    let bucket = b.register_item("bucket", 16, 0, None);
    let milk_bucket = b.register_item("milk_bucket", 1, 0, Some(bucket));
    let cheese = b.register_simple_item("cheese");
    b.register_item("short_fuel", 64, 5, None);

    b.mutate_item("lava_bucket", |item| item.remainder = Some(bucket))
        .expect("lava_bucket is registered");

    b.register_smelting_recipe(
        "smelt_iron",
        "smelting",
        Ingredient::of(iron_ore, 1),
        ItemStack::new(iron_ingot, 1),
        f64_to_fixed64(0.7),
    )
    .expect("valid recipe");
    b.register_smelting_recipe(
        "smelt_gold",
        "smelting",
        Ingredient::of(gold_ore, 1),
        ItemStack::new(gold_ingot, 1),
        f64_to_fixed64(1.0),
    )
    .expect("valid recipe");
    b.register_recipe(
        "iron_gold_alloy",
        "alloying",
        vec![Ingredient::of(iron_ore, 2), Ingredient::of(gold_ore, 1)],
        vec![ItemStack::new(alloy_ingot, 1)],
        f64_to_fixed64(2.0),
    )
    .expect("valid recipe");
    b.register_recipe(
        "any_ore_slag",
        "smelting",
        vec![Ingredient::any_of(vec![iron_ore, gold_ore], 1)],
        vec![ItemStack::new(slag, 1)],
        f64_to_fixed64(0.1),
    )
    .expect("valid recipe");
    b.register_smelting_recipe(
        "boil_milk",
        "cooking",
        Ingredient::of(milk_bucket, 1),
        ItemStack::new(cheese, 1),
        f64_to_fixed64(0.5),
    )
    .expect("valid recipe");

    b.build().expect("test catalog builds")
}

/// A 9/9/9 config with the given cook time and claim cap.
pub fn test_config(cook_time: u32, max_simultaneous_recipes: u32) -> SmelterConfig {
    SmelterConfig {
        cook_time,
        max_simultaneous_recipes,
        input_slots: 9,
        fuel_slots: 9,
        output_slots: 9,
    }
}

/// A pool of `slot_count` slots with the given stacks placed in order from
/// slot 0.
pub fn pool_of(slot_count: usize, stacks: &[(ItemTypeId, u32)]) -> SlotPool {
    let mut pool = SlotPool::new(slot_count);
    for (slot, &(item, count)) in stacks.iter().enumerate() {
        pool.set_stack(slot, ItemStack::new(item, count));
    }
    pool
}
