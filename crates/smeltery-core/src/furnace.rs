//! The furnace: burn/cook state machine and crafting committer.
//!
//! One `tick()` call per time step, strictly synchronous. The tick refreshes
//! whatever cached derivations the dirty flags mark stale, advances the
//! burn/cook counters, and on cook completion commits the crafting results.
//! Boundary effects are returned as data in [`TickResult`] rather than
//! invoked through callbacks: the host applies the burning-state visual and
//! ejects the overflow stacks.

use crate::allocation::Allocation;
use crate::capacity;
use crate::config::SmelterConfig;
use crate::dirty::DirtyFlags;
use crate::fixed::Fixed64;
use crate::fuel;
use crate::item::{ItemStack, SlotPool};
use crate::registry::Registry;
use crate::specificity;

/// Burn value assumed before any fuel has been consumed; only used to scale
/// progress display.
const INITIAL_BURN_VALUE: u32 = 200;

// ---------------------------------------------------------------------------
// Tick result
// ---------------------------------------------------------------------------

/// The outcome of a single tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickResult {
    /// `Some(new_state)` when the burning state flipped this tick. The host
    /// updates adjacent visuals/blockstates from it.
    pub burning_changed: Option<bool>,
    /// Stacks crafting could not place anywhere. The host must eject them
    /// (adjacent storage first, else drop into the world); they are never
    /// discarded here.
    pub overflow: Vec<ItemStack>,
    /// Whether a crafting commit happened this tick.
    pub crafted: bool,
}

// ---------------------------------------------------------------------------
// Furnace
// ---------------------------------------------------------------------------

/// A multi-recipe smelting device: three slot pools, burn/cook progress,
/// and the cached claim allocation with its dirty flags.
#[derive(Debug, Clone)]
pub struct Furnace {
    input: SlotPool,
    fuel: SlotPool,
    output: SlotPool,
    /// Un-collected smelting experience accrued per output slot.
    experience: Vec<Fixed64>,
    burn_time_remaining: u32,
    last_burn_value: u32,
    cook_progress: u32,
    dirty: DirtyFlags,
    is_room_to_cook: bool,
    can_consume_fuel: bool,
    allocation: Allocation,
}

impl Furnace {
    /// A cold, empty furnace with the configured pool sizes.
    pub fn new(config: &SmelterConfig) -> Self {
        Self {
            input: SlotPool::new(config.input_slots),
            fuel: SlotPool::new(config.fuel_slots),
            output: SlotPool::new(config.output_slots),
            experience: vec![Fixed64::ZERO; config.output_slots],
            burn_time_remaining: 0,
            last_burn_value: INITIAL_BURN_VALUE,
            cook_progress: 0,
            dirty: DirtyFlags::all(),
            is_room_to_cook: true,
            can_consume_fuel: false,
            allocation: Allocation::empty(config.input_slots),
        }
    }

    /// Reassemble a furnace from persisted state. All dirty flags are set
    /// so the first tick re-derives the allocation, the room check, and the
    /// fuel check from the restored pools.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_persisted(
        input: SlotPool,
        fuel: SlotPool,
        output: SlotPool,
        experience: Vec<Fixed64>,
        cook_progress: u32,
        burn_time_remaining: u32,
        last_burn_value: u32,
    ) -> Self {
        let input_slots = input.slot_count();
        Self {
            input,
            fuel,
            output,
            experience,
            burn_time_remaining,
            last_burn_value,
            cook_progress,
            dirty: DirtyFlags::all(),
            is_room_to_cook: true,
            can_consume_fuel: false,
            allocation: Allocation::empty(input_slots),
        }
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn input(&self) -> &SlotPool {
        &self.input
    }

    pub fn fuel(&self) -> &SlotPool {
        &self.fuel
    }

    pub fn output(&self) -> &SlotPool {
        &self.output
    }

    pub fn burn_time_remaining(&self) -> u32 {
        self.burn_time_remaining
    }

    /// Burn value of the fuel unit consumed most recently; scales the
    /// host's flame indicator.
    pub fn last_burn_value(&self) -> u32 {
        self.last_burn_value
    }

    pub fn cook_progress(&self) -> u32 {
        self.cook_progress
    }

    pub fn is_burning(&self) -> bool {
        self.burn_time_remaining > 0
    }

    /// The claim allocation from the most recent recompute.
    pub fn allocation(&self) -> &Allocation {
        &self.allocation
    }

    /// Cached result of the output-capacity simulation.
    pub fn is_room_to_cook(&self) -> bool {
        self.is_room_to_cook
    }

    /// Cached result of the fuel-availability scan.
    pub fn can_consume_fuel(&self) -> bool {
        self.can_consume_fuel
    }

    /// Experience accrued in `slot` and not yet collected.
    pub fn stored_experience(&self, slot: usize) -> Fixed64 {
        self.experience[slot]
    }

    // -----------------------------------------------------------------------
    // Host-facing mutation
    //
    // These stand in for inventory-changed callbacks: every mutation marks
    // the dirty flag whose derivation it staled.
    // -----------------------------------------------------------------------

    pub fn set_input(&mut self, slot: usize, stack: ItemStack) {
        self.input.set_stack(slot, stack);
        self.dirty.recipes = true;
    }

    pub fn set_fuel(&mut self, slot: usize, stack: ItemStack) {
        self.fuel.set_stack(slot, stack);
        self.dirty.fuel = true;
    }

    pub fn set_output(&mut self, slot: usize, stack: ItemStack) {
        self.output.set_stack(slot, stack);
        self.dirty.output = true;
    }

    /// Insert into the input pool, first-fit across slots. Returns the
    /// remainder that did not fit.
    #[must_use = "the remainder holds items that did not fit"]
    pub fn insert_input(&mut self, registry: &Registry, stack: ItemStack) -> ItemStack {
        let limit = registry.max_stack(stack.item);
        let remainder = self.input.insert_into_any(stack, limit);
        self.dirty.recipes = true;
        remainder
    }

    /// Extract from an output slot, collecting that slot's accrued
    /// experience alongside the items.
    #[must_use = "dropping the extracted stack destroys items"]
    pub fn take_output(&mut self, slot: usize, count: u32) -> (ItemStack, Fixed64) {
        let taken = self.output.extract(slot, count, false);
        let xp = std::mem::replace(&mut self.experience[slot], Fixed64::ZERO);
        self.dirty.output = true;
        (taken, xp)
    }

    pub fn take_fuel(&mut self, slot: usize, count: u32) -> ItemStack {
        let taken = self.fuel.extract(slot, count, false);
        self.dirty.fuel = true;
        taken
    }

    /// Drain the experience accrued in `slot` without touching the items.
    pub fn take_experience(&mut self, slot: usize) -> Fixed64 {
        std::mem::replace(&mut self.experience[slot], Fixed64::ZERO)
    }

    /// Invalidate every cached derivation. Call after swapping the catalog
    /// so the next tick re-ranks and re-claims against the new registry.
    pub fn on_catalog_reload(&mut self) {
        self.dirty = DirtyFlags::all();
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Burn time consumed per tick: simultaneous recipes burn fuel
    /// proportionally faster.
    fn burn_consumption(&self) -> u32 {
        (self.allocation.claim_count() as u32).max(1)
    }

    /// Advance the furnace by one tick against the injected catalog.
    pub fn tick(&mut self, registry: &Registry, config: &SmelterConfig) -> TickResult {
        let mut result = TickResult::default();

        let was_burning = self.is_burning();
        if was_burning {
            self.burn_time_remaining = self
                .burn_time_remaining
                .saturating_sub(self.burn_consumption());
        }

        // Re-derive whatever the dirty flags mark stale.
        if self.dirty.recipes {
            self.update_recipes(registry, config);
        }
        if self.dirty.output {
            self.update_output(registry);
        }
        if self.dirty.fuel {
            self.update_fuel(registry);
        }

        let has_smeltable = self.allocation.has_claims();

        if self.is_burning() || (self.can_consume_fuel && has_smeltable) {
            // Not burning but able to start: light up before cooking.
            if !self.is_burning() && has_smeltable {
                self.consume_one_fuel(registry, &mut result.overflow);
            }

            if self.is_burning() && has_smeltable {
                if self.is_room_to_cook {
                    self.cook_progress += 1;
                    if self.cook_progress >= config.cook_time {
                        self.cook_progress = 0;
                        self.craft(registry, &mut result.overflow);
                        result.crafted = true;
                    }
                }
                // No room: progress holds at its current value while the
                // burn continues.
            } else {
                // Burning with nothing smeltable: no partial credit.
                self.cook_progress = 0;
            }
        } else if !self.is_burning() && self.cook_progress > 0 {
            if has_smeltable {
                // Cooling down with input still present decays slowly, so a
                // brief fuel gap doesn't forfeit all progress.
                self.cook_progress = self.cook_progress.saturating_sub(2);
            } else {
                self.cook_progress = 0;
            }
        }

        let is_burning_after = self.is_burning();
        if is_burning_after != was_burning {
            log::debug!(
                "burning state changed: {} -> {}",
                was_burning,
                is_burning_after
            );
            result.burning_changed = Some(is_burning_after);
        }

        result
    }

    /// Rebuild the claim allocation from the current input pool, ranking
    /// the injected catalog's recipes from scratch.
    fn update_recipes(&mut self, registry: &Registry, config: &SmelterConfig) {
        let ranked = specificity::rank_recipes(registry);
        self.allocation = Allocation::recompute(
            registry,
            &ranked,
            &self.input,
            config.max_simultaneous_recipes,
        );
        self.dirty.recipes = false;
        // A fresh allocation stales the room check.
        self.dirty.output = true;
    }

    fn update_output(&mut self, registry: &Registry) {
        self.is_room_to_cook = capacity::has_room(registry, self.allocation.claims(), &self.output);
        self.dirty.output = false;
    }

    fn update_fuel(&mut self, registry: &Registry) {
        self.can_consume_fuel = fuel::can_consume_fuel(registry, &self.fuel);
        self.dirty.fuel = false;
    }

    fn consume_one_fuel(&mut self, registry: &Registry, overflow: &mut Vec<ItemStack>) {
        if let Some(budget) = fuel::consume_fuel(registry, &mut self.fuel, overflow) {
            self.last_burn_value = budget.burn_value;
            self.burn_time_remaining += budget.burn_time_granted;
            self.dirty.fuel = true;
        }
    }

    // -----------------------------------------------------------------------
    // Crafting commit
    // -----------------------------------------------------------------------

    /// Commit the cached allocation: write result stacks to the output pool
    /// (awarding experience per destination slot in proportion to the units
    /// it received), return ingredient remainders to the unused input, then
    /// replace the real input pool with the unused state. Anything that fits
    /// nowhere lands in `overflow` -- the failsafe against item loss when
    /// the room check has been raced by an output mutation this tick.
    fn craft(&mut self, registry: &Registry, overflow: &mut Vec<ItemStack>) {
        let allocation = std::mem::replace(
            &mut self.allocation,
            Allocation::empty(self.input.slot_count()),
        );
        let (mut unused, claims) = allocation.into_parts();

        for claim in &claims {
            let Some(recipe) = registry.get_recipe(claim.recipe) else {
                continue;
            };

            let total_units: u32 = recipe.results.iter().map(|r| r.count).sum();
            for &result_stack in &recipe.results {
                let limit = registry.max_stack(result_stack.item);
                let mut remaining = result_stack;
                for slot in 0..self.output.slot_count() {
                    if remaining.is_empty() {
                        break;
                    }
                    let before = remaining.count;
                    remaining = self.output.insert(slot, remaining, limit, false);
                    let inserted = before - remaining.count;
                    if inserted > 0 {
                        let fraction =
                            Fixed64::from_num(inserted) / Fixed64::from_num(total_units);
                        self.experience[slot] += recipe.experience * fraction;
                    }
                }
                if !remaining.is_empty() {
                    overflow.push(remaining);
                }
            }

            // Remaining (container) items from this claim's consumed stacks
            // go back into the unused input slots.
            for consumed in &claim.consumed {
                let Some(container) = registry.remainder(consumed.item) else {
                    continue;
                };
                let limit = registry.max_stack(container);
                let leftover =
                    unused.insert_into_any(ItemStack::new(container, consumed.count), limit);
                if !leftover.is_empty() {
                    overflow.push(leftover);
                }
            }
        }

        // The post-craft input pool is exactly the allocation's final
        // unused-input state.
        self.input = unused;
        self.dirty.recipes = true;
        self.dirty.output = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn idle_furnace_does_nothing() {
        let reg = test_registry();
        let config = test_config(200, 1);
        let mut furnace = Furnace::new(&config);

        let result = furnace.tick(&reg, &config);
        assert_eq!(result, TickResult::default());
        assert_eq!(furnace.burn_time_remaining(), 0);
        assert_eq!(furnace.cook_progress(), 0);
    }

    #[test]
    fn lighting_consumes_fuel_and_reports_transition() {
        let reg = test_registry();
        let config = test_config(200, 1);
        let mut furnace = Furnace::new(&config);
        furnace.set_input(0, ItemStack::new(iron_ore(), 1));
        furnace.set_fuel(0, ItemStack::new(coal(), 1));

        let result = furnace.tick(&reg, &config);
        assert_eq!(result.burning_changed, Some(true));
        assert!(furnace.is_burning());
        assert_eq!(furnace.burn_time_remaining(), 1600);
        assert_eq!(furnace.last_burn_value(), 1600);
        assert!(furnace.fuel().is_empty());
        assert_eq!(furnace.cook_progress(), 1);
    }

    #[test]
    fn full_cook_cycle_produces_output() {
        let reg = test_registry();
        let config = test_config(10, 1);
        let mut furnace = Furnace::new(&config);
        furnace.set_input(0, ItemStack::new(iron_ore(), 1));
        furnace.set_fuel(0, ItemStack::new(coal(), 1));

        let mut crafted = false;
        for _ in 0..10 {
            let result = furnace.tick(&reg, &config);
            assert!(result.overflow.is_empty());
            crafted |= result.crafted;
        }
        assert!(crafted);
        assert_eq!(furnace.output().count_of(iron_ingot()), 1);
        assert!(furnace.input().is_empty());
        assert_eq!(furnace.cook_progress(), 0);
    }

    #[test]
    fn crafting_awards_proportional_experience() {
        let reg = test_registry();
        let config = test_config(5, 1);
        let mut furnace = Furnace::new(&config);
        furnace.set_input(0, ItemStack::new(iron_ore(), 1));
        furnace.set_fuel(0, ItemStack::new(coal(), 1));

        for _ in 0..5 {
            let _ = furnace.tick(&reg, &config);
        }
        // One result unit, all in slot 0: full 0.7 experience.
        assert_eq!(furnace.stored_experience(0), Fixed64::from_num(0.7));

        let (taken, xp) = furnace.take_output(0, 64);
        assert_eq!(taken, ItemStack::new(iron_ingot(), 1));
        assert_eq!(xp, Fixed64::from_num(0.7));
        assert_eq!(furnace.stored_experience(0), Fixed64::ZERO);
    }

    #[test]
    fn burning_without_input_resets_progress() {
        let reg = test_registry();
        let config = test_config(100, 1);
        let mut furnace = Furnace::new(&config);
        furnace.set_input(0, ItemStack::new(iron_ore(), 1));
        furnace.set_fuel(0, ItemStack::new(coal(), 1));

        for _ in 0..5 {
            let _ = furnace.tick(&reg, &config);
        }
        assert_eq!(furnace.cook_progress(), 5);

        // Remove the input mid-burn: progress resets immediately.
        furnace.set_input(0, ItemStack::EMPTY);
        let _ = furnace.tick(&reg, &config);
        assert_eq!(furnace.cook_progress(), 0);
        assert!(furnace.is_burning());
    }

    #[test]
    fn cooling_down_decays_progress_slowly_with_input() {
        let reg = test_registry();
        let config = test_config(100, 1);
        let mut furnace = Furnace::new(&config);
        furnace.set_input(0, ItemStack::new(iron_ore(), 1));
        // Exactly enough fuel for a short burn.
        furnace.set_fuel(0, ItemStack::new(short_fuel(), 1));

        // Light and burn out: short_fuel grants 5 ticks.
        for _ in 0..5 {
            let _ = furnace.tick(&reg, &config);
        }
        assert_eq!(furnace.cook_progress(), 5);
        let result = furnace.tick(&reg, &config);
        assert!(!furnace.is_burning());
        assert_eq!(result.burning_changed, Some(false));

        // Input still present: decay by 2 per tick.
        assert_eq!(furnace.cook_progress(), 3);
        let _ = furnace.tick(&reg, &config);
        assert_eq!(furnace.cook_progress(), 1);
        let _ = furnace.tick(&reg, &config);
        assert_eq!(furnace.cook_progress(), 0);
    }

    #[test]
    fn cooling_down_without_input_hard_resets() {
        let reg = test_registry();
        let config = test_config(100, 1);
        let mut furnace = Furnace::new(&config);
        furnace.set_input(0, ItemStack::new(iron_ore(), 1));
        furnace.set_fuel(0, ItemStack::new(short_fuel(), 1));

        for _ in 0..6 {
            let _ = furnace.tick(&reg, &config);
        }
        assert!(!furnace.is_burning());
        assert!(furnace.cook_progress() > 0);

        furnace.set_input(0, ItemStack::EMPTY);
        let _ = furnace.tick(&reg, &config);
        assert_eq!(furnace.cook_progress(), 0);
    }

    #[test]
    fn full_output_freezes_progress_but_burns_fuel() {
        let reg = test_registry();
        let config = test_config(10, 1);
        let mut furnace = Furnace::new(&config);
        furnace.set_input(0, ItemStack::new(iron_ore(), 1));
        furnace.set_fuel(0, ItemStack::new(coal(), 1));
        // Fill every output slot with an unrelated, full stack.
        for slot in 0..config.output_slots {
            furnace.set_output(slot, ItemStack::new(gold_ingot(), 64));
        }

        let _ = furnace.tick(&reg, &config);
        assert!(furnace.is_burning());
        assert!(!furnace.is_room_to_cook());
        assert_eq!(furnace.cook_progress(), 0);

        let burn_before = furnace.burn_time_remaining();
        let _ = furnace.tick(&reg, &config);
        assert_eq!(furnace.cook_progress(), 0);
        assert!(furnace.burn_time_remaining() < burn_before);
    }

    #[test]
    fn multiple_claims_burn_fuel_faster() {
        let reg = test_registry();
        let config = test_config(100, 2);
        let mut furnace = Furnace::new(&config);
        furnace.set_input(0, ItemStack::new(iron_ore(), 2));
        furnace.set_fuel(0, ItemStack::new(coal(), 1));

        // Tick 1 lights the furnace and claims two batches.
        let _ = furnace.tick(&reg, &config);
        assert_eq!(furnace.allocation().claim_count(), 2);
        let after_light = furnace.burn_time_remaining();

        // Subsequent ticks decrement by 2 per tick.
        let _ = furnace.tick(&reg, &config);
        assert_eq!(furnace.burn_time_remaining(), after_light - 2);
    }

    #[test]
    fn burn_time_never_underflows() {
        let reg = test_registry();
        let config = test_config(100, 4);
        let mut furnace = Furnace::new(&config);
        furnace.set_input(0, ItemStack::new(iron_ore(), 3));
        furnace.set_fuel(0, ItemStack::new(short_fuel(), 1));

        for _ in 0..20 {
            let _ = furnace.tick(&reg, &config);
        }
        assert_eq!(furnace.burn_time_remaining(), 0);
    }

    #[test]
    fn container_ingredient_returns_to_input() {
        let reg = test_registry();
        let config = test_config(3, 1);
        let mut furnace = Furnace::new(&config);
        furnace.set_input(0, ItemStack::new(milk_bucket(), 1));
        furnace.set_fuel(0, ItemStack::new(coal(), 1));

        let mut crafted = false;
        for _ in 0..3 {
            let result = furnace.tick(&reg, &config);
            assert!(result.overflow.is_empty());
            crafted |= result.crafted;
        }
        assert!(crafted);
        assert_eq!(furnace.output().count_of(cheese()), 1);
        assert_eq!(furnace.input().count_of(bucket()), 1);
        assert_eq!(furnace.input().count_of(milk_bucket()), 0);
    }

    #[test]
    fn craft_overflow_returns_unplaceable_container() {
        let reg = test_registry();
        let config = SmelterConfig {
            cook_time: 2,
            max_simultaneous_recipes: 1,
            input_slots: 1,
            fuel_slots: 1,
            output_slots: 9,
        };
        let mut furnace = Furnace::new(&config);
        // Two milk buckets in the only input slot: the craft consumes one,
        // and the returned empty bucket cannot merge into the remaining
        // milk bucket.
        furnace.set_input(0, ItemStack::new(milk_bucket(), 2));
        furnace.set_fuel(0, ItemStack::new(coal(), 1));

        // Tick 1: light + progress 1.
        let r1 = furnace.tick(&reg, &config);
        assert!(!r1.crafted);
        assert!(r1.overflow.is_empty());

        // Tick 2: craft. The cheese lands in the output; the bucket has
        // nowhere to live and rides the tick result instead of vanishing.
        let r2 = furnace.tick(&reg, &config);
        assert!(r2.crafted);
        assert_eq!(r2.overflow, vec![ItemStack::new(bucket(), 1)]);
        assert_eq!(furnace.output().count_of(cheese()), 1);
        assert_eq!(furnace.input().stack(0), ItemStack::new(milk_bucket(), 1));
    }

    #[test]
    fn stacked_container_fuel_overflows_through_tick() {
        let reg = test_registry();
        let config = SmelterConfig {
            cook_time: 10,
            max_simultaneous_recipes: 1,
            input_slots: 1,
            fuel_slots: 1,
            output_slots: 1,
        };
        let mut furnace = Furnace::new(&config);
        furnace.set_input(0, ItemStack::new(iron_ore(), 1));
        // Two container fuels crammed into the only fuel slot: lighting
        // consumes one, and its spent bucket has nowhere to sit.
        furnace.set_fuel(0, ItemStack::new(lava_bucket(), 2));

        let result = furnace.tick(&reg, &config);
        assert!(furnace.is_burning());
        assert_eq!(result.overflow, vec![ItemStack::new(bucket(), 1)]);
        assert_eq!(furnace.fuel().stack(0), ItemStack::new(lava_bucket(), 1));
    }

    #[test]
    fn determinism_identical_furnaces_stay_identical() {
        let reg = test_registry();
        let config = test_config(7, 2);

        let build = || {
            let mut f = Furnace::new(&config);
            f.set_input(0, ItemStack::new(iron_ore(), 5));
            f.set_input(3, ItemStack::new(gold_ore(), 2));
            f.set_fuel(0, ItemStack::new(coal(), 2));
            f
        };
        let mut a = build();
        let mut b = build();

        for _ in 0..50 {
            let ra = a.tick(&reg, &config);
            let rb = b.tick(&reg, &config);
            assert_eq!(ra, rb);
        }
        assert_eq!(a.input(), b.input());
        assert_eq!(a.output(), b.output());
        assert_eq!(a.fuel(), b.fuel());
        assert_eq!(a.cook_progress(), b.cook_progress());
        assert_eq!(a.burn_time_remaining(), b.burn_time_remaining());
    }
}
