//! Smeltery Core -- a deterministic multi-recipe smelting engine.
//!
//! Models a single large furnace with pooled input, fuel, and output slots
//! that cooks several recipe batches against one shared burn. The host
//! (game loop, server, test harness) owns the clock and calls
//! [`furnace::Furnace::tick`] once per time step; everything is synchronous
//! and value-semantic, with no threads, no I/O, and no callbacks.
//!
//! # Tick Pipeline
//!
//! Each call to [`furnace::Furnace::tick`] advances the furnace by one tick:
//!
//! 1. **Burn** -- Decrement remaining burn time, faster with more claims.
//! 2. **Refresh** -- Re-derive whatever the dirty flags mark stale: the
//!    claim allocation, the room-to-cook check, the fuel check.
//! 3. **Ignite** -- Consume one fuel unit if cold with smeltable input.
//! 4. **Cook** -- Advance progress while burning with input and room;
//!    commit crafting when progress reaches the configured cook time.
//! 5. **Cool** -- Decay or reset progress when the burn has lapsed.
//!
//! # Key Types
//!
//! - [`furnace::Furnace`] -- The device: slot pools, burn/cook counters,
//!   cached allocation, and the tick state machine.
//! - [`furnace::TickResult`] -- Boundary effects returned as data: the
//!   burning-state flip and any overflow stacks the host must eject.
//! - [`registry::Registry`] -- Immutable item/recipe catalog, injected at
//!   every tick so a reload takes effect at the next recompute.
//! - [`allocation::Allocation`] -- Greedy claim assignment of ranked
//!   recipes over the shared input pool.
//! - [`specificity`] -- The ranking that lets narrow recipes claim shared
//!   items before broad ones.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for experience math.
//! - [`serialize`] -- Versioned furnace snapshots via bitcode.

pub mod allocation;
pub mod capacity;
pub mod config;
#[cfg(feature = "data-loader")]
pub mod data_loader;
pub mod dirty;
pub mod fixed;
pub mod fuel;
pub mod furnace;
pub mod id;
pub mod item;
pub mod registry;
pub mod serialize;
pub mod specificity;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
