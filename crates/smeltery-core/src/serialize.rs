//! Snapshot support for furnace state.
//!
//! Binary serialization via `bitcode` with a versioned header. Snapshots
//! carry only durable state: the three slot pools, per-slot experience, and
//! the burn/cook counters. Cached derivations (allocation, room check, fuel
//! check) are excluded; loading marks every dirty flag so the first tick
//! rebuilds them from the restored pools.

use crate::fixed::Fixed64;
use crate::furnace::Furnace;
use crate::item::SlotPool;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a furnace snapshot.
pub const SNAPSHOT_MAGIC: u32 = 0x534D_4C54;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during serialization.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

/// Errors that can occur during deserialization.
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SNAPSHOT_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("snapshot from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
    #[error("experience slot count {experience} does not match output slot count {output}")]
    SlotMismatch { experience: usize, output: usize },
}

// ---------------------------------------------------------------------------
// Snapshot header
// ---------------------------------------------------------------------------

/// Header prepended to every serialized snapshot. Enables format detection
/// and version checking before trusting the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub version: u32,
}

impl SnapshotHeader {
    /// Create a header for the current format version.
    pub fn new() -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
        }
    }

    /// Validate the header. Returns `Ok(())` if valid.
    pub fn validate(&self) -> Result<(), DeserializeError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(DeserializeError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(DeserializeError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(DeserializeError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Serializable furnace state (excludes cached derivations)
// ---------------------------------------------------------------------------

/// The durable portion of furnace state. The allocation and the room/fuel
/// checks are re-derived on load.
#[derive(Debug, Serialize, Deserialize)]
struct FurnaceSnapshot {
    header: SnapshotHeader,
    input: SlotPool,
    fuel: SlotPool,
    output: SlotPool,
    experience: Vec<Fixed64>,
    cook_progress: u32,
    burn_time_remaining: u32,
    last_burn_value: u32,
}

// ---------------------------------------------------------------------------
// Furnace serialization methods
// ---------------------------------------------------------------------------

impl Furnace {
    /// Serialize durable furnace state to a binary blob via bitcode.
    pub fn serialize(&self) -> Result<Vec<u8>, SerializeError> {
        let experience = (0..self.output().slot_count())
            .map(|slot| self.stored_experience(slot))
            .collect();
        let snapshot = FurnaceSnapshot {
            header: SnapshotHeader::new(),
            input: self.input().clone(),
            fuel: self.fuel().clone(),
            output: self.output().clone(),
            experience,
            cook_progress: self.cook_progress(),
            burn_time_remaining: self.burn_time_remaining(),
            last_burn_value: self.last_burn_value(),
        };

        bitcode::serialize(&snapshot).map_err(|e| SerializeError::Encode(e.to_string()))
    }

    /// Deserialize a furnace from a binary blob.
    ///
    /// Validates the header (magic number, version) before trusting the
    /// payload; returns an error, never a panic, on mismatch. The restored
    /// furnace has every dirty flag set, so the next tick rebuilds the
    /// allocation and the room/fuel checks.
    pub fn deserialize(data: &[u8]) -> Result<Self, DeserializeError> {
        let snapshot: FurnaceSnapshot =
            bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;

        snapshot.header.validate()?;

        if snapshot.experience.len() != snapshot.output.slot_count() {
            return Err(DeserializeError::SlotMismatch {
                experience: snapshot.experience.len(),
                output: snapshot.output.slot_count(),
            });
        }

        Ok(Furnace::from_persisted(
            snapshot.input,
            snapshot.fuel,
            snapshot.output,
            snapshot.experience,
            snapshot.cook_progress,
            snapshot.burn_time_remaining,
            snapshot.last_burn_value,
        ))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
