use serde::{Deserialize, Serialize};

/// Tracks which cached derivations are stale.
///
/// Each flag maps one pool to the derivation built from it: the input pool
/// to the claim allocation, the output pool (or a fresh allocation) to the
/// room-to-cook check, and the fuel pool to the can-consume-fuel check.
/// The tick inspects and clears these at its start instead of recomputing
/// every derivation every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirtyFlags {
    /// Input pool changed; the allocation must be rebuilt.
    pub recipes: bool,
    /// Output pool or allocation changed; room-to-cook must be rechecked.
    pub output: bool,
    /// Fuel pool changed; can-consume-fuel must be rechecked.
    pub fuel: bool,
}

impl DirtyFlags {
    /// Everything stale; used at creation and after restoring a snapshot.
    pub fn all() -> Self {
        Self {
            recipes: true,
            output: true,
            fuel: true,
        }
    }

    pub fn any(&self) -> bool {
        self.recipes || self.output || self.fuel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_clean() {
        let flags = DirtyFlags::default();
        assert!(!flags.any());
    }

    #[test]
    fn all_marks_everything() {
        let flags = DirtyFlags::all();
        assert!(flags.recipes && flags.output && flags.fuel);
        assert!(flags.any());
    }

    #[test]
    fn any_reflects_single_flag() {
        let flags = DirtyFlags {
            fuel: true,
            ..Default::default()
        };
        assert!(flags.any());
    }
}
