use serde::{Deserialize, Serialize};

/// Smelter configuration, validated at the load boundary. The core assumes
/// a validated config: `cook_time` and `max_simultaneous_recipes` are at
/// least 1 and every pool has at least one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmelterConfig {
    /// Ticks of continuous burning-with-input needed to finish one cook cycle.
    pub cook_time: u32,
    /// Cap on recipe batches claimed per allocation recompute.
    pub max_simultaneous_recipes: u32,
    pub input_slots: usize,
    pub fuel_slots: usize,
    pub output_slots: usize,
}

impl Default for SmelterConfig {
    fn default() -> Self {
        Self {
            cook_time: 200,
            max_simultaneous_recipes: 1,
            input_slots: 9,
            fuel_slots: 9,
            output_slots: 9,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cook_time must be at least 1, got {0}")]
    CookTimeTooSmall(u32),
    #[error("max_simultaneous_recipes must be at least 1, got {0}")]
    MaxSimultaneousTooSmall(u32),
    #[error("{0} must have at least one slot")]
    NoSlots(&'static str),
}

impl SmelterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cook_time < 1 {
            return Err(ConfigError::CookTimeTooSmall(self.cook_time));
        }
        if self.max_simultaneous_recipes < 1 {
            return Err(ConfigError::MaxSimultaneousTooSmall(
                self.max_simultaneous_recipes,
            ));
        }
        if self.input_slots == 0 {
            return Err(ConfigError::NoSlots("input pool"));
        }
        if self.fuel_slots == 0 {
            return Err(ConfigError::NoSlots("fuel pool"));
        }
        if self.output_slots == 0 {
            return Err(ConfigError::NoSlots("output pool"));
        }
        Ok(())
    }
}
