//! Difficulty curve
//!
//! Maps elapsed session time to spawn interval and card lifespan. Both ramp
//! linearly from their easy to their hard bound over the ramp window and stay
//! at the hard bound afterwards.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::*;
use crate::{lerp, unit_clamp};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub ramp_secs: f32,
    pub spawn_interval_max_ms: u32,
    pub spawn_interval_min_ms: u32,
    pub lifespan_max_ms: u32,
    pub lifespan_min_ms: u32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            ramp_secs: DIFFICULTY_RAMP_SECS,
            spawn_interval_max_ms: SPAWN_INTERVAL_MAX_MS,
            spawn_interval_min_ms: SPAWN_INTERVAL_MIN_MS,
            lifespan_max_ms: LIFESPAN_MAX_MS,
            lifespan_min_ms: LIFESPAN_MIN_MS,
        }
    }
}

impl Difficulty {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            ramp_secs: config.ramp_secs,
            spawn_interval_max_ms: config.spawn_interval_max_ms,
            spawn_interval_min_ms: config.spawn_interval_min_ms,
            lifespan_max_ms: config.lifespan_max_ms,
            lifespan_min_ms: config.lifespan_min_ms,
        }
    }

    /// Ramp progress in [0, 1]
    pub fn progress(&self, elapsed_secs: f32) -> f32 {
        unit_clamp(elapsed_secs / self.ramp_secs)
    }

    /// Delay before the next spawn (ms)
    pub fn spawn_interval_ms(&self, elapsed_secs: f32) -> u32 {
        ramp(
            self.spawn_interval_max_ms,
            self.spawn_interval_min_ms,
            self.progress(elapsed_secs),
        )
    }

    /// Lifespan of a card spawned now (ms)
    pub fn lifespan_ms(&self, elapsed_secs: f32) -> u32 {
        ramp(
            self.lifespan_max_ms,
            self.lifespan_min_ms,
            self.progress(elapsed_secs),
        )
    }
}

fn ramp(easy: u32, hard: u32, progress: f32) -> u32 {
    let value = lerp(easy as f32, hard as f32, progress).round() as u32;
    // Rounding must never escape the bounds
    value.clamp(easy.min(hard), easy.max(hard))
}
