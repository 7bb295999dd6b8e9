//! Game configuration
//!
//! Every fixed parameter of a session in one serializable struct. Persisted
//! separately from the leaderboard in LocalStorage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected configuration values
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("session duration must be at least one second")]
    ZeroDuration,
    #[error("max strikes must be at least one")]
    ZeroStrikes,
    #[error("positive probability {0} is outside [0, 1]")]
    Probability(f64),
    #[error("{name} bounds are inverted (min {min} > max {max})")]
    InvertedBounds { name: &'static str, min: u32, max: u32 },
    #[error("{0} is out of range (must be positive and finite)")]
    NonPositive(&'static str),
    #[error("palette is empty")]
    EmptyPalette,
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Session parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds on the clock at session start
    pub session_duration_secs: u32,
    /// Negative taps that end the session
    pub max_strikes: u32,
    /// Probability a spawned card is positive
    pub positive_probability: f64,
    /// Score magnitude of a single tap
    pub score_delta: i64,

    // === Geometry ===
    pub card_size: f32,
    pub margin: f32,

    // === Difficulty ===
    pub spawn_interval_max_ms: u32,
    pub spawn_interval_min_ms: u32,
    pub lifespan_max_ms: u32,
    pub lifespan_min_ms: u32,
    /// Seconds over which spawn rate and lifespan ramp to their hard values
    pub ramp_secs: f32,

    /// Concurrent card cap (None = unbounded)
    pub max_active_cards: Option<usize>,

    // === Timing ===
    pub strike_out_delay_ms: u64,
    pub feedback_duration_ms: u64,

    /// Card colors (hex strings)
    pub palette: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            session_duration_secs: SESSION_DURATION_SECS,
            max_strikes: MAX_STRIKES,
            positive_probability: POSITIVE_PROBABILITY,
            score_delta: SCORE_DELTA,

            card_size: CARD_SIZE,
            margin: CARD_MARGIN,

            spawn_interval_max_ms: SPAWN_INTERVAL_MAX_MS,
            spawn_interval_min_ms: SPAWN_INTERVAL_MIN_MS,
            lifespan_max_ms: LIFESPAN_MAX_MS,
            lifespan_min_ms: LIFESPAN_MIN_MS,
            ramp_secs: DIFFICULTY_RAMP_SECS,

            max_active_cards: Some(MAX_ACTIVE_CARDS),

            strike_out_delay_ms: STRIKE_OUT_DELAY_MS,
            feedback_duration_ms: FEEDBACK_DURATION_MS,

            palette: PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl GameConfig {
    /// Check that the parameters describe a playable session
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_duration_secs == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if self.max_strikes == 0 {
            return Err(ConfigError::ZeroStrikes);
        }
        if !(0.0..=1.0).contains(&self.positive_probability) {
            return Err(ConfigError::Probability(self.positive_probability));
        }
        if self.spawn_interval_min_ms > self.spawn_interval_max_ms {
            return Err(ConfigError::InvertedBounds {
                name: "spawn interval",
                min: self.spawn_interval_min_ms,
                max: self.spawn_interval_max_ms,
            });
        }
        if self.lifespan_min_ms > self.lifespan_max_ms {
            return Err(ConfigError::InvertedBounds {
                name: "lifespan",
                min: self.lifespan_min_ms,
                max: self.lifespan_max_ms,
            });
        }
        // A zero interval would spawn forever without advancing time
        if self.spawn_interval_min_ms == 0 {
            return Err(ConfigError::NonPositive("spawn_interval_min_ms"));
        }
        if self.lifespan_min_ms == 0 {
            return Err(ConfigError::NonPositive("lifespan_min_ms"));
        }
        if self.ramp_secs.is_nan() || self.ramp_secs <= 0.0 {
            return Err(ConfigError::NonPositive("ramp_secs"));
        }
        if self.card_size.is_nan() || self.card_size <= 0.0 {
            return Err(ConfigError::NonPositive("card_size"));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ConfigError::NonPositive("margin"));
        }
        if self.max_active_cards == Some(0) {
            return Err(ConfigError::NonPositive("max_active_cards"));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tap_rush_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
