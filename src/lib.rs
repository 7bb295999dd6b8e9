//! Tap Rush - a timed reaction minigame
//!
//! Core modules:
//! - `sim`: Deterministic session engine (spawning, timers, scoring, end conditions)
//! - `config`: Tunable game parameters
//! - `platform`: Browser/native collaborator interfaces (viewport, navigation, feedback)
//! - `results`: Final result record and messaging
//! - `leaderboard`: Score table persistence
//! - `security`: Verification code shown between play and results

pub mod config;
pub mod leaderboard;
pub mod platform;
pub mod results;
pub mod security;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use leaderboard::{LeaderboardStore, LocalLeaderboard};
pub use results::{ResultRecord, ResultTier};

/// Game configuration constants
pub mod consts {
    /// Session length (seconds)
    pub const SESSION_DURATION_SECS: u32 = 90;
    /// Negative taps allowed before striking out
    pub const MAX_STRIKES: u32 = 3;
    /// Chance that a spawned card is positive
    pub const POSITIVE_PROBABILITY: f64 = 0.7;
    /// Points gained (positive) or lost (negative) per tap
    pub const SCORE_DELTA: i64 = 5;

    /// Card geometry (px)
    pub const CARD_SIZE: f32 = 100.0;
    pub const CARD_MARGIN: f32 = 100.0;

    /// Spawn interval ramps from MAX down to MIN (ms)
    pub const SPAWN_INTERVAL_MAX_MS: u32 = 2000;
    pub const SPAWN_INTERVAL_MIN_MS: u32 = 500;
    /// Card lifespan ramps from MAX down to MIN (ms)
    pub const LIFESPAN_MAX_MS: u32 = 3000;
    pub const LIFESPAN_MIN_MS: u32 = 1000;
    /// Seconds until difficulty bottoms out
    pub const DIFFICULTY_RAMP_SECS: f32 = 60.0;

    /// Concurrent card cap; spawns are skipped while the board is full
    pub const MAX_ACTIVE_CARDS: usize = 7;

    /// Session clock resolution (ms)
    pub const CLOCK_TICK_MS: u64 = 1000;
    /// Delay between the final strike and ending the session (lets feedback render)
    pub const STRIKE_OUT_DELAY_MS: u64 = 500;
    /// How long a "+5"/"-5" popup stays visible
    pub const FEEDBACK_DURATION_MS: u64 = 1000;

    /// Words shown on positive cards
    pub const POSITIVE_WORDS: [&str; 4] = ["Jesus", "Lord", "Christ", "God"];
    /// Words shown on negative cards
    pub const NEGATIVE_WORDS: [&str; 3] = ["Satan", "Devil", "Evil"];

    /// Card colors
    pub const PALETTE: [&str; 8] = [
        "#FF6B6B", // Red
        "#4ECDC4", // Teal
        "#45B7D1", // Blue
        "#FFA07A", // Light Salmon
        "#98D8C8", // Mint
        "#F7DC6F", // Yellow
        "#BB8FCE", // Purple
        "#85C1E2", // Sky Blue
    ];
}

/// Linear interpolation from `from` to `to` by `t` (not clamped)
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Clamp a ratio to [0, 1], mapping NaN to 0
#[inline]
pub fn unit_clamp(t: f32) -> f32 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}
