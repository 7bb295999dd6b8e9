//! Leaderboard
//!
//! The results stage inserts one row per finished session; the leaderboard
//! screen queries the top rows. The store is opaque to the game: anything that
//! can insert, query and clear rows works. `LocalLeaderboard` keeps rows in
//! memory and mirrors them to LocalStorage on the web.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::results::ResultRecord;

/// Default number of rows the leaderboard screen shows
pub const DEFAULT_QUERY_LIMIT: usize = 20;

/// Maximum rows kept locally
pub const MAX_LOCAL_ENTRIES: usize = 100;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("failed to encode leaderboard: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("leaderboard storage unavailable: {0}")]
    Storage(String),
}

/// A stored row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(flatten)]
    pub record: ResultRecord,
    /// Unix timestamp (ms) when inserted
    pub created_at: f64,
}

/// Opaque row store
pub trait LeaderboardStore {
    /// Insert a row. Returns its rank (1-indexed) among the stored rows.
    fn insert(&mut self, record: ResultRecord, created_at: f64) -> Result<usize, LeaderboardError>;

    /// Best rows first: highest score, newest first among equal scores
    fn top(&self, limit: usize) -> Vec<LeaderboardEntry>;

    /// Delete every row
    fn clear(&mut self) -> Result<(), LeaderboardError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalLeaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl LocalLeaderboard {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tap_rush_leaderboard";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<i64> {
        self.entries.first().map(|e| e.record.final_score)
    }

    pub fn to_json(&self) -> Result<String, LeaderboardError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, LeaderboardError> {
        let mut board: Self = serde_json::from_str(json)?;
        board.entries.sort_by(rank_order);
        Ok(board)
    }

    /// Load leaderboard from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(board) = Self::from_json(&json) {
                    log::info!("Loaded {} leaderboard rows", board.entries.len());
                    return board;
                }
            }
        }

        log::info!("No leaderboard found, starting fresh");
        Self::new()
    }

    /// Save leaderboard to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), LeaderboardError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| LeaderboardError::Storage("no LocalStorage".into()))?;
        storage
            .set_item(Self::STORAGE_KEY, &self.to_json()?)
            .map_err(|e| LeaderboardError::Storage(format!("{:?}", e)))?;
        log::info!("Leaderboard saved ({} rows)", self.entries.len());
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), LeaderboardError> {
        Ok(())
    }
}

impl LeaderboardStore for LocalLeaderboard {
    fn insert(&mut self, record: ResultRecord, created_at: f64) -> Result<usize, LeaderboardError> {
        let entry = LeaderboardEntry { record, created_at };

        // Insertion point keeps the list in rank order
        let pos = self
            .entries
            .iter()
            .position(|e| rank_order(&entry, e).is_lt())
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_LOCAL_ENTRIES);
        self.save()?;
        Ok(pos + 1)
    }

    fn top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.entries.iter().take(limit).cloned().collect()
    }

    fn clear(&mut self) -> Result<(), LeaderboardError> {
        self.entries.clear();
        self.save()
    }
}

/// Score descending, then newest first
fn rank_order(a: &LeaderboardEntry, b: &LeaderboardEntry) -> std::cmp::Ordering {
    b.record
        .final_score
        .cmp(&a.record.final_score)
        .then_with(|| b.created_at.total_cmp(&a.created_at))
}
