//! Game state store
//!
//! Single source of truth for a session: active cards, score, strikes, clock
//! counters and the playing flag. The session owns the store and lends it to
//! the scheduler, clock and tap handler one at a time, so every mutation is
//! serialized by construction. Once `playing` is false the card set, score and
//! strikes are frozen.

use std::collections::HashMap;

use super::card::{Card, CardId};
use crate::config::GameConfig;

#[derive(Debug, Clone)]
pub struct GameStore {
    /// Score (unbounded, may go negative)
    score: i64,
    /// Negative cards tapped, never above `max_strikes`
    strikes: u32,
    max_strikes: u32,
    /// Seconds left on the clock
    time_remaining_secs: u32,
    /// Seconds since start; the single counter difficulty scaling reads
    elapsed_secs: u32,
    playing: bool,
    /// Active cards keyed by id
    cards: HashMap<CardId, Card>,
    /// Concurrent card cap (None = unbounded)
    capacity: Option<usize>,
}

impl GameStore {
    /// A store in its pre-session defaults (not playing)
    pub fn new(config: &GameConfig) -> Self {
        Self {
            score: 0,
            strikes: 0,
            max_strikes: config.max_strikes,
            time_remaining_secs: config.session_duration_secs,
            elapsed_secs: 0,
            playing: false,
            cards: HashMap::new(),
            capacity: config.max_active_cards,
        }
    }

    /// Reset to session-start defaults and begin playing
    pub fn reset(&mut self, duration_secs: u32) {
        self.score = 0;
        self.strikes = 0;
        self.time_remaining_secs = duration_secs;
        self.elapsed_secs = 0;
        self.cards.clear();
        self.playing = true;
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn strikes(&self) -> u32 {
        self.strikes
    }

    pub fn max_strikes(&self) -> u32 {
        self.max_strikes
    }

    pub fn struck_out(&self) -> bool {
        self.strikes >= self.max_strikes
    }

    pub fn time_remaining_secs(&self) -> u32 {
        self.time_remaining_secs
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn at_capacity(&self) -> bool {
        self.capacity.is_some_and(|cap| self.cards.len() >= cap)
    }

    /// Active cards sorted by id (stable order for rendering and tests)
    pub fn cards(&self) -> Vec<&Card> {
        let mut cards: Vec<&Card> = self.cards.values().collect();
        cards.sort_by_key(|c| c.id);
        cards
    }

    /// Insert a card. Ignored (returns false) when stopped or at capacity.
    pub fn add_card(&mut self, card: Card) -> bool {
        if !self.playing || self.at_capacity() {
            return false;
        }
        self.cards.insert(card.id, card);
        true
    }

    /// Remove a card, returning it if it was present. Stale ids are a no-op.
    pub fn remove_card(&mut self, id: CardId) -> Option<Card> {
        if !self.playing {
            return None;
        }
        self.cards.remove(&id)
    }

    /// Add `delta` to the score. Ignored when stopped.
    pub fn adjust_score(&mut self, delta: i64) -> bool {
        if !self.playing {
            return false;
        }
        self.score += delta;
        true
    }

    /// Count one strike, saturating at the max. Returns the new count.
    pub fn increment_strikes(&mut self) -> u32 {
        if self.playing && self.strikes < self.max_strikes {
            self.strikes += 1;
        }
        self.strikes
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub fn set_time_remaining(&mut self, secs: u32) {
        self.time_remaining_secs = secs;
    }

    /// One clock second: elapsed +1, remaining -1 floored at 0
    pub(crate) fn tick_second(&mut self) {
        self.elapsed_secs += 1;
        self.time_remaining_secs = self.time_remaining_secs.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::card::{Polarity, Shape};
    use glam::Vec2;

    fn card(ms: u64) -> Card {
        Card {
            id: CardId {
                spawned_at_ms: ms,
                nonce: 0,
            },
            polarity: Polarity::Positive,
            pos: Vec2::new(100.0, 100.0),
            shape: Shape::Circle,
            color: "#4ECDC4".into(),
            label: "Lord".into(),
            created_at_ms: ms,
            lifespan_ms: 3000,
        }
    }

    fn playing_store() -> GameStore {
        let mut store = GameStore::new(&GameConfig::default());
        store.reset(90);
        store
    }

    #[test]
    fn test_reset_defaults() {
        let mut store = playing_store();
        store.adjust_score(20);
        store.increment_strikes();
        store.add_card(card(1));
        store.reset(90);
        assert_eq!(store.score(), 0);
        assert_eq!(store.strikes(), 0);
        assert_eq!(store.time_remaining_secs(), 90);
        assert_eq!(store.card_count(), 0);
        assert!(store.is_playing());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = playing_store();
        let c = card(1);
        let id = c.id;
        assert!(store.add_card(c));
        assert!(store.remove_card(id).is_some());
        assert!(store.remove_card(id).is_none());
        assert_eq!(store.card_count(), 0);
    }

    #[test]
    fn test_score_has_no_floor() {
        let mut store = playing_store();
        store.adjust_score(-15);
        assert_eq!(store.score(), -15);
    }

    #[test]
    fn test_strikes_saturate() {
        let mut store = playing_store();
        for _ in 0..5 {
            store.increment_strikes();
        }
        assert_eq!(store.strikes(), 3);
        assert!(store.struck_out());
    }

    #[test]
    fn test_frozen_after_stop() {
        let mut store = playing_store();
        let c = card(1);
        let id = c.id;
        store.add_card(c);
        store.adjust_score(5);
        store.set_playing(false);

        assert!(!store.adjust_score(100));
        assert!(!store.add_card(card(2)));
        assert!(store.remove_card(id).is_none());
        assert_eq!(store.increment_strikes(), 0);
        assert_eq!(store.score(), 5);
        assert_eq!(store.card_count(), 1);
    }

    #[test]
    fn test_capacity() {
        let config = GameConfig {
            max_active_cards: Some(2),
            ..Default::default()
        };
        let mut store = GameStore::new(&config);
        store.reset(90);
        assert!(store.add_card(card(1)));
        assert!(store.add_card(card(2)));
        assert!(store.at_capacity());
        assert!(!store.add_card(card(3)));
        assert_eq!(store.card_count(), 2);
    }

    #[test]
    fn test_tick_second_floors_at_zero() {
        let mut store = playing_store();
        store.set_time_remaining(1);
        store.tick_second();
        store.tick_second();
        assert_eq!(store.time_remaining_secs(), 0);
        assert_eq!(store.elapsed_secs(), 2);
    }
}
