//! Card entity types
//!
//! A card is a single tappable, timed entity. Cards are created by the
//! generator, owned by the store, and removed by a tap or by their own expiry.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{NEGATIVE_WORDS, POSITIVE_WORDS};

/// Whether tapping a card rewards or penalizes the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn is_negative(&self) -> bool {
        matches!(self, Polarity::Negative)
    }

    /// Score change of a tap on a card of this polarity
    pub fn score_delta(&self, magnitude: i64) -> i64 {
        match self {
            Polarity::Positive => magnitude,
            Polarity::Negative => -magnitude,
        }
    }

    /// Label words a card of this polarity can carry
    pub fn words(&self) -> &'static [&'static str] {
        match self {
            Polarity::Positive => &POSITIVE_WORDS,
            Polarity::Negative => &NEGATIVE_WORDS,
        }
    }
}

/// Card outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Triangle,
    Hexagon,
    Star,
    Square,
    Diamond,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::Circle,
        Shape::Triangle,
        Shape::Hexagon,
        Shape::Star,
        Shape::Square,
        Shape::Diamond,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Triangle => "triangle",
            Shape::Hexagon => "hexagon",
            Shape::Star => "star",
            Shape::Square => "square",
            Shape::Diamond => "diamond",
        }
    }
}

/// Session-unique card identifier: spawn timestamp plus a random nonce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId {
    pub spawned_at_ms: u64,
    pub nonce: u32,
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card-{}-{:08x}", self.spawned_at_ms, self.nonce)
    }
}

impl CardId {
    /// Parse the `card-<ms>-<nonce>` form produced by `Display`
    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.strip_prefix("card-")?;
        let (ms, nonce) = rest.split_once('-')?;
        Some(Self {
            spawned_at_ms: ms.parse().ok()?,
            nonce: u32::from_str_radix(nonce, 16).ok()?,
        })
    }
}

/// A tappable card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub polarity: Polarity,
    /// Top-left corner in viewport pixels
    pub pos: Vec2,
    pub shape: Shape,
    /// Hex color from the palette
    pub color: String,
    /// Word printed on the card; the player's only polarity cue
    pub label: String,
    /// Session time (ms) the card was created
    pub created_at_ms: u64,
    /// Time (ms) until automatic expiry
    pub lifespan_ms: u32,
}

impl Card {
    /// Session time at which this card expires
    pub fn expires_at_ms(&self) -> u64 {
        self.created_at_ms + self.lifespan_ms as u64
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms()
    }
}
