//! Card generation
//!
//! Produces a fresh card for the current elapsed time and viewport. Pure apart
//! from the injected RNG.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::card::{Card, CardId, Polarity, Shape};
use super::difficulty::Difficulty;
use crate::config::GameConfig;

/// Measured play area (px)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Spawn parameters derived from the config
#[derive(Debug, Clone)]
pub struct CardGenerator {
    pub difficulty: Difficulty,
    pub positive_probability: f64,
    pub margin: f32,
    pub card_size: f32,
    pub palette: Vec<String>,
}

impl Default for CardGenerator {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

impl CardGenerator {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            difficulty: Difficulty::from_config(config),
            positive_probability: config.positive_probability,
            margin: config.margin,
            card_size: config.card_size,
            palette: config.palette.clone(),
        }
    }

    /// Generate a card spawned at session time `now_ms`
    pub fn generate<R: Rng>(
        &self,
        rng: &mut R,
        elapsed_secs: f32,
        viewport: Viewport,
        now_ms: u64,
    ) -> Card {
        let polarity = if rng.random::<f64>() < self.positive_probability {
            Polarity::Positive
        } else {
            Polarity::Negative
        };

        let pos = Vec2::new(
            self.sample_axis(rng, viewport.width),
            self.sample_axis(rng, viewport.height),
        );

        let shape = *Shape::ALL.choose(rng).unwrap_or(&Shape::Circle);
        let color = self
            .palette
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| crate::consts::PALETTE[0].to_string());
        let label = polarity
            .words()
            .choose(rng)
            .map(|w| w.to_string())
            .unwrap_or_default();

        Card {
            id: CardId {
                spawned_at_ms: now_ms,
                nonce: rng.random(),
            },
            polarity,
            pos,
            shape,
            color,
            label,
            created_at_ms: now_ms,
            lifespan_ms: self.difficulty.lifespan_ms(elapsed_secs),
        }
    }

    /// Uniform coordinate in [margin, extent - margin - card_size].
    /// Collapses to `margin` when the viewport is too small (or not finite).
    fn sample_axis<R: Rng>(&self, rng: &mut R, extent: f32) -> f32 {
        let range = extent - 2.0 * self.margin - self.card_size;
        if range.is_finite() && range > 0.0 {
            self.margin + rng.random_range(0.0..=range)
        } else {
            self.margin
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{NEGATIVE_WORDS, POSITIVE_WORDS};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_polarity_split() {
        let generator = CardGenerator::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let viewport = Viewport::new(800.0, 600.0);
        let positives = (0..10_000)
            .filter(|i| {
                generator
                    .generate(&mut rng, 0.0, viewport, *i)
                    .polarity
                    == Polarity::Positive
            })
            .count();
        // 70% +/- a generous tolerance
        assert!((6700..=7300).contains(&positives), "positives = {positives}");
    }

    #[test]
    fn test_lifespan_follows_difficulty() {
        let generator = CardGenerator::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(generator.generate(&mut rng, 0.0, viewport, 0).lifespan_ms, 3000);
        assert_eq!(generator.generate(&mut rng, 90.0, viewport, 0).lifespan_ms, 1000);
    }

    #[test]
    fn test_degenerate_viewport_clamps() {
        let generator = CardGenerator::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let card = generator.generate(&mut rng, 0.0, Viewport::new(120.0, 50.0), 0);
        assert_eq!(card.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_label_matches_polarity() {
        let generator = CardGenerator::default();
        let mut rng = Pcg32::seed_from_u64(21);
        let viewport = Viewport::new(800.0, 600.0);
        let mut seen = std::collections::HashSet::new();
        for i in 0..500 {
            let card = generator.generate(&mut rng, 0.0, viewport, i);
            match card.polarity {
                Polarity::Positive => assert!(POSITIVE_WORDS.contains(&card.label.as_str())),
                Polarity::Negative => assert!(NEGATIVE_WORDS.contains(&card.label.as_str())),
            }
            seen.insert(card.label);
        }
        assert_eq!(seen.len(), POSITIVE_WORDS.len() + NEGATIVE_WORDS.len());
    }

    #[test]
    fn test_infinite_viewport_clamps() {
        let generator = CardGenerator::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let card = generator.generate(&mut rng, 0.0, Viewport::new(f32::INFINITY, 600.0), 0);
        assert_eq!(card.pos.x, 100.0);
        assert!((100.0..=400.0).contains(&card.pos.y));

        let card = generator.generate(&mut rng, 0.0, Viewport::new(f32::NAN, f32::NAN), 0);
        assert_eq!(card.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_same_seed_same_card() {
        let generator = CardGenerator::default();
        let viewport = Viewport::new(1024.0, 768.0);
        let a = generator.generate(&mut Pcg32::seed_from_u64(42), 12.0, viewport, 5000);
        let b = generator.generate(&mut Pcg32::seed_from_u64(42), 12.0, viewport, 5000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_ids_unique() {
        let generator = CardGenerator::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let viewport = Viewport::new(800.0, 600.0);
        let mut ids = std::collections::HashSet::new();
        for i in 0..1000 {
            // Several spawns share a timestamp, the nonce keeps them apart
            let card = generator.generate(&mut rng, 0.0, viewport, i / 4);
            assert!(ids.insert(card.id));
        }
    }

    proptest! {
        #[test]
        fn prop_position_bounds(seed in any::<u64>(), elapsed in 0.0f32..120.0) {
            let generator = CardGenerator::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let card = generator.generate(&mut rng, elapsed, Viewport::new(800.0, 600.0), 0);
            prop_assert!((100.0..=600.0).contains(&card.pos.x));
            prop_assert!((100.0..=400.0).contains(&card.pos.y));
            prop_assert!(generator.palette.contains(&card.color));
        }
    }
}
