//! Tap resolution
//!
//! Turns a tap on a card into a store mutation plus a transient score popup.

use serde::{Deserialize, Serialize};

use super::card::{Card, CardId, Polarity};
use super::store::GameStore;

/// Transient "+5"/"-5" popup at the tapped card's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreFeedback {
    /// Card the popup belongs to (also identifies the popup)
    pub id: CardId,
    pub points: i64,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TapOutcome {
    pub card: Card,
    pub feedback: ScoreFeedback,
    /// This tap brought strikes to the limit
    pub struck_out: bool,
}

/// Resolve a tap. Returns None for stale taps (card already expired or tapped)
/// and leaves the store untouched in that case.
///
/// Scoring uses the polarity the store recorded at spawn; the reported one is
/// only cross-checked.
pub fn handle_tap(
    store: &mut GameStore,
    id: CardId,
    reported: Polarity,
    score_delta: i64,
) -> Option<TapOutcome> {
    let card = store.remove_card(id)?;
    if card.polarity != reported {
        log::warn!(
            "Tap on {} reported {:?} but card is {:?}",
            id,
            reported,
            card.polarity
        );
    }

    let points = card.polarity.score_delta(score_delta);
    store.adjust_score(points);

    let struck_out = if card.polarity.is_negative() {
        store.increment_strikes();
        store.struck_out()
    } else {
        false
    };

    let feedback = ScoreFeedback {
        id,
        points,
        x: card.pos.x,
        y: card.pos.y,
    };

    Some(TapOutcome {
        card,
        feedback,
        struck_out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::card::Shape;
    use glam::Vec2;

    fn add(store: &mut GameStore, nonce: u32, polarity: Polarity) -> CardId {
        let id = CardId {
            spawned_at_ms: 0,
            nonce,
        };
        store.add_card(Card {
            id,
            polarity,
            pos: Vec2::new(150.0, 250.0),
            shape: Shape::Hexagon,
            color: "#F7DC6F".into(),
            label: polarity.words()[0].into(),
            created_at_ms: 0,
            lifespan_ms: 3000,
        });
        id
    }

    fn store() -> GameStore {
        let mut store = GameStore::new(&GameConfig::default());
        store.reset(90);
        store
    }

    #[test]
    fn test_score_accounting() {
        let mut store = store();
        for n in 0..5 {
            let id = add(&mut store, n, Polarity::Positive);
            handle_tap(&mut store, id, Polarity::Positive, 5).unwrap();
        }
        for n in 5..7 {
            let id = add(&mut store, n, Polarity::Negative);
            handle_tap(&mut store, id, Polarity::Negative, 5).unwrap();
        }
        assert_eq!(store.score(), 15);
        assert_eq!(store.strikes(), 2);
        assert!(!store.struck_out());
    }

    #[test]
    fn test_double_tap_scores_once() {
        let mut store = store();
        let id = add(&mut store, 1, Polarity::Positive);
        assert!(handle_tap(&mut store, id, Polarity::Positive, 5).is_some());
        assert!(handle_tap(&mut store, id, Polarity::Positive, 5).is_none());
        assert_eq!(store.score(), 5);
    }

    #[test]
    fn test_feedback_at_card_position() {
        let mut store = store();
        let id = add(&mut store, 1, Polarity::Negative);
        let outcome = handle_tap(&mut store, id, Polarity::Negative, 5).unwrap();
        assert_eq!(outcome.feedback.points, -5);
        assert_eq!((outcome.feedback.x, outcome.feedback.y), (150.0, 250.0));
    }

    #[test]
    fn test_third_negative_strikes_out() {
        let mut store = store();
        let mut last = None;
        for n in 0..3 {
            let id = add(&mut store, n, Polarity::Negative);
            last = handle_tap(&mut store, id, Polarity::Negative, 5);
        }
        assert!(last.unwrap().struck_out);
    }

    #[test]
    fn test_stored_polarity_wins() {
        let mut store = store();
        let id = add(&mut store, 1, Polarity::Negative);
        let outcome = handle_tap(&mut store, id, Polarity::Positive, 5).unwrap();
        assert_eq!(outcome.feedback.points, -5);
        assert_eq!(store.strikes(), 1);
    }
}
