//! Idle/demo mode - a bot that plays a session
//!
//! Taps positive cards once they have been on screen for its reaction time,
//! most urgent first, and now and then fumbles onto a negative one.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::card::{CardId, Polarity};
use super::session::{Session, SessionPhase};

#[derive(Debug, Clone, Copy)]
struct Sighting {
    seen_at_ms: u64,
    /// Decided once per card so the bot doesn't re-roll every frame
    will_tap: bool,
}

#[derive(Debug, Clone)]
pub struct Autoplayer {
    rng: Pcg32,
    /// Delay between a card appearing and the bot tapping it
    pub reaction_ms: u64,
    /// Chance of tapping a negative card
    pub mistake_rate: f64,
    seen: HashMap<CardId, Sighting>,
}

impl Autoplayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            reaction_ms: 450,
            mistake_rate: 0.1,
            seen: HashMap::new(),
        }
    }

    pub fn with_reaction_ms(mut self, ms: u64) -> Self {
        self.reaction_ms = ms;
        self
    }

    pub fn with_mistake_rate(mut self, rate: f64) -> Self {
        self.mistake_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Look at the board and tap whatever is due. Returns the number of taps.
    pub fn play(&mut self, session: &mut Session) -> usize {
        if session.phase() != SessionPhase::Playing {
            self.seen.clear();
            return 0;
        }

        let now = session.now_ms();
        let mut due = Vec::new();
        for card in session.cards() {
            let sighting = match self.seen.get(&card.id) {
                Some(s) => *s,
                None => {
                    let will_tap = match card.polarity {
                        Polarity::Positive => true,
                        Polarity::Negative => self.rng.random::<f64>() < self.mistake_rate,
                    };
                    let s = Sighting {
                        seen_at_ms: now,
                        will_tap,
                    };
                    self.seen.insert(card.id, s);
                    s
                }
            };
            if sighting.will_tap && now.saturating_sub(sighting.seen_at_ms) >= self.reaction_ms {
                due.push((card.expires_at_ms(), card.id, card.polarity));
            }
        }

        // Closest to expiry first
        due.sort_by_key(|(expires, id, _)| (*expires, *id));
        let mut taps = 0;
        for (_, id, polarity) in due {
            if session.tap(id, polarity).is_some() {
                taps += 1;
            }
        }

        let store = session.store();
        self.seen.retain(|id, _| store.contains(*id));
        taps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::platform::FixedViewport;
    use crate::sim::EndReason;

    fn run(session: &mut Session, bot: &mut Autoplayer) {
        session.start();
        while session.phase() == SessionPhase::Playing {
            session.advance(50);
            bot.play(session);
        }
    }

    #[test]
    fn test_careful_bot_survives_to_timeout() {
        let mut session =
            Session::new(GameConfig::default(), 11).with_viewport(FixedViewport::new(1280.0, 720.0));
        let mut bot = Autoplayer::new(11).with_mistake_rate(0.0).with_reaction_ms(300);
        run(&mut session, &mut bot);

        let snap = session.snapshot();
        assert_eq!(snap.outcome, Some(EndReason::Timeout));
        assert_eq!(snap.strikes, 0);
        assert!(snap.score > 0);
        assert_eq!(snap.score % 5, 0);
    }

    #[test]
    fn test_reckless_bot_strikes_out() {
        let mut session =
            Session::new(GameConfig::default(), 12).with_viewport(FixedViewport::new(1280.0, 720.0));
        let mut bot = Autoplayer::new(12).with_mistake_rate(1.0).with_reaction_ms(100);
        run(&mut session, &mut bot);

        assert_eq!(session.outcome(), Some(EndReason::StruckOut));
        assert_eq!(session.store().strikes(), 3);
    }

    #[test]
    fn test_slow_bot_never_taps() {
        let mut session =
            Session::new(GameConfig::default(), 13).with_viewport(FixedViewport::new(1280.0, 720.0));
        // Slower than any card lives
        let mut bot = Autoplayer::new(13).with_reaction_ms(5_000);
        run(&mut session, &mut bot);

        assert_eq!(session.snapshot().score, 0);
        assert_eq!(session.outcome(), Some(EndReason::Timeout));
    }
}
