//! Session controller
//!
//! Owns one play-through: Idle -> Playing -> Ended. Wires the clock, the spawn
//! scheduler and the tap handler to a single store and routes every timer
//! through one queue, so all state changes happen on one logical thread.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::card::{Card, CardId, Polarity};
use super::clock::{EndReason, SessionClock};
use super::generator::CardGenerator;
use super::scheduler::{SpawnResult, SpawnScheduler};
use super::store::GameStore;
use super::tap::{ScoreFeedback, handle_tap};
use super::timers::{SessionTimer, TimerId, TimerQueue};
use crate::config::GameConfig;
use crate::platform::{FeedbackSink, Navigator, ViewportProvider};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Created, not started
    Idle,
    /// Clock and spawns running
    Playing,
    /// Terminal; the store is frozen
    Ended(EndReason),
}

/// Things that happened during `advance`/`tap`, for presentation layers
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    CardSpawned(CardId),
    CardExpired(CardId),
    CardTapped { id: CardId, points: i64 },
    Feedback(ScoreFeedback),
    FeedbackExpired(CardId),
    /// Final strike landed, session ends after the strike-out delay
    StrikeOutPending,
    Ended(EndReason),
}

/// Read-only view of the session for the results stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub score: i64,
    pub strikes: u32,
    pub elapsed_secs: u32,
    pub time_remaining_secs: u32,
    pub outcome: Option<EndReason>,
}

pub struct Session {
    config: GameConfig,
    seed: u64,
    phase: SessionPhase,
    store: GameStore,
    timers: TimerQueue<SessionTimer>,
    scheduler: SpawnScheduler,
    clock: SessionClock,
    generator: CardGenerator,
    rng: Pcg32,
    /// Visible score popups (not part of the store)
    feedback: Vec<ScoreFeedback>,
    pending_strike_out: Option<TimerId>,
    events: Vec<SessionEvent>,
    viewport: Option<Box<dyn ViewportProvider>>,
    navigator: Option<Box<dyn Navigator>>,
    feedback_sink: Option<Box<dyn FeedbackSink>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("seed", &self.seed)
            .field("phase", &self.phase)
            .field("now_ms", &self.timers.now_ms())
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create an idle session. Spawns are reproducible for a given seed.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            store: GameStore::new(&config),
            generator: CardGenerator::from_config(&config),
            config,
            seed,
            phase: SessionPhase::Idle,
            timers: TimerQueue::new(),
            scheduler: SpawnScheduler::new(),
            clock: SessionClock::new(),
            rng: Pcg32::seed_from_u64(seed),
            feedback: Vec::new(),
            pending_strike_out: None,
            events: Vec::new(),
            viewport: None,
            navigator: None,
            feedback_sink: None,
        }
    }

    pub fn with_viewport(mut self, provider: impl ViewportProvider + 'static) -> Self {
        self.viewport = Some(Box::new(provider));
        self
    }

    pub fn with_navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Some(Box::new(navigator));
        self
    }

    pub fn with_feedback_sink(mut self, sink: impl FeedbackSink + 'static) -> Self {
        self.feedback_sink = Some(Box::new(sink));
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<EndReason> {
        match self.phase {
            SessionPhase::Ended(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Session time (ms since creation)
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    pub fn cards(&self) -> Vec<&Card> {
        self.store.cards()
    }

    pub fn feedback(&self) -> &[ScoreFeedback] {
        &self.feedback
    }

    pub fn spawned_count(&self) -> u32 {
        self.scheduler.spawned()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            score: self.store.score(),
            strikes: self.store.strikes(),
            elapsed_secs: self.store.elapsed_secs(),
            time_remaining_secs: self.store.time_remaining_secs(),
            outcome: self.outcome(),
        }
    }

    /// Take everything recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Idle -> Playing. Returns false if the session was already started.
    pub fn start(&mut self) -> bool {
        if self.phase != SessionPhase::Idle {
            log::warn!("start() ignored in phase {:?}", self.phase);
            return false;
        }
        self.store.reset(self.config.session_duration_secs);
        self.phase = SessionPhase::Playing;
        self.clock.start(&mut self.timers);
        self.scheduler
            .activate(&mut self.timers, &self.store, &self.generator);
        log::info!(
            "Session started (seed {}, {}s, {} strikes)",
            self.seed,
            self.config.session_duration_secs,
            self.config.max_strikes
        );
        true
    }

    /// Discard this play-through and return to Idle with a new seed
    pub fn restart(&mut self, seed: u64) {
        self.scheduler.deactivate(&mut self.timers);
        self.clock.stop(&mut self.timers);
        self.timers.clear();
        self.store = GameStore::new(&self.config);
        self.scheduler = SpawnScheduler::new();
        self.clock = SessionClock::new();
        self.rng = Pcg32::seed_from_u64(seed);
        self.seed = seed;
        self.feedback.clear();
        self.pending_strike_out = None;
        self.events.clear();
        self.phase = SessionPhase::Idle;
    }

    /// Advance session time by `dt_ms`, firing every timer that falls due
    pub fn advance(&mut self, dt_ms: u64) {
        let until = self.timers.now_ms().saturating_add(dt_ms);
        while let Some((id, event)) = self.timers.pop_due(until) {
            self.dispatch(id, event);
        }
        self.timers.advance_to(until);
    }

    /// Player tapped a card. Returns the popup shown, or None for stale taps
    /// and taps outside play.
    pub fn tap(&mut self, id: CardId, polarity: Polarity) -> Option<ScoreFeedback> {
        if self.phase != SessionPhase::Playing {
            return None;
        }
        let Some(outcome) = handle_tap(&mut self.store, id, polarity, self.config.score_delta)
        else {
            log::debug!("Stale tap on {}", id);
            return None;
        };

        let feedback = outcome.feedback;
        self.events.push(SessionEvent::CardTapped {
            id,
            points: feedback.points,
        });
        self.show_feedback(feedback);

        if outcome.struck_out && self.pending_strike_out.is_none() {
            log::info!(
                "Strike {} of {} - ending in {}ms",
                self.store.strikes(),
                self.store.max_strikes(),
                self.config.strike_out_delay_ms
            );
            self.pending_strike_out = Some(
                self.timers
                    .schedule(self.config.strike_out_delay_ms, SessionTimer::StrikeOut),
            );
            self.events.push(SessionEvent::StrikeOutPending);
        }

        Some(feedback)
    }

    /// Tap by the `card-<ms>-<nonce>` id string a presentation layer renders
    pub fn tap_by_key(&mut self, key: &str) -> Option<ScoreFeedback> {
        let id = CardId::parse(key)?;
        let polarity = self.store.card(id)?.polarity;
        self.tap(id, polarity)
    }

    fn dispatch(&mut self, id: TimerId, event: SessionTimer) {
        match event {
            SessionTimer::SpawnDue => {
                let viewport = self.viewport.as_ref().and_then(|v| v.viewport());
                let result = self.scheduler.on_spawn_due(
                    id,
                    &mut self.timers,
                    &mut self.store,
                    &self.generator,
                    &mut self.rng,
                    viewport,
                );
                if let SpawnResult::Spawned(card) = result {
                    self.events.push(SessionEvent::CardSpawned(card));
                }
            }
            SessionTimer::CardExpired(card) => {
                if SpawnScheduler::on_card_expired(&mut self.store, card) {
                    self.events.push(SessionEvent::CardExpired(card));
                }
            }
            SessionTimer::ClockTick => {
                if let Some(reason) = self.clock.on_tick(id, &mut self.timers, &mut self.store) {
                    self.finish(reason);
                }
            }
            SessionTimer::StrikeOut => {
                if self.pending_strike_out == Some(id) {
                    self.pending_strike_out = None;
                    self.finish(EndReason::StruckOut);
                }
            }
            SessionTimer::FeedbackExpired(card) => {
                let before = self.feedback.len();
                self.feedback.retain(|f| f.id != card);
                if self.feedback.len() != before {
                    if let Some(sink) = self.feedback_sink.as_mut() {
                        sink.hide(card);
                    }
                    self.events.push(SessionEvent::FeedbackExpired(card));
                }
            }
        }
    }

    fn show_feedback(&mut self, feedback: ScoreFeedback) {
        self.feedback.push(feedback);
        self.timers.schedule(
            self.config.feedback_duration_ms,
            SessionTimer::FeedbackExpired(feedback.id),
        );
        if let Some(sink) = self.feedback_sink.as_mut() {
            sink.show(&feedback);
        }
        self.events.push(SessionEvent::Feedback(feedback));
    }

    /// Playing -> Ended. Any trigger after the first is ignored.
    fn finish(&mut self, reason: EndReason) -> bool {
        if self.phase != SessionPhase::Playing {
            log::debug!("Ignoring second end trigger ({:?})", reason);
            return false;
        }
        self.clock.stop(&mut self.timers);
        self.scheduler.deactivate(&mut self.timers);
        if let Some(id) = self.pending_strike_out.take() {
            self.timers.cancel(id);
        }
        self.store.set_playing(false);
        self.phase = SessionPhase::Ended(reason);
        self.events.push(SessionEvent::Ended(reason));

        log::info!(
            "Session ended: {:?} (score {}, strikes {}, {}s)",
            reason,
            self.store.score(),
            self.store.strikes(),
            self.store.elapsed_secs()
        );

        if let Some(navigator) = self.navigator.as_mut() {
            navigator.session_ended();
        }
        true
    }
}
