//! Spawn scheduler
//!
//! Keeps a stream of spawns going while the session plays. Each spawn arms the
//! next one with an interval read from the difficulty curve at the current
//! elapsed time, and arms an expiry timer for the new card.

use rand::Rng;

use super::card::CardId;
use super::generator::{CardGenerator, Viewport};
use super::store::GameStore;
use super::timers::{SessionTimer, TimerId, TimerQueue};

/// Why a due spawn produced no card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnSkip {
    /// Viewport not measured yet
    NoViewport,
    /// Active set is full
    AtCapacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnResult {
    Spawned(CardId),
    Skipped(SpawnSkip),
    /// Timer was stale or the session stopped; nothing re-armed
    Inactive,
}

#[derive(Debug, Clone, Default)]
pub struct SpawnScheduler {
    pending: Option<TimerId>,
    spawned: u32,
    skipped: u32,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    /// Arm the first spawn delay. No-op if already armed.
    pub fn activate(
        &mut self,
        timers: &mut TimerQueue<SessionTimer>,
        store: &GameStore,
        generator: &CardGenerator,
    ) {
        if self.pending.is_none() {
            self.arm(timers, store, generator);
        }
    }

    /// Cancel the pending spawn. Card expiry timers are left to fire as no-ops.
    pub fn deactivate(&mut self, timers: &mut TimerQueue<SessionTimer>) {
        if let Some(id) = self.pending.take() {
            timers.cancel(id);
        }
    }

    /// Handle a due `SpawnDue` timer
    pub fn on_spawn_due<R: Rng>(
        &mut self,
        fired: TimerId,
        timers: &mut TimerQueue<SessionTimer>,
        store: &mut GameStore,
        generator: &CardGenerator,
        rng: &mut R,
        viewport: Option<Viewport>,
    ) -> SpawnResult {
        if self.pending != Some(fired) {
            return SpawnResult::Inactive;
        }
        self.pending = None;
        if !store.is_playing() {
            return SpawnResult::Inactive;
        }

        let result = match viewport {
            None => SpawnResult::Skipped(SpawnSkip::NoViewport),
            Some(_) if store.at_capacity() => SpawnResult::Skipped(SpawnSkip::AtCapacity),
            Some(viewport) => {
                let now = timers.now_ms();
                let card =
                    generator.generate(rng, store.elapsed_secs() as f32, viewport, now);
                let id = card.id;
                let lifespan = card.lifespan_ms as u64;
                if store.add_card(card) {
                    timers.schedule(lifespan, SessionTimer::CardExpired(id));
                    SpawnResult::Spawned(id)
                } else {
                    SpawnResult::Skipped(SpawnSkip::AtCapacity)
                }
            }
        };

        match result {
            SpawnResult::Spawned(id) => {
                self.spawned += 1;
                log::trace!("Spawned {} at {}ms", id, timers.now_ms());
            }
            SpawnResult::Skipped(reason) => {
                self.skipped += 1;
                log::debug!("Spawn skipped ({:?}) at {}ms", reason, timers.now_ms());
            }
            SpawnResult::Inactive => {}
        }

        // Elapsed time may have moved on, so the interval is re-read every cycle
        self.arm(timers, store, generator);
        result
    }

    /// Handle a due `CardExpired` timer. Never touches the score.
    pub fn on_card_expired(store: &mut GameStore, id: CardId) -> bool {
        store.remove_card(id).is_some()
    }

    fn arm(
        &mut self,
        timers: &mut TimerQueue<SessionTimer>,
        store: &GameStore,
        generator: &CardGenerator,
    ) {
        let interval = generator
            .difficulty
            .spawn_interval_ms(store.elapsed_secs() as f32);
        self.pending = Some(timers.schedule(interval as u64, SessionTimer::SpawnDue));
    }
}
