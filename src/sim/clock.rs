//! Session clock
//!
//! Ticks once per second of session time: advances the shared elapsed counter,
//! counts the remaining time down and reports whether the session should end.

use serde::{Deserialize, Serialize};

use super::store::GameStore;
use super::timers::{SessionTimer, TimerId, TimerQueue};
use crate::consts::CLOCK_TICK_MS;

/// Terminal classification of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Survived the clock (win)
    Timeout,
    /// Reached the strike limit (loss)
    StruckOut,
}

/// End condition check, run after every tick.
///
/// Time exhaustion is checked before the strike count, so when both hold in
/// the same tick the session ends as a timeout.
pub fn check_end(store: &GameStore) -> Option<EndReason> {
    if store.time_remaining_secs() == 0 {
        Some(EndReason::Timeout)
    } else if store.struck_out() {
        Some(EndReason::StruckOut)
    } else {
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    pending: Option<TimerId>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn start(&mut self, timers: &mut TimerQueue<SessionTimer>) {
        if self.pending.is_none() {
            self.pending = Some(timers.schedule(CLOCK_TICK_MS, SessionTimer::ClockTick));
        }
    }

    pub fn stop(&mut self, timers: &mut TimerQueue<SessionTimer>) {
        if let Some(id) = self.pending.take() {
            timers.cancel(id);
        }
    }

    /// Handle a due `ClockTick`. Returns the end condition reached, if any.
    /// Stale or post-stop ticks do nothing and are not re-armed.
    pub fn on_tick(
        &mut self,
        fired: TimerId,
        timers: &mut TimerQueue<SessionTimer>,
        store: &mut GameStore,
    ) -> Option<EndReason> {
        if self.pending != Some(fired) {
            return None;
        }
        self.pending = None;
        if !store.is_playing() {
            return None;
        }

        store.tick_second();
        log::trace!(
            "Tick: elapsed={}s remaining={}s",
            store.elapsed_secs(),
            store.time_remaining_secs()
        );

        let end = check_end(store);
        if end.is_none() {
            self.pending = Some(timers.schedule(CLOCK_TICK_MS, SessionTimer::ClockTick));
        }
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn run(
        clock: &mut SessionClock,
        timers: &mut TimerQueue<SessionTimer>,
        store: &mut GameStore,
        until: u64,
    ) -> Option<EndReason> {
        let mut end = None;
        while let Some((id, event)) = timers.pop_due(until) {
            if event == SessionTimer::ClockTick {
                end = end.or(clock.on_tick(id, timers, store));
            }
        }
        timers.advance_to(until);
        end
    }

    #[test]
    fn test_counts_down_once_per_second() {
        let mut store = GameStore::new(&GameConfig::default());
        store.reset(90);
        let mut timers = TimerQueue::new();
        let mut clock = SessionClock::new();
        clock.start(&mut timers);

        assert_eq!(run(&mut clock, &mut timers, &mut store, 999), None);
        assert_eq!(store.time_remaining_secs(), 90);
        assert_eq!(run(&mut clock, &mut timers, &mut store, 10_000), None);
        assert_eq!(store.time_remaining_secs(), 80);
        assert_eq!(store.elapsed_secs(), 10);
    }

    #[test]
    fn test_timeout_when_clock_runs_out() {
        let mut store = GameStore::new(&GameConfig::default());
        store.reset(3);
        let mut timers = TimerQueue::new();
        let mut clock = SessionClock::new();
        clock.start(&mut timers);

        assert_eq!(run(&mut clock, &mut timers, &mut store, 2000), None);
        assert_eq!(run(&mut clock, &mut timers, &mut store, 3000), Some(EndReason::Timeout));
        assert!(!clock.is_running());
        assert_eq!(store.time_remaining_secs(), 0);
    }

    #[test]
    fn test_timeout_wins_tie() {
        let mut store = GameStore::new(&GameConfig::default());
        store.reset(1);
        for _ in 0..3 {
            store.increment_strikes();
        }
        assert_eq!(check_end(&store), Some(EndReason::StruckOut));
        store.tick_second();
        assert_eq!(check_end(&store), Some(EndReason::Timeout));
    }

    #[test]
    fn test_stop_cancels_tick() {
        let mut store = GameStore::new(&GameConfig::default());
        store.reset(90);
        let mut timers = TimerQueue::new();
        let mut clock = SessionClock::new();
        clock.start(&mut timers);
        clock.stop(&mut timers);
        assert_eq!(run(&mut clock, &mut timers, &mut store, 5000), None);
        assert_eq!(store.elapsed_secs(), 0);
    }
}
