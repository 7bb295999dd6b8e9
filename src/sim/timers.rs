//! Cancellable one-shot timers on a virtual millisecond clock
//!
//! Every delayed action in a session (spawn delay, card expiry, clock tick,
//! delayed strike-out, feedback expiry) is a timer here. The host advances the
//! clock; due timers pop in deadline order, ties in scheduling order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::card::CardId;

/// Handle to a scheduled timer. Ordering is (deadline, sequence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId {
    pub deadline_ms: u64,
    seq: u64,
}

/// Everything a session arms a timer for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTimer {
    /// Next card spawn
    SpawnDue,
    /// A card reached the end of its lifespan
    CardExpired(CardId),
    /// One second of session time
    ClockTick,
    /// Deferred end after the final strike
    StrikeOut,
    /// A score popup should disappear
    FeedbackExpired(CardId),
}

#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    now_ms: u64,
    next_seq: u64,
    pending: BTreeMap<TimerId, E>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            pending: BTreeMap::new(),
        }
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Arm a one-shot timer firing `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, event: E) -> TimerId {
        let id = TimerId {
            deadline_ms: self.now_ms.saturating_add(delay_ms),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending.insert(id, event);
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.pending.remove(&id).is_some()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pop the earliest timer due at or before `until_ms`, moving the clock to
    /// its deadline. Returns None (clock untouched) when nothing is due.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, E)> {
        let (&id, _) = self.pending.first_key_value()?;
        if id.deadline_ms > until_ms {
            return None;
        }
        let event = self.pending.remove(&id)?;
        self.now_ms = self.now_ms.max(id.deadline_ms);
        Some((id, event))
    }

    /// Move the clock forward without firing anything. Never moves backwards.
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_deadline_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(300, "c");
        timers.schedule(100, "a");
        timers.schedule(200, "b");

        let mut fired = Vec::new();
        while let Some((id, event)) = timers.pop_due(1000) {
            fired.push((id.deadline_ms, event));
        }
        assert_eq!(fired, vec![(100, "a"), (200, "b"), (300, "c")]);
        assert_eq!(timers.now_ms(), 300);
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(500, 1);
        timers.schedule(500, 2);
        assert_eq!(timers.pop_due(500).map(|(_, e)| e), Some(1));
        assert_eq!(timers.pop_due(500).map(|(_, e)| e), Some(2));
    }

    #[test]
    fn test_not_due_yet() {
        let mut timers = TimerQueue::new();
        timers.schedule(1000, ());
        assert!(timers.pop_due(999).is_none());
        assert_eq!(timers.now_ms(), 0);
        timers.advance_to(999);
        assert!(timers.pop_due(1000).is_some());
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(100, ());
        assert!(timers.is_pending(id));
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.pop_due(u64::MAX).is_none());
    }

    #[test]
    fn test_schedule_is_relative_to_now() {
        let mut timers = TimerQueue::new();
        timers.advance_to(2500);
        let id = timers.schedule(500, ());
        assert_eq!(id.deadline_ms, 3000);
        timers.advance_to(100);
        assert_eq!(timers.now_ms(), 2500);
    }
}
