//! Platform abstraction layer
//!
//! Collaborators the session talks to but does not own:
//! - Viewport bounds (may not be measured yet)
//! - Navigation trigger fired once when a session ends
//! - Score popup sink for presentation
//!
//! Browser implementations live in `web` (wasm32 only).

use crate::sim::{CardId, ScoreFeedback, Viewport};

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Supplies the current play area size on demand
pub trait ViewportProvider {
    /// None while the play area has not been measured
    fn viewport(&self) -> Option<Viewport>;
}

/// A viewport that never changes (headless runs, tests)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedViewport(pub Option<Viewport>);

impl FixedViewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self(Some(Viewport::new(width, height)))
    }

    pub fn unmeasured() -> Self {
        Self(None)
    }
}

impl ViewportProvider for FixedViewport {
    fn viewport(&self) -> Option<Viewport> {
        self.0
    }
}

/// Called exactly once when a session reaches its end. The next screen reads
/// the final state from the session itself.
pub trait Navigator {
    fn session_ended(&mut self);
}

impl<F: FnMut()> Navigator for F {
    fn session_ended(&mut self) {
        self()
    }
}

/// Fire-and-forget sink for transient score popups
pub trait FeedbackSink {
    fn show(&mut self, feedback: &ScoreFeedback);

    /// The popup's display time is over
    fn hide(&mut self, _id: CardId) {}
}
