//! Deterministic session engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual millisecond clock only (the host feeds elapsed time in)
//! - Seeded RNG only
//! - Stable iteration order (by card ID)
//! - No rendering or platform dependencies beyond the collaborator traits

pub mod autoplay;
pub mod card;
pub mod clock;
pub mod difficulty;
pub mod generator;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod tap;
pub mod timers;

pub use autoplay::Autoplayer;
pub use card::{Card, CardId, Polarity, Shape};
pub use clock::{EndReason, SessionClock, check_end};
pub use difficulty::Difficulty;
pub use generator::{CardGenerator, Viewport};
pub use scheduler::{SpawnResult, SpawnScheduler, SpawnSkip};
pub use session::{Session, SessionEvent, SessionPhase, SessionSnapshot};
pub use store::GameStore;
pub use tap::{ScoreFeedback, TapOutcome, handle_tap};
pub use timers::{SessionTimer, TimerId, TimerQueue};
