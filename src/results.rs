//! Session results
//!
//! The record handed to the persistence collaborator once a session ends,
//! and the message tier shown on the results screen.

use serde::{Deserialize, Serialize};

use crate::sim::{EndReason, SessionSnapshot};

/// Who played (captured before the session by the profile form)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    pub location: String,
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub name: String,
    pub location: String,
    pub final_score: i64,
    pub negative_cards_tapped: u32,
    pub duration_seconds: u32,
}

impl ResultRecord {
    /// Build the row for a finished session. Duration is the time used off the
    /// clock, so a struck-out session records how long it lasted.
    pub fn new(profile: &PlayerProfile, snapshot: &SessionSnapshot, session_duration_secs: u32) -> Self {
        Self {
            name: profile.name.trim().to_string(),
            location: profile.location.trim().to_string(),
            final_score: snapshot.score,
            negative_cards_tapped: snapshot.strikes,
            duration_seconds: session_duration_secs.saturating_sub(snapshot.time_remaining_secs),
        }
    }

    pub fn tier(&self) -> ResultTier {
        ResultTier::from_score(self.final_score)
    }
}

/// Results screen message band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultTier {
    /// Above 100
    Outstanding,
    /// 50 to 100
    WellDone,
    KeepPracticing,
}

impl ResultTier {
    pub fn from_score(score: i64) -> Self {
        if score > 100 {
            ResultTier::Outstanding
        } else if score >= 50 {
            ResultTier::WellDone
        } else {
            ResultTier::KeepPracticing
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ResultTier::Outstanding => "Outstanding reflexes!",
            ResultTier::WellDone => "Well done!",
            ResultTier::KeepPracticing => "Keep practicing! Speed grows with effort.",
        }
    }

    /// Confetti on the results screen
    pub fn celebrate(&self) -> bool {
        matches!(self, ResultTier::Outstanding)
    }
}

/// Headline for how the session ended
pub fn outcome_headline(reason: EndReason, max_strikes: u32) -> String {
    match reason {
        EndReason::Timeout => "Time's up - you made it!".to_string(),
        EndReason::StruckOut if max_strikes == 1 => "One strike - you're out!".to_string(),
        EndReason::StruckOut => format!("{} strikes - you're out!", max_strikes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(score: i64, strikes: u32, remaining: u32) -> SessionSnapshot {
        SessionSnapshot {
            score,
            strikes,
            elapsed_secs: 90 - remaining,
            time_remaining_secs: remaining,
            outcome: Some(EndReason::Timeout),
        }
    }

    #[test]
    fn test_record_from_snapshot() {
        let profile = PlayerProfile {
            name: "  Asha ".into(),
            location: "Goa".into(),
        };
        let record = ResultRecord::new(&profile, &snapshot(40, 2, 25), 90);
        assert_eq!(record.name, "Asha");
        assert_eq!(record.final_score, 40);
        assert_eq!(record.negative_cards_tapped, 2);
        assert_eq!(record.duration_seconds, 65);
    }

    #[test]
    fn test_record_json_shape() {
        let profile = PlayerProfile {
            name: "Ravi".into(),
            location: "Kerala".into(),
        };
        let json = serde_json::to_value(ResultRecord::new(&profile, &snapshot(15, 0, 0), 90)).unwrap();
        assert_eq!(json["final_score"], 15);
        assert_eq!(json["negative_cards_tapped"], 0);
        assert_eq!(json["duration_seconds"], 90);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(ResultTier::from_score(105), ResultTier::Outstanding);
        assert_eq!(ResultTier::from_score(100), ResultTier::WellDone);
        assert_eq!(ResultTier::from_score(50), ResultTier::WellDone);
        assert_eq!(ResultTier::from_score(49), ResultTier::KeepPracticing);
        assert_eq!(ResultTier::from_score(-10), ResultTier::KeepPracticing);
        assert!(ResultTier::Outstanding.celebrate());
    }

    #[test]
    fn test_headline_uses_strike_limit() {
        assert_eq!(outcome_headline(EndReason::StruckOut, 3), "3 strikes - you're out!");
        assert_eq!(outcome_headline(EndReason::StruckOut, 5), "5 strikes - you're out!");
        assert_eq!(outcome_headline(EndReason::StruckOut, 1), "One strike - you're out!");
        assert_eq!(outcome_headline(EndReason::Timeout, 3), "Time's up - you made it!");
    }
}
