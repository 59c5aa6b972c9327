//! Phase transition heuristics
//!
//! Each trigger is a pure counting predicate over the whole transcript.
//! Thresholds are exact: the heuristics are deliberately coarse.

use super::models::Turn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named heuristic deciding when a phase is ready to advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionTrigger {
    /// >= 2 user turns among the last 3 turns
    ConceptUnderstood,
    /// >= 3 user turns containing "practice"
    SkillsDemonstrated,
    /// >= 3 user turns
    BasicsMastered,
    /// >= 2 user turns containing "connect", case-insensitive
    ConnectionsMade,
    /// >= 1 user turn longer than 50 characters
    ConceptSimplified,
    /// >= 2 user turns
    ComfortEstablished,
    /// >= 2 user turns longer than 100 characters
    DepthAchieved,
    /// >= 2 user turns containing '?'
    CuriositySparked,
}

impl TransitionTrigger {
    pub const ALL: [TransitionTrigger; 8] = [
        Self::ConceptUnderstood,
        Self::SkillsDemonstrated,
        Self::BasicsMastered,
        Self::ConnectionsMade,
        Self::ConceptSimplified,
        Self::ComfortEstablished,
        Self::DepthAchieved,
        Self::CuriositySparked,
    ];

    /// Resolve a phase's trigger id. Ids without a heuristic (for example
    /// `session_complete`) resolve to `None` and never fire.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::ConceptUnderstood => "concept_understood",
            Self::SkillsDemonstrated => "skills_demonstrated",
            Self::BasicsMastered => "basics_mastered",
            Self::ConnectionsMade => "connections_made",
            Self::ConceptSimplified => "concept_simplified",
            Self::ComfortEstablished => "comfort_established",
            Self::DepthAchieved => "depth_achieved",
            Self::CuriositySparked => "curiosity_sparked",
        }
    }

    /// True when the transcript is ready to leave the phase
    pub fn is_satisfied(&self, transcript: &[Turn]) -> bool {
        match self {
            Self::ConceptUnderstood => {
                let tail = &transcript[transcript.len().saturating_sub(3)..];
                tail.iter().filter(|t| t.is_user()).count() >= 2
            }
            Self::SkillsDemonstrated => count_user(transcript, |c| c.contains("practice")) >= 3,
            Self::BasicsMastered => count_user(transcript, |_| true) >= 3,
            Self::ConnectionsMade => {
                count_user(transcript, |c| c.to_lowercase().contains("connect")) >= 2
            }
            Self::ConceptSimplified => count_user(transcript, |c| text_len(c) > 50) >= 1,
            Self::ComfortEstablished => count_user(transcript, |_| true) >= 2,
            Self::DepthAchieved => count_user(transcript, |c| text_len(c) > 100) >= 2,
            Self::CuriositySparked => count_user(transcript, |c| c.contains('?')) >= 2,
        }
    }
}

impl fmt::Display for TransitionTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

fn count_user(transcript: &[Turn], predicate: impl Fn(&str) -> bool) -> usize {
    transcript
        .iter()
        .filter(|t| t.is_user() && predicate(&t.content))
        .count()
}

/// Length in UTF-16 code units, matching how the thresholds were calibrated
fn text_len(content: &str) -> usize {
    content.encode_utf16().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users(texts: &[&str]) -> Vec<Turn> {
        texts.iter().map(|t| Turn::user(*t)).collect()
    }

    #[test]
    fn test_from_id_round_trips_every_trigger() {
        for trigger in TransitionTrigger::ALL {
            assert_eq!(TransitionTrigger::from_id(trigger.id()), Some(trigger));
        }
        assert_eq!(TransitionTrigger::from_id("session_complete"), None);
        assert_eq!(TransitionTrigger::from_id("story_complete"), None);
    }

    #[test]
    fn test_concept_understood_only_looks_at_last_three_turns() {
        let trigger = TransitionTrigger::ConceptUnderstood;
        assert!(!trigger.is_satisfied(&users(&["one"])));
        assert!(trigger.is_satisfied(&users(&["one", "two"])));

        let transcript = vec![
            Turn::user("a"),
            Turn::user("b"),
            Turn::tutor("T", "c"),
            Turn::tutor("T", "d"),
            Turn::user("e"),
        ];
        assert!(!trigger.is_satisfied(&transcript));

        let transcript = vec![Turn::tutor("T", "x"), Turn::user("y"), Turn::user("z")];
        assert!(trigger.is_satisfied(&transcript));
    }

    #[test]
    fn test_skills_demonstrated_is_case_sensitive() {
        let trigger = TransitionTrigger::SkillsDemonstrated;
        assert!(!trigger.is_satisfied(&users(&["practice", "practice", "Practice"])));
        assert!(trigger.is_satisfied(&users(&["practice", "more practice", "practiced"])));
    }

    #[test]
    fn test_connections_made_is_case_insensitive() {
        let trigger = TransitionTrigger::ConnectionsMade;
        assert!(trigger.is_satisfied(&users(&["CONNECT this", "it Connects"])));
        assert!(!trigger.is_satisfied(&users(&["connect", "link"])));
    }

    #[test]
    fn test_length_thresholds_are_strict() {
        let fifty = "x".repeat(50);
        let fifty_one = "x".repeat(51);
        let (fifty, fifty_one) = (fifty.as_str(), fifty_one.as_str());
        assert!(!TransitionTrigger::ConceptSimplified.is_satisfied(&users(&[fifty])));
        assert!(TransitionTrigger::ConceptSimplified.is_satisfied(&users(&[fifty_one])));

        let hundred = "y".repeat(100);
        let hundred_one = "y".repeat(101);
        let (hundred, hundred_one) = (hundred.as_str(), hundred_one.as_str());
        assert!(!TransitionTrigger::DepthAchieved.is_satisfied(&users(&[hundred, hundred_one])));
        assert!(TransitionTrigger::DepthAchieved.is_satisfied(&users(&[hundred_one, hundred_one])));
    }

    #[test]
    fn test_tutor_turns_are_ignored() {
        let transcript = vec![
            Turn::tutor("T", "what do you think?"),
            Turn::tutor("T", "and why?"),
            Turn::user("no question here"),
        ];
        assert!(!TransitionTrigger::CuriositySparked.is_satisfied(&transcript));
        assert!(!TransitionTrigger::ComfortEstablished.is_satisfied(&transcript));
    }

    #[test]
    fn test_counting_triggers() {
        assert!(TransitionTrigger::ComfortEstablished.is_satisfied(&users(&["a", "b"])));
        assert!(!TransitionTrigger::BasicsMastered.is_satisfied(&users(&["a", "b"])));
        assert!(TransitionTrigger::BasicsMastered.is_satisfied(&users(&["a", "b", "c"])));
        assert!(TransitionTrigger::CuriositySparked.is_satisfied(&users(&["why?", "how?"])));
    }

    #[test]
    fn test_empty_transcript_satisfies_nothing() {
        for trigger in TransitionTrigger::ALL {
            assert!(!trigger.is_satisfied(&[]), "{trigger} fired on empty transcript");
        }
    }
}
