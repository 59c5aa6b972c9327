//! Data models for calibration records, conversations and chat turns

use crate::chain::{ChainProgress, Turn};
use crate::matching::{AnswerSet, ScoreVector};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted outcome of one completed calibration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationRecord {
    pub user_id: String,
    pub answers: AnswerSet,
    pub scores: ScoreVector,
    pub primary_tutor: String,
    /// Primary match followed by the alternates
    pub tutor_matches: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

/// Stored conversation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: String,
    /// Tutor used whenever no chain is active
    pub tutor: String,
    pub transcript: Vec<Turn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<ChainProgress>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationRecord {
    pub fn new(id: impl Into<String>, tutor: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            tutor: tutor.into(),
            transcript: Vec::new(),
            progress: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// One learner message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Omit to start a new conversation
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// Tutor for single-tutor mode
    pub tutor: String,
    pub message: String,
}

/// How the chain moved on this turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhaseUpdate {
    /// No chain, or the phase held
    Unchanged,
    Entered { phase: String, tutor: String },
    /// The last phase finished; single-tutor mode resumes
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub conversation_id: String,
    pub response: String,
    /// Persona that produced `response`
    pub tutor: String,
    pub phase_update: PhaseUpdate,
    /// Set when the minimal fallback prompt produced the reply
    pub fallback: bool,
}
