//! Data models for teaching chains and conversation transcripts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speaker of a transcript turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "assistant")]
    Tutor,
}

/// One turn of a conversation transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// Persona that produced a tutor turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutor: Option<String>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tutor: None,
        }
    }

    pub fn tutor(tutor_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tutor,
            content: content.into(),
            tutor: Some(tutor_id.into()),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// One step of a chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Unique within the chain
    pub name: String,
    /// Persona speaking during this phase
    pub tutor: String,
    /// Id of the heuristic deciding when to leave this phase
    pub trigger: String,
}

impl Phase {
    pub fn new(name: impl Into<String>, tutor: impl Into<String>, trigger: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tutor: tutor.into(),
            trigger: trigger.into(),
        }
    }
}

/// Ordered, forward-only sequence of phases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeachingChain {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub phases: Vec<Phase>,
}

impl TeachingChain {
    pub fn new(id: impl Into<String>, name: impl Into<String>, phases: Vec<Phase>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            phases,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn first_phase(&self) -> Option<&Phase> {
        self.phases.first()
    }

    pub fn phase_index(&self, name: &str) -> Option<usize> {
        self.phases.iter().position(|p| p.name == name)
    }

    pub fn phase(&self, name: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.name == name)
    }

    /// Distinct tutors in phase order
    pub fn styles(&self) -> Vec<&str> {
        let mut styles: Vec<&str> = Vec::new();
        for phase in &self.phases {
            if !styles.contains(&phase.tutor.as_str()) {
                styles.push(phase.tutor.as_str());
            }
        }
        styles
    }
}

/// The only state a caller persists between turns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainProgress {
    pub chain_id: String,
    pub phase: String,
    pub updated_at: DateTime<Utc>,
}

impl ChainProgress {
    pub fn new(chain_id: impl Into<String>, phase: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            phase: phase.into(),
            updated_at: Utc::now(),
        }
    }
}
