//! Persistence collaborator for calibrations and conversations

use super::models::{CalibrationRecord, ConversationRecord};
use crate::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;

/// Keyed storage for session state. Engines never touch it directly.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn calibration(&self, user_id: &str) -> Result<Option<CalibrationRecord>>;

    async fn save_calibration(&self, record: CalibrationRecord) -> Result<()>;

    async fn conversation(&self, conversation_id: &str) -> Result<Option<ConversationRecord>>;

    async fn save_conversation(&self, record: ConversationRecord) -> Result<()>;
}

/// Process-local store
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    calibrations: DashMap<String, CalibrationRecord>,
    conversations: DashMap<String, ConversationRecord>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation_count(&self) -> usize {
        self.conversations.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn calibration(&self, user_id: &str) -> Result<Option<CalibrationRecord>> {
        Ok(self.calibrations.get(user_id).map(|r| r.value().clone()))
    }

    async fn save_calibration(&self, record: CalibrationRecord) -> Result<()> {
        self.calibrations.insert(record.user_id.clone(), record);
        Ok(())
    }

    async fn conversation(&self, conversation_id: &str) -> Result<Option<ConversationRecord>> {
        Ok(self
            .conversations
            .get(conversation_id)
            .map(|r| r.value().clone()))
    }

    async fn save_conversation(&self, record: ConversationRecord) -> Result<()> {
        self.conversations.insert(record.id.clone(), record);
        Ok(())
    }
}
