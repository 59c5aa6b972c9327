//! Session orchestration and persistence
//!
//! Owns every piece of mutable state: calibration results, transcripts and
//! chain progress, keyed by user or conversation id.

pub mod models;
pub mod orchestrator;
pub mod store;

pub use models::{CalibrationRecord, ChatReply, ChatRequest, ConversationRecord, PhaseUpdate};
pub use orchestrator::{SessionOrchestrator, FALLBACK_PROMPT};
pub use store::{InMemorySessionStore, SessionStore};
