//! Teaching chains
//!
//! Sequences several tutor personas through ordered pedagogical phases
//! within one conversation. Each phase advances when its named heuristic is
//! satisfied by the conversation transcript.

pub mod catalog;
pub mod engine;
pub mod models;
pub mod triggers;

pub use catalog::default_chains;
pub use engine::{ChainEngine, ChainError, PhaseStep};
pub use models::{ChainProgress, Phase, Role, TeachingChain, Turn};
pub use triggers::TransitionTrigger;
