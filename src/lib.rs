//! ELARA: persona-based AI tutoring
//!
//! Two pure engines form the core:
//! - [`matching`]: weighted calibration scoring and stable tutor ranking
//! - [`chain`]: the teaching-chain phase state machine
//!
//! [`session`] wires them to persistence and the LLM collaborator, and
//! [`api`] exposes the result over HTTP.

pub mod api;
pub mod chain;
pub mod config;
pub mod error;
pub mod llm;
pub mod matching;
pub mod metrics;
pub mod observability;
pub mod personas;
pub mod session;

pub use error::{ElaraError, Result};
