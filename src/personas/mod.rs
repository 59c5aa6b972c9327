//! Tutor personas
//!
//! Immutable persona registry supplied at process start. The registry's key
//! set is the universe of tutor ids for calibration scoring and chain phases.

pub mod models;
pub mod templates;

pub use models::{PersonaRegistry, TutorPersona};
pub use templates::{default_personas, default_registry};
