//! Tutor matching
//!
//! Converts a completed calibration answer set into a ranked tutor
//! recommendation:
//! - Weighted scoring over a sparse option -> tutor point map
//! - Score vector covering every registered persona
//! - Deterministic ranking with a stable, declaration-order tie-break

pub mod engine;
pub mod models;
pub mod questionnaire;

pub use engine::{MatchError, MatchingEngine};
pub use models::{
    AnswerSet, CalibrationOption, CalibrationQuestion, MatchResult, PointMap, Questionnaire,
    ScoreVector,
};
pub use questionnaire::default_questionnaire;
