//! Weighted calibration scoring and ranking

use super::models::{AnswerSet, MatchResult, Questionnaire, ScoreVector};
use crate::personas::PersonaRegistry;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Calibration matching errors
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid answer for question '{question_id}': {reason}")]
    InvalidAnswer { question_id: String, reason: String },

    #[error("Invalid questionnaire: {0}")]
    InvalidQuestionnaire(String),
}

/// Maps calibration answers to a ranked list of tutors.
///
/// Pure and reentrant; the persona registry and questionnaire are injected at
/// construction and never change afterwards.
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    registry: Arc<PersonaRegistry>,
    questionnaire: Questionnaire,
}

impl MatchingEngine {
    /// Create an engine, validating the questionnaire against the registry
    pub fn new(registry: Arc<PersonaRegistry>, questionnaire: Questionnaire) -> Result<Self, MatchError> {
        validate_questionnaire(&registry, &questionnaire)?;
        Ok(Self {
            registry,
            questionnaire,
        })
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    pub fn registry(&self) -> &PersonaRegistry {
        &self.registry
    }

    /// Accumulate `points * weight` per tutor over the answered questions.
    ///
    /// Every registered tutor is present in the result. Unanswered questions
    /// contribute nothing. The whole answer set is validated before any
    /// scoring happens.
    pub fn score(&self, answers: &AnswerSet) -> Result<ScoreVector, MatchError> {
        for (question_id, value) in answers.iter() {
            let question = self.questionnaire.question(question_id).ok_or_else(|| {
                MatchError::InvalidAnswer {
                    question_id: question_id.to_string(),
                    reason: "question is not part of the questionnaire".to_string(),
                }
            })?;

            if question.option(value).is_none() {
                return Err(MatchError::InvalidAnswer {
                    question_id: question_id.to_string(),
                    reason: format!("'{}' is not an option of this question", value),
                });
            }
        }

        let mut scores = ScoreVector::zeroed(self.registry.ids());

        // Questionnaire order keeps float accumulation independent of map order
        for question in self.questionnaire.questions() {
            let Some(option) = answers.get(&question.id).and_then(|v| question.option(v)) else {
                continue;
            };

            for (tutor_id, points) in option.points.iter() {
                scores.add(tutor_id, points * question.weight);
            }
        }

        debug!("Scored {} answers across {} tutors", answers.len(), scores.len());

        Ok(scores)
    }

    /// Tutor ids by descending score.
    ///
    /// Stable sort over registry order: equal scores keep declaration order.
    pub fn rank(&self, scores: &ScoreVector) -> Vec<String> {
        let mut entries: Vec<(&str, f64)> = scores.iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries.into_iter().map(|(tutor, _)| tutor.to_string()).collect()
    }

    /// Score then rank in one step
    pub fn match_answers(&self, answers: &AnswerSet) -> Result<MatchResult, MatchError> {
        let scores = self.score(answers)?;
        let ranking = self.rank(&scores);
        Ok(MatchResult { ranking, scores })
    }
}

fn validate_questionnaire(
    registry: &PersonaRegistry,
    questionnaire: &Questionnaire,
) -> Result<(), MatchError> {
    let mut question_ids = HashSet::new();

    for question in questionnaire.questions() {
        if !question_ids.insert(question.id.as_str()) {
            return Err(MatchError::InvalidQuestionnaire(format!(
                "duplicate question id '{}'",
                question.id
            )));
        }

        if !question.weight.is_finite() || question.weight <= 0.0 {
            return Err(MatchError::InvalidQuestionnaire(format!(
                "question '{}' has non-positive weight {}",
                question.id, question.weight
            )));
        }

        if question.options.is_empty() {
            return Err(MatchError::InvalidQuestionnaire(format!(
                "question '{}' has no options",
                question.id
            )));
        }

        let mut values = HashSet::new();
        for option in &question.options {
            if !values.insert(option.value.as_str()) {
                return Err(MatchError::InvalidQuestionnaire(format!(
                    "question '{}' repeats option value '{}'",
                    question.id, option.value
                )));
            }

            for (tutor_id, points) in option.points.iter() {
                if !registry.contains(tutor_id) {
                    return Err(MatchError::InvalidQuestionnaire(format!(
                        "option '{}' of question '{}' awards points to unknown tutor '{}'",
                        option.value, question.id, tutor_id
                    )));
                }
                if !points.is_finite() || points < 0.0 {
                    return Err(MatchError::InvalidQuestionnaire(format!(
                        "option '{}' of question '{}' awards invalid points {} to '{}'",
                        option.value, question.id, points, tutor_id
                    )));
                }
            }
        }
    }

    Ok(())
}
