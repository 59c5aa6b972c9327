//! Data models for calibration matching

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sparse tutor -> points contribution of a calibration option.
///
/// Tutors missing from the map contribute zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointMap(IndexMap<String, f64>);

impl PointMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tutor_id: impl Into<String>, points: f64) -> Self {
        self.0.insert(tutor_id.into(), points);
        self
    }

    /// Points awarded to `tutor_id`, zero when absent
    pub fn points_for(&self, tutor_id: &str) -> f64 {
        self.0.get(tutor_id).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(tutor, points)| (tutor.as_str(), *points))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for PointMap {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// One selectable answer of a calibration question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationOption {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub points: PointMap,
}

impl CalibrationOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>, points: PointMap) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            points,
        }
    }
}

/// Single-select calibration question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationQuestion {
    pub id: String,
    pub prompt: String,
    /// Relative importance; multiplies every option's points
    pub weight: f64,
    pub options: Vec<CalibrationOption>,
}

impl CalibrationQuestion {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            weight,
            options: Vec::new(),
        }
    }

    pub fn with_option(mut self, option: CalibrationOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn option(&self, value: &str) -> Option<&CalibrationOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

/// Ordered questionnaire. Part of the engine's effective version: changing
/// it changes scoring outcomes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Questionnaire {
    questions: Vec<CalibrationQuestion>,
}

impl Questionnaire {
    pub fn new(questions: Vec<CalibrationQuestion>) -> Self {
        Self { questions }
    }

    pub fn question(&self, id: &str) -> Option<&CalibrationQuestion> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn questions(&self) -> &[CalibrationQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Question id -> chosen option value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(HashMap<String, String>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, question_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(question_id, value);
        self
    }

    pub fn insert(&mut self, question_id: impl Into<String>, value: impl Into<String>) {
        self.0.insert(question_id.into(), value.into());
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(q, v)| (q.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Accumulated score per tutor, in persona-registry order.
///
/// Produced by the engine with an entry for every registered tutor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreVector(IndexMap<String, f64>);

impl ScoreVector {
    pub(crate) fn zeroed<'a>(tutor_ids: impl Iterator<Item = &'a str>) -> Self {
        Self(tutor_ids.map(|id| (id.to_string(), 0.0)).collect())
    }

    pub(crate) fn add(&mut self, tutor_id: &str, amount: f64) {
        if let Some(score) = self.0.get_mut(tutor_id) {
            *score += amount;
        }
    }

    pub fn get(&self, tutor_id: &str) -> Option<f64> {
        self.0.get(tutor_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(tutor, score)| (tutor.as_str(), *score))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ScoreVector {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Ranked recommendation derived from one answer set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// Tutor ids, best match first
    pub ranking: Vec<String>,
    pub scores: ScoreVector,
}

impl MatchResult {
    pub fn primary(&self) -> Option<&str> {
        self.ranking.first().map(String::as_str)
    }

    /// Up to `count` runners-up after the primary match
    pub fn alternates(&self, count: usize) -> &[String] {
        let end = self.ranking.len().min(count.saturating_add(1));
        self.ranking.get(1..end).unwrap_or(&[])
    }

    /// Primary followed by up to `alternate_count` alternates
    pub fn top(&self, alternate_count: usize) -> &[String] {
        let end = self.ranking.len().min(alternate_count.saturating_add(1));
        &self.ranking[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_map_zero_default() {
        let points = PointMap::new().with("A", 2.0);
        assert_eq!(points.points_for("A"), 2.0);
        assert_eq!(points.points_for("B"), 0.0);
    }

    #[test]
    fn test_answer_set_deserializes_from_object() {
        let answers: AnswerSet =
            serde_json::from_str(r#"{"learning_approach":"creative"}"#).unwrap();
        assert_eq!(answers.get("learning_approach"), Some("creative"));
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn test_match_result_slices() {
        let result = MatchResult {
            ranking: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            scores: ScoreVector::default(),
        };
        assert_eq!(result.primary(), Some("A"));
        assert_eq!(result.alternates(2), &["B".to_string(), "C".to_string()]);
        assert_eq!(result.top(2).len(), 3);
        assert_eq!(result.alternates(10).len(), 3);
    }

    #[test]
    fn test_match_result_empty() {
        let result = MatchResult {
            ranking: vec![],
            scores: ScoreVector::default(),
        };
        assert_eq!(result.primary(), None);
        assert!(result.alternates(2).is_empty());
        assert!(result.top(2).is_empty());
    }
}
