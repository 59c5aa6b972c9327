//! Integration tests for calibration scoring and ranking

use elara::matching::{
    default_questionnaire, AnswerSet, CalibrationOption, CalibrationQuestion, MatchError,
    MatchingEngine, PointMap, Questionnaire,
};
use elara::personas::{default_registry, PersonaRegistry, TutorPersona};
use std::sync::Arc;

fn registry(ids: &[&str]) -> Arc<PersonaRegistry> {
    Arc::new(PersonaRegistry::from_personas(
        ids.iter().map(|id| TutorPersona::new(*id, *id, format!("You are {id}."))),
    ))
}

fn single_question(weight: f64) -> Questionnaire {
    Questionnaire::new(vec![CalibrationQuestion::new("q1", "Which one?", weight)
        .with_option(CalibrationOption::new(
            "a",
            "Option A",
            PointMap::new().with("TutorX", 2.0).with("TutorY", 1.0),
        ))
        .with_option(CalibrationOption::new(
            "b",
            "Option B",
            PointMap::new().with("TutorZ", 2.0),
        ))])
}

#[test]
fn test_single_weighted_question_scores_and_ranks() {
    let engine = MatchingEngine::new(
        registry(&["TutorW", "TutorX", "TutorY", "TutorZ"]),
        single_question(2.0),
    )
    .unwrap();

    let answers = AnswerSet::new().answer("q1", "a");
    let scores = engine.score(&answers).unwrap();

    assert_eq!(scores.get("TutorX"), Some(4.0));
    assert_eq!(scores.get("TutorY"), Some(2.0));
    assert_eq!(scores.get("TutorW"), Some(0.0));
    assert_eq!(scores.get("TutorZ"), Some(0.0));

    let ranking = engine.rank(&scores);
    assert_eq!(ranking, vec!["TutorX", "TutorY", "TutorW", "TutorZ"]);
}

#[test]
fn test_score_vector_covers_every_registered_tutor() {
    let registry = Arc::new(default_registry());
    let engine = MatchingEngine::new(registry.clone(), default_questionnaire()).unwrap();

    for answers in [
        AnswerSet::new(),
        AnswerSet::new().answer("learning_approach", "creative"),
        AnswerSet::new()
            .answer("learning_approach", "practical")
            .answer("learning_environment", "structured")
            .answer("feedback_style", "direct")
            .answer("challenge_preference", "holistic"),
    ] {
        let scores = engine.score(&answers).unwrap();
        assert_eq!(scores.len(), registry.len());
        for id in registry.ids() {
            assert!(scores.get(id).is_some(), "missing score for {id}");
        }
    }
}

#[test]
fn test_score_then_rank_is_deterministic() {
    let engine = MatchingEngine::new(Arc::new(default_registry()), default_questionnaire()).unwrap();
    let answers = AnswerSet::new()
        .answer("learning_approach", "philosophical")
        .answer("learning_environment", "contemplative")
        .answer("feedback_style", "guided")
        .answer("challenge_preference", "holistic");

    let first = engine.match_answers(&answers).unwrap();
    for _ in 0..20 {
        let again = engine.match_answers(&answers).unwrap();
        assert_eq!(again.ranking, first.ranking);
        assert_eq!(again.scores, first.scores);
    }
}

#[test]
fn test_doubling_weight_doubles_contribution() {
    let ids = ["TutorX", "TutorY", "TutorZ"];
    let answers = AnswerSet::new().answer("q1", "a");

    let base = MatchingEngine::new(registry(&ids), single_question(1.5))
        .unwrap()
        .score(&answers)
        .unwrap();
    let doubled = MatchingEngine::new(registry(&ids), single_question(3.0))
        .unwrap()
        .score(&answers)
        .unwrap();

    for id in ids {
        assert_eq!(doubled.get(id).unwrap(), 2.0 * base.get(id).unwrap());
    }
}

#[test]
fn test_ties_follow_registry_declaration_order() {
    let questionnaire = Questionnaire::new(vec![CalibrationQuestion::new("q1", "Tie", 1.0)
        .with_option(CalibrationOption::new(
            "even",
            "Even split",
            PointMap::new().with("Late", 3.0).with("Early", 3.0).with("Middle", 3.0),
        ))]);

    let engine = MatchingEngine::new(registry(&["Early", "Zero", "Middle", "Late"]), questionnaire)
        .unwrap();
    let result = engine
        .match_answers(&AnswerSet::new().answer("q1", "even"))
        .unwrap();

    assert_eq!(result.ranking, vec!["Early", "Middle", "Late", "Zero"]);
    assert_eq!(result.primary(), Some("Early"));
    assert_eq!(result.alternates(2), &["Middle".to_string(), "Late".to_string()]);
}

#[test]
fn test_invalid_answers_are_rejected_before_scoring() {
    let engine = MatchingEngine::new(registry(&["TutorX", "TutorY", "TutorZ"]), single_question(1.0))
        .unwrap();

    let unknown_question = engine.score(&AnswerSet::new().answer("q9", "a"));
    assert!(matches!(
        unknown_question,
        Err(MatchError::InvalidAnswer { ref question_id, .. }) if question_id == "q9"
    ));

    let unknown_option = engine.score(&AnswerSet::new().answer("q1", "c"));
    assert!(matches!(
        unknown_option,
        Err(MatchError::InvalidAnswer { ref question_id, .. }) if question_id == "q1"
    ));
}

#[test]
fn test_default_questionnaire_partial_answer_set() {
    let engine = MatchingEngine::new(Arc::new(default_registry()), default_questionnaire()).unwrap();
    let answers = AnswerSet::new()
        .answer("learning_approach", "practical")
        .answer("learning_environment", "structured");

    let scores = engine.score(&answers).unwrap();
    // practical: Zen 2*2.0, Phoenix 1*2.0; structured: Kuchiki 2*1.5, Zen 1*1.5
    assert_eq!(scores.get("Master Zen"), Some(5.5));
    assert_eq!(scores.get("Kuchiki Sensei"), Some(3.0));
    assert_eq!(scores.get("Coach Phoenix"), Some(2.0));

    let ranking = engine.rank(&scores);
    assert_eq!(&ranking[..3], &["Master Zen", "Kuchiki Sensei", "Coach Phoenix"]);
}
