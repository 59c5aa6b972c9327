//! Orchestrator flow tests against a scripted LLM

use async_trait::async_trait;
use elara::chain::{default_chains, ChainEngine, Role};
use elara::config::MatchingConfig;
use elara::llm::{LlmClient, LlmError};
use elara::matching::{default_questionnaire, AnswerSet, MatchingEngine};
use elara::personas::default_registry;
use elara::session::{
    ChatRequest, InMemorySessionStore, PhaseUpdate, SessionOrchestrator, SessionStore,
    FALLBACK_PROMPT,
};
use elara::ElaraError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Returns queued outcomes in order, then "ok" forever; records every prompt
#[derive(Default)]
struct ScriptedLlm {
    outcomes: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<Vec<String>>>,
    delay: Option<Duration>,
}

impl ScriptedLlm {
    fn with_outcomes(outcomes: Vec<Result<String, LlmError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            ..Self::default()
        }
    }

    fn prompts(&self) -> Vec<Vec<String>> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, prompt_parts: &[String]) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt_parts.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.outcomes.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok("ok".to_string()))
    }
}

fn orchestrator_with(llm: Arc<ScriptedLlm>, store: Arc<InMemorySessionStore>) -> SessionOrchestrator {
    let matching = MatchingEngine::new(Arc::new(default_registry()), default_questionnaire()).unwrap();
    let chains = ChainEngine::new(default_chains()).unwrap();
    SessionOrchestrator::new(matching, chains, store, llm, MatchingConfig::default()).unwrap()
}

fn request(conversation_id: &str, tutor: &str, message: &str) -> ChatRequest {
    ChatRequest {
        conversation_id: Some(conversation_id.to_string()),
        tutor: tutor.to_string(),
        message: message.to_string(),
    }
}

#[tokio::test]
async fn test_single_tutor_turn_builds_prompt_from_history() {
    let llm = Arc::new(ScriptedLlm::with_outcomes(vec![
        Ok("first reply".to_string()),
        Ok("second reply".to_string()),
    ]));
    let orchestrator = orchestrator_with(llm.clone(), Arc::new(InMemorySessionStore::new()));

    let first = orchestrator
        .chat(request("c1", "Master Zen", "What is a monad?"))
        .await
        .unwrap();
    assert_eq!(first.response, "first reply");
    assert_eq!(first.tutor, "Master Zen");
    assert_eq!(first.phase_update, PhaseUpdate::Unchanged);
    assert!(!first.fallback);

    orchestrator
        .chat(request("c1", "Master Zen", "Show me an example"))
        .await
        .unwrap();

    let zen_template = default_registry().get("Master Zen").unwrap().prompt_template.clone();
    let prompts = llm.prompts();
    assert_eq!(prompts[0], vec![zen_template.clone(), "What is a monad?".to_string()]);
    assert_eq!(
        prompts[1],
        vec![
            zen_template,
            "What is a monad?".to_string(),
            "first reply".to_string(),
            "Show me an example".to_string(),
        ]
    );

    let conversation = orchestrator.conversation("c1").await.unwrap().unwrap();
    let roles: Vec<Role> = conversation.transcript.iter().map(|t| t.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Tutor, Role::User, Role::Tutor]);
}

#[tokio::test]
async fn test_missing_conversation_id_creates_conversation() {
    let llm = Arc::new(ScriptedLlm::default());
    let store = Arc::new(InMemorySessionStore::new());
    let orchestrator = orchestrator_with(llm, store.clone());

    let reply = orchestrator
        .chat(ChatRequest {
            conversation_id: None,
            tutor: "Professor Echo".to_string(),
            message: "Hello".to_string(),
        })
        .await
        .unwrap();

    assert!(!reply.conversation_id.is_empty());
    assert!(store.conversation(&reply.conversation_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_chain_advances_then_abandon() {
    let llm = Arc::new(ScriptedLlm::default());
    let orchestrator = orchestrator_with(llm.clone(), Arc::new(InMemorySessionStore::new()));

    orchestrator
        .start_chain("c1", "light_deep_debate")
        .await
        .unwrap();

    let reply = orchestrator.chat(request("c1", "Master Zen", "hi")).await.unwrap();
    assert_eq!(reply.tutor, "Urahara Sensei");
    assert_eq!(reply.phase_update, PhaseUpdate::Unchanged);
    assert!(llm.prompts()[0][1].contains("maintaining"));
    assert!(llm.prompts()[0][1].contains("\"Warm Up\""));

    let reply = orchestrator.chat(request("c1", "Master Zen", "hello again")).await.unwrap();
    assert_eq!(
        reply.phase_update,
        PhaseUpdate::Entered {
            phase: "Deep Dive".to_string(),
            tutor: "Professor Echo".to_string(),
        }
    );
    assert_eq!(reply.tutor, "Professor Echo");
    assert!(llm.prompts()[1][1].contains("transitioning to"));

    let abandoned = orchestrator.abandon_chain("c1").await.unwrap();
    assert_eq!(abandoned.map(|p| p.phase), Some("Deep Dive".to_string()));

    let reply = orchestrator.chat(request("c1", "Master Zen", "back to zen")).await.unwrap();
    assert_eq!(reply.tutor, "Master Zen");
    assert_eq!(reply.phase_update, PhaseUpdate::Unchanged);
}

#[tokio::test]
async fn test_phase_without_heuristic_holds() {
    let llm = Arc::new(ScriptedLlm::default());
    let orchestrator = orchestrator_with(llm, Arc::new(InMemorySessionStore::new()));

    orchestrator
        .start_chain("c1", "explore_simulate_analyze")
        .await
        .unwrap();

    // Explore -> Simulate needs two questions
    orchestrator.chat(request("c1", "Coach Phoenix", "why?")).await.unwrap();
    let reply = orchestrator.chat(request("c1", "Coach Phoenix", "how?")).await.unwrap();
    assert!(matches!(reply.phase_update, PhaseUpdate::Entered { ref phase, .. } if phase == "Simulate"));

    // simulation_complete never fires
    let reply = orchestrator.chat(request("c1", "Coach Phoenix", "and?")).await.unwrap();
    assert_eq!(reply.tutor, "Dr. Quantum Quest");
    assert_eq!(reply.phase_update, PhaseUpdate::Unchanged);
}

#[tokio::test]
async fn test_unknown_chain_degrades_to_single_tutor() {
    let llm = Arc::new(ScriptedLlm::default());
    let store = Arc::new(InMemorySessionStore::new());
    let orchestrator = orchestrator_with(llm, store.clone());

    orchestrator.start_chain("c1", "light_deep_debate").await.unwrap();

    // Simulate progress persisted by an older deployment
    let mut conversation = store.conversation("c1").await.unwrap().unwrap();
    if let Some(progress) = conversation.progress.as_mut() {
        progress.chain_id = "retired_chain".to_string();
    }
    store.save_conversation(conversation).await.unwrap();

    let reply = orchestrator.chat(request("c1", "Master Zen", "hi")).await.unwrap();
    assert_eq!(reply.tutor, "Master Zen");
    assert_eq!(reply.phase_update, PhaseUpdate::Unchanged);

    let conversation = store.conversation("c1").await.unwrap().unwrap();
    assert!(conversation.progress.is_none());
}

#[tokio::test]
async fn test_start_unknown_chain_fails() {
    let orchestrator = orchestrator_with(
        Arc::new(ScriptedLlm::default()),
        Arc::new(InMemorySessionStore::new()),
    );
    let result = orchestrator.start_chain("c1", "no_such_chain").await;
    assert!(matches!(result, Err(ElaraError::Chain(_))));
}

#[tokio::test]
async fn test_llm_failure_uses_fallback_prompt() {
    let llm = Arc::new(ScriptedLlm::with_outcomes(vec![
        Err(LlmError::Upstream("Status 503".to_string())),
        Ok("plain answer".to_string()),
    ]));
    let orchestrator = orchestrator_with(llm.clone(), Arc::new(InMemorySessionStore::new()));

    let reply = orchestrator
        .chat(request("c1", "Master Zen", "Explain gravity"))
        .await
        .unwrap();

    assert!(reply.fallback);
    assert_eq!(reply.response, "plain answer");
    assert_eq!(
        llm.prompts()[1],
        vec![FALLBACK_PROMPT.to_string(), "Explain gravity".to_string()]
    );
}

#[tokio::test]
async fn test_double_llm_failure_surfaces_original_error() {
    let llm = Arc::new(ScriptedLlm::with_outcomes(vec![
        Err(LlmError::Timeout("slow".to_string())),
        Err(LlmError::Upstream("still down".to_string())),
    ]));
    let store = Arc::new(InMemorySessionStore::new());
    let orchestrator = orchestrator_with(llm, store.clone());

    let result = orchestrator.chat(request("c1", "Master Zen", "Hello")).await;
    assert!(matches!(result, Err(ElaraError::Llm(LlmError::Timeout(_)))));

    // A failed turn leaves no trace
    assert!(store.conversation("c1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_turn_can_be_resent_without_side_effects() {
    let llm = Arc::new(ScriptedLlm::with_outcomes(vec![
        Ok("welcome".to_string()),
        Err(LlmError::Upstream("Status 503".to_string())),
        Err(LlmError::Upstream("Status 503".to_string())),
    ]));
    let store = Arc::new(InMemorySessionStore::new());
    let orchestrator = orchestrator_with(llm, store.clone());
    orchestrator.start_chain("c1", "light_deep_debate").await.unwrap();

    let reply = orchestrator.chat(request("c1", "Master Zen", "hi")).await.unwrap();
    assert_eq!(reply.phase_update, PhaseUpdate::Unchanged);

    let failed = orchestrator.chat(request("c1", "Master Zen", "hi again")).await;
    assert!(matches!(failed, Err(ElaraError::Llm(_))));

    let conversation = store.conversation("c1").await.unwrap().unwrap();
    assert_eq!(conversation.transcript.len(), 2);
    assert_eq!(conversation.progress.unwrap().phase, "Warm Up");

    let retry = orchestrator.chat(request("c1", "Master Zen", "hi again")).await.unwrap();
    assert_eq!(
        retry.phase_update,
        PhaseUpdate::Entered {
            phase: "Deep Dive".to_string(),
            tutor: "Professor Echo".to_string(),
        }
    );
    assert_eq!(retry.tutor, "Professor Echo");

    let conversation = store.conversation("c1").await.unwrap().unwrap();
    let user_turns: Vec<&str> = conversation
        .transcript
        .iter()
        .filter(|t| t.role == Role::User)
        .map(|t| t.content.as_str())
        .collect();
    assert_eq!(user_turns, vec!["hi", "hi again"]);
    assert_eq!(conversation.progress.unwrap().phase, "Deep Dive");
}

#[tokio::test]
async fn test_concurrent_turns_on_one_conversation_are_serialized() {
    let llm = Arc::new(ScriptedLlm {
        delay: Some(Duration::from_millis(20)),
        ..ScriptedLlm::default()
    });
    let orchestrator = Arc::new(orchestrator_with(llm, Arc::new(InMemorySessionStore::new())));
    orchestrator.start_chain("c1", "light_deep_debate").await.unwrap();

    let handles: Vec<_> = ["first", "second", "third"]
        .into_iter()
        .map(|message| {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                orchestrator
                    .chat(request("c1", "Master Zen", message))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut entered = 0;
    for handle in handles {
        if matches!(handle.await.unwrap().phase_update, PhaseUpdate::Entered { .. }) {
            entered += 1;
        }
    }

    // Warm Up -> Deep Dive happens exactly once
    assert_eq!(entered, 1);
    let conversation = orchestrator.conversation("c1").await.unwrap().unwrap();
    assert_eq!(conversation.transcript.len(), 6);
    assert_eq!(conversation.progress.unwrap().phase, "Deep Dive");
}

#[tokio::test]
async fn test_calibration_round_trip() {
    let orchestrator = orchestrator_with(
        Arc::new(ScriptedLlm::default()),
        Arc::new(InMemorySessionStore::new()),
    );

    let answers = AnswerSet::new()
        .answer("learning_approach", "creative")
        .answer("learning_environment", "explorative")
        .answer("feedback_style", "guided")
        .answer("challenge_preference", "holistic");

    let record = orchestrator.calibrate("learner-1", answers).await.unwrap();
    assert_eq!(record.primary_tutor, "Nova Starweaver");
    assert_eq!(record.tutor_matches.len(), 3);
    assert_eq!(record.tutor_matches[0], "Nova Starweaver");

    let stored = orchestrator.calibration("learner-1").await.unwrap().unwrap();
    assert_eq!(stored.tutor_matches, record.tutor_matches);

    let invalid = orchestrator
        .calibrate("learner-2", AnswerSet::new().answer("learning_approach", "creative"))
        .await;
    assert!(matches!(invalid, Err(ElaraError::IncompleteCalibration { answered: 1, total: 4 })));
}
