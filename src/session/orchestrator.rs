//! Session orchestration
//!
//! Glues the matching and chain engines to the persistence and LLM
//! collaborators. Calibration runs once per learner; every chat turn
//! evaluates the active chain before building the LLM prompt.

use super::models::{
    CalibrationRecord, ChatReply, ChatRequest, ConversationRecord, PhaseUpdate,
};
use super::store::SessionStore;
use crate::chain::{ChainEngine, ChainError, ChainProgress, PhaseStep, Turn};
use crate::config::MatchingConfig;
use crate::error::{ElaraError, Result};
use crate::llm::LlmClient;
use crate::matching::{AnswerSet, MatchingEngine};
use crate::metrics::METRICS;
use crate::personas::PersonaRegistry;
use chrono::Utc;
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Prompt used when the full prompt fails
pub const FALLBACK_PROMPT: &str = "You are a helpful tutor. Keep responses clear and concise.";

pub struct SessionOrchestrator {
    matching: MatchingEngine,
    chains: ChainEngine,
    store: Arc<dyn SessionStore>,
    llm: Arc<dyn LlmClient>,
    policy: MatchingConfig,
    /// At most one advancing call per conversation id
    locks: DashMap<String, Arc<Mutex<()>>>,
}

/// Chain evaluation for one turn
struct TurnPlan {
    tutor: String,
    progress: Option<ChainProgress>,
    update: PhaseUpdate,
    framing: Option<String>,
    /// (chain id, "entered" | "completed") once the reply is persisted
    transition: Option<(String, &'static str)>,
}

impl SessionOrchestrator {
    /// Fails when a chain phase names a tutor missing from the persona registry
    pub fn new(
        matching: MatchingEngine,
        chains: ChainEngine,
        store: Arc<dyn SessionStore>,
        llm: Arc<dyn LlmClient>,
        policy: MatchingConfig,
    ) -> Result<Self> {
        chains.check_tutors(matching.registry())?;

        Ok(Self {
            matching,
            chains,
            store,
            llm,
            policy,
            locks: DashMap::new(),
        })
    }

    pub fn registry(&self) -> &PersonaRegistry {
        self.matching.registry()
    }

    pub fn matching(&self) -> &MatchingEngine {
        &self.matching
    }

    pub fn chains(&self) -> &ChainEngine {
        &self.chains
    }

    /// Score a learner's answers and persist the ranked result
    pub async fn calibrate(&self, user_id: &str, answers: AnswerSet) -> Result<CalibrationRecord> {
        if user_id.trim().is_empty() {
            return Err(ElaraError::InvalidRequest("user_id cannot be empty".to_string()));
        }

        let questionnaire = self.matching.questionnaire();
        if self.policy.require_complete {
            let answered = questionnaire
                .questions()
                .iter()
                .filter(|q| answers.get(&q.id).is_some())
                .count();
            if answered < questionnaire.len() {
                METRICS.record_calibration(None);
                return Err(ElaraError::IncompleteCalibration {
                    answered,
                    total: questionnaire.len(),
                });
            }
        }

        let result = match self.matching.match_answers(&answers) {
            Ok(result) => result,
            Err(e) => {
                METRICS.record_calibration(None);
                return Err(e.into());
            }
        };

        let primary_tutor = result
            .primary()
            .ok_or_else(|| ElaraError::Configuration("persona registry is empty".to_string()))?
            .to_string();

        let record = CalibrationRecord {
            user_id: user_id.to_string(),
            answers,
            tutor_matches: result.top(self.policy.alternate_count).to_vec(),
            scores: result.scores,
            primary_tutor,
            completed_at: Utc::now(),
        };

        self.store.save_calibration(record.clone()).await?;
        METRICS.record_calibration(Some(&record.primary_tutor));
        info!(
            "Calibration for {} matched {} (alternates: {:?})",
            user_id,
            record.primary_tutor,
            &record.tutor_matches[1..]
        );

        Ok(record)
    }

    pub async fn calibration(&self, user_id: &str) -> Result<Option<CalibrationRecord>> {
        self.store.calibration(user_id).await
    }

    pub async fn conversation(&self, conversation_id: &str) -> Result<Option<ConversationRecord>> {
        self.store.conversation(conversation_id).await
    }

    /// Put a conversation at the first phase of `chain_id`, creating the
    /// conversation if needed
    pub async fn start_chain(&self, conversation_id: &str, chain_id: &str) -> Result<ChainProgress> {
        let progress = self.chains.start(chain_id)?;
        let first_tutor = self
            .chains
            .tutor_for_phase(chain_id, &progress.phase)
            .unwrap_or_default()
            .to_string();

        self.serialized(conversation_id, async {
            let mut conversation = self
                .store
                .conversation(conversation_id)
                .await?
                .unwrap_or_else(|| ConversationRecord::new(conversation_id, first_tutor));
            conversation.progress = Some(progress.clone());
            conversation.touch();
            self.store.save_conversation(conversation).await
        })
        .await?;

        METRICS.record_phase_transition(chain_id, "entered");
        info!(
            "Conversation {} started chain '{}' at phase '{}'",
            conversation_id, chain_id, progress.phase
        );
        Ok(progress)
    }

    /// Drop any active chain; returns the progress that was cleared
    pub async fn abandon_chain(&self, conversation_id: &str) -> Result<Option<ChainProgress>> {
        self.serialized(conversation_id, async {
            let Some(mut conversation) = self.store.conversation(conversation_id).await? else {
                return Ok(None);
            };

            let cleared = conversation.progress.take();
            if cleared.is_some() {
                conversation.touch();
                self.store.save_conversation(conversation).await?;
                info!("Conversation {} abandoned its chain", conversation_id);
            }
            Ok(cleared)
        })
        .await
    }

    /// Run one chat turn: advance the chain, prompt the LLM, persist both turns.
    ///
    /// Nothing is persisted unless a reply (full or fallback) was produced, so
    /// a failed turn can be resent without duplicating it.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatReply> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(ElaraError::InvalidRequest("message cannot be empty".to_string()));
        }
        if !self.registry().contains(&request.tutor) {
            return Err(ElaraError::UnknownTutor(request.tutor));
        }

        let conversation_id = request
            .conversation_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        self.serialized(
            &conversation_id,
            self.run_turn(&conversation_id, request.tutor, message),
        )
        .await
    }

    async fn run_turn(&self, conversation_id: &str, tutor: String, message: &str) -> Result<ChatReply> {
        let mut conversation = self
            .store
            .conversation(conversation_id)
            .await?
            .unwrap_or_else(|| ConversationRecord::new(conversation_id, &tutor));
        conversation.tutor = tutor;

        let history_len = conversation.transcript.len();
        conversation.transcript.push(Turn::user(message));

        let plan = self.plan_turn(&conversation)?;

        let template = self
            .registry()
            .get(&plan.tutor)
            .map(|p| p.prompt_template.clone())
            .ok_or_else(|| ElaraError::UnknownTutor(plan.tutor.clone()))?;

        let mut prompt_parts = Vec::with_capacity(history_len + 3);
        prompt_parts.push(template);
        prompt_parts.extend(plan.framing);
        prompt_parts.extend(
            conversation.transcript[..history_len]
                .iter()
                .map(|turn| turn.content.clone()),
        );
        prompt_parts.push(message.to_string());

        let (response, fallback) = match self.llm.complete(&prompt_parts).await {
            Ok(text) => (text, false),
            Err(e) => {
                warn!("LLM completion failed for {}: {}, trying fallback prompt", conversation_id, e);
                METRICS.record_llm_fallback();

                let fallback_parts = [FALLBACK_PROMPT.to_string(), message.to_string()];
                match self.llm.complete(&fallback_parts).await {
                    Ok(text) => (text, true),
                    Err(fallback_err) => {
                        error!("Fallback completion also failed: {}", fallback_err);
                        METRICS.record_chat_turn("error");
                        return Err(e.into());
                    }
                }
            }
        };

        conversation.progress = plan.progress;
        conversation
            .transcript
            .push(Turn::tutor(&plan.tutor, response.clone()));
        conversation.touch();
        self.store.save_conversation(conversation).await?;

        if let Some((chain_id, kind)) = &plan.transition {
            METRICS.record_phase_transition(chain_id, kind);
        }
        METRICS.record_chat_turn(if fallback { "fallback" } else { "ok" });

        Ok(ChatReply {
            conversation_id: conversation_id.to_string(),
            response,
            tutor: plan.tutor,
            phase_update: plan.update,
            fallback,
        })
    }

    /// Decide tutor, progress and framing text for a conversation whose
    /// transcript already ends with the new user turn
    fn plan_turn(&self, conversation: &ConversationRecord) -> Result<TurnPlan> {
        let single_tutor = |update| TurnPlan {
            tutor: conversation.tutor.clone(),
            progress: None,
            update,
            framing: None,
            transition: None,
        };

        let Some(progress) = &conversation.progress else {
            return Ok(single_tutor(PhaseUpdate::Unchanged));
        };

        let step = match self.chains.advance(progress, &conversation.transcript) {
            Ok(step) => step,
            Err(ChainError::UnknownChain(chain_id)) => {
                warn!(
                    "Conversation {} references unknown chain '{}', using single-tutor mode",
                    conversation.id, chain_id
                );
                METRICS.record_chain_fallback();
                return Ok(single_tutor(PhaseUpdate::Unchanged));
            }
            Err(e) => return Err(e.into()),
        };

        let chain_name = self
            .chains
            .chain(&progress.chain_id)
            .map(|c| c.name.as_str())
            .unwrap_or(progress.chain_id.as_str());

        let plan = match step {
            PhaseStep::Stay(phase) => {
                debug!("Conversation {} stays in phase '{}'", conversation.id, phase.name);
                TurnPlan {
                    tutor: phase.tutor.clone(),
                    progress: Some(progress.clone()),
                    update: PhaseUpdate::Unchanged,
                    framing: Some(chain_framing(&phase.name, chain_name, false)),
                    transition: None,
                }
            }
            PhaseStep::Entered(phase) => {
                info!(
                    "Conversation {} moved from '{}' to '{}' in chain '{}', tutor now {}",
                    conversation.id, progress.phase, phase.name, progress.chain_id, phase.tutor
                );
                TurnPlan {
                    tutor: phase.tutor.clone(),
                    progress: Some(ChainProgress::new(&progress.chain_id, &phase.name)),
                    update: PhaseUpdate::Entered {
                        phase: phase.name.clone(),
                        tutor: phase.tutor.clone(),
                    },
                    framing: Some(chain_framing(&phase.name, chain_name, true)),
                    transition: Some((progress.chain_id.clone(), "entered")),
                }
            }
            PhaseStep::Completed => {
                info!(
                    "Conversation {} completed chain '{}'",
                    conversation.id, progress.chain_id
                );
                TurnPlan {
                    transition: Some((progress.chain_id.clone(), "completed")),
                    ..single_tutor(PhaseUpdate::Completed)
                }
            }
        };

        Ok(plan)
    }

    /// Run `work` while holding the conversation's lock, then drop the lock
    /// entry once no other call is waiting on it
    async fn serialized<T, F>(&self, conversation_id: &str, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let lock = self.conversation_lock(conversation_id);
        let result = {
            let _guard = lock.lock().await;
            work.await
        };

        drop(lock);
        self.locks
            .remove_if(conversation_id, |_, held| Arc::strong_count(held) == 1);
        result
    }

    fn conversation_lock(&self, conversation_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(conversation_id.to_string())
            .or_default()
            .clone()
    }
}

fn chain_framing(phase_name: &str, chain_name: &str, transitioning: bool) -> String {
    format!(
        "You are in the \"{}\" phase of the \"{}\" teaching chain. Focus on {} this teaching style.",
        phase_name,
        chain_name,
        if transitioning { "transitioning to" } else { "maintaining" }
    )
}
