//! Teaching chain state machine
//!
//! States are `(chain_id, phase_name)` pairs. Transitions only move forward
//! along a chain's fixed phase order; completion leaves no active chain.

use super::models::{ChainProgress, Phase, TeachingChain, Turn};
use super::triggers::TransitionTrigger;
use crate::personas::PersonaRegistry;
use indexmap::IndexMap;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Teaching chain errors
#[derive(Debug, Error)]
pub enum ChainError {
    /// Callers should fall back to single-tutor mode
    #[error("Unknown teaching chain: {0}")]
    UnknownChain(String),

    #[error("Invalid teaching chain: {0}")]
    InvalidChain(String),
}

/// Outcome of one advancing step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseStep<'a> {
    /// Trigger not satisfied; keep the current phase
    Stay(&'a Phase),
    /// A different phase is now active (advance, or restart after lost state)
    Entered(&'a Phase),
    /// The last phase's trigger fired; no active chain remains
    Completed,
}

/// Registry of chains plus the phase-advancing logic
#[derive(Debug, Clone, Default)]
pub struct ChainEngine {
    chains: IndexMap<String, TeachingChain>,
}

impl ChainEngine {
    /// Create an engine, rejecting duplicate ids, empty chains and repeated
    /// phase names
    pub fn new(chains: Vec<TeachingChain>) -> Result<Self, ChainError> {
        let mut registry = IndexMap::new();

        for chain in chains {
            if chain.phases.is_empty() {
                return Err(ChainError::InvalidChain(format!(
                    "chain '{}' has no phases",
                    chain.id
                )));
            }

            let mut names = HashSet::new();
            for phase in &chain.phases {
                if !names.insert(phase.name.as_str()) {
                    return Err(ChainError::InvalidChain(format!(
                        "chain '{}' repeats phase '{}'",
                        chain.id, phase.name
                    )));
                }
            }

            if registry.contains_key(&chain.id) {
                return Err(ChainError::InvalidChain(format!(
                    "duplicate chain id '{}'",
                    chain.id
                )));
            }
            registry.insert(chain.id.clone(), chain);
        }

        Ok(Self { chains: registry })
    }

    /// Verify every phase's tutor exists in `registry`
    pub fn check_tutors(&self, registry: &PersonaRegistry) -> Result<(), ChainError> {
        for chain in self.chains.values() {
            if let Some(phase) = chain.phases.iter().find(|p| !registry.contains(&p.tutor)) {
                return Err(ChainError::InvalidChain(format!(
                    "phase '{}' of chain '{}' uses unknown tutor '{}'",
                    phase.name, chain.id, phase.tutor
                )));
            }
        }
        Ok(())
    }

    pub fn chain(&self, chain_id: &str) -> Result<&TeachingChain, ChainError> {
        self.chains
            .get(chain_id)
            .ok_or_else(|| ChainError::UnknownChain(chain_id.to_string()))
    }

    pub fn chains(&self) -> impl Iterator<Item = &TeachingChain> {
        self.chains.values()
    }

    /// Initial progress for a chain: its first phase
    pub fn start(&self, chain_id: &str) -> Result<ChainProgress, ChainError> {
        let chain = self.chain(chain_id)?;
        let first = chain
            .first_phase()
            .ok_or_else(|| ChainError::InvalidChain(format!("chain '{}' has no phases", chain_id)))?;
        Ok(ChainProgress::new(chain_id, first.name.clone()))
    }

    /// Tutor active during `phase_name`, if both chain and phase exist
    pub fn tutor_for_phase(&self, chain_id: &str, phase_name: &str) -> Option<&str> {
        self.chains
            .get(chain_id)?
            .phase(phase_name)
            .map(|p| p.tutor.as_str())
    }

    /// Decide the phase after this turn.
    ///
    /// - Unknown `current_phase`: the chain's first phase (lost-state recovery).
    /// - Trigger not satisfied, or the trigger id has no heuristic: the current phase.
    /// - Trigger satisfied: the next phase, or `None` when the chain is complete.
    ///
    /// The heuristics scan the entire transcript, not only turns since the
    /// phase was entered, so a long history can satisfy a phase immediately.
    pub fn next_phase(
        &self,
        chain_id: &str,
        current_phase: &str,
        transcript: &[Turn],
    ) -> Result<Option<&Phase>, ChainError> {
        let chain = self.chain(chain_id)?;

        let Some(index) = chain.phase_index(current_phase) else {
            debug!(
                "Phase '{}' not found in chain '{}', restarting at first phase",
                current_phase, chain_id
            );
            return Ok(chain.first_phase());
        };

        let phase = &chain.phases[index];
        let ready = TransitionTrigger::from_id(&phase.trigger)
            .map(|trigger| trigger.is_satisfied(transcript))
            .unwrap_or(false);

        if ready {
            debug!("Trigger '{}' satisfied in chain '{}'", phase.trigger, chain_id);
            Ok(chain.phases.get(index + 1))
        } else {
            Ok(Some(phase))
        }
    }

    /// [`next_phase`](Self::next_phase) classified against `progress`
    pub fn advance(
        &self,
        progress: &ChainProgress,
        transcript: &[Turn],
    ) -> Result<PhaseStep<'_>, ChainError> {
        let step = match self.next_phase(&progress.chain_id, &progress.phase, transcript)? {
            Some(phase) if phase.name == progress.phase => PhaseStep::Stay(phase),
            Some(phase) => PhaseStep::Entered(phase),
            None => PhaseStep::Completed,
        };
        Ok(step)
    }
}
