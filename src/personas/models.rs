//! Data models for tutor personas

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named tutoring style backed by an LLM prompt template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorPersona {
    /// Stable key, e.g. "Professor Echo"
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub description: String,
    /// Opaque text handed to the LLM collaborator
    #[serde(skip_serializing, default)]
    pub prompt_template: String,
}

impl TutorPersona {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        prompt_template: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            specialty: String::new(),
            description: String::new(),
            prompt_template: prompt_template.into(),
        }
    }

    pub fn with_profile(mut self, specialty: impl Into<String>, description: impl Into<String>) -> Self {
        self.specialty = specialty.into();
        self.description = description.into();
        self
    }
}

/// Declaration-ordered registry of personas.
///
/// The key set is the universe of valid tutor ids. Iteration order is the
/// order personas were registered, which the matching engine relies on for
/// its tie-break.
#[derive(Debug, Clone, Default)]
pub struct PersonaRegistry {
    personas: IndexMap<String, TutorPersona>,
}

impl PersonaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry; a later persona with a duplicate id replaces the
    /// earlier one but keeps its position.
    pub fn from_personas(personas: impl IntoIterator<Item = TutorPersona>) -> Self {
        let mut registry = Self::new();
        for persona in personas {
            registry.register(persona);
        }
        registry
    }

    pub fn register(&mut self, persona: TutorPersona) {
        self.personas.insert(persona.id.clone(), persona);
    }

    pub fn get(&self, id: &str) -> Option<&TutorPersona> {
        self.personas.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.personas.contains_key(id)
    }

    /// Tutor ids in declaration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.personas.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TutorPersona> {
        self.personas.values()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}
