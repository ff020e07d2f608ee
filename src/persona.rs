//! Persona catalog: the fixed table of system prompts.
//!
//! A catalog is built once at startup (either the built-in table or one
//! supplied through the config file) and shared read-only afterwards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named role with the system prompt that steers the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub prompt: String,
}

impl Persona {
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
        }
    }
}

/// Errors raised when building a catalog from an injected table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("persona table is empty")]
    Empty,
    #[error("persona at position {0} has a blank name")]
    BlankName(usize),
    #[error("persona '{0}' has a blank prompt")]
    BlankPrompt(String),
    #[error("persona '{0}' is defined more than once")]
    Duplicate(String),
    #[error("default persona '{0}' is not in the table")]
    MissingDefault(String),
}

/// Name of the default built-in persona.
pub const DEFAULT_PERSONA: &str = "General Assistant";

const BUILTIN: &[(&str, &str)] = &[
    (
        "General Assistant",
        "You are a helpful AI assistant. Answer questions accurately and be conversational.",
    ),
    (
        "Software Engineer",
        "You are an expert software engineer. Help with coding questions, debugging, system design, and best practices. If a question is unrelated to software engineering, politely explain you can only answer software engineering questions in this role.",
    ),
    (
        "Nutritionist",
        "You are a professional nutritionist. Provide advice on diet, food choices, nutrition, and healthy eating habits. If a question is unrelated to nutrition, politely explain you can only answer nutrition questions in this role.",
    ),
    (
        "Skin Expert",
        "You are a dermatology expert. Provide information about skincare, common skin conditions, and basic skincare routines. If a question is unrelated to skin health, politely explain you can only answer skin-related questions in this role.",
    ),
    (
        "Financial Advisor",
        "You are a financial advisor. Provide guidance on personal finance, investments, budgeting, and financial planning. If a question is unrelated to finance, politely explain you can only answer financial questions in this role.",
    ),
    (
        "Travel Guide",
        "You are a travel expert. Provide recommendations about destinations, travel tips, and cultural information. If a question is unrelated to travel, politely explain you can only answer travel questions in this role.",
    ),
    (
        "Fitness Coach",
        "You are a fitness coach. Provide advice on exercise, workouts, fitness goals, and training programs. If a question is unrelated to fitness, politely explain you can only answer fitness questions in this role.",
    ),
    (
        "Mental Health Support",
        "You are a mental wellness guide. Provide information about stress management, self-care practices, and general mental wellness tips. You are NOT a therapist, so make this clear and suggest professional help when appropriate. If a question is unrelated to mental wellness, politely explain you can only answer mental health questions in this role.",
    ),
];

/// Immutable mapping from persona name to system prompt.
#[derive(Debug, Clone)]
pub struct PromptCatalog {
    personas: Vec<Persona>,
    default_index: usize,
}

impl PromptCatalog {
    /// Build a catalog from `personas`, with `default` as the fallback entry.
    pub fn new(personas: Vec<Persona>, default: &str) -> Result<Self, CatalogError> {
        if personas.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for (i, persona) in personas.iter().enumerate() {
            if persona.name.trim().is_empty() {
                return Err(CatalogError::BlankName(i));
            }
            if persona.prompt.trim().is_empty() {
                return Err(CatalogError::BlankPrompt(persona.name.clone()));
            }
            if !seen.insert(persona.name.as_str()) {
                return Err(CatalogError::Duplicate(persona.name.clone()));
            }
        }

        let default_index = personas
            .iter()
            .position(|p| p.name == default)
            .ok_or_else(|| CatalogError::MissingDefault(default.to_string()))?;

        Ok(Self {
            personas,
            default_index,
        })
    }

    /// The built-in eight-persona table, defaulting to "General Assistant".
    pub fn builtin() -> Self {
        Self {
            personas: BUILTIN
                .iter()
                .map(|(name, prompt)| Persona::new(*name, *prompt))
                .collect(),
            default_index: 0,
        }
    }

    /// System prompt for `name`, or the default persona's prompt if unknown.
    pub fn prompt_for(&self, name: &str) -> &str {
        match self.get(name) {
            Some(persona) => &persona.prompt,
            None => {
                tracing::debug!(persona = name, "unknown persona, using default prompt");
                &self.personas[self.default_index].prompt
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn default_persona(&self) -> &str {
        &self.personas[self.default_index].name
    }

    /// Persona names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.personas.iter().map(|p| p.name.as_str())
    }

    /// Position of `name` in catalog order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.personas.iter().position(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

impl Default for PromptCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_prompts_are_non_empty() {
        let catalog = PromptCatalog::builtin();
        assert_eq!(catalog.len(), 8);
        for name in catalog.names() {
            assert!(!catalog.prompt_for(name).is_empty(), "{name} has no prompt");
        }
    }

    #[test]
    fn test_unknown_persona_falls_back_to_default() {
        let catalog = PromptCatalog::builtin();
        assert_eq!(catalog.default_persona(), DEFAULT_PERSONA);
        assert_eq!(
            catalog.prompt_for("Astronaut"),
            catalog.prompt_for(DEFAULT_PERSONA)
        );
        assert_eq!(catalog.prompt_for(""), catalog.prompt_for(DEFAULT_PERSONA));
    }

    #[test]
    fn test_builtin_order_starts_with_default() {
        let catalog = PromptCatalog::builtin();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names.first(), Some(&"General Assistant"));
        assert_eq!(names.last(), Some(&"Mental Health Support"));
        assert_eq!(catalog.index_of("Nutritionist"), Some(2));
    }

    #[test]
    fn test_new_with_custom_default() {
        let catalog = PromptCatalog::new(
            vec![
                Persona::new("Pirate", "Talk like a pirate."),
                Persona::new("Poet", "Answer in verse."),
            ],
            "Poet",
        )
        .unwrap();
        assert_eq!(catalog.default_persona(), "Poet");
        assert_eq!(catalog.prompt_for("Chef"), "Answer in verse.");
        assert_eq!(catalog.prompt_for("Pirate"), "Talk like a pirate.");
    }

    #[test]
    fn test_new_rejects_invalid_tables() {
        assert_eq!(
            PromptCatalog::new(vec![], "x").unwrap_err(),
            CatalogError::Empty
        );
        assert_eq!(
            PromptCatalog::new(vec![Persona::new(" ", "p")], " ").unwrap_err(),
            CatalogError::BlankName(0)
        );
        assert_eq!(
            PromptCatalog::new(vec![Persona::new("A", "")], "A").unwrap_err(),
            CatalogError::BlankPrompt("A".to_string())
        );
        assert_eq!(
            PromptCatalog::new(
                vec![Persona::new("A", "one"), Persona::new("A", "two")],
                "A"
            )
            .unwrap_err(),
            CatalogError::Duplicate("A".to_string())
        );
        assert_eq!(
            PromptCatalog::new(vec![Persona::new("A", "one")], "B").unwrap_err(),
            CatalogError::MissingDefault("B".to_string())
        );
    }
}
