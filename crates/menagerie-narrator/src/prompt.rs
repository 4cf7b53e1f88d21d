//! Prompt templates via `minijinja`.
//!
//! The templates under `templates/` are compiled into the crate. A
//! templates directory can override any of them by file name
//! (`system.j2`, `fact.j2`, `event.j2`, `name.j2`), so the wording can be
//! tuned without recompiling. Missing files keep the built-in version.

use std::path::Path;

use minijinja::{Environment, context};

use crate::error::NarratorError;
use crate::parse::{MAX_EVENT_COINS, MIN_EVENT_COINS};

const TEMPLATES: [(&str, &str); 4] = [
    ("system.j2", include_str!("../templates/system.j2")),
    ("fact.j2", include_str!("../templates/fact.j2")),
    ("event.j2", include_str!("../templates/event.j2")),
    ("name.j2", include_str!("../templates/name.j2")),
];

/// A prompt ready to send to a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    /// System message.
    pub system: String,
    /// User message.
    pub user: String,
}

/// Holds the loaded templates.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    /// Engine with the built-in templates.
    pub fn builtin() -> Result<Self, NarratorError> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)
                .map_err(|e| NarratorError::Template(format!("failed to add {name}: {e}")))?;
        }
        Ok(Self { env })
    }

    /// Engine with the built-in templates, overridden by any matching
    /// files in `dir`.
    pub fn with_overrides(dir: &Path) -> Result<Self, NarratorError> {
        let mut engine = Self::builtin()?;
        for (name, _) in TEMPLATES {
            let path = dir.join(name);
            if !path.is_file() {
                continue;
            }
            let source = std::fs::read_to_string(&path).map_err(|e| {
                NarratorError::Template(format!("failed to read {}: {e}", path.display()))
            })?;
            engine
                .env
                .add_template_owned(name, source)
                .map_err(|e| NarratorError::Template(format!("failed to add {name}: {e}")))?;
            tracing::info!(template = name, path = %path.display(), "Prompt template overridden");
        }
        Ok(engine)
    }

    /// Prompt for a fact about a pet.
    pub fn fact(
        &self,
        name: &str,
        species: &str,
        habitat: &str,
    ) -> Result<RenderedPrompt, NarratorError> {
        self.render("fact.j2", &context! { name, species, habitat })
    }

    /// Prompt for a random event.
    pub fn random_event(&self) -> Result<RenderedPrompt, NarratorError> {
        self.render(
            "event.j2",
            &context! { min_coins => MIN_EVENT_COINS, max_coins => MAX_EVENT_COINS },
        )
    }

    /// Prompt for a pet name.
    pub fn name(&self, species: &str) -> Result<RenderedPrompt, NarratorError> {
        self.render("name.j2", &context! { species })
    }

    fn render(
        &self,
        template: &str,
        ctx: &minijinja::Value,
    ) -> Result<RenderedPrompt, NarratorError> {
        let system = self.render_one("system.j2", ctx)?;
        let user = self.render_one(template, ctx)?;
        Ok(RenderedPrompt { system, user })
    }

    fn render_one(&self, template: &str, ctx: &minijinja::Value) -> Result<String, NarratorError> {
        let rendered = self
            .env
            .get_template(template)
            .map_err(|e| NarratorError::Template(format!("missing {template}: {e}")))?
            .render(ctx)
            .map_err(|e| NarratorError::Template(format!("{template} render failed: {e}")))?;
        Ok(rendered.trim().to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builtin_fact_mentions_pet_and_species() {
        let engine = PromptEngine::builtin().unwrap();
        let prompt = engine.fact("Goldie", "Goldfish", "Aquarium").unwrap();
        assert!(prompt.user.contains("Goldie"));
        assert!(prompt.user.contains("Goldfish"));
        assert!(prompt.system.contains("Menagerie"));
    }

    #[test]
    fn event_prompt_states_the_coin_range() {
        let engine = PromptEngine::builtin().unwrap();
        let prompt = engine.random_event().unwrap();
        assert!(prompt.user.contains("from 10 to 100"));
    }

    #[test]
    fn directory_overrides_single_templates() {
        let dir = std::env::temp_dir().join(format!("menagerie-prompts-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("name.j2"), "Name this {{ species }}, pirate style.").unwrap();

        let engine = PromptEngine::with_overrides(&dir).unwrap();
        assert_eq!(
            engine.name("Parrot").unwrap().user,
            "Name this Parrot, pirate style."
        );
        // Untouched templates keep the built-in text.
        assert!(engine.fact("Rex", "Dog", "Zoo").unwrap().user.contains("Rex"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
