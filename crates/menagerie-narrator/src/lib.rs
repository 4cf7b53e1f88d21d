//! Flavor text for the Menagerie simulator.
//!
//! The narrator produces pet names, species facts and random events by
//! calling an LLM over HTTP. It is decorative: every call is bounded by
//! a timeout and falls back to fixed text, so the game never waits on it
//! and never sees an error from it.
//!
//! # Modules
//!
//! - [`config`] -- Backend settings from `NARRATOR_*` environment variables.
//! - [`error`] -- [`NarratorError`], logged but never surfaced to the game.
//! - [`llm`] -- `OpenAI`-compatible and Anthropic backends over `reqwest`.
//! - [`narrator`] -- [`Narrator`] and its fallbacks.
//! - [`parse`] -- Cleaning names and facts, parsing events.
//! - [`prompt`] -- `minijinja` prompt templates.

pub mod config;
pub mod error;
pub mod llm;
pub mod narrator;
pub mod parse;
pub mod prompt;

pub use config::{BackendType, LlmBackendConfig, NarratorSettings};
pub use error::NarratorError;
pub use narrator::Narrator;
