//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure that can stop startup or the
//! scheduler, so `run` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: menagerie_core::config::ConfigError,
    },

    /// Game clock initialization failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: menagerie_core::clock::ClockError,
    },

    /// Text-service setup failed.
    #[error("narrator error: {source}")]
    Narrator {
        /// The underlying narrator error.
        #[from]
        source: menagerie_narrator::NarratorError,
    },

    /// The scheduler failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: menagerie_core::runner::RunnerError,
    },

    /// The async runtime could not be built.
    #[error("runtime error: {source}")]
    Runtime {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
