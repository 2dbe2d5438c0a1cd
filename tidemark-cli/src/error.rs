//! CLI error types and result alias.

use miette::Diagnostic;
use thiserror::Error;

use tidemark_engine::EngineError;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(tidemark::io))]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    #[diagnostic(code(tidemark::config))]
    Config(String),

    /// Engine error
    #[error(transparent)]
    #[diagnostic(code(tidemark::engine))]
    Engine(#[from] EngineError),

    /// Run aborted by conflicts
    #[error("Run aborted: {conflicts} conflicting scripts must be resolved")]
    #[diagnostic(code(tidemark::conflicts))]
    Aborted {
        /// Number of conflicts found.
        conflicts: usize,
    },

    /// Scripts failed to apply
    #[error("Run finished with {count} failed scripts")]
    #[diagnostic(code(tidemark::failed))]
    Failed {
        /// Number of failed scripts.
        count: usize,
    },
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::Config(format!("Failed to parse TOML: {}", err))
    }
}
