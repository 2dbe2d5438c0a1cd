//! Error types for the reconciliation engine.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while loading, planning, or applying scripts.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The script directory does not exist or is not a directory.
    #[error("Script directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// An individual script file could not be read. The whole load fails.
    #[error("Failed to read script '{name}': {source}")]
    MalformedScript {
        /// File name of the unreadable script.
        name: String,
        /// Underlying read error.
        #[source]
        source: std::io::Error,
    },

    /// Two ordered migrations share the same serial number.
    #[error("Duplicate migration serial {serial}: '{first}' and '{second}'")]
    DuplicateSerial {
        /// The shared serial number.
        serial: i64,
        /// First script carrying the serial, in canonical order.
        first: String,
        /// Second script carrying the serial.
        second: String,
    },

    /// Script execution or its bookkeeping write failed.
    #[error("Failed to apply script '{name}': {reason}")]
    ApplicationFailed {
        /// File name of the failed script.
        name: String,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Applied-state store failure outside of script application.
    #[error("Store error: {0}")]
    Store(String),

    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Create a store error.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create an application failure for the named script.
    pub fn application_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ApplicationFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_failed_display() {
        let err = EngineError::application_failed("001_create.sql", "syntax error");
        let msg = err.to_string();
        assert!(msg.contains("001_create.sql"));
        assert!(msg.contains("syntax error"));
    }

    #[test]
    fn test_duplicate_serial_display() {
        let err = EngineError::DuplicateSerial {
            serial: 7,
            first: "007_a.sql".to_string(),
            second: "7_b.sql".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains('7'));
        assert!(msg.contains("007_a.sql"));
        assert!(msg.contains("7_b.sql"));
    }
}
