//! Error types for uptimes-core operations.

use std::path::PathBuf;

/// All errors that can occur in uptimes-core operations.
#[derive(Debug, thiserror::Error)]
pub enum UptimesError {
    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("Invalid configuration value for {field}: {reason}")]
    ConfigInvalid { field: String, reason: String },

    // ─────────────────────────────────────────────────────────────────────
    // Database Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Uptimes database is corrupt: {path}: {details}")]
    CorruptDatabase { path: PathBuf, details: String },

    #[error("Failed to persist uptimes database: {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Process Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Process not found: {0}")]
    ProcessNotFound(u32),
}

/// Convenience type alias for Results using UptimesError.
pub type Result<T> = std::result::Result<T, UptimesError>;

impl UptimesError {
    /// True for failures raised while writing the database back to disk.
    ///
    /// These are the errors a save cycle tolerates: another instance may be
    /// replacing the file at the same moment, and the next cycle catches up.
    pub fn is_write_contention(&self) -> bool {
        matches!(self, UptimesError::Persist { .. })
    }
}

impl From<UptimesError> for String {
    fn from(err: UptimesError) -> String {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_is_write_contention() {
        let err = UptimesError::Persist {
            path: PathBuf::from("/tmp/uptimes.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_write_contention());
    }

    #[test]
    fn test_corrupt_database_is_not_write_contention() {
        let err = UptimesError::CorruptDatabase {
            path: PathBuf::from("/tmp/uptimes.json"),
            details: "expected value at line 1 column 1".to_string(),
        };
        assert!(!err.is_write_contention());
        assert!(err.to_string().contains("/tmp/uptimes.json"));
    }
}
