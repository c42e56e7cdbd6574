// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by every pwnstore crate.

use thiserror::Error;

/// The primary error type used across the registry, store, and gateway.
#[derive(Debug, Error)]
pub enum PwnstoreError {
    /// A plugin is absent from the registry, or a local file is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Unsafe plugin name, unsafe archive entry path, or malformed input.
    #[error("security error: {0}")]
    Validation(String),

    /// Connection failure or non-success HTTP status.
    #[error("network error: {message}")]
    Network {
        message: String,
        /// HTTP status code when the server answered.
        status: Option<u16>,
    },

    /// The operation needs elevated privilege and the process does not have it.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Malformed JSON or source text.
    #[error("parse error: {0}")]
    Parse(String),

    /// The device configuration file could not be read or written.
    #[error("config file error: {message}")]
    ConfigIo {
        message: String,
        source: Option<std::io::Error>,
    },

    /// Archive could not be opened or an entry could not be read.
    #[error("archive error: {0}")]
    Archive(String),

    /// Internal or unexpected errors (filesystem failures outside the config file).
    #[error("internal error: {0}")]
    Internal(String),
}

impl PwnstoreError {
    /// Builds a [`PwnstoreError::ConfigIo`] from an I/O failure.
    pub fn config_io(message: impl Into<String>, source: std::io::Error) -> Self {
        PwnstoreError::ConfigIo {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Whether the CLI should terminate with a non-zero status.
    ///
    /// `NotFound` and `Validation` refuse the operation but leave the process
    /// healthy; everything else aborts the invoking command.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            PwnstoreError::NotFound(_) | PwnstoreError::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_and_validation_are_recoverable() {
        assert!(!PwnstoreError::NotFound("x".into()).is_fatal());
        assert!(!PwnstoreError::Validation("x".into()).is_fatal());
    }

    #[test]
    fn network_and_permission_are_fatal() {
        let network = PwnstoreError::Network {
            message: "refused".into(),
            status: None,
        };
        assert!(network.is_fatal());
        assert!(PwnstoreError::Permission("root".into()).is_fatal());
        assert!(PwnstoreError::Parse("bad json".into()).is_fatal());
    }

    #[test]
    fn config_io_keeps_source() {
        let err = PwnstoreError::config_io("read failed", std::io::Error::other("boom"));
        assert!(err.to_string().contains("read failed"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
