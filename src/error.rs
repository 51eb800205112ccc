//! Error type for the crate.
//!
//! Nothing in the countdown itself can fail: bad input is clamped and invalid
//! transitions are ignored. Errors only come from the edges, meaning the
//! configuration file, the alert backends and the terminal program.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced at the crate's edges.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file could not be parsed.
    #[error("invalid configuration in {path}: {source}")]
    Config {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: toml::de::Error,
    },

    /// A file could not be read or written.
    #[error("{context}: {source}")]
    Io {
        /// What was being attempted.
        context: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The audio backend was unavailable or refused a tone.
    #[error("audio unavailable: {0}")]
    Audio(String),

    /// The desktop notification could not be shown.
    #[error("notification failed: {0}")]
    Notification(String),

    /// The terminal program failed.
    #[error("terminal program failed: {0}")]
    Program(String),
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
