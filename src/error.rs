//! Error type shared by every stage of manifest compilation.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Failures that abort a manifest compilation.
///
/// Every variant carries the offending input so callers can report it without extra context.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// A duration string had no recognised unit or a non-integer magnitude.
  #[error("not a valid duration: {value:?}")]
  InvalidDuration {
    /// The rejected duration string.
    value: String,
  },

  /// The filesystem collaborator could not enumerate the requested directory.
  #[error("cannot list base directory {path}")]
  NoSuchBase {
    /// Directory that was requested.
    path: String,
    /// Underlying I/O failure, when there is one.
    #[source]
    source: Option<std::io::Error>,
  },

  /// A matched file could not be read for hashing.
  #[error("cannot read file {path}")]
  UnreadableFile {
    /// Path of the file as reported by the listing.
    path: String,
    /// Underlying I/O failure, when there is one.
    #[source]
    source: Option<std::io::Error>,
  },

  /// The input configuration is structurally malformed.
  #[error("invalid config: {message}")]
  InvalidSpec {
    /// Human readable description of the problem.
    message: String,
  },

  /// A glob compiled into a regular expression the engine rejected.
  #[error("invalid pattern {glob:?}")]
  InvalidPattern {
    /// Glob as written in the config.
    glob: String,
    /// Regex engine error.
    #[source]
    source: regex::Error,
  },

  /// Writing an output file failed.
  #[error("failed to write {}", .path.display())]
  Io {
    /// Destination path.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },
}

impl ManifestError {
  /// Creates an [`ManifestError::InvalidSpec`] error.
  pub fn invalid_spec(message: impl Into<String>) -> Self {
    Self::InvalidSpec {
      message: message.into(),
    }
  }

  /// Creates an [`ManifestError::InvalidDuration`] error.
  pub fn invalid_duration(value: impl Into<String>) -> Self {
    Self::InvalidDuration {
      value: value.into(),
    }
  }
}
