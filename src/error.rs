//! Error types for discovery, export and configuration loading.
//!
//! Per-entry problems during export (a name that cannot be made unique, a sprite that
//! decodes to nothing) are not errors; they are logged and counted in
//! [`crate::export::ExportSummary`]. The lookup boundary never surfaces any of these types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while expanding bundle globs.
#[derive(Debug, Error)]
pub enum LocateError {
  /// A directory glob could not be compiled.
  #[error("invalid glob pattern '{pattern}': {source}")]
  Pattern {
    /// Pattern as written by the caller, joined to its base directory.
    pattern: String,
    /// Underlying pattern error.
    source: glob::PatternError,
  },
  /// The root directory could not be made absolute.
  #[error("failed to resolve {}: {source}", path.display())]
  Root {
    /// Root that was passed in.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
}

/// Errors that end a batch export run.
#[derive(Debug, Error)]
pub enum ExportError {
  /// Discovery produced no bundle files.
  #[error("Your query returned no files.")]
  NoBundlesMatched,
  /// Bundles were found but the parser produced no records.
  #[error("No resources found.")]
  NoResourcesFound,
  /// Bundle discovery failed outright.
  #[error(transparent)]
  Locate(#[from] LocateError),
  /// Writing an exported file failed.
  #[error("failed to write {}: {source}", path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
}

/// Errors that can occur while loading a lookup configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Failed to read the configuration file from disk.
  #[error("failed to read {}: {source}", path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// Failed to parse the JSON configuration file.
  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
}
