//! Configuration for the sprite lookup service.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// File name searched for by [`LookupConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "bundle_lookup.config.json";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "BUNDLE_LOOKUP_CONFIG";

/// Where the lookup service finds its application and which bundles it indexes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LookupConfig {
  /// Directory globs expanded under the install directory.
  pub dir_globs: Vec<String>,
  /// Bundle-directory globs expanded under every matching directory.
  pub file_globs: Vec<String>,
  /// Numeric identifier of the application in the launcher.
  pub app_id: u32,
  /// Short name key of the application in the launcher.
  pub app_key: String,
  /// Launcher manifest listing installed applications.
  pub launcher_manifest: Option<PathBuf>,
}

impl Default for LookupConfig {
  fn default() -> Self {
    Self {
      dir_globs: vec![
        "resources".into(),
        "*/Raid_Data/StreamingAssets/AssetBundles".into(),
      ],
      file_globs: vec!["HeroAvatars*".into()],
      app_id: 101,
      app_key: "raid".into(),
      launcher_manifest: None,
    }
  }
}

impl LookupConfig {
  /// Attempt to load configuration from the provided directory.
  ///
  /// A missing or unparsable file yields the defaults.
  pub fn discover(dir: &Path) -> Self {
    Self::from_path(&dir.join(DEFAULT_CONFIG_FILE)).unwrap_or_default()
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Configuration for a process with no caller-supplied settings.
  ///
  /// Honours [`CONFIG_ENV_VAR`] when set, otherwise discovers in the working directory.
  pub fn from_environment() -> Self {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
      let path = PathBuf::from(path);
      match Self::from_path(&path) {
        Ok(config) => return config,
        Err(err) => tracing::warn!("{err}; using defaults"),
      }
      return Self::default();
    }

    match std::env::current_dir() {
      Ok(dir) => Self::discover(&dir),
      Err(_) => Self::default(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn discover_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    assert_eq!(LookupConfig::discover(dir.path()), LookupConfig::default());

    fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "{ broken").unwrap();
    assert_eq!(LookupConfig::discover(dir.path()), LookupConfig::default());
  }

  #[test]
  fn partial_files_keep_remaining_defaults() {
    let dir = tempdir().unwrap();
    fs::write(
      dir.path().join(DEFAULT_CONFIG_FILE),
      r#"{"fileGlobs": ["Icons*"], "launcherManifest": "apps.json"}"#,
    )
    .unwrap();

    let config = LookupConfig::discover(dir.path());
    assert_eq!(config.file_globs, vec!["Icons*".to_string()]);
    assert_eq!(config.launcher_manifest, Some(PathBuf::from("apps.json")));
    assert_eq!(config.app_id, 101);
    assert_eq!(config.dir_globs.len(), 2);
  }

  #[test]
  fn from_path_reports_parse_errors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.json");
    fs::write(&path, r#"{"appId": "raid"}"#).unwrap();

    let err = LookupConfig::from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("custom.json"));

    fs::write(&path, "{ broken").unwrap();
    let err = LookupConfig::from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
  }
}
