//! Install-location lookup backed by a launcher's list of installed applications.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::collaborators::InstallLocator;

/// One application entry in the launcher manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledApp {
  /// Numeric application identifier.
  pub id: u32,
  /// Short name key of the application.
  pub key: String,
  /// Directory the application is installed in.
  pub install_path: PathBuf,
}

/// Reads a JSON array of [`InstalledApp`] entries from disk on each lookup.
#[derive(Debug, Clone)]
pub struct LauncherManifestLocator {
  manifest_path: PathBuf,
}

impl LauncherManifestLocator {
  /// Locator backed by the manifest at `manifest_path`.
  pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
    Self {
      manifest_path: manifest_path.into(),
    }
  }

  /// Path of the backing manifest.
  pub fn manifest_path(&self) -> &Path {
    &self.manifest_path
  }

  /// Parse the manifest.
  pub fn installed_apps(&self) -> Result<Vec<InstalledApp>> {
    let path = &self.manifest_path;
    let text =
      fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
  }
}

impl InstallLocator for LauncherManifestLocator {
  fn install_path(&self, app_id: u32, key: &str) -> Option<PathBuf> {
    let apps = match self.installed_apps() {
      Ok(apps) => apps,
      Err(err) => {
        warn!("launcher manifest unavailable: {err:#}");
        return None;
      }
    };

    let found = apps
      .into_iter()
      .filter(|app| app.id == app_id && app.key == key)
      .map(|app| app.install_path)
      .find(|path| path.is_dir());
    if found.is_none() {
      debug!("no installed application {app_id}/{key} in {}", self.manifest_path.display());
    }
    found
  }
}
