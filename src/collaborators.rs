//! Seams to the external bundle parser, image codec and install-location lookup.

use std::path::PathBuf;

use crate::models::{BundlePath, ResourceRecord};

/// Decodes bundle files into typed resource records.
pub trait BundleParser {
  /// Records of every bundle, bundle by bundle, each in its in-file order.
  ///
  /// Bundles that cannot be read are skipped; the implementation logs why.
  fn load(&self, bundles: &[BundlePath]) -> Vec<ResourceRecord>;
}

/// Encodes a decoded image resource as PNG.
pub trait ImageCodec {
  /// PNG bytes for `record`. An empty buffer means the record has nothing to encode.
  fn encode_png(&self, record: &ResourceRecord) -> anyhow::Result<Vec<u8>>;
}

/// Resolves where an installed application lives on disk.
pub trait InstallLocator {
  /// Install directory of the application registered under `app_id` and `key`.
  fn install_path(&self, app_id: u32, key: &str) -> Option<PathBuf>;
}

impl<T: BundleParser + ?Sized> BundleParser for &T {
  fn load(&self, bundles: &[BundlePath]) -> Vec<ResourceRecord> {
    (**self).load(bundles)
  }
}

impl<T: ImageCodec + ?Sized> ImageCodec for &T {
  fn encode_png(&self, record: &ResourceRecord) -> anyhow::Result<Vec<u8>> {
    (**self).encode_png(record)
  }
}

impl<T: InstallLocator + ?Sized> InstallLocator for &T {
  fn install_path(&self, app_id: u32, key: &str) -> Option<PathBuf> {
    (**self).install_path(app_id, key)
  }
}

impl<T: InstallLocator> InstallLocator for Option<T> {
  fn install_path(&self, app_id: u32, key: &str) -> Option<PathBuf> {
    self.as_ref()?.install_path(app_id, key)
  }
}
