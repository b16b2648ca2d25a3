use std::sync::OnceLock;

use tracing::{debug, info, warn};

use super::mapping::NameMapping;
use crate::bundle_paths::locate;
use crate::collaborators::{BundleParser, ImageCodec, InstallLocator};
use crate::config::LookupConfig;
use crate::indexer::ResourceIndex;

/// Why the cache can never answer a lookup in this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
  /// The install locator did not know the application.
  InstallNotFound,
  /// The install directory contained no matching bundles.
  NoBundles,
  /// The configured globs could not be expanded.
  DiscoveryFailed,
}

/// Result of the one-time population.
#[derive(Debug)]
pub enum CacheState {
  /// Lookups always miss.
  Invalid(InvalidReason),
  /// Sprites are available by display text.
  Ready(NameMapping),
}

/// Sprite cache populated on first use and kept for the life of the service.
///
/// Population runs exactly once even with concurrent callers; afterwards the mapping is
/// only read.
pub struct LookupService<P, C, L> {
  config: LookupConfig,
  parser: P,
  codec: C,
  locator: L,
  state: OnceLock<CacheState>,
}

impl<P, C, L> LookupService<P, C, L>
where
  P: BundleParser,
  C: ImageCodec,
  L: InstallLocator,
{
  /// Create an unpopulated service.
  pub fn new(config: LookupConfig, parser: P, codec: C, locator: L) -> Self {
    Self {
      config,
      parser,
      codec,
      locator,
      state: OnceLock::new(),
    }
  }

  /// Populate the cache if no caller has yet, and return its state.
  pub fn ensure_initialized(&self) -> &CacheState {
    self.state.get_or_init(|| self.populate())
  }

  /// Returns `true` once populated with a usable mapping.
  pub fn is_valid(&self) -> bool {
    matches!(self.ensure_initialized(), CacheState::Ready(_))
  }

  /// PNG bytes of the sprite registered under `id`.
  ///
  /// An invalid cache, an unknown id and a sprite that encodes to nothing all report `None`.
  pub fn lookup(&self, id: &str) -> Option<Vec<u8>> {
    let CacheState::Ready(mapping) = self.ensure_initialized() else {
      return None;
    };
    let entry = mapping.get(id)?;

    match self.codec.encode_png(&entry.record) {
      Ok(png) if !png.is_empty() => Some(png),
      Ok(_) => {
        debug!("sprite '{id}' has no image data");
        None
      }
      Err(err) => {
        warn!("failed to encode sprite '{id}': {err:#}");
        None
      }
    }
  }

  fn populate(&self) -> CacheState {
    let config = &self.config;
    let Some(install_dir) = self.locator.install_path(config.app_id, &config.app_key) else {
      warn!(
        "application {}/{} is not installed; sprite lookups are disabled",
        config.app_id, config.app_key
      );
      return CacheState::Invalid(InvalidReason::InstallNotFound);
    };

    let bundles = match locate(&install_dir, &config.dir_globs, &config.file_globs) {
      Ok(bundles) => bundles,
      Err(err) => {
        warn!("bundle discovery failed: {err}");
        return CacheState::Invalid(InvalidReason::DiscoveryFailed);
      }
    };
    if bundles.is_empty() {
      warn!("no bundles under {}", install_dir.display());
      return CacheState::Invalid(InvalidReason::NoBundles);
    }

    let index = ResourceIndex::build(self.parser.load(&bundles));
    let mapping = NameMapping::from_entries(index.into_entries());
    info!(
      "sprite cache ready: {} sprites from {} bundles",
      mapping.len(),
      bundles.len()
    );
    CacheState::Ready(mapping)
  }
}
