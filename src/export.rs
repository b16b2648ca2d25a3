//! Batch export of sprites from discovered bundles to individual PNG files.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::bundle_paths::locate;
use crate::collaborators::{BundleParser, ImageCodec};
use crate::error::ExportError;
use crate::indexer::ResourceIndex;
use crate::models::{IndexEntry, ResourceKind};
use crate::naming::{CollisionPolicy, Resolution, resolve};

/// Extension of every exported file.
pub const EXPORT_EXTENSION: &str = ".png";

/// Inputs of one export run.
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
  /// Root directory the globs are expanded under.
  pub root_dir: PathBuf,
  /// Directory globs, in priority order.
  pub dir_globs: Vec<String>,
  /// Bundle-directory globs, in priority order.
  pub file_globs: Vec<String>,
  /// Destination for exported files.
  pub output_dir: PathBuf,
}

/// What an export run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
  /// Number of indexed resources of every kind.
  pub indexed: usize,
  /// Files written, in index order.
  pub written: Vec<PathBuf>,
  /// Sprites skipped because both candidate names were taken.
  pub exhausted: usize,
  /// Sprites skipped because they encoded to nothing.
  pub empty: usize,
  /// Sprites skipped because their file could not be written.
  pub failed: usize,
}

/// Drives discovery, parsing, indexing and file output for one run.
pub struct SpriteExporter<P, C> {
  parser: P,
  codec: C,
}

impl<P: BundleParser, C: ImageCodec> SpriteExporter<P, C> {
  /// Create an exporter over the given parser and codec.
  pub fn new(parser: P, codec: C) -> Self {
    Self { parser, codec }
  }

  /// Discover, parse and index the bundles named by `request`.
  ///
  /// Fails when no bundle matched or when the matched bundles held no resources.
  pub fn index(&self, request: &ExportRequest) -> Result<ResourceIndex, ExportError> {
    let bundles = locate(&request.root_dir, &request.dir_globs, &request.file_globs)?;
    if bundles.is_empty() {
      return Err(ExportError::NoBundlesMatched);
    }
    debug!("matched {} bundle files", bundles.len());

    let records = self.parser.load(&bundles);
    if records.is_empty() {
      return Err(ExportError::NoResourcesFound);
    }

    Ok(ResourceIndex::build(records))
  }

  /// Run the full export described by `request`.
  pub fn export(&self, request: &ExportRequest) -> Result<ExportSummary, ExportError> {
    let index = self.index(request)?;
    self.export_index(&index, &request.output_dir)
  }

  /// Write every sprite of an existing index into `output_dir`.
  ///
  /// Only sprites are exported; other kinds are counted but left alone.
  pub fn export_index(
    &self,
    index: &ResourceIndex,
    output_dir: &Path,
  ) -> Result<ExportSummary, ExportError> {
    let mut summary = ExportSummary {
      indexed: index.len(),
      ..ExportSummary::default()
    };

    for entry in index.of_kind(ResourceKind::Sprite) {
      self.export_entry(entry, output_dir, &mut summary)?;
    }

    info!(
      "exported {} sprites ({} name collisions, {} empty, {} failed)",
      summary.written.len(),
      summary.exhausted,
      summary.empty,
      summary.failed
    );
    Ok(summary)
  }

  fn export_entry(
    &self,
    entry: &IndexEntry,
    output_dir: &Path,
    summary: &mut ExportSummary,
  ) -> Result<(), ExportError> {
    let resolution = resolve(
      output_dir,
      &entry.display_text,
      &entry.unique_suffix(),
      EXPORT_EXTENSION,
      CollisionPolicy::KeepDuplicates,
    )
    .map_err(|source| ExportError::Io {
      path: output_dir.to_path_buf(),
      source,
    })?;

    let path = match resolution {
      Resolution::Available(path) => path,
      Resolution::Existing(_) | Resolution::Exhausted => {
        debug!("no free file name left for '{}'", entry.display_text);
        summary.exhausted += 1;
        return Ok(());
      }
    };

    let png = match self.codec.encode_png(&entry.record) {
      Ok(png) => png,
      Err(err) => {
        warn!("failed to encode '{}': {err:#}", entry.display_text);
        Vec::new()
      }
    };
    if png.is_empty() {
      debug!("'{}' has no image data", entry.display_text);
      summary.empty += 1;
      return Ok(());
    }

    info!("saving {}", entry.display_text);
    save(path, &png, summary);
    Ok(())
  }
}

/// Write one exported file, recording the outcome in `summary`.
fn save(path: PathBuf, png: &[u8], summary: &mut ExportSummary) {
  match write_new_file(&path, png) {
    Ok(()) => summary.written.push(path),
    Err(err) if err.kind() == ErrorKind::AlreadyExists => {
      debug!("{} appeared while exporting; skipping", path.display());
      summary.exhausted += 1;
    }
    Err(err) => {
      warn!("failed to write {}: {err}", path.display());
      summary.failed += 1;
    }
  }
}

/// Run one export with the given collaborators.
pub fn export<P: BundleParser, C: ImageCodec>(
  request: &ExportRequest,
  parser: P,
  codec: C,
) -> Result<ExportSummary, ExportError> {
  SpriteExporter::new(parser, codec).export(request)
}

/// Write `bytes` to `path`, refusing to replace an existing file.
fn write_new_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
  let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
  if let Err(err) = file.write_all(bytes) {
    drop(file);
    let _ = fs::remove_file(path);
    return Err(err);
  }
  Ok(())
}
