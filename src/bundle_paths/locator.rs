use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::filters::{is_data_file, is_unity3d_file};
use crate::error::LocateError;
use crate::models::BundlePath;

/// Expand `dir_globs` under `root_dir`, then `file_globs` under every match, and collect
/// the bundle files found beneath each resulting directory.
///
/// Within one bundle directory every `__data` file comes before every `*.unity3d` file.
/// Matches are concatenated in glob order and never de-duplicated, so overlapping globs
/// yield the same bundle more than once. An empty result is not an error.
pub fn locate<D, F>(
    root_dir: &Path,
    dir_globs: &[D],
    file_globs: &[F],
) -> Result<Vec<BundlePath>, LocateError>
where
    D: AsRef<str>,
    F: AsRef<str>,
{
    let root = std::path::absolute(root_dir).map_err(|source| LocateError::Root {
        path: root_dir.to_path_buf(),
        source,
    })?;

    let mut matching_dirs = Vec::new();
    for pattern in dir_globs {
        matching_dirs.extend(expand_directories(&root, pattern.as_ref())?);
    }

    let mut bundle_dirs = Vec::new();
    for dir in &matching_dirs {
        for pattern in file_globs {
            bundle_dirs.extend(expand_directories(dir, pattern.as_ref())?);
        }
    }

    let mut bundles = Vec::new();
    for dir in &bundle_dirs {
        bundles.extend(collect_bundle_files(dir));
    }

    debug!(
        directories = matching_dirs.len(),
        bundle_dirs = bundle_dirs.len(),
        bundles = bundles.len(),
        "bundle discovery finished"
    );
    Ok(bundles)
}

/// Directories below `base` matching `pattern`, in the order the glob walk yields them.
fn expand_directories(base: &Path, pattern: &str) -> Result<Vec<PathBuf>, LocateError> {
    let pattern = pattern.trim_start_matches(['/', '\\']);
    if pattern.is_empty() {
        return Ok(Vec::new());
    }

    let joined = format!(
        "{}/{}",
        Pattern::escape(&base.to_string_lossy()).trim_end_matches(['/', '\\']),
        pattern
    );
    let paths = glob::glob(&joined).map_err(|source| LocateError::Pattern {
        pattern: joined.clone(),
        source,
    })?;

    let mut dirs = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) if path.is_dir() => dirs.push(path),
            Ok(_) => {}
            Err(err) => warn!(
                "skipping unreadable path {}: {}",
                err.path().display(),
                err.error()
            ),
        }
    }
    Ok(dirs)
}

/// All `__data` files under `dir`, followed by all `*.unity3d` files under `dir`.
fn collect_bundle_files(dir: &Path) -> Vec<BundlePath> {
    let mut data_files = Vec::new();
    let mut packed_files = Vec::new();

    let walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry under {}: {}", dir.display(), err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        if is_data_file(&path) {
            data_files.push(BundlePath::new(path));
        } else if is_unity3d_file(&path) {
            packed_files.push(BundlePath::new(path));
        }
    }

    data_files.extend(packed_files);
    data_files
}
