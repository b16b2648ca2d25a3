use std::path::Path;

/// File name used by uncompressed bundle directories.
pub const DATA_FILE_NAME: &str = "__data";

/// Extension of packed web-player bundles.
pub const UNITY3D_EXTENSION: &str = ".unity3d";

/// Returns `true` for files named exactly `__data`.
pub fn is_data_file(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name == DATA_FILE_NAME)
}

/// Returns `true` for files matching `*.unity3d`.
pub fn is_unity3d_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(UNITY3D_EXTENSION))
}

/// Determine whether a file is picked up by the bundle walk.
pub fn is_bundle_file(path: &Path) -> bool {
    is_data_file(path) || is_unity3d_file(path)
}
