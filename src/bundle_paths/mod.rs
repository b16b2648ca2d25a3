//! Resolve a root directory plus glob patterns into the bundle files to index.
//!
//! Discovery runs in three ordered passes (directory globs, bundle-directory globs, then a
//! recursive file walk) and never sorts or de-duplicates between them, so the order of the
//! returned paths is fully determined by the order of the globs and the directory listing.
//! Sequence ids assigned by the indexer depend on that order.

mod filters;
mod locator;

pub use filters::{is_bundle_file, is_data_file, is_unity3d_file};
pub use locator::locate;
