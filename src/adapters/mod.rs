//! Concrete collaborators used by the command line tool and the lookup boundary.
//!
//! Each adapter implements one of the traits in [`crate::collaborators`]; tests and
//! embedders are free to substitute their own.

mod json_records;
mod launcher;
mod png;

pub use json_records::JsonRecordParser;
pub use launcher::{InstalledApp, LauncherManifestLocator};
pub use png::PngCodec;
