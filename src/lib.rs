#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod adapters;
pub mod bundle_paths;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod export;
pub mod indexer;
pub mod lookup;
pub mod models;
pub mod naming;
pub mod text;

pub use bundle_paths::locate;
pub use collaborators::{BundleParser, ImageCodec, InstallLocator};
pub use config::LookupConfig;
pub use error::{ConfigError, ExportError, LocateError};
pub use export::{ExportRequest, ExportSummary, SpriteExporter, export};
pub use indexer::{ResourceIndex, index};
pub use lookup::{CacheState, LookupService, NameMapping};
pub use models::{BundlePath, IndexEntry, RecordBody, ResourceKind, ResourceRecord};
pub use naming::{CollisionPolicy, Resolution, resolve};
