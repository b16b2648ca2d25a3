//! Long-lived sprite cache answering point lookups for a host process.
//!
//! [`LookupService`] owns the cache and its collaborators; [`ffi`] exposes a process-wide
//! instance across a C calling convention.

pub mod ffi;
mod mapping;
mod service;

pub use mapping::NameMapping;
pub use service::{CacheState, InvalidReason, LookupService};
