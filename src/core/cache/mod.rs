//! Artifact cache and path resolution
//!
//! - [`path`] - deterministic artifact naming (the cache key)
//! - [`store`] - the [`ArtifactCache`] trait and its filesystem implementation
//! - [`single_flight`] - per-path generation gate
//! - [`atomic`] - temp-then-rename writes

pub mod atomic;
pub mod path;
pub mod single_flight;
pub mod store;

pub use atomic::write_atomic;
pub use path::{format_stamp, slugify, ArtifactPaths};
pub use single_flight::{FlightGuard, RecordGates, RecordGuard, SingleFlight};
pub use store::{is_ready, ArtifactCache, FsArtifactCache};
