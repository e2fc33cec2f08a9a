//! File-backed product catalog.
//! - Keeps an ordered list of products in memory and mirrors it to a JSON snapshot.
//! - Every add/update/delete rewrites the snapshot in full.
//! - Outcomes are returned as values and reported to a [`signal::CatalogObserver`].

pub mod errors;
pub mod manager;
pub mod model;
pub mod runtime;
pub mod signal;
pub mod storage;

pub use errors::CatalogError;
pub use manager::{ProductManager, Saved, SnapshotStatus};
pub use model::{NewProduct, Product, ProductPatch};
pub use signal::{CatalogObserver, NullObserver, RecordingObserver, Signal, TracingObserver};
pub use storage::backend::{FsBackend, MemoryBackend, SnapshotBackend};
pub use storage::snapshot::LoadStatus;
