//! Snapshot storage for the catalog.
//!
//! The catalog is mirrored to a single JSON document that is rewritten in
//! full after every mutation. [`backend`] abstracts the file system so tests
//! can run against memory; [`snapshot`] owns the encoding and the tolerant
//! load path.

pub mod backend;
pub mod snapshot;
