use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error};

use configs::CatalogConfig;

use crate::errors::CatalogError;
use crate::model::{NewProduct, Product, ProductPatch};
use crate::signal::{CatalogObserver, Signal, TracingObserver};
use crate::storage::backend::{FsBackend, SnapshotBackend};
use crate::storage::snapshot::{self, LoadStatus};

/// Result of rewriting the snapshot after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotStatus {
    Written,
    /// The in-memory change stands; disk still holds the previous snapshot.
    Failed(String),
}

impl SnapshotStatus {
    pub fn is_written(&self) -> bool { matches!(self, SnapshotStatus::Written) }
}

/// A mutation that took effect in memory, with the outcome of persisting it.
#[derive(Debug, Clone, PartialEq)]
pub struct Saved<T> {
    pub value: T,
    pub snapshot: SnapshotStatus,
}

/// Ordered product catalog mirrored to a JSON snapshot.
///
/// The snapshot is read once on construction and rewritten in full after
/// every successful add, update or delete. Mutations take `&mut self`, so
/// one instance never interleaves two of them.
pub struct ProductManager {
    path: PathBuf,
    products: Vec<Product>,
    backend: Arc<dyn SnapshotBackend>,
    observer: Arc<dyn CatalogObserver>,
    indent: String,
    load_status: LoadStatus,
    last_snapshot: Option<SnapshotStatus>,
}

impl ProductManager {
    /// Open the catalog at `path` on the local file system.
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        Self::with_backend(path, Arc::new(FsBackend::default()))
    }

    /// Open the catalog at `path` through `backend`. A missing or unreadable
    /// snapshot gives an empty catalog; see [`ProductManager::load_status`].
    pub fn with_backend<P: Into<PathBuf>>(path: P, backend: Arc<dyn SnapshotBackend>) -> Self {
        let path = path.into();
        let (products, load_status) = snapshot::load(backend.as_ref(), &path);
        Self {
            path,
            products,
            backend,
            observer: Arc::new(TracingObserver),
            indent: "\t".to_string(),
            load_status,
            last_snapshot: None,
        }
    }

    pub fn from_config(cfg: &CatalogConfig) -> Self {
        let backend = Arc::new(FsBackend::new(cfg.storage.create_parent_dirs));
        Self::with_backend(cfg.storage.path.clone(), backend).with_indent(cfg.storage.indent.clone())
    }

    pub fn with_observer(mut self, observer: Arc<dyn CatalogObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn len(&self) -> usize { self.products.len() }

    pub fn is_empty(&self) -> bool { self.products.is_empty() }

    pub fn load_status(&self) -> &LoadStatus { &self.load_status }

    /// Outcome of the most recent snapshot write, if any happened yet.
    pub fn last_snapshot_status(&self) -> Option<&SnapshotStatus> { self.last_snapshot.as_ref() }

    /// Identifier the next added product receives: last record's id + 1, or 1.
    ///
    /// This follows the position of the last record, not the largest id, so
    /// it can repeat an id still held by an earlier record once ids have been
    /// rewritten by an update.
    pub fn next_id(&self) -> u64 {
        self.products.last().map_or(1, |p| p.id.saturating_add(1))
    }

    /// Append `candidate` unless a product with the same code exists.
    pub async fn add_product(&mut self, candidate: NewProduct) -> Result<Saved<Product>, CatalogError> {
        if self.products.iter().any(|p| p.code == candidate.code) {
            self.observer.notify(&Signal::AlreadyListed { title: &candidate.title });
            return Err(CatalogError::DuplicateCode { code: candidate.code, title: candidate.title });
        }

        let product = candidate.into_product(self.next_id());
        debug!(id = product.id, code = %product.code, "adding product");
        self.products.push(product.clone());
        let snapshot = self.save_file().await;
        self.observer.notify(&Signal::Added { title: &product.title });
        Ok(Saved { value: product, snapshot })
    }

    pub fn get_products(&self) -> &[Product] {
        self.observer.notify(&Signal::Listed(&self.products));
        &self.products
    }

    /// First product whose id equals `id`.
    pub fn find_product_by_id(&self, id: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn get_product_by_id(&self, id: u64) -> Result<&Product, CatalogError> {
        match self.find_product_by_id(id) {
            Some(product) => {
                self.observer.notify(&Signal::Found(product));
                Ok(product)
            }
            None => {
                self.observer.notify(&Signal::NotFound { id });
                Err(CatalogError::not_found(id))
            }
        }
    }

    /// Merge `patch` into the product with `id` and persist.
    ///
    /// Code uniqueness is not re-checked here. An empty patch still rewrites
    /// the snapshot.
    pub async fn update_product(&mut self, id: u64, patch: ProductPatch) -> Result<Saved<Product>, CatalogError> {
        let Some(index) = self.position(id) else {
            self.observer.notify(&Signal::NothingToUpdate { id });
            return Err(CatalogError::not_found(id));
        };

        let updated = self.products[index].merged(&patch)?;
        debug!(id, fields = patch.len(), "updating product");
        self.products[index] = updated.clone();
        let snapshot = self.save_file().await;
        self.observer.notify(&Signal::Updated { id });
        Ok(Saved { value: updated, snapshot })
    }

    /// Remove every product with `id` and persist. Remaining order is kept.
    ///
    /// More than one record is removed only when ids have collided; the
    /// returned list holds whatever was taken out.
    pub async fn delete_product(&mut self, id: u64) -> Result<Saved<Vec<Product>>, CatalogError> {
        if self.position(id).is_none() {
            self.observer.notify(&Signal::NothingToDelete { id });
            return Err(CatalogError::not_found(id));
        }

        let (removed, kept): (Vec<Product>, Vec<Product>) =
            std::mem::take(&mut self.products).into_iter().partition(|p| p.id == id);
        self.products = kept;
        debug!(id, removed = removed.len(), "deleting product");
        let snapshot = self.save_file().await;
        self.observer.notify(&Signal::Deleted { id });
        Ok(Saved { value: removed, snapshot })
    }

    /// Rewrite the whole snapshot. Failures are logged and returned as a
    /// status; the in-memory catalog is never rolled back.
    pub async fn save_file(&mut self) -> SnapshotStatus {
        let status = match snapshot::encode(&self.products, &self.indent) {
            Ok(bytes) => match self.backend.write(&self.path, bytes).await {
                Ok(()) => {
                    debug!(path = %self.path.display(), count = self.products.len(), "snapshot written");
                    SnapshotStatus::Written
                }
                Err(e) => {
                    error!(path = %self.path.display(), error = %e, "error saving products file");
                    SnapshotStatus::Failed(e.to_string())
                }
            },
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "error encoding products file");
                SnapshotStatus::Failed(e.to_string())
            }
        };
        self.last_snapshot = Some(status.clone());
        status
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.products.iter().position(|p| p.id == id)
    }
}
