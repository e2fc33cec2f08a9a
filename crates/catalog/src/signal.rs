//! Operation outcomes reported to an observer.
//!
//! Every public [`ProductManager`](crate::ProductManager) operation emits one
//! [`Signal`]. Its `Display` text is the line a console front end would print;
//! the default [`TracingObserver`] turns it into a structured log event.

use std::fmt;
use std::sync::Mutex;

use tracing::{debug, info};

use crate::model::Product;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal<'a> {
    Added { title: &'a str },
    AlreadyListed { title: &'a str },
    Listed(&'a [Product]),
    Found(&'a Product),
    NotFound { id: u64 },
    Updated { id: u64 },
    NothingToUpdate { id: u64 },
    Deleted { id: u64 },
    NothingToDelete { id: u64 },
}

impl Signal<'_> {
    /// Stable name used as the `event` field in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Signal::Added { .. } => "product_added",
            Signal::AlreadyListed { .. } => "product_already_listed",
            Signal::Listed(_) => "products_listed",
            Signal::Found(_) => "product_found",
            Signal::NotFound { .. } => "product_not_found",
            Signal::Updated { .. } => "product_updated",
            Signal::NothingToUpdate { .. } => "product_update_missing",
            Signal::Deleted { .. } => "product_deleted",
            Signal::NothingToDelete { .. } => "product_delete_missing",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Signal::Added { .. }
                | Signal::Listed(_)
                | Signal::Found(_)
                | Signal::Updated { .. }
                | Signal::Deleted { .. }
        )
    }
}

impl fmt::Display for Signal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Added { title } => write!(f, "Product \"{title}\" added to products list."),
            Signal::AlreadyListed { title } => {
                write!(f, "The product \"{title}\" is already on the products list.")
            }
            Signal::Listed(products) => {
                let dump = serde_json::to_string_pretty(products).map_err(|_| fmt::Error)?;
                f.write_str(&dump)
            }
            Signal::Found(product) => {
                let dump = serde_json::to_string_pretty(product).map_err(|_| fmt::Error)?;
                f.write_str(&dump)
            }
            Signal::NotFound { id } => write!(f, "No product found with id \"{id}\"."),
            Signal::Updated { id } => write!(f, "Product with id \"{id}\" updated."),
            Signal::NothingToUpdate { id } => write!(f, "No product to update with id \"{id}\"."),
            Signal::Deleted { .. } => f.write_str("Product deleted"),
            Signal::NothingToDelete { id } => write!(f, "No product to delete with id \"{id}\"."),
        }
    }
}

/// Receives the outcome of every catalog operation.
pub trait CatalogObserver: Send + Sync {
    fn notify(&self, signal: &Signal<'_>);
}

/// Logs signals through `tracing`. List and record dumps go to `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CatalogObserver for TracingObserver {
    fn notify(&self, signal: &Signal<'_>) {
        let event = signal.kind();
        match signal {
            Signal::Listed(products) => debug!(event, count = products.len(), "{signal}"),
            Signal::Found(product) => debug!(event, id = product.id, "{signal}"),
            _ => info!(event, success = signal.is_success(), "{signal}"),
        }
    }
}

/// Drops every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl CatalogObserver for NullObserver {
    fn notify(&self, _signal: &Signal<'_>) {}
}

/// Keeps the rendered text of every signal, oldest first.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    lines: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn new() -> Self { Self::default() }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last(&self) -> Option<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).last().cloned()
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl CatalogObserver for RecordingObserver {
    fn notify(&self, signal: &Signal<'_>) {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).push(signal.to_string());
    }
}
