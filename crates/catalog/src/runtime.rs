//! Runtime wiring
//!
//! Thin layer over `common` and `configs` so embedders only depend on this
//! crate to get logging and a configured catalog.

use configs::{CatalogConfig, LogFormat, LoggingConfig};
use tracing::info;

use crate::manager::ProductManager;

/// Install the tracing subscriber described by `cfg`.
pub fn init_logging(cfg: &LoggingConfig) {
    match cfg.format {
        LogFormat::Compact => common::utils::logging::init_logging_default(&cfg.filter),
        LogFormat::Json => common::utils::logging::init_logging_json(&cfg.filter),
    }
}

/// Load and validate configuration, set up logging, and open the catalog.
pub fn bootstrap() -> anyhow::Result<ProductManager> {
    let cfg = CatalogConfig::load_and_validate()?;
    Ok(open_with(&cfg))
}

/// Set up logging from `cfg` and open the catalog it points at.
pub fn open_with(cfg: &CatalogConfig) -> ProductManager {
    init_logging(&cfg.logging);
    let manager = ProductManager::from_config(cfg);
    info!(
        event = "catalog_open",
        path = %manager.path().display(),
        status = ?manager.load_status(),
        products = manager.len(),
        "catalog opened"
    );
    manager
}
