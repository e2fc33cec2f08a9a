use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, warn};

use crate::errors::CatalogError;
use crate::model::Product;
use crate::storage::backend::SnapshotBackend;

/// What construction found at the snapshot location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing at the path; started empty.
    Missing,
    /// Parsed this many records.
    Loaded(usize),
    /// Unreadable or malformed; started empty.
    Corrupt(String),
}

/// Read the snapshot at `path`. Never fails: a missing or broken snapshot
/// yields an empty catalog and the reason is carried in the status.
pub fn load(backend: &dyn SnapshotBackend, path: &Path) -> (Vec<Product>, LoadStatus) {
    if !backend.exists(path) {
        debug!(path = %path.display(), "no snapshot, starting empty");
        return (Vec::new(), LoadStatus::Missing);
    }
    let parsed = backend
        .read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|raw| serde_json::from_str::<Vec<Product>>(&raw).map_err(|e| e.to_string()));
    match parsed {
        Ok(products) => {
            debug!(path = %path.display(), count = products.len(), "snapshot loaded");
            let n = products.len();
            (products, LoadStatus::Loaded(n))
        }
        Err(reason) => {
            warn!(path = %path.display(), error = %reason, "unusable snapshot, starting empty");
            (Vec::new(), LoadStatus::Corrupt(reason))
        }
    }
}

/// Pretty-print the catalog using `indent` as the nesting unit.
pub fn encode(products: &[Product], indent: &str) -> Result<Vec<u8>, CatalogError> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    products.serialize(&mut ser)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewProduct;
    use crate::storage::backend::MemoryBackend;

    #[test]
    fn missing_and_corrupt_start_empty() {
        let backend = MemoryBackend::new()
            .with_file("broken.json", "{ not json")
            .with_file("empty.json", "")
            .with_file("object.json", "{}");

        let (products, status) = load(&backend, Path::new("absent.json"));
        assert!(products.is_empty());
        assert_eq!(status, LoadStatus::Missing);

        for name in ["broken.json", "empty.json", "object.json"] {
            let (products, status) = load(&backend, Path::new(name));
            assert!(products.is_empty());
            assert!(matches!(status, LoadStatus::Corrupt(_)), "{name}: {status:?}");
        }
    }

    #[test]
    fn encode_uses_indent_and_loads_back() -> Result<(), anyhow::Error> {
        let products = vec![
            NewProduct::new("a", "b", 1.0, "c", "A1").into_product(1),
            NewProduct::new("d", "e", 2.5, "f", "A2").with_stock(3.5).into_product(2),
        ];
        let bytes = encode(&products, "\t")?;
        let text = String::from_utf8(bytes.clone())?;
        assert!(text.starts_with("[\n\t{\n\t\t\"id\": 1,"));

        let backend = MemoryBackend::new().with_file("p.json", bytes);
        let (loaded, status) = load(&backend, Path::new("p.json"));
        assert_eq!(status, LoadStatus::Loaded(2));
        assert_eq!(loaded, products);
        Ok(())
    }

    #[test]
    fn fractional_stock_and_null_price_load() {
        let raw = r#"[
            {"id": 1, "title": "a", "description": "b", "price": null, "thumbnail": "c", "code": "A1"},
            {"id": 2, "title": "d", "description": "e", "price": 4, "thumbnail": "f", "code": "A2", "stock": 2.5}
        ]"#;
        let backend = MemoryBackend::new().with_file("p.json", raw);
        let (loaded, status) = load(&backend, Path::new("p.json"));
        assert_eq!(status, LoadStatus::Loaded(2));
        assert!(loaded[0].price.is_nan());
        assert_eq!(loaded[1].stock, Some(2.5));
    }

    #[test]
    fn empty_catalog_encodes_as_empty_array() -> Result<(), anyhow::Error> {
        assert_eq!(encode(&[], "  ")?, b"[]".to_vec());
        Ok(())
    }
}
