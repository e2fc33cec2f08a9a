use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate code: {code} (\"{title}\" is already listed)")]
    DuplicateCode { code: String, title: String },
    #[error("not found: no product with id {0}")]
    NotFound(u64),
    #[error("invalid patch: {0}")]
    InvalidPatch(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn not_found(id: u64) -> Self { Self::NotFound(id) }

    pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }

    pub fn is_duplicate(&self) -> bool { matches!(self, Self::DuplicateCode { .. }) }
}
