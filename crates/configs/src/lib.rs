use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// Indentation unit used when pretty-printing the snapshot.
    #[serde(default = "default_indent")]
    pub indent: String,
    #[serde(default = "default_create_parent_dirs")]
    pub create_parent_dirs: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            indent: default_indent(),
            create_parent_dirs: default_create_parent_dirs(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: LogFormat::default(), filter: default_filter() }
    }
}

fn default_path() -> PathBuf { PathBuf::from("data/products.json") }
fn default_indent() -> String { "\t".to_string() }
fn default_create_parent_dirs() -> bool { true }
fn default_filter() -> String { "info".to_string() }

/// Load from `CATALOG_CONFIG` (default `catalog.toml`). A missing file yields defaults.
pub fn load_default() -> Result<CatalogConfig> {
    dotenvy::dotenv().ok();
    let path = std::env::var("CATALOG_CONFIG").unwrap_or_else(|_| "catalog.toml".to_string());
    if !std::path::Path::new(&path).exists() {
        return Ok(CatalogConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<CatalogConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<CatalogConfig> {
    let cfg: CatalogConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl CatalogConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.storage.normalize_from_env();
        self.storage.validate()?;
        self.logging.normalize();
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(path) = std::env::var("CATALOG_PATH") {
            if !path.trim().is_empty() {
                self.path = PathBuf::from(path);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(anyhow!("storage.path is empty; set it in catalog.toml or CATALOG_PATH"));
        }
        if self.path.is_dir() {
            return Err(anyhow!("storage.path {} is a directory", self.path.display()));
        }
        if !self.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(anyhow!("storage.indent may only contain spaces and tabs"));
        }
        Ok(())
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.filter.trim().is_empty() {
            self.filter = default_filter();
        }
    }
}
