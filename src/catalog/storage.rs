use super::types::Catalog;
use super::CatalogError;
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;
use tokio::sync::Mutex;

/// Global mutex for catalog file access
static CATALOG_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn get_lock() -> &'static Mutex<()> {
    CATALOG_LOCK.get_or_init(|| Mutex::new(()))
}

/// Read the catalog from disk
pub async fn read_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::NotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path).await?;
    let catalog: Catalog = serde_json::from_str(&content)?;
    Ok(catalog)
}

/// Write the catalog to disk with locking and atomic write
pub async fn write_catalog(path: &Path, catalog: &Catalog) -> Result<(), CatalogError> {
    let _guard = get_lock().lock().await;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    // Write atomically using temp file + rename
    let temp_path = path.with_extension("json.tmp");
    let mut content = serde_json::to_string_pretty(catalog)?;
    content.push('\n');
    fs::write(&temp_path, &content).await?;
    fs::rename(&temp_path, path).await?;

    Ok(())
}
