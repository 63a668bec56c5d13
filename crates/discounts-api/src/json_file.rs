//! JSON file helpers shared by the catalog, FAQ and ledger stores

use discounts_common::{Result, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Read and parse a UTF-8 JSON file
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::io(path, e))?;

    serde_json::from_str(&content).map_err(|e| StoreError::parse(path, e))
}

/// Serialize `value` and replace `path` with it atomically.
///
/// The document is written to a temporary file in the destination directory
/// and renamed over `path`, so readers see either the old or the new file.
pub async fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value).map_err(|e| StoreError::parse(path, e))?;
    let path = path.to_path_buf();

    tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;

    let mut temp_file =
        tempfile::NamedTempFile::new_in(parent).map_err(|e| StoreError::io(parent, e))?;

    temp_file
        .write_all(bytes)
        .map_err(|e| StoreError::io(temp_file.path(), e))?;
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| StoreError::io(temp_file.path(), e))?;

    temp_file
        .persist(path)
        .map_err(|e| StoreError::io(path, e.error))?;

    Ok(())
}
