//! Append-only JSON array files for form submissions

use discounts_common::{Result, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::json_file::{read_json, write_json_atomic};

/// A JSON array file that only ever grows by one record at a time.
///
/// The file does not exist until the first append. Appends through the same
/// `Ledger` are serialised, and each rewrite replaces the file atomically.
#[derive(Debug)]
pub struct Ledger<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Ledger<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in append order; an absent file is an empty ledger
    pub async fn load(&self) -> Result<Vec<T>> {
        match read_json(&self.path).await {
            Ok(records) => Ok(records),
            Err(StoreError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Append one record and return the new number of records
    pub async fn append(&self, record: &T) -> Result<usize> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load_raw().await?;
        let value =
            serde_json::to_value(record).map_err(|e| StoreError::parse(&self.path, e))?;
        records.push(value);

        write_json_atomic(&self.path, &records).await?;

        info!(
            "Appended record {} to ledger {}",
            records.len(),
            self.path.display()
        );
        Ok(records.len())
    }

    /// Existing entries as opaque values, so they are rewritten untouched
    async fn load_raw(&self) -> Result<Vec<Value>> {
        let document: Value = match read_json(&self.path).await {
            Ok(document) => document,
            Err(StoreError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                debug!("Starting new ledger at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        match document {
            Value::Array(records) => Ok(records),
            _ => Err(StoreError::NotAnArray {
                path: self.path.clone(),
            }),
        }
    }
}
