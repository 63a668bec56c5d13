//! Read-only FAQ list

use discounts_common::Result;
use serde_json::Value;
use std::path::PathBuf;

use crate::json_file::read_json;

#[derive(Debug, Clone)]
pub struct FaqStore {
    path: PathBuf,
}

impl FaqStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The FAQ file as published, entry by entry; a missing file is an error
    pub async fn load(&self) -> Result<Vec<Value>> {
        read_json(&self.path).await
    }
}
