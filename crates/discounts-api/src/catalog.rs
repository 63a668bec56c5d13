//! Read-only catalog of establishment discount files
//!
//! The catalog root holds one directory per category. Each establishment is
//! either a `<category>/<establishment>.json` file or a
//! `<category>/<establishment>/` directory of `.json` files. Regular files
//! directly under the root (ledgers, FAQs) are not part of the catalog.

use discounts_common::{
    CatalogFile, Category, Discount, DiscountSummary, Result, StoreError,
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::vec;
use tracing::debug;

use crate::json_file::read_json;

/// One catalog file found by the walker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub category: String,
    pub establishment: String,
    pub path: PathBuf,
}

/// Discovers catalog files under a root directory
#[derive(Debug, Clone)]
pub struct CatalogWalker {
    root: PathBuf,
}

impl CatalogWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Lazily walk the catalog, optionally restricted to one category.
    ///
    /// Every call starts a fresh walk. Entries come out in file-name order,
    /// category by category.
    pub fn files(&self, filter: Option<Category>) -> CatalogFiles {
        CatalogFiles {
            root: self.root.clone(),
            filter,
            categories: None,
            pending: Vec::new().into_iter(),
            finished: false,
        }
    }
}

/// Iterator returned by [`CatalogWalker::files`]. Stops after the first error.
#[derive(Debug)]
pub struct CatalogFiles {
    root: PathBuf,
    filter: Option<Category>,
    categories: Option<vec::IntoIter<(String, PathBuf)>>,
    pending: vec::IntoIter<CatalogEntry>,
    finished: bool,
}

impl CatalogFiles {
    fn category_dirs(&self) -> Result<Vec<(String, PathBuf)>> {
        if let Some(category) = self.filter {
            let dir = self.root.join(category.as_str());
            if dir.is_dir() {
                return Ok(vec![(category.as_str().to_string(), dir)]);
            }
            return Ok(Vec::new());
        }

        Ok(sorted_children(&self.root)?
            .into_iter()
            .filter(|path| path.is_dir())
            .filter_map(|path| file_name(&path).map(|name| (name, path)))
            .collect())
    }

    fn fail(&mut self, err: StoreError) -> Option<Result<CatalogEntry>> {
        self.finished = true;
        Some(Err(err))
    }
}

impl Iterator for CatalogFiles {
    type Item = Result<CatalogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            if let Some(entry) = self.pending.next() {
                return Some(Ok(entry));
            }

            if self.categories.is_none() {
                match self.category_dirs() {
                    Ok(dirs) => self.categories = Some(dirs.into_iter()),
                    Err(e) => return self.fail(e),
                }
            }

            let next_category = self.categories.as_mut().and_then(Iterator::next);
            match next_category {
                Some((category, dir)) => match establishment_files(&category, &dir) {
                    Ok(entries) => self.pending = entries.into_iter(),
                    Err(e) => return self.fail(e),
                },
                None => {
                    self.finished = true;
                    return None;
                }
            }
        }
    }
}

fn establishment_files(category: &str, dir: &Path) -> Result<Vec<CatalogEntry>> {
    let mut entries = Vec::new();

    for path in sorted_children(dir)? {
        if path.is_dir() {
            let Some(establishment) = file_name(&path) else {
                continue;
            };
            for file in sorted_children(&path)? {
                if is_json_file(&file) {
                    entries.push(CatalogEntry {
                        category: category.to_string(),
                        establishment: establishment.clone(),
                        path: file,
                    });
                }
            }
        } else if is_json_file(&path) {
            let Some(establishment) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            entries.push(CatalogEntry {
                category: category.to_string(),
                establishment: establishment.to_string(),
                path,
            });
        }
    }

    Ok(entries)
}

/// Children of `dir` sorted by name; a missing directory has none
fn sorted_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_dir = match std::fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StoreError::io(dir, e)),
    };

    let mut paths = read_dir
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| StoreError::io(dir, e))?;
    paths.sort();

    Ok(paths)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

fn is_json_file(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
}

/// Query side of the catalog
#[derive(Debug, Clone)]
pub struct CatalogStore {
    walker: CatalogWalker,
}

impl CatalogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            walker: CatalogWalker::new(root),
        }
    }

    /// Collect the walk on the blocking pool
    pub async fn entries(&self, filter: Option<Category>) -> Result<Vec<CatalogEntry>> {
        let walker = self.walker.clone();

        tokio::task::spawn_blocking(move || walker.files(filter).collect::<Result<Vec<_>>>())
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }

    /// Summaries of every discount in the selected categories.
    ///
    /// Any unreadable file fails the whole listing.
    pub async fn list(&self, filter: Option<Category>) -> Result<Vec<DiscountSummary>> {
        let mut summaries = Vec::new();

        for entry in self.entries(filter).await? {
            debug!(
                "Reading {}/{}: {}",
                entry.category,
                entry.establishment,
                entry.path.display()
            );
            let file: CatalogFile = read_json(&entry.path).await?;
            summaries.extend(file.discounts.iter().map(DiscountSummary::from));
        }

        Ok(summaries)
    }

    /// First discount with the given id, in walk order.
    ///
    /// Files after the match are not read; a failure in any file read before
    /// it fails the lookup.
    pub async fn find(&self, id: &str) -> Result<Option<Discount>> {
        for entry in self.entries(None).await? {
            debug!(
                "Searching {}/{}: {}",
                entry.category,
                entry.establishment,
                entry.path.display()
            );
            let file: CatalogFile = read_json(&entry.path).await?;
            if let Some(discount) = file.discounts.into_iter().find(|d| d.has_id(id)) {
                return Ok(Some(discount));
            }
        }

        Ok(None)
    }
}
