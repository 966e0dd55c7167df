use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::error::TintmarkResult;

const GALLERY_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp", "svg"];

/// Fixed set of named background images the user can pick from.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Gallery {
    entries: BTreeMap<String, PathBuf>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.entries.insert(name.into(), path.into());
    }

    pub fn resolve(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(PathBuf::as_path)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add `other`'s entries; on a name clash `other` wins.
    pub fn merge(&mut self, other: Gallery) {
        self.entries.extend(other.entries);
    }

    /// Rebase relative entries onto `root`.
    pub fn rooted_at(mut self, root: &Path) -> Self {
        for path in self.entries.values_mut() {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
        self
    }

    /// Every image file directly inside `dir`, named by file stem.
    pub fn from_dir(dir: &Path) -> TintmarkResult<Self> {
        let mut gallery = Self::new();
        let rd = std::fs::read_dir(dir)
            .with_context(|| format!("read gallery dir '{}'", dir.display()))?;
        for entry in rd {
            let entry = entry.with_context(|| format!("list gallery dir '{}'", dir.display()))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !GALLERY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            gallery.insert(stem.to_owned(), path.clone());
        }
        tracing::debug!(dir = %dir.display(), entries = gallery.len(), "scanned gallery");
        Ok(gallery)
    }
}
