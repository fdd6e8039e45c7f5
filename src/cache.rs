//! Per-domain ontology cache.
//!
//! One pretty-printed JSON document per lower-cased domain. Reads treat any
//! problem as a miss and writes report errors for the caller to log; neither
//! ever decides the outcome of a request.
use crate::schema::Ontology;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub trait CacheStore {
    fn get(&self, domain: &str) -> Option<Ontology>;
    fn put(&self, domain: &str, ontology: &Ontology) -> Result<()>;
}

/// Directory-backed cache: `<root>/<key>.json`.
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, domain: &str) -> PathBuf {
        self.root.join(format!("{}.json", cache_key(domain)))
    }
}

impl CacheStore for FileCache {
    fn get(&self, domain: &str) -> Option<Ontology> {
        let path = self.path_for(domain);
        if !path.is_file() {
            return None;
        }
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read cached ontology, regenerating"
                );
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(ontology) => {
                tracing::info!(domain, path = %path.display(), "loading ontology from cache");
                Some(ontology)
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to parse cached ontology, regenerating"
                );
                None
            }
        }
    }

    fn put(&self, domain: &str, ontology: &Ontology) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("create cache dir {}", self.root.display()))?;
        let path = self.path_for(domain);
        let text = serde_json::to_string_pretty(ontology).context("serialize ontology")?;
        fs::write(&path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
        tracing::info!(domain, path = %path.display(), "wrote ontology to cache");
        Ok(())
    }
}

/// Cache that never hits and never stores.
pub struct DisabledCache;

impl CacheStore for DisabledCache {
    fn get(&self, _domain: &str) -> Option<Ontology> {
        None
    }

    fn put(&self, _domain: &str, _ontology: &Ontology) -> Result<()> {
        Ok(())
    }
}

/// Lower-cased domain with anything unsafe in a file name replaced by `_`.
///
/// The mapping is lossy: `a/b` and `a_b` share one entry, and the last
/// write wins.
pub fn cache_key(domain: &str) -> String {
    let key: String = domain
        .to_lowercase()
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || matches!(ch, ' ' | '-' | '_' | '.') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if key.is_empty() || key.chars().all(|ch| ch == '.') {
        return format!("_{key}");
    }
    key
}
