/// Pack discovery and loading from a directory of JSON/RON documents.

use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::validator::{PackDocumentError, ValidationError};
use crate::schema::pack::{CampaignPack, PackSummary};

#[derive(Debug, Error)]
pub enum PackError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid pack: {0}")]
    Validation(#[from] ValidationError),
    #[error("unsupported pack format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("pack not found: {0}")]
    NotFound(String),
}

impl From<PackDocumentError> for PackError {
    fn from(err: PackDocumentError) -> Self {
        match err {
            PackDocumentError::Validation(e) => PackError::Validation(e),
            PackDocumentError::Json(e) => PackError::Json(e),
        }
    }
}

/// Decode a pack file into an untyped document, choosing the format by
/// extension.
pub fn decode_document(path: &Path) -> Result<Value, PackError> {
    let contents = std::fs::read_to_string(path)?;
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => Ok(serde_json::from_str(&contents)?),
        Some("ron") => Ok(ron::from_str(&contents)?),
        _ => Err(PackError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// One candidate file found while scanning, with its decode outcome.
#[derive(Debug)]
pub struct PackEntry {
    pub path: PathBuf,
    pub summary: Result<PackSummary, PackError>,
}

/// A directory of campaign packs. Built via `PackLibrary::builder()`.
#[derive(Debug, Clone)]
pub struct PackLibrary {
    dir: PathBuf,
    extensions: Vec<String>,
}

/// Builder for constructing a `PackLibrary`.
#[derive(Debug, Clone)]
pub struct PackLibraryBuilder {
    dir: PathBuf,
    extensions: Vec<String>,
}

impl PackLibrary {
    pub fn builder() -> PackLibraryBuilder {
        PackLibraryBuilder {
            dir: PathBuf::from("packs"),
            extensions: vec!["json".to_string(), "ron".to_string()],
        }
    }

    /// Library over `dir` with the default extensions.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::builder().dir(dir).build()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every candidate document in the directory, sorted by path, each
    /// with its own decode result. Failing to read the directory itself is
    /// an error; failing to decode one document, or a document that is not
    /// an object (or whose `meta` is not an object), is not.
    pub fn scan(&self) -> Result<Vec<PackEntry>, PackError> {
        let mut entries = Vec::new();
        for path in self.candidate_paths()? {
            let summary = decode_document(&path).and_then(|doc| summarize(&doc, &path));
            if let Ok(ref s) = summary {
                tracing::debug!(path = %path.display(), pack = %s.id, "decoded pack");
            }
            entries.push(PackEntry { path, summary });
        }
        Ok(entries)
    }

    /// Summaries of all decodable documents, sorted case-insensitively by
    /// title. Documents that fail to decode or are not objects are skipped
    /// and logged.
    /// Listing does not validate.
    pub fn list_packs(&self) -> Result<Vec<PackSummary>, PackError> {
        let mut packs = Vec::new();
        for entry in self.scan()? {
            match entry.summary {
                Ok(summary) => packs.push(summary),
                Err(e) => {
                    tracing::warn!(path = %entry.path.display(), error = %e, "skipping pack");
                }
            }
        }
        packs.sort_by_cached_key(|p| p.title.to_lowercase());
        Ok(packs)
    }

    /// Load and validate the first document whose id matches `pack_id`.
    ///
    /// Undecodable documents are skipped while searching. A matching
    /// document that fails validation is reported, not skipped.
    pub fn load_pack(&self, pack_id: &str) -> Result<CampaignPack, PackError> {
        for path in self.candidate_paths()? {
            let document = match decode_document(&path) {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "skipping undecodable pack");
                    continue;
                }
            };
            match summarize(&document, &path) {
                Ok(summary) if summary.id == pack_id => {}
                Ok(_) => continue,
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "skipping malformed pack");
                    continue;
                }
            }
            let pack = CampaignPack::from_value(document)?;
            tracing::info!(pack = pack_id, path = %path.display(), "loaded pack");
            return Ok(pack);
        }
        Err(PackError::NotFound(pack_id.to_string()))
    }

    fn candidate_paths(&self) -> Result<Vec<PathBuf>, PackError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let matches = path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| self.extensions.iter().any(|e| e == ext));
            if matches {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

impl PackLibraryBuilder {
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Restrict discovery to these file extensions (without the dot).
    pub fn extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn build(self) -> PackLibrary {
        PackLibrary {
            dir: self.dir,
            extensions: self.extensions,
        }
    }
}

/// `meta.id` / `meta.title`, falling back to the file stem when absent
/// or empty. Documents that are not objects, or whose `meta` is present
/// but not an object, cannot be summarized.
fn summarize(document: &Value, path: &Path) -> Result<PackSummary, PackError> {
    let document = document.as_object().ok_or(ValidationError::NotAnObject)?;
    let meta = match document.get("meta") {
        None => None,
        Some(Value::Object(meta)) => Some(meta),
        Some(_) => {
            return Err(ValidationError::WrongType {
                context: "pack".to_string(),
                key: "meta".to_string(),
                expected: "an object",
            }
            .into())
        }
    };
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let field = |key: &str| {
        meta.and_then(|meta| meta.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| stem.clone())
    };
    Ok(PackSummary {
        id: field("id"),
        title: field("title"),
        path: path.to_path_buf(),
    })
}
