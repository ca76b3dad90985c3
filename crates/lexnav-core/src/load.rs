//! One-shot document loading from disk or over HTTP.
//!
//! A load either yields a complete [`Document`] or a [`LoadError`]; there is
//! no retry and nothing is built from a partially parsed payload.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::{Document, LoadError};

/// Where a statute document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Path(PathBuf),
    Url(String),
}

impl DocumentSource {
    /// Interpret a CLI argument: `http://` and `https://` are URLs, anything
    /// else is a file path.
    pub fn parse(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            Self::Url(arg.to_string())
        } else {
            Self::Path(PathBuf::from(arg))
        }
    }

    pub async fn load(&self) -> Result<Document, LoadError> {
        match self {
            Self::Path(path) => Document::load_path(path).await,
            #[cfg(feature = "http")]
            Self::Url(url) => fetch_document(url).await,
            #[cfg(not(feature = "http"))]
            Self::Url(url) => Err(LoadError::Other(format!(
                "cannot fetch {url}: built without the `http` feature"
            ))),
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

impl Document {
    /// Parse a document from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let doc: Document = serde_json::from_str(json)?;
        doc.report_integrity();
        Ok(doc)
    }

    pub fn from_json_slice(json: &[u8]) -> Result<Self, LoadError> {
        let doc: Document = serde_json::from_slice(json)?;
        doc.report_integrity();
        Ok(doc)
    }

    /// Read and parse a document file.
    pub async fn load_path(path: &Path) -> Result<Self, LoadError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::from_json_slice(&bytes)?;
        let stats = doc.stats();
        info!(
            path = %path.display(),
            acts = stats.acts,
            sections = stats.sections,
            "loaded statute document"
        );
        Ok(doc)
    }

    /// Log structural problems that navigation will treat as silent misses.
    fn report_integrity(&self) {
        for dangling in self.dangling_quick_references() {
            warn!(
                act_id = %dangling.act_id,
                section = %dangling.section,
                "quick reference entry does not resolve to a section"
            );
        }
        for id in self.duplicate_section_ids() {
            warn!(section_id = %id, "duplicate section id");
        }
    }
}

/// Fetch a document once from `url`. Non-success statuses are errors.
#[cfg(feature = "http")]
pub async fn fetch_document(url: &str) -> Result<Document, LoadError> {
    info!(url = %url, "fetching statute document");
    let resp = reqwest::get(url).await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(LoadError::Server {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = resp.bytes().await?;
    let doc = Document::from_json_slice(&bytes)?;
    let stats = doc.stats();
    info!(acts = stats.acts, sections = stats.sections, "fetched statute document");
    Ok(doc)
}
