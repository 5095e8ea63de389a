use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;

use crate::upload::validator::guess_media_type;

/// A file the user dropped or picked. Immutable once constructed; cloning is
/// cheap because the contents are reference-counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    name: String,
    media_type: String,
    contents: Bytes,
}

impl CandidateFile {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        contents: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            contents: contents.into(),
        }
    }

    /// Reads a file from disk. When `media_type` is `None` the declared type is
    /// guessed from the extension, the way a browser fills `File.type`.
    pub async fn from_path(path: &Path, media_type: Option<&str>) -> Result<Self> {
        let contents = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read '{}'", path.display()))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("'{}' has no file name", path.display()))?;

        let media_type = media_type
            .map(str::to_string)
            .unwrap_or_else(|| guess_media_type(&name).to_string());

        Ok(Self::new(name, media_type, contents))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared media type. May be empty when the platform could not tell.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn contents(&self) -> &Bytes {
        &self.contents
    }

    pub fn len(&self) -> u64 {
        self.contents.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Size in megabytes with two decimals, e.g. `"2.00 MB"`.
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.len() as f64 / 1024.0 / 1024.0)
    }
}
