use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    PlainText,
    Markup,
}

/// A loaded input document. Immutable once constructed; it is discarded after cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    kind: SourceKind,
    content: String,
    origin: Option<PathBuf>,
}

impl RawDocument {
    pub fn plain_text(content: impl Into<String>) -> Self {
        RawDocument {
            kind: SourceKind::PlainText,
            content: content.into(),
            origin: None,
        }
    }

    pub fn markup(content: impl Into<String>) -> Self {
        RawDocument {
            kind: SourceKind::Markup,
            content: content.into(),
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// The file the document was read from, if any. Pasted text has none.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}
