use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{MaccabyteError, Result};
use crate::parsing::{extract_prose_text, normalize};
use crate::types::{RawDocument, SourceKind};

/// What a command-line text argument refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Literal(String),
    File(PathBuf),
}

/// Extensions `load_document` knows how to read.
const DOCUMENT_EXTENSIONS: [&str; 2] = ["txt", "xml"];

/// An argument is a path when it names an existing file, ends in `.txt` or
/// `.xml` (any case, spaces allowed), or has no whitespace and ends in an
/// ASCII alphanumeric extension. Anything else is literal text.
pub fn resolve_source(arg: &str) -> Source {
    let path = Path::new(arg);
    if path.is_file() {
        return Source::File(path.to_path_buf());
    }
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
    let known = DOCUMENT_EXTENSIONS
        .iter()
        .any(|known| extension.eq_ignore_ascii_case(known));
    let looks_like_path = !arg.chars().any(char::is_whitespace)
        && !extension.is_empty()
        && extension.chars().all(|c| c.is_ascii_alphanumeric());
    if known || looks_like_path {
        Source::File(path.to_path_buf())
    } else {
        Source::Literal(arg.to_string())
    }
}

/// Reads a `.txt` file as plain text or a `.xml` file as markup.
pub fn load_document(path: &Path) -> Result<RawDocument> {
    if !path.exists() {
        return Err(MaccabyteError::FileNotFound(path.to_path_buf()));
    }
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let kind = match extension.as_str() {
        "txt" => SourceKind::PlainText,
        "xml" => SourceKind::Markup,
        _ => return Err(MaccabyteError::UnsupportedFormat(extension)),
    };

    let bytes = fs::read(path).map_err(|e| MaccabyteError::io(path, e))?;
    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), "input is not valid UTF-8; replacing invalid sequences");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    debug!(path = %path.display(), ?kind, bytes = content.len(), "loaded document");

    let document = match kind {
        SourceKind::PlainText => RawDocument::plain_text(content),
        SourceKind::Markup => RawDocument::markup(content),
    };
    Ok(document.with_origin(path))
}

pub fn read_source(arg: &str) -> Result<RawDocument> {
    match resolve_source(arg) {
        Source::Literal(text) => Ok(RawDocument::plain_text(text)),
        Source::File(path) => load_document(&path),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleaningOptions {
    pub clean: bool,
    pub strip_punctuation: bool,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        CleaningOptions {
            clean: true,
            strip_punctuation: true,
        }
    }
}

/// Turns a loaded document into the text handed to the engine: markup goes
/// through prose extraction, then everything is normalized unless cleaning is off.
pub fn prepare_text(document: &RawDocument, options: CleaningOptions) -> String {
    let text = match document.kind() {
        SourceKind::PlainText => document.content().to_string(),
        SourceKind::Markup => extract_prose_text(document.content()),
    };
    if options.clean {
        normalize(&text, options.strip_punctuation)
    } else {
        text
    }
}
