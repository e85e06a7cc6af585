//! Whole-file access to the summary document.
//!
//! The document is always read and written in full. Every write recomputes the
//! `共 N 个` count phrase from the headings actually present.

use crate::document::RE_HEADING;
use crate::error::{Error, Result};
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::debug;

static RE_COUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"共 \d+ 个").unwrap());

pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DocumentStore { path: path.into() }
    }

    pub fn read(&self) -> Result<String> {
        let text = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::DocumentMissing(self.path.clone()),
            _ => Error::io(&self.path, e),
        })?;
        debug!(path = %self.path.display(), bytes = text.len(), "read document");
        Ok(text)
    }

    /// Recount, then replace the file contents with `text`.
    pub fn write(&self, text: &str) -> Result<()> {
        let text = recount(text);
        fs::write(&self.path, &text).map_err(|e| Error::io(&self.path, e))?;
        debug!(
            path = %self.path.display(),
            bytes = text.len(),
            count = count(&text),
            "wrote document"
        );
        Ok(())
    }
}

/// Number of entry headings in `text`.
pub fn count(text: &str) -> usize {
    RE_HEADING.find_iter(text).count()
}

/// Rewrite every count phrase to the actual heading count.
pub fn recount(text: &str) -> String {
    let phrase = format!("共 {} 个", count(text));
    RE_COUNT.replace_all(text, phrase.as_str()).into_owned()
}
