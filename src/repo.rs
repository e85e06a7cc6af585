//! Entry names from the plugin directory and from the document, and their diff.

use crate::config::Config;
use crate::document::RE_HEADING;
use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fs;
use tracing::trace;

/// Folders that start with this character are never plugins.
const RESERVED_PREFIX: char = '.';

/// Result of comparing the directory against the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// In the directory, absent from the document.
    pub missing: Vec<String>,
    /// In the document, absent from the directory.
    pub extra: Vec<String>,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// Plugin folders under `config.root`, sorted.
///
/// A folder qualifies when it is a directory, is not hidden or excluded, and
/// contains `<name>/<name>.<ext>`.
pub fn list_from_filesystem(config: &Config) -> Result<Vec<String>> {
    let entries = fs::read_dir(&config.root).map_err(|e| Error::io(&config.root, e))?;

    let mut names = BTreeSet::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !path.is_dir()
            || name.starts_with(RESERVED_PREFIX)
            || config.excluded_dirs.iter().any(|x| x == name)
        {
            trace!(name, "skipping directory entry");
            continue;
        }
        if !path.join(format!("{name}.{}", config.source_ext)).is_file() {
            trace!(name, "no same-named source file");
            continue;
        }
        names.insert(name.to_string());
    }
    Ok(names.into_iter().collect())
}

/// Entry names carried by heading anchors in `text`, sorted.
pub fn list_from_document(text: &str) -> Vec<String> {
    RE_HEADING
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// `missing = fs - doc`, `extra = doc - fs`, both sorted.
pub fn diff(fs_names: &[String], doc_names: &[String]) -> Diff {
    let fs: BTreeSet<&String> = fs_names.iter().collect();
    let doc: BTreeSet<&String> = doc_names.iter().collect();
    Diff {
        missing: fs.difference(&doc).map(|s| s.to_string()).collect(),
        extra: doc.difference(&fs).map(|s| s.to_string()).collect(),
    }
}
