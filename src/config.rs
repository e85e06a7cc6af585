//! Resolved run configuration, built once in `main` and handed to each component.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Default document file name inside the plugin directory.
pub const DEFAULT_DOCUMENT: &str = "PLUGIN_SUMMARY.html";

/// Default extension of the source file that marks a folder as a plugin.
pub const DEFAULT_SOURCE_EXT: &str = "ts";

/// Folder names that are never plugins.
pub const EXCLUDED_DIRS: &[&str] = &["node_modules", "scripts"];

#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub document: PathBuf,
    pub source_ext: String,
    pub excluded_dirs: Vec<String>,
}

impl Config {
    /// Resolve `root` to an absolute directory and place the document inside it.
    pub fn new(root: &Path, document_name: &str, source_ext: &str) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::DirectoryNotFound(root.to_path_buf()));
        }
        let root = root
            .canonicalize()
            .map_err(|e| Error::io(root, e))?;
        let document = root.join(document_name);
        Ok(Config {
            root,
            document,
            source_ext: source_ext.trim_start_matches('.').to_string(),
            excluded_dirs: EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
        })
    }
}
