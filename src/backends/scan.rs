//! Text file scanning backend
//!
//! Uses the ignore crate for traversal (respecting .gitignore) and reports
//! size, mtime, content hash and word/char counts for each text file.

use anyhow::{bail, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::core::model::{Meta, ResultItem, ResultSet};
use crate::core::paths::{display_name, has_extension, resolve};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::{get_file_size, get_mtime_ms, hash_bytes, text_counts};

/// Extensions treated as text files when none are given
pub const DEFAULT_EXTENSIONS: &[&str] = &["txt"];

/// Which files a scan should visit
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Limit scanning to a subdirectory under root
    pub scope: Option<PathBuf>,
    /// Include hidden files and directories
    pub hidden: bool,
    /// Respect .gitignore and friends
    pub ignore: bool,
    /// File extensions to keep, without the dot
    pub extensions: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            scope: None,
            hidden: false,
            ignore: true,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Collect matching text files under root, sorted by path
pub fn scan_text_files(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    let scan_path = match &options.scope {
        Some(scope) => resolve(root, scope),
        None => root.to_path_buf(),
    };
    if !scan_path.is_dir() {
        bail!("scan path is not a directory: {}", scan_path.display());
    }

    let mut builder = WalkBuilder::new(&scan_path);
    builder
        .hidden(!options.hidden)
        .git_ignore(options.ignore)
        .git_global(options.ignore)
        .git_exclude(options.ignore)
        .ignore(options.ignore)
        .require_git(false);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                log::warn!("skipping unreadable entry: {}", err);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        if !has_extension(path, &options.extensions) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    log::debug!("scan found {} text file(s) under {}", files.len(), scan_path.display());
    Ok(files)
}

/// Build the result item for one file
fn describe_file(path: &Path, root: &Path) -> ResultItem {
    let mut meta = Meta::default();
    if let Ok(size) = get_file_size(path) {
        meta.size = Some(size);
    }
    if let Ok(mtime) = get_mtime_ms(path) {
        meta.mtime_ms = Some(mtime);
    }
    match std::fs::read(path) {
        Ok(bytes) => {
            meta.hash = Some(hash_bytes(&bytes));
            let (words, chars) = text_counts(&String::from_utf8_lossy(&bytes));
            meta.words = Some(words);
            meta.chars = Some(chars);
        }
        Err(err) => log::warn!("cannot read {}: {}", path.display(), err),
    }

    ResultItem::file(display_name(path, root)).with_meta(meta)
}

/// List text files with their metadata
pub fn list_files(root: &Path, options: &ScanOptions) -> Result<ResultSet> {
    let files = scan_text_files(root, options)?;

    #[cfg(feature = "parallel")]
    let items: Vec<ResultItem> = {
        use rayon::prelude::*;
        files.par_iter().map(|p| describe_file(p, root)).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let items: Vec<ResultItem> = files.iter().map(|p| describe_file(p, root)).collect();

    let mut result_set: ResultSet = items.into_iter().collect();
    result_set.sort();
    Ok(result_set)
}

/// Run the list command
pub fn run_list(root: &Path, options: &ScanOptions, config: RenderConfig) -> Result<()> {
    let result_set = list_files(root, options)?;
    Renderer::with_config(config).render_to(&result_set, std::io::stdout().lock())?;
    Ok(())
}
