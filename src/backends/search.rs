//! Keyword search over text files

use anyhow::{bail, Result};
use std::path::Path;

use crate::backends::scan::{scan_text_files, ScanOptions};
use crate::core::model::{Range, ResultItem, ResultSet};
use crate::core::paths::display_name;
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::truncate_string;

/// Longest excerpt emitted for a matching line
pub const MAX_EXCERPT_BYTES: usize = 512;

/// Find every line containing `keyword` (case-sensitive substring)
pub fn search_files(root: &Path, keyword: &str, options: &ScanOptions) -> Result<ResultSet> {
    if keyword.is_empty() {
        bail!("search keyword must not be empty");
    }

    let mut result_set = ResultSet::new();
    let mut matched_files = 0usize;

    for path in scan_text_files(root, options)? {
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("cannot read {}: {}", path.display(), err);
                continue;
            }
        };
        let content = String::from_utf8_lossy(&bytes);
        let relative = display_name(&path, root);

        let before = result_set.len();
        for (index, line) in content.lines().enumerate() {
            if !line.contains(keyword) {
                continue;
            }
            let line_no = (index + 1) as u32;
            let (excerpt, truncated) = truncate_string(line, MAX_EXCERPT_BYTES);
            let mut item =
                ResultItem::match_result(relative.clone(), Range::lines(line_no, line_no), excerpt);
            item.meta.truncated = truncated;
            result_set.push(item);
        }
        if result_set.len() > before {
            matched_files += 1;
        }
    }

    if result_set.is_empty() {
        log::info!("no files found with the keyword: {}", keyword);
    } else {
        log::debug!(
            "{} match(es) for '{}' in {} file(s)",
            result_set.len(),
            keyword,
            matched_files
        );
    }

    result_set.sort();
    Ok(result_set)
}

/// Run the search command
pub fn run_search(
    root: &Path,
    keyword: &str,
    options: &ScanOptions,
    config: RenderConfig,
) -> Result<()> {
    let result_set = search_files(root, keyword, options)?;
    Renderer::with_config(config).render_to(&result_set, std::io::stdout().lock())?;
    Ok(())
}
