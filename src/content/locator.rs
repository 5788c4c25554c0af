//! Content locator - enumerates the slugs of a content category

use std::fs;
use std::path::{Path, PathBuf};

use super::ContentError;

/// Extension of content files
pub const MARKDOWN_EXT: &str = "md";

/// Reserved stem of a category's landing document
pub const INDEX_SLUG: &str = "index";

/// Lists the documents available in each category directory
#[derive(Debug, Clone)]
pub struct ContentLocator {
    content_dir: PathBuf,
}

impl ContentLocator {
    /// Create a locator rooted at the content directory
    pub fn new<P: AsRef<Path>>(content_dir: P) -> Self {
        Self {
            content_dir: content_dir.as_ref().to_path_buf(),
        }
    }

    /// Directory holding a category's markdown files
    pub fn category_dir(&self, category: &str) -> PathBuf {
        self.content_dir.join(category)
    }

    /// List the slugs of all markdown files in a category, excluding `index.md`.
    ///
    /// Slugs come back sorted so generated output is reproducible.
    pub fn slugs(&self, category: &str) -> Result<Vec<String>, ContentError> {
        let dir = self.category_dir(category);
        let entries = fs::read_dir(&dir).map_err(|source| ContentError::MissingCategory {
            category: category.to_string(),
            path: dir.clone(),
            source,
        })?;

        let mut slugs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ContentError::Io {
                path: dir.clone(),
                source,
            })?;

            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }

            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                tracing::warn!("Skipping non UTF-8 file name in {:?}", dir);
                continue;
            };

            if let Some(slug) = slug_from_file_name(name) {
                slugs.push(slug.to_string());
            }
        }

        slugs.sort();
        tracing::debug!("Category '{}' has {} documents", category, slugs.len());
        Ok(slugs)
    }
}

/// Map a file name to its slug.
///
/// Returns `None` for non-markdown files, hidden files and the reserved
/// index document.
pub fn slug_from_file_name(file_name: &str) -> Option<&str> {
    let stem = file_name.strip_suffix(MARKDOWN_EXT)?.strip_suffix('.')?;
    if !is_valid_segment(stem) || stem == INDEX_SLUG {
        None
    } else {
        Some(stem)
    }
}

/// A single path segment that cannot escape its parent directory
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('.')
        && !segment.contains(['/', '\\', '\0'])
}

/// File name backing a slug
pub fn document_file_name(slug: &str) -> String {
    format!("{}.{}", slug, MARKDOWN_EXT)
}
