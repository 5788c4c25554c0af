//! Document model

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;

lazy_static! {
    /// A level-1 ATX heading at the start of a line
    static ref H1_RE: Regex = Regex::new(r"(?m)^#\s+(.+)$").unwrap();
}

/// A markdown document loaded from a content category
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Category directory name
    pub category: String,

    /// File stem; `index` for a category landing document
    pub slug: String,

    /// Title from the first level-1 heading, or the slug
    pub title: String,

    /// Raw markdown text
    pub raw: String,

    /// Full source file path
    pub source: PathBuf,
}

impl Document {
    /// Build a document from its raw text
    pub fn new(category: &str, slug: &str, raw: String, source: PathBuf) -> Self {
        Self {
            category: category.to_string(),
            slug: slug.to_string(),
            title: derive_title(&raw, slug),
            raw,
            source,
        }
    }
}

/// Derive a page title from markdown text.
///
/// The first level-1 heading wins; without one the slug is used verbatim.
pub fn derive_title(text: &str, slug: &str) -> String {
    H1_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end().to_string())
        .unwrap_or_else(|| slug.to_string())
}
