//! Create a new document

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::locator::{document_file_name, INDEX_SLUG};
use crate::Docs;

/// Create `<content_dir>/<category>/<slug>.md` with a level-1 heading.
///
/// The slug defaults to the slugified title.
pub fn create_document(
    docs: &Docs,
    title: &str,
    category: &str,
    slug: Option<&str>,
) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from {:?}", title);
    }
    if slug == INDEX_SLUG {
        anyhow::bail!("'{}' is reserved for the category landing page", INDEX_SLUG);
    }

    let category_slug = slug::slugify(category);
    if category_slug != category {
        anyhow::bail!("Category must be a lowercase kebab-case name, got {:?}", category);
    }

    if !docs.config.categories.contains_key(category) {
        tracing::warn!(
            "Category '{}' is not listed in the site configuration; it will not be built",
            category
        );
    }

    let target_dir = docs.content_dir.join(category);
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(document_file_name(&slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, format!("# {}\n\n", title))?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}
