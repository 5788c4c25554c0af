//! Document loader - resolves slugs to markdown files

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::locator::{document_file_name, is_valid_segment, INDEX_SLUG};
use super::{ContentError, ContentLocator, Document};

/// Loads documents from the content directory
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    locator: ContentLocator,
}

impl DocumentLoader {
    /// Create a loader rooted at the content directory
    pub fn new<P: AsRef<Path>>(content_dir: P) -> Self {
        Self {
            locator: ContentLocator::new(content_dir),
        }
    }

    /// The locator sharing this loader's content directory
    pub fn locator(&self) -> &ContentLocator {
        &self.locator
    }

    /// Expected path of a document
    pub fn document_path(&self, category: &str, slug: &str) -> PathBuf {
        self.locator
            .category_dir(category)
            .join(document_file_name(slug))
    }

    /// Load a document by slug.
    ///
    /// Returns `Ok(None)` when no file backs the slug, including slugs that
    /// are not a plain file stem.
    pub fn load(&self, category: &str, slug: &str) -> Result<Option<Document>, ContentError> {
        if !is_valid_segment(category) || !is_valid_segment(slug) || slug == INDEX_SLUG {
            return Ok(None);
        }
        self.read(category, slug)
    }

    /// Load the landing document of a category
    pub fn load_index(&self, category: &str) -> Result<Document, ContentError> {
        let missing = || ContentError::MissingIndex {
            category: category.to_string(),
            path: self.document_path(category, INDEX_SLUG),
        };
        if !is_valid_segment(category) {
            return Err(missing());
        }
        self.read(category, INDEX_SLUG)?.ok_or_else(missing)
    }

    /// Load `index.md` at the root of the content directory, if present
    pub fn load_home(&self) -> Result<Option<Document>, ContentError> {
        let path = self.locator.category_dir("").join(document_file_name(INDEX_SLUG));
        read_document(&path, "", INDEX_SLUG)
    }

    fn read(&self, category: &str, slug: &str) -> Result<Option<Document>, ContentError> {
        let path = self.document_path(category, slug);
        read_document(&path, category, slug)
    }
}

fn read_document(path: &Path, category: &str, slug: &str) -> Result<Option<Document>, ContentError> {
    if !path.is_file() {
        tracing::debug!("No document at {:?}", path);
        return Ok(None);
    }

    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(Document::new(category, slug, raw, path.to_path_buf()))),
        // Removed between the existence check and the read
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ContentError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let category = dir.path().join("game-developers");
        fs::create_dir_all(&category).unwrap();
        fs::write(
            category.join("index.md"),
            "# Game Developer Guide\n\nWelcome.\n",
        )
        .unwrap();
        fs::write(
            category.join("onboarding.md"),
            "# Onboarding\n\nInstall the SDK.\n",
        )
        .unwrap();
        fs::write(category.join("faq.md"), "No heading here.\n").unwrap();
        fs::write(category.join(".draft.md"), "# Draft\n").unwrap();
        dir
    }

    #[test]
    fn test_every_located_slug_loads() {
        let dir = fixture();
        let loader = DocumentLoader::new(dir.path());
        let slugs = loader.locator().slugs("game-developers").unwrap();
        assert_eq!(slugs, vec!["faq", "onboarding"]);

        for slug in &slugs {
            let doc = loader.load("game-developers", slug).unwrap().unwrap();
            assert!(!doc.raw.is_empty());
            assert_eq!(&doc.slug, slug);
        }
    }

    #[test]
    fn test_title_derivation_on_load() {
        let dir = fixture();
        let loader = DocumentLoader::new(dir.path());
        let doc = loader.load("game-developers", "onboarding").unwrap().unwrap();
        assert_eq!(doc.title, "Onboarding");
        let doc = loader.load("game-developers", "faq").unwrap().unwrap();
        assert_eq!(doc.title, "faq");
    }

    #[test]
    fn test_unknown_slugs_are_not_found() {
        let dir = fixture();
        let loader = DocumentLoader::new(dir.path());
        for slug in ["missing", "", "index", "../game-developers/onboarding", ".hidden"] {
            assert!(
                loader.load("game-developers", slug).unwrap().is_none(),
                "slug {:?} should not resolve",
                slug
            );
        }
        assert!(loader.load("no-such-category", "onboarding").unwrap().is_none());
        assert!(loader.load("..", "onboarding").unwrap().is_none());
    }

    #[test]
    fn test_load_index() {
        let dir = fixture();
        let loader = DocumentLoader::new(dir.path());
        let index = loader.load_index("game-developers").unwrap();
        assert_eq!(index.slug, "index");
        assert_eq!(index.title, "Game Developer Guide");

        let err = loader.load_index("indie-developers").unwrap_err();
        assert!(matches!(err, ContentError::MissingIndex { .. }));
    }

    #[test]
    fn test_load_home() {
        let dir = fixture();
        let loader = DocumentLoader::new(dir.path());
        assert!(loader.load_home().unwrap().is_none());

        fs::write(dir.path().join("index.md"), "# Overview\n").unwrap();
        let home = loader.load_home().unwrap().unwrap();
        assert_eq!(home.title, "Overview");
    }
}
