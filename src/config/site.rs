//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    /// Site name, appended to every page title
    pub title: String,
    pub description: String,
    pub language: String,

    // URL
    pub root: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    pub static_dir: String,

    // Content
    /// Category directories under `content_dir`, in sidebar order
    pub categories: IndexMap<String, CategoryConfig>,

    /// Sidebar sections. Empty means one section per category.
    pub nav: Vec<NavSection>,

    /// Stylesheets linked from every page, relative to `root` unless absolute URLs
    pub stylesheets: Vec<String>,

    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut categories = IndexMap::new();
        categories.insert(
            "game-developers".to_string(),
            CategoryConfig {
                title: Some("Game Developer Guide".to_string()),
                description: "Mobile attribution and deep linking built for game developers"
                    .to_string(),
            },
        );

        Self {
            title: "EZLinks".to_string(),
            description: "Deep links made simple.".to_string(),
            language: "en".to_string(),

            root: "/".to_string(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            categories,
            nav: Vec::new(),
            stylesheets: vec!["css/docs.css".to_string()],

            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    /// Full page title for a document title
    pub fn page_title(&self, title: &str) -> String {
        format!("{} - {}", title, self.title)
    }

    /// Full title of the site root page: the site name and its tagline
    pub fn home_title(&self) -> String {
        if self.description.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.description)
        }
    }
}

/// Per-category settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Title of the category landing page; the index heading when unset
    pub title: Option<String>,
    pub description: String,
}

/// A titled group of sidebar links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavSection {
    pub section: String,
    #[serde(default)]
    pub items: Vec<NavItem>,
}

/// A sidebar link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub title: String,
    pub href: String,
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Name of a theme bundled with syntect
    pub theme: String,
    /// Emit a copy button carrying the raw snippet
    pub copy_button: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "InspiredGitHub".to_string(),
            copy_button: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "EZLinks");
        assert_eq!(config.content_dir, "content");
        assert!(config.categories.contains_key("game-developers"));
        assert!(config.nav.is_empty());
        assert_eq!(config.highlight.theme, "InspiredGitHub");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Acme Docs
root: /docs/
categories:
  sdk:
    title: SDK Reference
  game-developers: {}
nav:
  - section: Get Started
    items:
      - title: Overview
        href: /
      - title: Quick Start Guide
        href: /quick-start
highlight:
  theme: base16-ocean.dark
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Acme Docs");
        assert_eq!(config.root, "/docs/");
        let keys: Vec<_> = config.categories.keys().cloned().collect();
        assert_eq!(keys, vec!["sdk", "game-developers"]);
        assert_eq!(config.categories["game-developers"].title, None);
        assert_eq!(config.nav[0].items[1].href, "/quick-start");
        assert_eq!(config.highlight.theme, "base16-ocean.dark");
        assert!(config.highlight.copy_button);
        assert_eq!(config.public_dir, "public");
    }

    #[test]
    fn test_page_title() {
        let config = SiteConfig::default();
        assert_eq!(config.page_title("Onboarding"), "Onboarding - EZLinks");
        assert_eq!(config.home_title(), "EZLinks - Deep links made simple.");

        let config = SiteConfig {
            description: String::new(),
            ..SiteConfig::default()
        };
        assert_eq!(config.home_title(), "EZLinks");
    }
}
