//! Initialize a new documentation site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# Site
title: EZLinks
description: Deep links made simple.
language: en

# URL
root: /

# Directory
content_dir: content
public_dir: public
static_dir: static

# Content
categories:
  game-developers:
    title: Game Developer Guide
    description: Mobile attribution and deep linking built for game developers

# Sidebar; leave empty to list every category and its documents
nav:
  - section: Get Started
    items:
      - title: Overview
        href: /game-developers/
  - section: Guides
    items:
      - title: Onboarding
        href: /game-developers/onboarding/

stylesheets:
  - css/docs.css

highlight:
  theme: InspiredGitHub
  copy_button: true
"#;

const INDEX_TEMPLATE: &str = r#"# Game Developer Guide

Ship deep links in minutes, not days.

- [Onboarding](/game-developers/onboarding/)
"#;

const ONBOARDING_TEMPLATE: &str = r#"# Onboarding

Install the SDK and initialize it when your game starts:

```ts
import { EZLinks } from "ezlinks";

EZLinks.init({ apiKey: "YOUR_API_KEY" });
```
"#;

const STYLESHEET_TEMPLATE: &str = r#".docs-container { display: flex; }
.sidebar { width: 16rem; }
.main-content { flex: 1; min-width: 0; }
.nav-item.active { font-weight: 600; }
.code-snippet { border: 1px solid #e1e4e8; border-radius: 12px; overflow: hidden; }
.code-snippet-header { display: flex; justify-content: space-between; padding: 8px 15px; }
"#;

/// Initialize a new site in the given directory.
///
/// Existing files are left untouched.
pub fn init_site(target_dir: &Path) -> Result<()> {
    let files = [
        (crate::CONFIG_FILE, CONFIG_TEMPLATE),
        ("content/game-developers/index.md", INDEX_TEMPLATE),
        ("content/game-developers/onboarding.md", ONBOARDING_TEMPLATE),
        ("static/css/docs.css", STYLESHEET_TEMPLATE),
    ];

    for (relative, content) in files {
        let path = target_dir.join(relative);
        if path.exists() {
            tracing::warn!("Keeping existing {:?}", path);
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        tracing::debug!("Created {:?}", path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Docs;
    use tempfile::TempDir;

    #[test]
    fn test_init_site_builds() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let docs = Docs::new(dir.path()).unwrap();
        assert_eq!(docs.config.nav.len(), 2);

        let summary = docs.generate().unwrap();
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.assets, 1);

        let html = fs::read_to_string(
            dir.path()
                .join("public/game-developers/onboarding/index.html"),
        )
        .unwrap();
        assert!(html.contains("<title>Onboarding - EZLinks</title>"));
        assert!(html.contains(r#"class="language-ts""#));
    }

    #[test]
    fn test_init_keeps_existing_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(crate::CONFIG_FILE), "title: Mine\n").unwrap();
        init_site(dir.path()).unwrap();
        let config = fs::read_to_string(dir.path().join(crate::CONFIG_FILE)).unwrap();
        assert_eq!(config, "title: Mine\n");
    }
}
