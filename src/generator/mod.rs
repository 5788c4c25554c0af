//! Generator module - writes every route of the site as static HTML

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::site::Site;
use crate::Docs;

/// Name of the not-found page in the public directory
pub const NOT_FOUND_FILE: &str = "404.html";

/// Static site generator
pub struct Generator {
    site: Site,
    public_dir: PathBuf,
    static_dir: PathBuf,
}

/// Outcome of a build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Routes written as HTML pages
    pub pages: usize,
    /// Files copied from the static directory
    pub assets: usize,
}

impl Generator {
    /// Create a new generator
    pub fn new(docs: &Docs) -> Result<Self> {
        Ok(Self {
            site: docs.site()?,
            public_dir: docs.public_dir.clone(),
            static_dir: docs.static_dir.clone(),
        })
    }

    /// Generate the entire site
    pub fn generate(&self) -> Result<BuildSummary> {
        // Resolve everything that can fail on missing content before writing
        let nav = self.site.navigation()?;
        let routes = self.site.routes()?;

        fs::create_dir_all(&self.public_dir)
            .with_context(|| format!("Failed to create {:?}", self.public_dir))?;

        let assets = self.copy_static_assets()?;

        let mut pages = 0;
        for route in &routes {
            let Some(page) = self.site.render(route, &nav)? else {
                tracing::warn!("Skipping {}: document disappeared during build", route.path());
                continue;
            };

            let output_path = self.public_dir.join(route.output_file());
            write_file(&output_path, &page.html)?;
            tracing::debug!("Generated page: {:?}", output_path);
            pages += 1;
        }

        let not_found = self.site.render_not_found("/404.html", &nav)?;
        write_file(&self.public_dir.join(NOT_FOUND_FILE), &not_found)?;

        Ok(BuildSummary { pages, assets })
    }

    /// Copy files from the static directory into the public directory
    fn copy_static_assets(&self) -> Result<usize> {
        if !self.static_dir.exists() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(&self.static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(&self.static_dir)?;
            let dest = self.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest).with_context(|| format!("Failed to copy {:?}", path))?;
            copied += 1;
        }

        tracing::debug!("Copied {} static assets", copied);
        Ok(copied)
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))
}
