//! Built-in documentation layout using the Tera template engine
//!
//! The page shell (header, mobile navigation, sidebar and page-to-page
//! navigation) is embedded in the binary.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::escape_html;

/// Template renderer with the embedded docs layout
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Rendered markdown is inserted verbatim; text fields go through
        // the `html` filter instead, which leaves URL slashes alone
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("docs/layout.html")),
            ("page.html", include_str!("docs/page.html")),
            ("404.html", include_str!("docs/404.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("docs/partials/header.html"),
            ),
            (
                "partials/mobile_nav.html",
                include_str!("docs/partials/mobile_nav.html"),
            ),
            (
                "partials/sidebar.html",
                include_str!("docs/partials/sidebar.html"),
            ),
            (
                "partials/page_nav.html",
                include_str!("docs/partials/page_nav.html"),
            ),
        ])?;

        tera.register_filter("html", html_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: escape text for HTML
fn html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("html", "value", String, value);
    Ok(tera::Value::String(escape_html(&s)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub home: String,
    pub stylesheets: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    pub title: String,
    pub full_title: String,
    pub description: String,
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarSection {
    pub section: String,
    pub items: Vec<SidebarItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarItem {
    pub title: String,
    pub href: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLink {
    pub title: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageLinks {
    pub prev: Option<PageLink>,
    pub next: Option<PageLink>,
}
