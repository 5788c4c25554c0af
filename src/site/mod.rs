//! Site module - binds routes to documents and renders them into the page shell

mod navigation;

pub use navigation::Navigation;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tera::Context;

use crate::config::SiteConfig;
use crate::content::{ContentError, Document, DocumentLoader, MarkdownRenderer};
use crate::helpers::{strip_root, url_for};
use crate::templates::{PageData, SiteData, TemplateRenderer};

/// A page of the generated site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`, rendered from `index.md` at the content root when present
    Home,
    /// `/<category>/`, always rendered from the category's `index.md`
    Category { category: String },
    /// `/<category>/<slug>/`
    Document { category: String, slug: String },
}

impl Route {
    pub fn category(category: &str) -> Self {
        Route::Category {
            category: category.to_string(),
        }
    }

    pub fn document(category: &str, slug: &str) -> Self {
        Route::Document {
            category: category.to_string(),
            slug: slug.to_string(),
        }
    }

    /// URL path relative to the site root
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Category { category } => format!("/{}/", category),
            Route::Document { category, slug } => format!("/{}/{}/", category, slug),
        }
    }

    /// Output file relative to the public directory
    pub fn output_file(&self) -> PathBuf {
        let mut file = PathBuf::new();
        match self {
            Route::Home => {}
            Route::Category { category } => file.push(category),
            Route::Document { category, slug } => {
                file.push(category);
                file.push(slug);
            }
        }
        file.push("index.html");
        file
    }
}

/// A route rendered into a full HTML document
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub route: Route,
    /// Title with the site name suffix
    pub title: String,
    pub html: String,
}

/// The documentation site: content, markdown rendering and page layout
pub struct Site {
    config: SiteConfig,
    loader: DocumentLoader,
    markdown: MarkdownRenderer,
    templates: TemplateRenderer,
}

impl Site {
    /// Create a site reading content from `content_dir`
    pub fn new<P: AsRef<Path>>(config: SiteConfig, content_dir: P) -> Result<Self> {
        let markdown = MarkdownRenderer::with_options(&config.highlight);
        let templates = TemplateRenderer::new()?;

        Ok(Self {
            loader: DocumentLoader::new(content_dir),
            config,
            markdown,
            templates,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn loader(&self) -> &DocumentLoader {
        &self.loader
    }

    /// Sidebar for the current state of the content directory
    pub fn navigation(&self) -> Result<Navigation> {
        Navigation::from_config(&self.config, &self.loader)
    }

    /// Every static route of the site.
    ///
    /// Fails when a configured category directory is missing.
    pub fn routes(&self) -> Result<Vec<Route>> {
        let mut routes = Vec::new();

        if self.loader.load_home()?.is_some() {
            routes.push(Route::Home);
        }

        for category in self.config.categories.keys() {
            routes.push(Route::category(category));
            for slug in self.loader.locator().slugs(category)? {
                routes.push(Route::document(category, &slug));
            }
        }

        Ok(routes)
    }

    /// Map a request path to a route of a configured category.
    ///
    /// The path may carry the site root prefix and a trailing `index.html`.
    pub fn resolve(&self, path: &str) -> Option<Route> {
        let rest = strip_root(&self.config, path)?;
        let mut segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        if segments.last() == Some(&"index.html") {
            segments.pop();
        }

        match segments.as_slice() {
            [] => Some(Route::Home),
            [category] if self.config.categories.contains_key(*category) => {
                Some(Route::category(category))
            }
            [category, slug] if self.config.categories.contains_key(*category) => {
                Some(Route::document(category, slug))
            }
            _ => None,
        }
    }

    /// Load the document behind a route.
    ///
    /// A category root without `index.md` is an error, not a missing page.
    pub fn load(&self, route: &Route) -> Result<Option<Document>, ContentError> {
        match route {
            Route::Home => self.loader.load_home(),
            Route::Category { category } => self.loader.load_index(category).map(Some),
            Route::Document { category, slug } => self.loader.load(category, slug),
        }
    }

    /// Render a route. `Ok(None)` means no document backs it.
    pub fn render(&self, route: &Route, nav: &Navigation) -> Result<Option<RenderedPage>> {
        let Some(doc) = self.load(route)? else {
            return Ok(None);
        };

        let title = self.document_title(route, &doc);
        let description = match route {
            Route::Home => self.config.description.clone(),
            Route::Category { category } => self
                .config
                .categories
                .get(category)
                .map(|c| c.description.clone())
                .unwrap_or_default(),
            Route::Document { .. } => String::new(),
        };

        let full_title = self.page_title(route, &doc);
        let html = self.render_document(route, &doc, &title, &full_title, &description, nav)?;
        tracing::debug!("Rendered {} from {:?}", route.path(), doc.source);

        Ok(Some(RenderedPage {
            route: route.clone(),
            title: full_title,
            html,
        }))
    }

    /// Title of a route's page, without the site name.
    ///
    /// Category roots prefer the configured category title.
    pub fn document_title(&self, route: &Route, doc: &Document) -> String {
        if let Route::Category { category } = route {
            if let Some(title) = self
                .config
                .categories
                .get(category)
                .and_then(|c| c.title.clone())
            {
                return title;
            }
        }
        doc.title.clone()
    }

    /// Title of a route's page with the site name.
    ///
    /// The site root carries the site name and description instead.
    pub fn page_title(&self, route: &Route, doc: &Document) -> String {
        match route {
            Route::Home => self.config.home_title(),
            _ => self.config.page_title(&self.document_title(route, doc)),
        }
    }

    /// Render a request path, `Ok(None)` when it names no document
    pub fn render_path(&self, path: &str, nav: &Navigation) -> Result<Option<RenderedPage>> {
        match self.resolve(path) {
            Some(route) => self.render(&route, nav),
            None => Ok(None),
        }
    }

    /// Render the not-found page for a request path
    pub fn render_not_found(&self, path: &str, nav: &Navigation) -> Result<String> {
        let page = PageData {
            title: "Not Found".to_string(),
            full_title: self.config.page_title("Not Found"),
            description: String::new(),
            path: path.to_string(),
            content: String::new(),
        };
        self.render_template("404.html", page, path, nav)
    }

    fn render_document(
        &self,
        route: &Route,
        doc: &Document,
        title: &str,
        full_title: &str,
        description: &str,
        nav: &Navigation,
    ) -> Result<String> {
        let path = route.path();
        let page = PageData {
            title: title.to_string(),
            full_title: full_title.to_string(),
            description: description.to_string(),
            path: url_for(&self.config, &path),
            content: self.markdown.render(&doc.raw),
        };
        self.render_template("page.html", page, &path, nav)
    }

    fn render_template(
        &self,
        template: &str,
        page: PageData,
        current: &str,
        nav: &Navigation,
    ) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", &self.site_data());
        context.insert("page", &page);
        context.insert("sidebar", &nav.sidebar(&self.config, current));
        context.insert("page_links", &nav.page_links(&self.config, current));
        self.templates.render(template, &context)
    }

    fn site_data(&self) -> SiteData {
        SiteData {
            title: self.config.title.clone(),
            description: self.config.description.clone(),
            language: self.config.language.clone(),
            home: url_for(&self.config, "/"),
            stylesheets: self
                .config
                .stylesheets
                .iter()
                .map(|href| url_for(&self.config, href))
                .collect(),
        }
    }
}
