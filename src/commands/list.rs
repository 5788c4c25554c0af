//! List site content

use anyhow::Result;
use serde::Serialize;

use crate::site::Route;
use crate::Docs;

/// A route with the title its page will carry
#[derive(Debug, Clone, Serialize)]
pub struct RouteEntry {
    pub path: String,
    pub title: String,
    pub source: String,
}

/// A category with its document count
#[derive(Debug, Clone, Serialize)]
pub struct CategoryEntry {
    pub name: String,
    pub path: String,
    pub documents: usize,
}

/// List site content by type
pub fn run(docs: &Docs, content_type: &str, json: bool) -> Result<()> {
    match content_type {
        "route" | "routes" => {
            let routes = collect_routes(docs)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&routes)?);
            } else {
                println!("Routes ({}):", routes.len());
                for route in routes {
                    println!("  {} - {} [{}]", route.path, route.title, route.source);
                }
            }
        }
        "category" | "categories" => {
            let categories = collect_categories(docs)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&categories)?);
            } else {
                println!("Categories ({}):", categories.len());
                for category in categories {
                    println!("  {} ({} documents)", category.path, category.documents);
                }
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: route, category",
                content_type
            );
        }
    }

    Ok(())
}

/// Every route with its page title and source file
pub fn collect_routes(docs: &Docs) -> Result<Vec<RouteEntry>> {
    let site = docs.site()?;
    let mut entries = Vec::new();

    for route in site.routes()? {
        let Some(doc) = site.load(&route)? else {
            continue;
        };

        let source = doc
            .source
            .strip_prefix(&docs.base_dir)
            .unwrap_or(&doc.source)
            .to_string_lossy()
            .to_string();

        entries.push(RouteEntry {
            path: route.path(),
            title: site.page_title(&route, &doc),
            source,
        });
    }

    Ok(entries)
}

/// Configured categories with their document counts
pub fn collect_categories(docs: &Docs) -> Result<Vec<CategoryEntry>> {
    let site = docs.site()?;
    let mut entries = Vec::new();

    for name in docs.config.categories.keys() {
        let documents = site.loader().locator().slugs(name)?.len();
        entries.push(CategoryEntry {
            name: name.clone(),
            path: Route::category(name).path(),
            documents,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_routes_and_categories() {
        let dir = TempDir::new().unwrap();
        let category = dir.path().join("content/game-developers");
        fs::create_dir_all(&category).unwrap();
        fs::write(category.join("index.md"), "# Guide\n").unwrap();
        fs::write(category.join("onboarding.md"), "no title\n").unwrap();

        let docs = Docs::new(dir.path()).unwrap();
        let routes = collect_routes(&docs).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].path, "/game-developers/");
        assert_eq!(routes[1].path, "/game-developers/onboarding/");
        assert_eq!(routes[1].title, "onboarding - EZLinks");
        assert!(routes[1].source.ends_with("onboarding.md"));

        let categories = collect_categories(&docs).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].documents, 1);
    }

    #[test]
    fn test_unknown_type() {
        let dir = TempDir::new().unwrap();
        let docs = Docs::new(dir.path()).unwrap();
        assert!(run(&docs, "tags", false).is_err());
    }
}
