//! Sidebar and page-to-page navigation

use anyhow::Result;

use crate::config::{NavItem, NavSection, SiteConfig};
use crate::content::DocumentLoader;
use crate::helpers::{is_external, normalize_path, url_for};
use crate::templates::{PageLink, PageLinks, SidebarItem, SidebarSection};

use super::Route;

/// Sidebar sections shared by every page of a build
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    sections: Vec<NavSection>,
}

impl Navigation {
    /// Create from explicit sections
    pub fn new(sections: Vec<NavSection>) -> Self {
        Self { sections }
    }

    /// Use the configured sections, or derive one section per category
    pub fn from_config(config: &SiteConfig, loader: &DocumentLoader) -> Result<Self> {
        if !config.nav.is_empty() {
            return Ok(Self::new(config.nav.clone()));
        }

        let mut sections = Vec::with_capacity(config.categories.len());
        for (category, settings) in &config.categories {
            let index = loader.load_index(category)?;
            let section = settings.title.clone().unwrap_or(index.title);

            let mut items = vec![NavItem {
                title: "Overview".to_string(),
                href: Route::category(category).path(),
            }];
            for slug in loader.locator().slugs(category)? {
                let Some(doc) = loader.load(category, &slug)? else {
                    continue;
                };
                items.push(NavItem {
                    title: doc.title,
                    href: Route::document(category, &slug).path(),
                });
            }

            sections.push(NavSection { section, items });
        }

        Ok(Self::new(sections))
    }

    /// Sidebar with the current page marked active
    pub fn sidebar(&self, config: &SiteConfig, current: &str) -> Vec<SidebarSection> {
        let current = normalize_path(current);
        self.sections
            .iter()
            .map(|section| SidebarSection {
                section: section.section.clone(),
                items: section
                    .items
                    .iter()
                    .map(|item| SidebarItem {
                        title: item.title.clone(),
                        href: url_for(config, &item.href),
                        active: !is_external(&item.href) && normalize_path(&item.href) == current,
                    })
                    .collect(),
            })
            .collect()
    }

    /// Previous and next pages in sidebar order
    pub fn page_links(&self, config: &SiteConfig, current: &str) -> PageLinks {
        let current = normalize_path(current);
        let order: Vec<&NavItem> = self
            .sections
            .iter()
            .flat_map(|s| s.items.iter())
            .filter(|item| !is_external(&item.href))
            .collect();

        let Some(pos) = order
            .iter()
            .position(|item| normalize_path(&item.href) == current)
        else {
            return PageLinks::default();
        };

        let link = |item: &NavItem| PageLink {
            title: item.title.clone(),
            href: url_for(config, &item.href),
        };

        PageLinks {
            prev: pos.checked_sub(1).map(|i| link(order[i])),
            next: order.get(pos + 1).map(|&item| link(item)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn item(title: &str, href: &str) -> NavItem {
        NavItem {
            title: title.to_string(),
            href: href.to_string(),
        }
    }

    fn nav() -> Navigation {
        Navigation::new(vec![
            NavSection {
                section: "Get Started".to_string(),
                items: vec![item("Overview", "/"), item("Quick Start Guide", "/quick-start")],
            },
            NavSection {
                section: "Reference".to_string(),
                items: vec![
                    item("Status", "https://status.ezlinks.dev"),
                    item("SDK Reference", "/sdk"),
                ],
            },
        ])
    }

    #[test]
    fn test_sidebar_marks_active_item() {
        let config = SiteConfig::default();
        let sidebar = nav().sidebar(&config, "/quick-start/");
        assert!(!sidebar[0].items[0].active);
        assert!(sidebar[0].items[1].active);
        assert!(!sidebar[1].items[1].active);
    }

    #[test]
    fn test_sidebar_applies_root() {
        let config = SiteConfig {
            root: "/docs/".to_string(),
            ..SiteConfig::default()
        };
        let sidebar = nav().sidebar(&config, "/sdk");
        assert_eq!(sidebar[1].items[1].href, "/docs/sdk");
        assert_eq!(sidebar[1].items[0].href, "https://status.ezlinks.dev");
        assert!(sidebar[1].items[1].active);
    }

    #[test]
    fn test_page_links_cross_sections_and_skip_external() {
        let config = SiteConfig::default();
        let links = nav().page_links(&config, "/quick-start");
        assert_eq!(links.prev.unwrap().title, "Overview");
        assert_eq!(links.next.unwrap().title, "SDK Reference");

        let links = nav().page_links(&config, "/");
        assert!(links.prev.is_none());
        assert_eq!(links.next.unwrap().href, "/quick-start");

        let links = nav().page_links(&config, "/sdk");
        assert!(links.next.is_none());

        assert_eq!(nav().page_links(&config, "/elsewhere"), PageLinks::default());
    }

    #[test]
    fn test_derived_navigation() {
        let dir = TempDir::new().unwrap();
        let category = dir.path().join("game-developers");
        fs::create_dir_all(&category).unwrap();
        fs::write(category.join("index.md"), "# Guide\n").unwrap();
        fs::write(category.join("onboarding.md"), "# Onboarding\n").unwrap();
        fs::write(category.join("attribution.md"), "# Attribution\n").unwrap();

        let config = SiteConfig::default();
        let loader = DocumentLoader::new(dir.path());
        let nav = Navigation::from_config(&config, &loader).unwrap();

        let sidebar = nav.sidebar(&config, "/game-developers/onboarding/");
        assert_eq!(sidebar.len(), 1);
        assert_eq!(sidebar[0].section, "Game Developer Guide");
        let titles: Vec<_> = sidebar[0].items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Overview", "Attribution", "Onboarding"]);
        assert!(sidebar[0].items[2].active);
    }

    #[test]
    fn test_configured_navigation_wins() {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig {
            nav: vec![NavSection {
                section: "Guides".to_string(),
                items: vec![item("Examples", "/implementation-examples")],
            }],
            ..SiteConfig::default()
        };
        // No content on disk: configured nav must not touch the loader
        let loader = DocumentLoader::new(dir.path());
        let nav = Navigation::from_config(&config, &loader).unwrap();
        assert_eq!(nav.sidebar(&config, "/")[0].section, "Guides");
    }
}
