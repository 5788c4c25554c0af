//! URL helper functions

use crate::config::SiteConfig;

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/game-developers/") // -> "/docs/game-developers/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    if is_external(path) {
        return path.to_string();
    }

    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Request path relative to the site root, starting with `/`.
///
/// Returns `None` when the path lies outside the root.
pub fn strip_root<'a>(config: &SiteConfig, path: &'a str) -> Option<&'a str> {
    let root = config.root.trim_end_matches('/');
    let rest = path.strip_prefix(root)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Whether a link points off-site
pub fn is_external(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//")
}

/// Normalize a request or nav path for comparison: leading slash, no trailing slash
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            root: "/docs/".to_string(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/quick-start"), "/docs/quick-start");
        assert_eq!(url_for(&config, "game-developers/"), "/docs/game-developers/");
        assert_eq!(url_for(&config, "/"), "/docs/");
        assert_eq!(url_for(&SiteConfig::default(), "/faq"), "/faq");
    }

    #[test]
    fn test_strip_root() {
        let config = test_config();
        assert_eq!(strip_root(&config, "/docs/css/docs.css"), Some("/css/docs.css"));
        assert_eq!(strip_root(&config, "/docs"), Some("/"));
        assert_eq!(strip_root(&config, "/docs/"), Some("/"));
        assert_eq!(strip_root(&config, "/docsite/faq"), None);
        assert_eq!(strip_root(&config, "/css/docs.css"), None);

        let config = SiteConfig::default();
        assert_eq!(strip_root(&config, "/css/docs.css"), Some("/css/docs.css"));
    }

    #[test]
    fn test_external_links_are_untouched() {
        let config = test_config();
        assert_eq!(
            url_for(&config, "https://ezlinks.dev"),
            "https://ezlinks.dev"
        );
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/game-developers/onboarding/"), "/game-developers/onboarding");
        assert_eq!(normalize_path("faq"), "/faq");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
    }
}
