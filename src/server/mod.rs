//! Development server rendering pages on request, with live reload

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::helpers::strip_root;
use crate::site::Site;
use crate::Docs;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Server state
pub struct ServerState {
    site: RwLock<Arc<Site>>,
    static_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

impl ServerState {
    /// Create state serving the given site
    pub fn new(docs: &Docs, live_reload: bool) -> Result<Self> {
        let (reload_tx, _) = broadcast::channel::<()>(16);
        Ok(Self {
            site: RwLock::new(Arc::new(docs.site()?)),
            static_dir: docs.static_dir.clone(),
            reload_tx,
            live_reload,
        })
    }

    fn site(&self) -> Arc<Site> {
        match self.site.read() {
            Ok(site) => Arc::clone(&site),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Swap in a freshly loaded site and tell connected pages to reload
    fn reload(&self, docs: &Docs) -> Result<()> {
        let site = Arc::new(docs.site()?);
        match self.site.write() {
            Ok(mut current) => *current = site,
            Err(poisoned) => *poisoned.into_inner() = site,
        }
        let _ = self.reload_tx.send(());
        Ok(())
    }
}

/// Build the application router
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/__livereload", get(livereload_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the development server
pub async fn start(docs: &Docs, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let state = Arc::new(ServerState::new(docs, watch)?);
    let app = router(Arc::clone(&state));

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let docs = docs.clone();
        let state = Arc::clone(&state);

        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(docs, state) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch content, static files and configuration; reload the site on change
fn watch_and_reload(docs: Docs, state: Arc<ServerState>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Create debouncer to avoid multiple rapid reloads
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    let config_path = docs.base_dir.join(crate::CONFIG_FILE);
    for (path, mode) in [
        (&docs.content_dir, RecursiveMode::Recursive),
        (&docs.static_dir, RecursiveMode::Recursive),
        (&config_path, RecursiveMode::NonRecursive),
    ] {
        if path.exists() {
            debouncer.watcher().watch(path, mode)?;
            tracing::debug!("Watching: {:?}", path);
        }
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<_> = events
                    .iter()
                    .filter(|e| {
                        let path_str = e.path.to_string_lossy();
                        !path_str.contains(".git")
                            && !path_str.contains(".DS_Store")
                            && !path_str.ends_with('~')
                    })
                    .collect();

                if relevant.is_empty() {
                    continue;
                }

                for event in &relevant {
                    tracing::info!("File changed: {}", event.path.display());
                }

                // Reload configuration too, categories may have changed
                match Docs::new(&docs.base_dir).and_then(|docs| state.reload(&docs)) {
                    Ok(()) => tracing::info!("Reloaded site"),
                    Err(e) => tracing::error!("Reload failed: {:#}", e),
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Outcome of rendering a request path
enum PageOutcome {
    Page(String),
    /// No route matches; try static files
    NoRoute,
    /// A route matched but no document backs it
    Missing,
}

/// Render documentation routes, serve static files, answer 404 otherwise
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let path = request.uri().path().to_string();
    let site = state.site();

    let outcome = {
        let site = Arc::clone(&site);
        let path = path.clone();
        tokio::task::spawn_blocking(move || -> Result<PageOutcome> {
            if site.resolve(&path).is_none() {
                return Ok(PageOutcome::NoRoute);
            }
            let nav = site.navigation()?;
            Ok(match site.render_path(&path, &nav)? {
                Some(page) => PageOutcome::Page(page.html),
                None => PageOutcome::Missing,
            })
        })
        .await
    };

    match outcome {
        Ok(Ok(PageOutcome::Page(html))) => state.html_response(StatusCode::OK, html),
        Ok(Ok(PageOutcome::Missing)) => not_found(&state, &site, &path).await,
        Ok(Ok(PageOutcome::NoRoute)) => {
            let Some(request) = rebase_request(request, site.config()) else {
                return not_found(&state, &site, &path).await;
            };
            let mut service = ServeDir::new(&state.static_dir);
            match service.try_call(request).await {
                Ok(response) if response.status() != StatusCode::NOT_FOUND => {
                    response.into_response()
                }
                Ok(_) => not_found(&state, &site, &path).await,
                Err(e) => {
                    tracing::error!("Failed to serve {}: {}", path, e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
                }
            }
        }
        Ok(Err(e)) => {
            tracing::error!("Failed to render {}: {:#}", path, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
        Err(e) => {
            tracing::error!("Render task for {} failed: {}", path, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// Rewrite a request so its path is relative to the site root.
///
/// Static files live at `<root><file>`; `ServeDir` expects `/<file>`.
fn rebase_request(request: Request<Body>, config: &SiteConfig) -> Option<Request<Body>> {
    let (mut parts, body) = request.into_parts();
    let relative = strip_root(config, parts.uri.path())?;
    let uri = match parts.uri.query() {
        Some(query) => format!("{}?{}", relative, query),
        None => relative.to_string(),
    };
    parts.uri = uri.parse::<Uri>().ok()?;
    Some(Request::from_parts(parts, body))
}

/// The rendered not-found page with a 404 status
async fn not_found(state: &ServerState, site: &Arc<Site>, path: &str) -> Response {
    let site = Arc::clone(site);
    let path = path.to_string();
    let rendered = tokio::task::spawn_blocking(move || {
        let nav = site.navigation()?;
        site.render_not_found(&path, &nav)
    })
    .await;

    match rendered {
        Ok(Ok(html)) => state.html_response(StatusCode::NOT_FOUND, html),
        Ok(Err(e)) => {
            tracing::warn!("Failed to render not-found page: {:#}", e);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

impl ServerState {
    fn html_response(&self, status: StatusCode, html: String) -> Response {
        let html = if self.live_reload {
            inject_live_reload(&html)
        } else {
            html
        };
        (status, Html(html)).into_response()
    }
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replace("</body>", LIVE_RELOAD_SCRIPT)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn site_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let category = dir.path().join("content/game-developers");
        fs::create_dir_all(&category).unwrap();
        fs::write(category.join("index.md"), "# Game Developer Guide\n").unwrap();
        fs::write(category.join("onboarding.md"), "# Onboarding\n\nHello.\n").unwrap();
        fs::create_dir_all(dir.path().join("static/css")).unwrap();
        fs::write(dir.path().join("static/css/docs.css"), "body {}").unwrap();
        dir
    }

    fn app(dir: &TempDir, live_reload: bool) -> Router {
        let docs = Docs::new(dir.path()).unwrap();
        router(Arc::new(ServerState::new(&docs, live_reload).unwrap()))
    }

    async fn fetch(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&bytes).to_string())
    }

    #[tokio::test]
    async fn test_serves_document() {
        let dir = site_dir();
        let (status, body) = fetch(app(&dir, false), "/game-developers/onboarding").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Onboarding - EZLinks</title>"));
        assert!(body.contains("<p>Hello.</p>"));
        assert!(!body.contains("__livereload"));
    }

    #[tokio::test]
    async fn test_serves_category_root() {
        let dir = site_dir();
        let (status, body) = fetch(app(&dir, false), "/game-developers/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Game Developer Guide - EZLinks</title>"));
    }

    #[tokio::test]
    async fn test_missing_slug_is_404() {
        let dir = site_dir();
        let (status, body) = fetch(app(&dir, false), "/game-developers/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("<title>Not Found - EZLinks</title>"));

        let (status, _) = fetch(app(&dir, false), "/nowhere/at/all").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serves_static_files() {
        let dir = site_dir();
        let (status, body) = fetch(app(&dir, false), "/css/docs.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "body {}");
    }

    #[tokio::test]
    async fn test_static_files_under_site_root() {
        let dir = site_dir();
        fs::write(dir.path().join(crate::CONFIG_FILE), "root: /docs/\n").unwrap();

        let (status, body) = fetch(app(&dir, false), "/docs/game-developers/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"href="/docs/css/docs.css""#));

        let (status, body) = fetch(app(&dir, false), "/docs/css/docs.css?v=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "body {}");

        let (status, body) = fetch(app(&dir, false), "/css/docs.css").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("<title>Not Found - EZLinks</title>"));
    }

    #[tokio::test]
    async fn test_live_reload_injection() {
        let dir = site_dir();
        let (_, body) = fetch(app(&dir, true), "/game-developers/onboarding").await;
        assert!(body.contains("/__livereload"));
        assert!(body.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_inject_without_body_tag() {
        let html = inject_live_reload("<p>fragment</p>");
        assert!(html.starts_with("<p>fragment</p>"));
        assert!(html.contains("WebSocket"));
    }
}
