//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::generator::{BuildSummary, Generator};
use crate::Docs;

/// Generate the static site
pub fn run(docs: &Docs) -> Result<BuildSummary> {
    let start = Instant::now();

    let generator = Generator::new(docs)?;
    let summary = generator.generate()?;

    tracing::info!(
        "Generated {} pages and copied {} assets in {:.2}s",
        summary.pages,
        summary.assets,
        start.elapsed().as_secs_f64()
    );

    Ok(summary)
}

/// Watch for file changes and regenerate the whole site
pub fn watch(docs: &Docs) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(&docs.content_dir, notify::RecursiveMode::Recursive)?;

    if docs.static_dir.exists() {
        watcher.watch(&docs.static_dir, notify::RecursiveMode::Recursive)?;
    }

    let config_path = docs.base_dir.join(crate::CONFIG_FILE);
    if config_path.exists() {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                // Debounce: only rebuild if more than 500ms since last rebuild
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    // Reload so configuration edits take effect
                    if let Err(e) = Docs::new(&docs.base_dir).and_then(|docs| run(&docs)) {
                        tracing::error!("Generation failed: {:#}", e);
                    }
                    last_rebuild = Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}
