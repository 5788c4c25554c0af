//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Docs;

/// Remove the public directory
pub fn run(docs: &Docs) -> Result<()> {
    if docs.public_dir.exists() {
        fs::remove_dir_all(&docs.public_dir)?;
        tracing::info!("Deleted: {:?}", docs.public_dir);
    }

    Ok(())
}
