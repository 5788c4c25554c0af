//! Content module - locates, loads and renders markdown documents

mod document;
mod error;
pub mod loader;
pub mod locator;
mod markdown;

pub use document::{derive_title, Document};
pub use error::ContentError;
pub use loader::DocumentLoader;
pub use locator::ContentLocator;
pub use markdown::MarkdownRenderer;
