//! Content Aggregator
//!
//! Turns crawl fragments or a directory walk into the final document.

pub mod document;
pub mod language;

pub use document::{render_directory, render_web};
pub use language::fence_language;
