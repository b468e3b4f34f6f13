pub mod error;

pub use error::{DigestError, Result};

// =============================================================================
// Domain Types
// =============================================================================

use std::fmt;
use url::Url;

/// Marker appended after truncated file content
pub const TRUNCATION_MARKER: &str = "\n... [CONTENT TRUNCATED] ...";

/// Marker rendered for files with no content
pub const EMPTY_FILE_MARKER: &str = "[EMPTY FILE]";

/// A URL waiting in the crawl frontier
///
/// Created on discovery and consumed exactly once when dequeued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,
    pub depth: u32,
}

impl FrontierEntry {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }
}

/// Markdown extracted from one crawled page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFragment {
    pub url: Url,
    pub depth: u32,
    pub markdown: String,
}

/// What ends up inside a file's fenced block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// Full decoded text
    Text(String),
    /// Leading slice of an oversized file
    Truncated(String),
    /// Content never read because of the file type
    Omitted { extension: String },
    /// Bytes that are not valid text, or a failed read
    Unreadable,
}

/// A regular file that passed filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Root-relative path with `/` separators
    pub relative_path: String,
    pub content: FileContent,
}

impl FileDescriptor {
    pub fn new(relative_path: impl Into<String>, content: FileContent) -> Self {
        Self {
            relative_path: relative_path.into(),
            content,
        }
    }
}

impl fmt::Display for FileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.content {
            FileContent::Text(text) if text.is_empty() => f.write_str(EMPTY_FILE_MARKER),
            FileContent::Text(text) => f.write_str(text),
            FileContent::Truncated(head) => write!(f, "{}{}", head, TRUNCATION_MARKER),
            FileContent::Omitted { extension } => {
                write!(f, "[Content omitted (file type: {})]", extension)
            }
            FileContent::Unreadable => {
                write!(f, "[Unreadable or binary content: {}]", self.relative_path)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_rendering() {
        let omitted = FileDescriptor::new(
            "img/logo.png",
            FileContent::Omitted {
                extension: ".png".to_string(),
            },
        );
        assert_eq!(omitted.to_string(), "[Content omitted (file type: .png)]");

        let binary = FileDescriptor::new("blob.dat", FileContent::Unreadable);
        assert_eq!(binary.to_string(), "[Unreadable or binary content: blob.dat]");

        let empty = FileDescriptor::new("empty.txt", FileContent::Text(String::new()));
        assert_eq!(empty.to_string(), EMPTY_FILE_MARKER);
    }

    #[test]
    fn test_truncated_rendering_appends_marker() {
        let file = FileDescriptor::new("big.txt", FileContent::Truncated("abc".to_string()));
        assert_eq!(file.to_string(), format!("abc{}", TRUNCATION_MARKER));
    }
}
