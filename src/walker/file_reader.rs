//! Per-file content policy
//!
//! Decides what a file contributes to the document, in priority order:
//! omitted type, decoded text, truncated text, unreadable marker.

use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::warn;

use crate::constants::walk::OMIT_CONTENT_EXTENSIONS;
use crate::types::{FileContent, FileDescriptor};

/// A file queued for reading after its directory level is rendered
#[derive(Debug, Clone)]
pub struct PendingFile {
    pub path: PathBuf,
    pub relative_path: String,
}

/// Lowercased extension with its leading dot, e.g. `.png`
pub fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
}

/// Whether the file's type is excluded from content capture
pub fn is_omitted_type(path: &Path) -> Option<String> {
    dotted_extension(path).filter(|ext| OMIT_CONTENT_EXTENSIONS.contains(&ext.as_str()))
}

/// Read one file and apply the content policy
pub async fn read_descriptor(file: PendingFile, max_file_size: usize) -> FileDescriptor {
    if let Some(extension) = is_omitted_type(&file.path) {
        return FileDescriptor::new(file.relative_path, FileContent::Omitted { extension });
    }

    let bytes = match read_bounded(&file.path, max_file_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Could not read {}: {}", file.relative_path, e);
            return FileDescriptor::new(file.relative_path, FileContent::Unreadable);
        }
    };

    let content = decode_content(bytes, max_file_size);
    match &content {
        FileContent::Truncated(_) => {
            warn!("File too large, content truncated: {}", file.relative_path)
        }
        FileContent::Unreadable => {
            warn!("Not valid UTF-8 (binary?), content skipped: {}", file.relative_path)
        }
        _ => {}
    }

    FileDescriptor::new(file.relative_path, content)
}

/// Read the file, stopping one byte past the ceiling
///
/// Anything beyond `max_file_size + 1` bytes can never reach the document,
/// so oversized files are only read far enough to prove they are oversized.
async fn read_bounded(path: &Path, max_file_size: usize) -> std::io::Result<Vec<u8>> {
    let file = tokio::fs::File::open(path).await?;
    let limit = max_file_size as u64 + 1;
    let len = file.metadata().await?.len();

    let mut bytes = Vec::with_capacity(len.min(limit) as usize);
    file.take(limit).read_to_end(&mut bytes).await?;
    Ok(bytes)
}

/// Decode raw bytes, truncating text beyond `max_file_size` bytes to its
/// first `max_file_size / 2` bytes, cut back to a character boundary
///
/// `bytes` longer than the ceiling may be a prefix of the file, so a
/// multibyte character split at the very end is tolerated there.
pub fn decode_content(bytes: Vec<u8>, max_file_size: usize) -> FileContent {
    if bytes.len() <= max_file_size {
        return match String::from_utf8(bytes) {
            Ok(text) => FileContent::Text(text),
            Err(_) => FileContent::Unreadable,
        };
    }

    let Some(text) = utf8_prefix(&bytes) else {
        return FileContent::Unreadable;
    };
    let cut = text.floor_char_boundary(max_file_size / 2);
    FileContent::Truncated(text[..cut].to_string())
}

/// Valid UTF-8 text of `bytes`, ignoring an incomplete trailing character
fn utf8_prefix(bytes: &[u8]) -> Option<&str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(e) if e.error_len().is_none() => std::str::from_utf8(&bytes[..e.valid_up_to()]).ok(),
        Err(_) => None,
    }
}
