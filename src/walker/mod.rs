//! Filesystem Walker
//!
//! Recursive directory enumeration with gitignore filtering:
//! - Ignore predicate compiled once per root
//! - Tree rendering in enumeration order
//! - Concurrent per-level file reads with the content policy

pub mod file_reader;
pub mod gitignore;
pub mod tree;

pub use file_reader::{PendingFile, decode_content, read_descriptor};
pub use gitignore::GitIgnoreFilter;
pub use tree::{DirectoryWalker, WalkOutput};
