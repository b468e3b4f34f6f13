//! Recursive directory walk producing the tree rendering and file list.

use futures::future::{BoxFuture, join_all};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::file_reader::{PendingFile, read_descriptor};
use super::gitignore::GitIgnoreFilter;
use crate::config::WalkConfig;
use crate::constants::walk::GITIGNORE_FILE;
use crate::types::{DigestError, FileDescriptor, Result};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_PREFIX: &str = "|   ";
const SPACE_PREFIX: &str = "    ";

/// Accumulated walk result
#[derive(Debug, Clone, Default)]
pub struct WalkOutput {
    /// Tree lines in directory enumeration order (without the root line)
    pub tree: String,
    /// Descriptors in discovery order; the aggregator sorts them by path
    pub files: Vec<FileDescriptor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File,
}

struct Survivor {
    name: String,
    path: PathBuf,
    relative_path: String,
    kind: EntryKind,
}

/// Filesystem walker bound to one root
pub struct DirectoryWalker {
    root: PathBuf,
    filter: GitIgnoreFilter,
    include_dot_files: bool,
    max_file_size: usize,
}

impl DirectoryWalker {
    /// Validate `root` and compile its ignore rules.
    ///
    /// Fails with [`DigestError::InvalidRoot`] when `root` is not a readable
    /// directory; this is fatal for the run.
    pub async fn new<P: AsRef<Path>>(root: P, config: &WalkConfig) -> Result<Self> {
        let root = root.as_ref();
        let invalid = || DigestError::InvalidRoot {
            path: root.to_path_buf(),
        };

        let root = tokio::fs::canonicalize(root).await.map_err(|_| invalid())?;
        let metadata = tokio::fs::metadata(&root).await.map_err(|_| invalid())?;
        if !metadata.is_dir() {
            return Err(DigestError::InvalidRoot { path: root });
        }

        let filter = GitIgnoreFilter::compile(&root).await;

        Ok(Self {
            root,
            filter,
            include_dot_files: config.include_dot_files,
            max_file_size: config.max_file_size,
        })
    }

    /// Base name of the root, used as the tree's first line
    pub fn root_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    /// Walk the whole tree
    pub async fn walk(&self) -> WalkOutput {
        info!("Processing directory: {}", self.root.display());
        let mut output = WalkOutput::default();
        self.walk_dir(self.root.clone(), String::new(), 0, &mut output)
            .await;
        info!(
            "Walk finished: {} files captured under {}",
            output.files.len(),
            self.root.display()
        );
        output
    }

    fn walk_dir<'a>(
        &'a self,
        current: PathBuf,
        prefix: String,
        depth: usize,
        output: &'a mut WalkOutput,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let survivors = match self.list_survivors(&current).await {
                Ok(survivors) => survivors,
                Err(e) => {
                    error!(
                        "Skipping directory {} (level {}): {}",
                        current.display(),
                        depth,
                        e
                    );
                    return;
                }
            };

            let last_index = survivors.len().saturating_sub(1);
            let mut pending = Vec::new();

            for (index, entry) in survivors.into_iter().enumerate() {
                let is_last = index == last_index;
                let connector = if is_last { LAST_BRANCH } else { BRANCH };

                match entry.kind {
                    EntryKind::Dir => {
                        output
                            .tree
                            .push_str(&format!("{}{}**{}/**\n", prefix, connector, entry.name));
                        let child_prefix = format!(
                            "{}{}",
                            prefix,
                            if is_last { SPACE_PREFIX } else { PIPE_PREFIX }
                        );
                        self.walk_dir(entry.path, child_prefix, depth + 1, &mut *output)
                            .await;
                    }
                    EntryKind::File => {
                        output
                            .tree
                            .push_str(&format!("{}{}{}\n", prefix, connector, entry.name));
                        pending.push(PendingFile {
                            path: entry.path,
                            relative_path: entry.relative_path,
                        });
                    }
                }
            }

            let descriptors = join_all(
                pending
                    .into_iter()
                    .map(|file| read_descriptor(file, self.max_file_size)),
            )
            .await;
            output.files.extend(descriptors);
        })
    }

    /// List `dir` in enumeration order, keeping only entries that pass the
    /// dotfile and ignore rules and are regular files or directories.
    async fn list_survivors(&self, dir: &Path) -> std::io::Result<Vec<Survivor>> {
        let mut reader = tokio::fs::read_dir(dir).await?;
        let mut survivors = Vec::new();

        while let Some(entry) = reader.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.is_empty() {
                continue;
            }

            if name.starts_with('.') && !self.include_dot_files && name != GITIGNORE_FILE {
                continue;
            }

            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(e) => {
                    warn!("Cannot stat {}: {}", entry.path().display(), e);
                    continue;
                }
            };

            let kind = if file_type.is_dir() {
                EntryKind::Dir
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                debug!("Skipping non-regular entry {}", entry.path().display());
                continue;
            };

            let path = entry.path();
            let relative_path = self.relative_path(&path);
            if self.filter.is_ignored(&relative_path, kind == EntryKind::Dir) {
                continue;
            }

            survivors.push(Survivor {
                name,
                path,
                relative_path,
                kind,
            });
        }

        Ok(survivors)
    }

    fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}
