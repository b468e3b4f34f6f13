use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::constants::walk::{GITIGNORE_FILE, VCS_DIR};

/// Ignore predicate compiled once per traversal root.
///
/// Combines the root `.gitignore` (when present) with an implicit rule that
/// always excludes the `.git` directory.
pub struct GitIgnoreFilter {
    gitignore: Gitignore,
}

impl GitIgnoreFilter {
    /// Compile the filter for `root`.
    ///
    /// A missing rules file is not an error. Any other read failure is
    /// reported and the filter falls back to the implicit rule only.
    pub async fn compile<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        let gitignore_path = root.join(GITIGNORE_FILE);

        let rules = match tokio::fs::read_to_string(&gitignore_path).await {
            Ok(content) => {
                info!("Loaded {} from {}", GITIGNORE_FILE, root.display());
                Some(content)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(
                    "No {} in {}, using only the '{}' rule",
                    GITIGNORE_FILE,
                    root.display(),
                    VCS_DIR
                );
                None
            }
            Err(e) => {
                error!("Failed to read {}: {}", gitignore_path.display(), e);
                None
            }
        };

        Self::from_rules(root, rules.as_deref())
    }

    /// Build the filter from rule text already in memory.
    pub fn from_rules<P: AsRef<Path>>(root: P, rules: Option<&str>) -> Self {
        let root = root.as_ref();
        let mut builder = GitignoreBuilder::new(root);

        if let Err(e) = builder.add_line(None, VCS_DIR) {
            warn!("Failed to add implicit '{}' rule: {}", VCS_DIR, e);
        }

        if let Some(rules) = rules {
            let source = root.join(GITIGNORE_FILE);
            for line in rules.lines() {
                if let Err(e) = builder.add_line(Some(source.clone()), line) {
                    warn!("Skipping invalid ignore pattern {:?}: {}", line, e);
                }
            }
        }

        let gitignore = builder.build().unwrap_or_else(|e| {
            warn!("Failed to compile ignore rules: {}", e);
            Gitignore::empty()
        });

        Self { gitignore }
    }

    /// Whether the root-relative, slash-separated `path` is excluded.
    ///
    /// Paths below an ignored directory are ignored as well.
    pub fn is_ignored(&self, path: &str, is_dir: bool) -> bool {
        let path = path.trim_start_matches("./");
        if path.is_empty() {
            return false;
        }
        self.gitignore
            .matched_path_or_any_parents(Path::new(path), is_dir)
            .is_ignore()
    }
}
