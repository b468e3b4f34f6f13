//! Repository Materializer
//!
//! Clones a remote repository into a scratch directory, walks it like any
//! local directory, and removes the scratch directory on every exit path.

pub mod clone;
pub mod scratch;

pub use clone::{GitCloner, RepositoryCloner};
pub use scratch::ScratchDir;

use std::path::Path;
use tracing::{info, warn};

use crate::config::{RepoConfig, WalkConfig};
use crate::constants::repo::SCRATCH_PREFIX;
use crate::types::Result;
use crate::walker::{DirectoryWalker, WalkOutput};

/// Walk result for a cloned repository
#[derive(Debug)]
pub struct MaterializedRepo {
    /// Display name used as the document root
    pub name: String,
    pub output: WalkOutput,
}

pub struct RepoMaterializer<C: RepositoryCloner> {
    cloner: C,
    config: RepoConfig,
}

impl<C: RepositoryCloner> RepoMaterializer<C> {
    pub fn new(cloner: C, config: &RepoConfig) -> Self {
        Self {
            cloner,
            config: config.clone(),
        }
    }

    pub async fn materialize(&self, url: &str, walk: &WalkConfig) -> Result<MaterializedRepo> {
        let scratch = ScratchDir::create(SCRATCH_PREFIX).await?;
        info!("Created scratch directory {}", scratch.path().display());

        let result = self.clone_and_walk(url, scratch.path(), walk).await;

        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.remove(self.config.cleanup_retries).await {
            warn!(
                "Failed to remove scratch directory {}: {}",
                scratch_path.display(),
                e
            );
        }

        result
    }

    async fn clone_and_walk(
        &self,
        url: &str,
        dir: &Path,
        walk: &WalkConfig,
    ) -> Result<MaterializedRepo> {
        self.cloner
            .clone_into(url, self.config.branch.as_deref(), dir)
            .await?;

        let walker = DirectoryWalker::new(dir, walk).await?;
        let output = walker.walk().await;
        let name = repository_name(url).unwrap_or_else(|| walker.root_name());

        Ok(MaterializedRepo { name, output })
    }
}

/// Last path segment of a clone URL without a `.git` suffix
pub fn repository_name(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DigestError;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Writes fixed files into the destination, or fails after writing
    struct FakeCloner {
        files: Vec<(&'static str, &'static str)>,
        fail: bool,
        dest: Mutex<Option<PathBuf>>,
        branch: Mutex<Option<String>>,
    }

    impl FakeCloner {
        fn new(files: Vec<(&'static str, &'static str)>, fail: bool) -> Self {
            Self {
                files,
                fail,
                dest: Mutex::new(None),
                branch: Mutex::new(None),
            }
        }

        fn dest(&self) -> PathBuf {
            self.dest.lock().unwrap().clone().unwrap()
        }
    }

    #[async_trait]
    impl RepositoryCloner for FakeCloner {
        async fn clone_into(&self, url: &str, branch: Option<&str>, dest: &Path) -> Result<()> {
            *self.dest.lock().unwrap() = Some(dest.to_path_buf());
            *self.branch.lock().unwrap() = branch.map(str::to_string);
            for (path, content) in &self.files {
                let full = dest.join(path);
                tokio::fs::create_dir_all(full.parent().unwrap()).await?;
                tokio::fs::write(full, content).await?;
            }
            if self.fail {
                return Err(DigestError::Clone {
                    url: url.to_string(),
                    message: "repository not found".to_string(),
                });
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_materialize_walks_clone_and_cleans_up() {
        let cloner = FakeCloner::new(vec![("README.md", "# hi"), ("src/lib.rs", "")], false);
        let config = RepoConfig {
            branch: Some("main".to_string()),
            ..RepoConfig::default()
        };
        let materializer = RepoMaterializer::new(cloner, &config);

        let repo = materializer
            .materialize("https://example.com/team/widget.git", &WalkConfig::default())
            .await
            .unwrap();

        assert_eq!(repo.name, "widget");
        let mut paths: Vec<_> = repo
            .output
            .files
            .iter()
            .map(|f| f.relative_path.as_str())
            .collect();
        paths.sort();
        assert_eq!(paths, vec!["README.md", "src/lib.rs"]);
        assert_eq!(
            materializer.cloner.branch.lock().unwrap().as_deref(),
            Some("main")
        );
        assert!(!materializer.cloner.dest().exists());
    }

    #[tokio::test]
    async fn test_failed_clone_cleans_up_and_surfaces_error() {
        let cloner = FakeCloner::new(vec![("partial.txt", "x")], true);
        let materializer = RepoMaterializer::new(cloner, &RepoConfig::default());

        let err = materializer
            .materialize("https://example.com/missing.git", &WalkConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, DigestError::Clone { .. }));
        assert!(!materializer.cloner.dest().exists());
    }

    #[test]
    fn test_repository_name() {
        assert_eq!(
            repository_name("https://github.com/org/project.git").as_deref(),
            Some("project")
        );
        assert_eq!(
            repository_name("https://github.com/org/project/").as_deref(),
            Some("project")
        );
        assert_eq!(
            repository_name("git@github.com:project.git").as_deref(),
            Some("project")
        );
        assert_eq!(repository_name(""), None);
        assert_eq!(repository_name(".git"), None);
    }
}
