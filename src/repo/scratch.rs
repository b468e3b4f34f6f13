//! Scratch directory for cloned repositories.

use backon::{ConstantBuilder, Retryable};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::constants::repo::CLEANUP_RETRY_DELAY_MS;
use crate::types::Result;

/// Uniquely named directory under the system temp dir
///
/// Call [`ScratchDir::remove`] on every path out of the materializer. If that
/// never happens (panic, cancelled task) `Drop` deletes synchronously.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    removed: bool,
}

impl ScratchDir {
    pub async fn create(prefix: &str) -> Result<Self> {
        let path = std::env::temp_dir().join(format!("{}{}", prefix, Uuid::new_v4()));
        tokio::fs::create_dir_all(&path).await?;
        debug!("Created scratch directory {}", path.display());
        Ok(Self {
            path,
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Recursive delete, retried up to `retries` times. A directory that is
    /// already gone counts as removed.
    pub async fn remove(mut self, retries: usize) -> Result<()> {
        self.removed = true;
        let path = self.path.clone();
        let target = path.as_path();

        let outcome = (move || async move { tokio::fs::remove_dir_all(target).await })
            .retry(
                ConstantBuilder::default()
                    .with_delay(Duration::from_millis(CLEANUP_RETRY_DELAY_MS))
                    .with_max_times(retries),
            )
            .when(|e: &std::io::Error| e.kind() != ErrorKind::NotFound)
            .notify(|e: &std::io::Error, delay: Duration| {
                warn!(
                    "Retrying removal of {} in {:?}: {}",
                    path.display(),
                    delay,
                    e
                );
            })
            .await;

        match outcome {
            Ok(()) => {
                debug!("Removed scratch directory {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => debug!("Removed scratch directory {} on drop", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove scratch directory {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_is_unique_and_prefixed() {
        let a = ScratchDir::create("crawldigest-test-").await.unwrap();
        let b = ScratchDir::create("crawldigest-test-").await.unwrap();

        assert_ne!(a.path(), b.path());
        assert!(a.path().is_dir());
        let name = a.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("crawldigest-test-"));

        a.remove(1).await.unwrap();
        b.remove(1).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_deletes_contents() {
        let scratch = ScratchDir::create("crawldigest-test-").await.unwrap();
        let path = scratch.path().to_path_buf();
        std::fs::create_dir_all(path.join("nested/dir")).unwrap();
        std::fs::write(path.join("nested/dir/file.txt"), "x").unwrap();

        scratch.remove(2).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_remove_tolerates_missing_directory() {
        let scratch = ScratchDir::create("crawldigest-test-").await.unwrap();
        std::fs::remove_dir_all(scratch.path()).unwrap();
        scratch.remove(2).await.unwrap();
    }

    #[tokio::test]
    async fn test_drop_cleans_up() {
        let scratch = ScratchDir::create("crawldigest-test-").await.unwrap();
        let path = scratch.path().to_path_buf();
        drop(scratch);
        assert!(!path.exists());
    }
}
