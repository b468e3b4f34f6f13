//! External clone process
//!
//! [`RepositoryCloner`] is the seam the materializer clones through.
//! [`GitCloner`] drives the local `git` binary as a child process.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::RepoConfig;
use crate::types::{DigestError, Result};

#[async_trait]
pub trait RepositoryCloner: Send + Sync {
    /// Populate `dest` with a checkout of `url`, optionally pinned to `branch`
    async fn clone_into(&self, url: &str, branch: Option<&str>, dest: &Path) -> Result<()>;
}

/// Shallow clone via the `git` command line
pub struct GitCloner {
    program: String,
    depth: u32,
    timeout: Duration,
}

impl GitCloner {
    pub fn new(config: &RepoConfig) -> Self {
        Self {
            program: config.git_program.clone(),
            depth: config.clone_depth,
            timeout: Duration::from_secs(config.clone_timeout_secs),
        }
    }

    fn command(&self, url: &str, branch: Option<&str>, dest: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("clone").arg("--depth").arg(self.depth.to_string());
        if let Some(branch) = branch {
            cmd.arg("--branch").arg(branch);
        }
        cmd.arg("--quiet")
            .arg(url)
            .arg(dest)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl RepositoryCloner for GitCloner {
    async fn clone_into(&self, url: &str, branch: Option<&str>, dest: &Path) -> Result<()> {
        info!(
            "Cloning {}{} into {}",
            url,
            branch.map(|b| format!(" (branch {})", b)).unwrap_or_default(),
            dest.display()
        );

        let child = self.command(url, branch, dest).spawn().map_err(|e| DigestError::Clone {
            url: url.to_string(),
            message: format!("failed to spawn {}: {}. Is it installed?", self.program, e),
        })?;

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| DigestError::Clone {
                url: url.to_string(),
                message: format!("timed out after {}s", self.timeout.as_secs()),
            })?
            .map_err(|e| DigestError::Clone {
                url: url.to_string(),
                message: format!("clone process failed: {}", e),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            let message = if stderr.trim().is_empty() {
                format!("process exited with {}", output.status)
            } else {
                stderr.trim().to_string()
            };
            return Err(DigestError::Clone {
                url: url.to_string(),
                message,
            });
        }

        if is_notable_stderr(&stderr) {
            warn!("git clone reported: {}", stderr.trim());
        }
        debug!("Clone of {} complete", url);
        Ok(())
    }
}

/// Whether stderr from a successful clone says more than routine progress
fn is_notable_stderr(stderr: &str) -> bool {
    stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .any(|line| !line.starts_with("Cloning into") && !line.contains("already exists"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routine_stderr_is_not_notable() {
        assert!(!is_notable_stderr(""));
        assert!(!is_notable_stderr("Cloning into '/tmp/x'...\n"));
        assert!(!is_notable_stderr("fatal: destination path 'x' already exists\n"));
        assert!(is_notable_stderr(
            "Cloning into 'x'...\nwarning: redirecting to https://example.com/\n"
        ));
    }

    #[test]
    fn test_command_arguments() {
        let cloner = GitCloner::new(&RepoConfig::default());
        let cmd = cloner.command("https://example.com/r.git", Some("dev"), Path::new("/tmp/d"));
        let args: Vec<String> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            args,
            vec![
                "clone",
                "--depth",
                "1",
                "--branch",
                "dev",
                "--quiet",
                "https://example.com/r.git",
                "/tmp/d"
            ]
        );
        assert_eq!(cmd.as_std().get_program(), "git");
    }

    #[tokio::test]
    async fn test_missing_program_is_clone_error() {
        let config = RepoConfig {
            git_program: "crawldigest-no-such-git".to_string(),
            ..RepoConfig::default()
        };
        let dir = tempfile::TempDir::new().unwrap();
        let err = GitCloner::new(&config)
            .clone_into("https://example.com/r.git", None, dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, DigestError::Clone { .. }));
        assert!(err.is_fatal());
    }
}
