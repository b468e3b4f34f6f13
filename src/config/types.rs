//! Configuration Types
//!
//! All configuration structures with defaults taken from [`crate::constants`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{crawl, output, repo, walk};
use crate::types::{DigestError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output file settings
    pub output: OutputConfig,

    /// Web crawl settings
    pub crawl: CrawlConfig,

    /// Filesystem walk settings
    pub walk: WalkConfig,

    /// Repository clone settings
    pub repo: RepoConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `DigestError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.output.file.as_os_str().is_empty() {
            return Err(DigestError::Config(
                "output.file must not be empty".to_string(),
            ));
        }

        if self.crawl.timeout_secs == 0 {
            return Err(DigestError::Config(
                "crawl.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.crawl.user_agent.trim().is_empty() {
            return Err(DigestError::Config(
                "crawl.user_agent must not be empty".to_string(),
            ));
        }

        if self.walk.max_file_size == 0 {
            return Err(DigestError::Config(
                "walk.max_file_size must be greater than 0".to_string(),
            ));
        }

        if self.repo.clone_depth == 0 {
            return Err(DigestError::Config(
                "repo.clone_depth must be greater than 0".to_string(),
            ));
        }

        if self.repo.clone_timeout_secs == 0 {
            return Err(DigestError::Config(
                "repo.clone_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Apply command-line overrides (highest priority)
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(file) = &overrides.output {
            self.output.file = file.clone();
        }
        if let Some(depth) = overrides.depth {
            self.crawl.max_depth = depth;
        }
        if let Some(branch) = &overrides.branch {
            self.repo.branch = Some(branch.clone());
        }
        if overrides.include_dot_files {
            self.walk.include_dot_files = true;
        }
        self
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub output: Option<PathBuf>,
    pub depth: Option<u32>,
    pub branch: Option<String>,
    pub include_dot_files: bool,
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Markdown file written at the end of a run
    pub file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(output::DEFAULT_OUTPUT_FILE),
        }
    }
}

// =============================================================================
// Crawl Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Maximum link depth followed from the seed (0 = seed only)
    pub max_depth: u32,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Per-request timeout
    pub timeout_secs: u64,

    /// Pause between fetches
    pub delay_ms: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: crawl::DEFAULT_MAX_DEPTH,
            user_agent: crawl::USER_AGENT.to_string(),
            timeout_secs: crawl::REQUEST_TIMEOUT_SECS,
            delay_ms: crawl::POLITENESS_DELAY_MS,
        }
    }
}

// =============================================================================
// Walk Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Include dot-prefixed entries (`.git` stays ignored regardless)
    pub include_dot_files: bool,

    /// Size ceiling in bytes before truncation
    pub max_file_size: usize,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            include_dot_files: false,
            max_file_size: walk::MAX_FILE_SIZE,
        }
    }
}

// =============================================================================
// Repository Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Branch to clone (remote default branch when unset)
    pub branch: Option<String>,

    /// Shallow clone depth
    pub clone_depth: u32,

    /// Timeout for the clone process
    pub clone_timeout_secs: u64,

    /// Retries for scratch directory removal
    pub cleanup_retries: usize,

    /// Git executable
    pub git_program: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            branch: None,
            clone_depth: repo::CLONE_DEPTH,
            clone_timeout_secs: repo::CLONE_TIMEOUT_SECS,
            cleanup_retries: repo::CLEANUP_RETRIES,
            git_program: "git".to_string(),
        }
    }
}
