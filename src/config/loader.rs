//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (platform config dir, e.g. ~/.config/crawldigest/config.toml)
//! 3. Project config (./crawldigest.toml or the path given with --config)
//! 4. Environment variables (CRAWLDIGEST_* prefix, `__` between sections)

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::Config;
use crate::types::{DigestError, Result};

/// Default project config file name
pub const PROJECT_CONFIG_FILE: &str = "crawldigest.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CRAWLDIGEST_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project → env vars
    pub fn load(project_config: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = project_config
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        } else if project_config.is_some() {
            return Err(DigestError::Config(format!(
                "Config file not found: {}",
                project_path.display()
            )));
        }

        // e.g. CRAWLDIGEST_CRAWL__MAX_DEPTH -> crawl.max_depth
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| DigestError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "crawldigest").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Render the effective configuration as TOML
    pub fn render(config: &Config) -> Result<String> {
        Ok(toml::to_string_pretty(config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_config_merges_over_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("crawldigest.toml");
        fs::write(
            &path,
            r#"
[crawl]
max_depth = 3
delay_ms = 0

[walk]
include_dot_files = true
"#,
        )
        .unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.crawl.max_depth, 3);
        assert_eq!(config.crawl.delay_ms, 0);
        assert!(config.walk.include_dot_files);
        // untouched sections keep defaults
        assert_eq!(config.crawl.timeout_secs, 15);
        assert_eq!(config.repo.clone_depth, 1);
    }

    #[test]
    fn test_explicit_config_is_validated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "[repo]\nclone_depth = 0\n").unwrap();

        let err = ConfigLoader::load(Some(&path)).unwrap_err();
        assert!(matches!(err, DigestError::Config(_)));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("absent.toml");
        assert!(ConfigLoader::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_render_round_trips_through_toml() {
        let rendered = ConfigLoader::render(&Config::default()).unwrap();
        assert!(rendered.contains("[crawl]"));
        assert!(rendered.contains("max_depth = 1"));
        assert!(rendered.contains("file = \"output.md\""));
    }
}
