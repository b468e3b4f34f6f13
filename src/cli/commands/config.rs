//! Config Command
//!
//! Prints the effective configuration after every layer is merged.

use crate::config::{Config, ConfigLoader, ENV_PREFIX, PROJECT_CONFIG_FILE};
use crate::types::Result;

/// Print the merged configuration as TOML, preceded by its sources
pub fn show(config: &Config) -> Result<()> {
    let rendered = ConfigLoader::render(config)?;

    match ConfigLoader::global_config_path() {
        Some(path) => println!("# Global config:  {}", path.display()),
        None => println!("# Global config:  (unavailable on this platform)"),
    }
    println!("# Project config: ./{}", PROJECT_CONFIG_FILE);
    println!("# Environment:    {}<SECTION>__<KEY>\n", ENV_PREFIX);
    println!("{}", rendered);
    Ok(())
}
