//! `cortex config` commands - Show and initialize configuration

use anyhow::{bail, Result};
use cortex_core::Config;

pub fn show(config: Config) -> Result<()> {
    let toml_str = toml::to_string_pretty(&config)?;
    if let Some(path) = Config::default_config_path() {
        println!("# {}", path.display());
    }
    println!("{toml_str}");
    Ok(())
}

pub fn init(force: bool) -> Result<()> {
    let Some(path) = Config::default_config_path() else {
        bail!("Could not determine config path");
    };

    if path.exists() && !force {
        bail!(
            "Config already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    let config = Config::default();
    config.save()?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
