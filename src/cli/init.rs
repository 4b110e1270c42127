//! Init command implementation

use anyhow::{Result, bail};

use ritual::config::Config;

/// Create the global config file with defaults
pub fn init_command(force: bool) -> Result<()> {
    let path = Config::global_config_path();

    if path.exists() && !force {
        bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    let config = Config::default();
    config.save_to_file(&path)?;
    println!("Created {}", path.display());
    println!("  user = \"{}\"", config.user);
    Ok(())
}
