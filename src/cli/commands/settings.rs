//! Configuration inspection.

use crate::config::{self, Config};

/// Print where the config lives and what is in effect; optionally save it
pub fn cmd_config(config: &Config, save: bool) -> anyhow::Result<()> {
    match config::config_path() {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (no config directory on this platform)"),
    }
    println!();

    let mut shown = config.clone();
    if shown.credentials.secret.is_some() {
        shown.credentials.secret = Some("********".to_string());
    }
    print!("{}", toml::to_string_pretty(&shown)?);

    if save {
        config::save(config)?;
        println!();
        println!("✓ Saved");
    }
    Ok(())
}
