//! Configuration commands.
//!
//! - `config show`: Display the current configuration, token redacted
//! - `config path`: Print where the configuration file lives

use owo_colors::OwoColorize;

use super::print_json;
use crate::config::Config;
use crate::error::Result;

/// Show current configuration
pub fn cmd_config_show(json: bool) -> Result<()> {
    let config = Config::load()?.redacted();

    if json {
        return print_json(&serde_json::to_value(&config)?);
    }

    let path = Config::config_path()?;
    if !path.exists() {
        println!("{}", format!("# no config file at {}, showing defaults", path.display()).dimmed());
    }
    print!("{}", serde_yaml_ng::to_string(&config)?);
    Ok(())
}

/// Print the configuration file path
pub fn cmd_config_path() -> Result<()> {
    println!("{}", Config::config_path()?.display());
    Ok(())
}
