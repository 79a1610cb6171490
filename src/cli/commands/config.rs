//! Config Command
//!
//! Inspect aidiag configuration.
//!
//! Usage:
//!   aidiag config show [-g] [-f json]
//!   aidiag config path

use crate::cli::util::DisplayFormat;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show configuration
pub fn show(global: bool, format: DisplayFormat) -> Result<()> {
    if global {
        match ConfigLoader::global_config_path() {
            Some(global_path) if global_path.exists() => {
                let content = std::fs::read_to_string(&global_path)?;
                println!("# Global Config: {}\n", global_path.display());
                println!("{}", content);
            }
            Some(_) => println!("No global config found."),
            None => println!("Cannot determine global config directory."),
        }
    } else {
        ConfigLoader::show_config(format == DisplayFormat::Json)?;
    }
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}
