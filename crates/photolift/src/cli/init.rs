//! Init command - write a starter config file

use crate::cli::error::HelpfulError;
use photolift::upload::config::{default_config_path, UploadConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
pub struct InitArgs {
    pub config: Option<PathBuf>,
    pub force: bool,
}

pub fn run(args: InitArgs) -> anyhow::Result<()> {
    let path = args.config.unwrap_or_else(default_config_path);
    if path.exists() && !args.force {
        return Err(HelpfulError::config_exists(&path).into());
    }

    UploadConfig::sample().save(&path)?;
    info!(path = %path.display(), "Config written");

    println!("Wrote {}", path.display());
    println!("Edit the [[jobs]] entries, then preview with: photolift plan");
    Ok(())
}
