//! Init command implementation

use crate::catalog::CatalogDb;
use crate::config::Config;
use crate::error::{Error, Result};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct InitOptions {
    pub base_dir: PathBuf,
    pub config_path: PathBuf,
    pub force: bool,
}

/// Write a default config file and create the catalog schema
pub async fn cmd_init(options: InitOptions) -> Result<Config> {
    let InitOptions {
        base_dir,
        config_path,
        force,
    } = options;

    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    std::fs::create_dir_all(&base_dir)?;

    let config = Config::for_base_dir(base_dir, config_path);
    config.save()?;

    let db = CatalogDb::connect(&config).await?;
    db.init_schema().await?;
    db.close().await;

    info!("Catalog ready at {:?}", config.paths.db_file);
    Ok(config)
}
