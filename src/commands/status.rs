//! Status command implementation

use crate::catalog::{CatalogDb, CatalogStats, ImportRun};
use crate::config::Config;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Status information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusInfo {
    pub config_path: String,
    pub db_path: String,
    pub channel_id: Option<String>,
    pub api_key_set: bool,
    pub schema_initialized: bool,
    pub catalog: CatalogStats,
    pub last_run: Option<ImportRun>,
}

/// Get catalog status
pub async fn cmd_status(config: &Config, db: &CatalogDb) -> Result<StatusInfo> {
    info!("Getting status");

    let schema_initialized = db.is_initialized().await?;
    let (catalog, last_run) = if schema_initialized {
        (db.get_stats().await?, db.get_latest_run().await?)
    } else {
        (CatalogStats::default(), None)
    };

    Ok(StatusInfo {
        config_path: config.paths.config_file.display().to_string(),
        db_path: config.paths.db_file.display().to_string(),
        channel_id: config.youtube.channel_id.clone(),
        api_key_set: config.api_key().is_some(),
        schema_initialized,
        catalog,
        last_run,
    })
}

/// Print status to console
pub fn print_status(status: &StatusInfo) {
    println!("\n📊 reelsync Status\n");
    println!("Configuration: {}", status.config_path);
    println!("Database: {}", status.db_path);

    println!("\nYouTube:");
    println!(
        "  Channel: {}",
        status.channel_id.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  API key: {}",
        if status.api_key_set { "✓ set" } else { "✗ not set" }
    );

    if !status.schema_initialized {
        println!("\n⚠ Catalog schema not created - run 'reelsync init' or 'reelsync db init'");
        return;
    }

    println!("\nCatalog:");
    println!("  Playlists: {}", status.catalog.playlist_count);
    println!(
        "  Videos: {} ({} featured)",
        status.catalog.video_count, status.catalog.featured_count
    );
    println!(
        "  Case studies: {} ({} published)",
        status.catalog.case_study_count, status.catalog.published_case_study_count
    );

    match &status.last_run {
        Some(run) => {
            println!("\nLast run:");
            println!("  {} {} ({})", run.operation, run.status, run.started_at);
            println!(
                "  Written: {} playlists, {} videos, {} case studies",
                run.playlists_written, run.videos_written, run.case_studies_written
            );
            if run.records_failed > 0 {
                println!("  Skipped: {}", run.records_failed);
            }
        }
        None => println!("\nNo imports yet."),
    }
}
