//! Import command implementation

use crate::catalog::{CatalogDb, RunOperation, RunStatus, RunTotals};
use crate::config::Config;
use crate::error::{ErrorKind, Result};
use crate::models::{PlaylistRecord, VideoRecord};
use crate::normalize::{normalize_playlist, normalize_video};
use crate::progress::{advance_progress, finish_progress, start_progress};
use crate::upsert::{RecordFailure, Upserter};
use crate::youtube::{CatalogSource, RemoteVideo};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

/// Statistics from an import run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportStats {
    pub run_id: String,
    pub channel_id: String,
    pub playlists_fetched: usize,
    pub videos_fetched: usize,
    pub playlists_written: usize,
    pub videos_written: usize,
    pub failures: Vec<RecordFailure>,
}

impl ImportStats {
    pub fn status(&self) -> RunStatus {
        if self.failures.is_empty() {
            RunStatus::Completed
        } else {
            RunStatus::Partial
        }
    }
}

/// Import options
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Channel to import
    pub channel_id: String,
    /// Only these playlists (on top of the configured selection)
    pub playlist_ids: Option<Vec<String>>,
}

/// Everything fetched and normalized before the first write
#[derive(Debug, Default)]
struct FetchedCatalog {
    playlists: Vec<PlaylistRecord>,
    videos: Vec<VideoRecord>,
    failures: Vec<RecordFailure>,
}

/// Import a channel's playlists and videos into the catalog
///
/// The whole catalog is fetched first; a fetch failure aborts the run with
/// nothing written.
pub async fn cmd_import(
    config: &Config,
    db: &CatalogDb,
    source: &dyn CatalogSource,
    options: ImportOptions,
) -> Result<ImportStats> {
    info!(channel_id = %options.channel_id, "Starting import");

    let run = db
        .start_import_run(Some(&options.channel_id), RunOperation::Videos)
        .await?;

    let mut stats = ImportStats {
        run_id: run.id.clone(),
        channel_id: options.channel_id.clone(),
        ..Default::default()
    };

    let fetched = match fetch_catalog(config, source, &options).await {
        Ok(fetched) => fetched,
        Err(e) => {
            warn!(error = %e, "Fetch failed, nothing written");
            let totals = RunTotals {
                errors: vec![e.to_string()],
                ..Default::default()
            };
            db.complete_import_run(&run.id, RunStatus::Failed, &totals)
                .await?;
            return Err(e);
        }
    };

    stats.playlists_fetched = fetched.playlists.len();
    stats.videos_fetched = fetched.videos.len() + fetched.failures.len();
    stats.failures = fetched.failures;

    let videos = dedupe_videos(fetched.videos);
    if videos.len() < stats.videos_fetched - stats.failures.len() {
        info!(
            distinct = videos.len(),
            "Videos listed in more than one place are written once"
        );
    }

    let upserter = Upserter::new(db);
    let written = async {
        let (playlist_report, _) = upserter.playlists(&fetched.playlists).await?;
        let video_report = upserter.videos(&videos).await?;
        Ok::<_, crate::error::Error>((playlist_report, video_report))
    }
    .await;

    let (playlist_report, video_report) = match written {
        Ok(reports) => reports,
        Err(e) => {
            let totals = RunTotals {
                errors: vec![e.to_string()],
                ..Default::default()
            };
            db.complete_import_run(&run.id, RunStatus::Failed, &totals)
                .await?;
            return Err(e);
        }
    };

    stats.playlists_written = playlist_report.written;
    stats.videos_written = video_report.written;
    stats.failures.extend(playlist_report.failures);
    stats.failures.extend(video_report.failures);

    let totals = RunTotals {
        playlists_written: stats.playlists_written as i64,
        videos_written: stats.videos_written as i64,
        case_studies_written: 0,
        errors: stats.failures.iter().map(ToString::to_string).collect(),
    };
    db.complete_import_run(&run.id, stats.status(), &totals)
        .await?;

    info!(
        playlists = stats.playlists_written,
        videos = stats.videos_written,
        failed = stats.failures.len(),
        "Import finished"
    );

    Ok(stats)
}

async fn fetch_catalog(
    config: &Config,
    source: &dyn CatalogSource,
    options: &ImportOptions,
) -> Result<FetchedCatalog> {
    let remote_playlists = source.playlists(&options.channel_id).await?;
    info!("Found {} playlists", remote_playlists.len());

    let selected: Vec<_> = remote_playlists
        .iter()
        .filter(|p| config.import.includes(&p.id))
        .filter(|p| {
            options
                .playlist_ids
                .as_ref()
                .map_or(true, |ids| ids.iter().any(|id| id == &p.id))
        })
        .collect();

    if selected.len() < remote_playlists.len() {
        info!(
            "Importing {} of {} playlists",
            selected.len(),
            remote_playlists.len()
        );
    }

    let mut fetched = FetchedCatalog::default();
    let progress = start_progress(selected.len(), "Fetching playlists");

    for remote in selected {
        let playlist = normalize_playlist(remote);
        let items = source.playlist_items(&playlist.playlist_id).await?;

        let ids: Vec<String> = items
            .iter()
            .filter_map(|item| item.video_id().map(str::to_string))
            .collect();
        let details: HashMap<String, RemoteVideo> = source
            .video_details(&ids)
            .await?
            .into_iter()
            .map(|video| (video.id.clone(), video))
            .collect();

        for (index, item) in items.iter().enumerate() {
            let detail = item.video_id().and_then(|id| details.get(id));
            match normalize_video(item, detail, &playlist, index) {
                Ok(video) => fetched.videos.push(video),
                Err(e) => {
                    warn!(playlist_id = %playlist.playlist_id, error = %e, "Skipping playlist item");
                    fetched.failures.push(RecordFailure {
                        key: item
                            .video_id()
                            .map(str::to_string)
                            .unwrap_or_else(|| format!("{}[{}]", playlist.playlist_id, index)),
                        kind: ErrorKind::Recoverable,
                        message: e.to_string(),
                    });
                }
            }
        }

        fetched.playlists.push(playlist);
        advance_progress(&progress);
    }

    finish_progress(progress, "Playlists fetched");
    Ok(fetched)
}

/// One record per video id, holding the last occurrence at the first one's slot
fn dedupe_videos(videos: Vec<VideoRecord>) -> Vec<VideoRecord> {
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(videos.len());
    let mut unique: Vec<VideoRecord> = Vec::with_capacity(videos.len());

    for video in videos {
        match slots.get(&video.video_id) {
            Some(&slot) => unique[slot] = video,
            None => {
                slots.insert(video.video_id.clone(), unique.len());
                unique.push(video);
            }
        }
    }

    unique
}

/// Print import stats to console
pub fn print_import_stats(stats: &ImportStats) {
    println!("\n✓ Import complete ({})", stats.status());
    println!("  Channel: {}", stats.channel_id);
    println!(
        "  Playlists: {} fetched, {} written",
        stats.playlists_fetched, stats.playlists_written
    );
    println!(
        "  Videos: {} fetched, {} written",
        stats.videos_fetched, stats.videos_written
    );

    if !stats.failures.is_empty() {
        println!("\n  Skipped ({}):", stats.failures.len());
        for failure in &stats.failures {
            println!("    - {}", failure);
        }
    }
}
