//! Catalog storage using SQLite
//!
//! This module handles everything the website reads and the importer writes:
//! - Playlists and videos, keyed by their YouTube ids
//! - Case studies, at most one per video
//! - Import runs (history and stats)

mod query;
mod schema;

pub use query::*;
pub use schema::*;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{CaseStudy, CaseStudyRecord, CaseStudyStatus, Playlist, PlaylistRecord, Video, VideoRecord};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

/// What an import run wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOperation {
    Videos,
    CaseStudies,
}

impl std::fmt::Display for RunOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOperation::Videos => write!(f, "videos"),
            RunOperation::CaseStudies => write!(f, "case_studies"),
        }
    }
}

/// Import run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    /// Finished, but some records were skipped
    Partial,
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Running => write!(f, "running"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Partial => write!(f, "partial"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for RunStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "running" => Ok(RunStatus::Running),
            "completed" => Ok(RunStatus::Completed),
            "partial" => Ok(RunStatus::Partial),
            "failed" => Ok(RunStatus::Failed),
            _ => Err(Error::Config(format!("Unknown run status: {}", s))),
        }
    }
}

/// An import run record
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ImportRun {
    pub id: String,
    pub channel_id: Option<String>,
    pub operation: String,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub status: String,
    pub playlists_written: i64,
    pub videos_written: i64,
    pub case_studies_written: i64,
    pub records_failed: i64,
    pub errors_json: Option<String>,
}

impl ImportRun {
    pub fn new(channel_id: Option<String>, operation: RunOperation) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            channel_id,
            operation: operation.to_string(),
            started_at: Utc::now().to_rfc3339(),
            completed_at: None,
            status: RunStatus::Running.to_string(),
            playlists_written: 0,
            videos_written: 0,
            case_studies_written: 0,
            records_failed: 0,
            errors_json: None,
        }
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors_json
            .as_ref()
            .and_then(|j| serde_json::from_str(j).ok())
            .unwrap_or_default()
    }
}

/// Final counts for an import run
#[derive(Debug, Clone, Default)]
pub struct RunTotals {
    pub playlists_written: i64,
    pub videos_written: i64,
    pub case_studies_written: i64,
    pub errors: Vec<String>,
}

/// A playlist with the number of videos actually stored for it
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub playlist_id: String,
    pub title: String,
    pub category: String,
    pub video_count: i64,
    pub stored_videos: i64,
    pub featured_videos: i64,
    pub updated_at: String,
}

/// Catalog-wide counts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogStats {
    pub playlist_count: usize,
    pub video_count: usize,
    pub featured_count: usize,
    pub case_study_count: usize,
    pub published_case_study_count: usize,
}

/// Catalog database handle
///
/// Constructed once per command and closed when the command finishes.
#[derive(Clone)]
pub struct CatalogDb {
    pool: SqlitePool,
}

impl CatalogDb {
    /// Connect to the catalog named by the configuration
    pub async fn connect(config: &Config) -> Result<Self> {
        Self::open(&config.paths.db_file, config.database.max_connections).await
    }

    /// Connect to a catalog file directly
    pub async fn open(db_path: &Path, max_connections: u32) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        debug!("Connecting to SQLite catalog at {:?}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Connect and create the schema when the file is new
    pub async fn open_initialized(config: &Config) -> Result<Self> {
        let db = Self::connect(config).await?;
        if !db.is_initialized().await? {
            db.init_schema().await?;
        }
        Ok(db)
    }

    /// Create tables and indexes (idempotent)
    pub async fn init_schema(&self) -> Result<()> {
        info!("Initializing catalog schema");
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// Check if the catalog schema exists
    pub async fn is_initialized(&self) -> Result<bool> {
        let result: Option<(i32,)> =
            sqlx::query_as("SELECT 1 FROM sqlite_master WHERE type='table' AND name='videos'")
                .fetch_optional(&self.pool)
                .await?;
        Ok(result.is_some())
    }

    /// Close the pool, waiting for in-flight statements
    pub async fn close(&self) {
        self.pool.close().await;
    }

    // ===== Playlist Operations =====

    /// Insert or update a playlist by its YouTube id
    pub async fn upsert_playlist(&self, playlist: &PlaylistRecord) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO playlists (playlist_id, title, description, thumbnail_url, video_count, category, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(playlist_id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                thumbnail_url = excluded.thumbnail_url,
                video_count = excluded.video_count,
                category = excluded.category,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&playlist.playlist_id)
        .bind(&playlist.title)
        .bind(&playlist.description)
        .bind(&playlist.thumbnail_url)
        .bind(playlist.video_count)
        .bind(playlist.category.label())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get playlist by YouTube id
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<Option<Playlist>> {
        let playlist =
            sqlx::query_as::<_, Playlist>("SELECT * FROM playlists WHERE playlist_id = ?")
                .bind(playlist_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(playlist)
    }

    /// List playlists with stored video counts
    pub async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>> {
        let playlists = sqlx::query_as::<_, PlaylistSummary>(
            r#"
            SELECT p.playlist_id, p.title, p.category, p.video_count, p.updated_at,
                   COUNT(v.video_id) AS stored_videos,
                   COALESCE(SUM(v.featured), 0) AS featured_videos
            FROM playlists p
            LEFT JOIN videos v ON v.playlist_id = p.playlist_id
            GROUP BY p.playlist_id
            ORDER BY p.title COLLATE NOCASE
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(playlists)
    }

    // ===== Video Operations =====

    /// Insert or update a video by its YouTube id
    ///
    /// `featured` is left untouched; it belongs to curation and case studies.
    pub async fn upsert_video(&self, video: &VideoRecord) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let tags_json = serde_json::to_string(&video.tags)?;
        sqlx::query(
            r#"
            INSERT INTO videos (video_id, playlist_id, title, description,
                thumbnail_default, thumbnail_medium, thumbnail_high, thumbnail_maxres,
                duration_seconds, published_at, view_count, like_count, comment_count,
                tags_json, position, category, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(video_id) DO UPDATE SET
                playlist_id = excluded.playlist_id,
                title = excluded.title,
                description = excluded.description,
                thumbnail_default = excluded.thumbnail_default,
                thumbnail_medium = excluded.thumbnail_medium,
                thumbnail_high = excluded.thumbnail_high,
                thumbnail_maxres = excluded.thumbnail_maxres,
                duration_seconds = excluded.duration_seconds,
                published_at = excluded.published_at,
                view_count = excluded.view_count,
                like_count = excluded.like_count,
                comment_count = excluded.comment_count,
                tags_json = excluded.tags_json,
                position = excluded.position,
                category = excluded.category,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&video.video_id)
        .bind(&video.playlist_id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_default)
        .bind(&video.thumbnail_medium)
        .bind(&video.thumbnail_high)
        .bind(&video.thumbnail_maxres)
        .bind(video.duration_seconds)
        .bind(&video.published_at)
        .bind(video.view_count)
        .bind(video.like_count)
        .bind(video.comment_count)
        .bind(&tags_json)
        .bind(video.position)
        .bind(video.category.label())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get video by YouTube id
    pub async fn get_video(&self, video_id: &str) -> Result<Option<Video>> {
        let video = sqlx::query_as::<_, Video>("SELECT * FROM videos WHERE video_id = ?")
            .bind(video_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(video)
    }

    /// Set or clear a video's featured flag
    pub async fn set_video_featured(&self, video_id: &str, featured: bool) -> Result<()> {
        let result = sqlx::query("UPDATE videos SET featured = ?, updated_at = ? WHERE video_id = ?")
            .bind(featured)
            .bind(Utc::now().to_rfc3339())
            .bind(video_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::VideoNotFound(video_id.to_string()));
        }
        Ok(())
    }

    // ===== Case Study Operations =====

    /// Insert or update a case study by video, and mark that video featured
    ///
    /// Both writes commit together; a case study for an unknown video is
    /// rejected by the foreign key.
    pub async fn upsert_case_study(&self, study: &CaseStudyRecord) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let key_takeaways_json = serde_json::to_string(&study.key_takeaways)?;
        let seo_keywords_json = serde_json::to_string(&study.seo_keywords)?;
        let metrics_json = study
            .metrics
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO case_studies (id, video_id, title, slug, client_name, challenge, approach, results,
                key_takeaways_json, metrics_json, seo_title, seo_description, seo_keywords_json,
                status, featured, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(video_id) DO UPDATE SET
                title = excluded.title,
                slug = excluded.slug,
                client_name = excluded.client_name,
                challenge = excluded.challenge,
                approach = excluded.approach,
                results = excluded.results,
                key_takeaways_json = excluded.key_takeaways_json,
                metrics_json = excluded.metrics_json,
                seo_title = excluded.seo_title,
                seo_description = excluded.seo_description,
                seo_keywords_json = excluded.seo_keywords_json,
                status = excluded.status,
                featured = excluded.featured,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&study.video_id)
        .bind(&study.title)
        .bind(&study.slug)
        .bind(&study.client_name)
        .bind(&study.challenge)
        .bind(&study.approach)
        .bind(&study.results)
        .bind(&key_takeaways_json)
        .bind(&metrics_json)
        .bind(&study.seo_title)
        .bind(&study.seo_description)
        .bind(&seo_keywords_json)
        .bind(study.status.to_string())
        .bind(study.featured)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE videos SET featured = 1, updated_at = ? WHERE video_id = ?")
            .bind(&now)
            .bind(&study.video_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Get the case study for a video
    pub async fn get_case_study_by_video(&self, video_id: &str) -> Result<Option<CaseStudy>> {
        let study =
            sqlx::query_as::<_, CaseStudy>("SELECT * FROM case_studies WHERE video_id = ?")
                .bind(video_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(study)
    }

    /// List case studies, optionally by status
    pub async fn list_case_studies(
        &self,
        status: Option<CaseStudyStatus>,
    ) -> Result<Vec<CaseStudy>> {
        let studies = match status {
            Some(status) => {
                sqlx::query_as::<_, CaseStudy>(
                    "SELECT * FROM case_studies WHERE status = ? ORDER BY featured DESC, updated_at DESC",
                )
                .bind(status.to_string())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, CaseStudy>(
                    "SELECT * FROM case_studies ORDER BY featured DESC, updated_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(studies)
    }

    // ===== Import Run Operations =====

    /// Start a new import run
    pub async fn start_import_run(
        &self,
        channel_id: Option<&str>,
        operation: RunOperation,
    ) -> Result<ImportRun> {
        let run = ImportRun::new(channel_id.map(str::to_string), operation);
        sqlx::query(
            r#"
            INSERT INTO import_runs (id, channel_id, operation, started_at, status)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&run.id)
        .bind(&run.channel_id)
        .bind(&run.operation)
        .bind(&run.started_at)
        .bind(&run.status)
        .execute(&self.pool)
        .await?;
        Ok(run)
    }

    /// Complete an import run
    pub async fn complete_import_run(
        &self,
        id: &str,
        status: RunStatus,
        totals: &RunTotals,
    ) -> Result<()> {
        let errors_json = if totals.errors.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&totals.errors)?)
        };
        sqlx::query(
            r#"
            UPDATE import_runs SET
                completed_at = ?,
                status = ?,
                playlists_written = ?,
                videos_written = ?,
                case_studies_written = ?,
                records_failed = ?,
                errors_json = ?
            WHERE id = ?
            "#,
        )
        .bind(Utc::now().to_rfc3339())
        .bind(status.to_string())
        .bind(totals.playlists_written)
        .bind(totals.videos_written)
        .bind(totals.case_studies_written)
        .bind(totals.errors.len() as i64)
        .bind(errors_json)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get an import run by id
    pub async fn get_import_run(&self, id: &str) -> Result<Option<ImportRun>> {
        let run = sqlx::query_as::<_, ImportRun>("SELECT * FROM import_runs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(run)
    }

    /// Get the most recent import run
    pub async fn get_latest_run(&self) -> Result<Option<ImportRun>> {
        let run = sqlx::query_as::<_, ImportRun>(
            "SELECT * FROM import_runs ORDER BY started_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(run)
    }

    // ===== Statistics =====

    /// Get catalog statistics
    pub async fn get_stats(&self) -> Result<CatalogStats> {
        let playlist_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM playlists")
            .fetch_one(&self.pool)
            .await?;

        let video_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
            .fetch_one(&self.pool)
            .await?;

        let featured_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE featured = 1")
                .fetch_one(&self.pool)
                .await?;

        let case_study_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM case_studies")
            .fetch_one(&self.pool)
            .await?;

        let published_case_study_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM case_studies WHERE status = 'published'")
                .fetch_one(&self.pool)
                .await?;

        Ok(CatalogStats {
            playlist_count: playlist_count as usize,
            video_count: video_count as usize,
            featured_count: featured_count as usize,
            case_study_count: case_study_count as usize,
            published_case_study_count: published_case_study_count as usize,
        })
    }
}
