//! Batch writes into the catalog
//!
//! Records are written one at a time in dependency order (playlists before
//! videos before case studies). A record that fails recoverably is logged and
//! skipped; anything else stops the batch.

use crate::catalog::CatalogDb;
use crate::error::{Error, ErrorKind, Result};
use crate::models::{CaseStudyRecord, PlaylistRecord, VideoRecord};
use crate::progress::{advance_progress, finish_progress, start_progress};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A record that was skipped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordFailure {
    pub key: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl std::fmt::Display for RecordFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

/// Outcome of one batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub attempted: usize,
    pub written: usize,
    pub failures: Vec<RecordFailure>,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Whether the record was written; non-recoverable errors pass through
    fn record(&mut self, key: &str, result: Result<()>) -> Result<bool> {
        self.attempted += 1;
        match result {
            Ok(()) => {
                self.written += 1;
                Ok(true)
            }
            Err(e) if e.is_recoverable() => {
                warn!(key, error = %e, "Skipping record");
                self.failures.push(RecordFailure {
                    key: key.to_string(),
                    kind: e.kind(),
                    message: e.to_string(),
                });
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

/// Writes validated records into the catalog
pub struct Upserter<'a> {
    db: &'a CatalogDb,
}

impl<'a> Upserter<'a> {
    pub fn new(db: &'a CatalogDb) -> Self {
        Self { db }
    }

    /// Upsert playlists; returns the report and the ids that were written
    pub async fn playlists(
        &self,
        playlists: &[PlaylistRecord],
    ) -> Result<(BatchReport, Vec<String>)> {
        let mut report = BatchReport::default();
        let mut written = Vec::with_capacity(playlists.len());
        let progress = start_progress(playlists.len(), "Writing playlists");

        for playlist in playlists {
            let result = match playlist.validate() {
                Ok(()) => self.db.upsert_playlist(playlist).await,
                Err(e) => Err(e),
            };
            if report.record(&playlist.playlist_id, result)? {
                debug!(playlist_id = %playlist.playlist_id, "Playlist written");
                written.push(playlist.playlist_id.clone());
            }
            advance_progress(&progress);
        }

        finish_progress(progress, "Playlists written");
        Ok((report, written))
    }

    /// Upsert videos
    pub async fn videos(&self, videos: &[VideoRecord]) -> Result<BatchReport> {
        let mut report = BatchReport::default();
        let progress = start_progress(videos.len(), "Writing videos");

        for video in videos {
            let result = match video.validate() {
                Ok(()) => self.db.upsert_video(video).await,
                Err(e) => Err(e),
            };
            report.record(&video.video_id, result)?;
            advance_progress(&progress);
        }

        finish_progress(progress, "Videos written");
        Ok(report)
    }

    /// Upsert case studies, marking each referenced video featured
    pub async fn case_studies(&self, studies: &[CaseStudyRecord]) -> Result<BatchReport> {
        let mut report = BatchReport::default();
        let progress = start_progress(studies.len(), "Writing case studies");

        for study in studies {
            let result = self.write_case_study(study).await;
            report.record(&study.video_id, result)?;
            advance_progress(&progress);
        }

        finish_progress(progress, "Case studies written");
        Ok(report)
    }

    async fn write_case_study(&self, study: &CaseStudyRecord) -> Result<()> {
        study.validate()?;
        if self.db.get_video(&study.video_id).await?.is_none() {
            return Err(Error::VideoNotFound(study.video_id.clone()));
        }
        self.db.upsert_case_study(study).await
    }
}
