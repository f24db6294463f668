//! Manual curation of the featured flag

use crate::catalog::CatalogDb;
use crate::error::{Error, Result};
use crate::models::Video;
use tracing::info;

/// Set or clear a video's featured flag and return the updated row
pub async fn cmd_set_featured(db: &CatalogDb, video_id: &str, featured: bool) -> Result<Video> {
    db.set_video_featured(video_id, featured).await?;
    info!(video_id, featured, "Updated featured flag");

    db.get_video(video_id)
        .await?
        .ok_or_else(|| Error::VideoNotFound(video_id.to_string()))
}
