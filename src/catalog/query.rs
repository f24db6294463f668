//! Read queries: filtered, sorted, paginated video listings

use super::CatalogDb;
use crate::error::Result;
use crate::models::Video;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite};

/// Largest page a listing returns
pub const MAX_PAGE_SIZE: i64 = 100;

/// Sort order for video listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum VideoSort {
    /// Most recently published first
    #[default]
    Newest,
    /// Oldest first
    Oldest,
    /// Highest view count first
    MostViewed,
    /// Longest first
    Longest,
    /// Playlist order
    Position,
    /// Alphabetical by title
    Title,
}

impl VideoSort {
    fn order_by(&self) -> &'static str {
        match self {
            VideoSort::Newest => " ORDER BY published_at IS NULL, published_at DESC, video_id",
            VideoSort::Oldest => " ORDER BY published_at IS NULL, published_at ASC, video_id",
            VideoSort::MostViewed => " ORDER BY view_count DESC, video_id",
            VideoSort::Longest => " ORDER BY duration_seconds DESC, video_id",
            VideoSort::Position => " ORDER BY playlist_id, position, video_id",
            VideoSort::Title => " ORDER BY title COLLATE NOCASE, video_id",
        }
    }
}

/// Filters for a video listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoQuery {
    pub playlist_id: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    /// Case-insensitive pattern matched against title and description
    pub search: Option<String>,
    pub tag: Option<String>,
    pub min_duration: Option<i64>,
    pub max_duration: Option<i64>,
    pub sort: VideoSort,
    pub limit: Option<i64>,
    pub offset: i64,
}

/// One page of results plus the total number of matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoPage {
    pub videos: Vec<Video>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl VideoPage {
    pub fn has_more(&self) -> bool {
        self.offset + (self.videos.len() as i64) < self.total
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, query: &VideoQuery) {
    builder.push(" WHERE 1=1");

    if let Some(playlist_id) = &query.playlist_id {
        builder.push(" AND playlist_id = ");
        builder.push_bind(playlist_id.clone());
    }

    if let Some(category) = &query.category {
        builder.push(" AND category = ");
        builder.push_bind(category.clone());
    }

    if let Some(featured) = query.featured {
        builder.push(" AND featured = ");
        builder.push_bind(featured);
    }

    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        builder.push(" AND (title LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR description LIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }

    if let Some(tag) = &query.tag {
        builder.push(" AND EXISTS (SELECT 1 FROM json_each(videos.tags_json) WHERE json_each.value = ");
        builder.push_bind(tag.clone());
        builder.push(")");
    }

    if let Some(min) = query.min_duration {
        builder.push(" AND duration_seconds >= ");
        builder.push_bind(min);
    }

    if let Some(max) = query.max_duration {
        builder.push(" AND duration_seconds <= ");
        builder.push_bind(max);
    }
}

impl CatalogDb {
    /// List videos matching a query
    pub async fn list_videos(&self, query: &VideoQuery, default_limit: i64) -> Result<VideoPage> {
        let limit = query.limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE);
        let offset = query.offset.max(0);

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM videos");
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Sqlite>::new("SELECT * FROM videos");
        push_filters(&mut select, query);
        select.push(query.sort.order_by());
        select.push(" LIMIT ");
        select.push_bind(limit);
        select.push(" OFFSET ");
        select.push_bind(offset);

        let videos = select
            .build_query_as::<Video>()
            .fetch_all(&self.pool)
            .await?;

        Ok(VideoPage {
            videos,
            total,
            limit,
            offset,
        })
    }
}
