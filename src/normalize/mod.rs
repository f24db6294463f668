//! Normalization from YouTube payloads to catalog records
//!
//! Pure functions: durations, categories, and flattening of the nested
//! thumbnail and statistics objects.

mod category;
mod duration;

pub use category::*;
pub use duration::*;

use crate::error::{Error, Result};
use crate::models::{PlaylistRecord, VideoRecord};
use crate::youtube::{RemotePlaylist, RemotePlaylistItem, RemoteVideo, Thumbnails};
use chrono::{DateTime, SecondsFormat, Utc};

/// Thumbnail URLs flattened to the four stored variants
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThumbnailUrls {
    pub default: Option<String>,
    pub medium: Option<String>,
    pub high: Option<String>,
    pub maxres: Option<String>,
}

impl ThumbnailUrls {
    pub fn from_thumbnails(thumbnails: &Thumbnails) -> Self {
        let url = |t: &Option<crate::youtube::Thumbnail>| {
            t.as_ref()
                .map(|t| t.url.trim().to_string())
                .filter(|u| !u.is_empty())
        };
        Self {
            default: url(&thumbnails.default),
            medium: url(&thumbnails.medium),
            high: url(&thumbnails.high),
            maxres: url(&thumbnails.maxres),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.default.is_none()
            && self.medium.is_none()
            && self.high.is_none()
            && self.maxres.is_none()
    }
}

/// Largest available thumbnail
pub fn best_thumbnail(thumbnails: &Thumbnails) -> Option<String> {
    [
        &thumbnails.maxres,
        &thumbnails.standard,
        &thumbnails.high,
        &thumbnails.medium,
        &thumbnails.default,
    ]
    .into_iter()
    .flatten()
    .map(|t| t.url.trim())
    .find(|u| !u.is_empty())
    .map(str::to_string)
}

/// Parse a statistics counter; absent or malformed counts as zero
pub fn parse_count(value: Option<&str>) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v >= 0)
        .unwrap_or(0)
}

/// Normalize an RFC 3339 timestamp to UTC; unparsable values are dropped
pub fn normalize_timestamp(value: Option<&str>) -> Option<String> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v.trim()).ok())
        .map(|dt| {
            dt.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        })
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Normalize a playlist
pub fn normalize_playlist(playlist: &RemotePlaylist) -> PlaylistRecord {
    let title = playlist.snippet.title.trim().to_string();
    PlaylistRecord {
        playlist_id: playlist.id.clone(),
        category: infer_category(&title),
        title,
        description: non_blank(&playlist.snippet.description),
        thumbnail_url: best_thumbnail(&playlist.snippet.thumbnails),
        video_count: i64::from(playlist.content_details.item_count.unwrap_or(0)),
    }
}

/// Normalize a playlist item and its detail record
///
/// `index` is the item's position in the listing, used when the item carries
/// no explicit position. Items without a video id or detail record (private
/// or deleted videos) are rejected as invalid.
pub fn normalize_video(
    item: &RemotePlaylistItem,
    details: Option<&RemoteVideo>,
    playlist: &PlaylistRecord,
    index: usize,
) -> Result<VideoRecord> {
    let video_id = item.video_id().ok_or_else(|| {
        Error::invalid_record(
            format!("{}[{}]", playlist.playlist_id, index),
            "playlist item has no video id",
        )
    })?;

    let details = details.ok_or_else(|| {
        Error::invalid_record(video_id, "no video details returned (private or deleted)")
    })?;

    let title = non_blank(&details.snippet.title)
        .or_else(|| non_blank(&item.snippet.title))
        .unwrap_or_default();
    let description =
        non_blank(&details.snippet.description).or_else(|| non_blank(&item.snippet.description));

    let thumbnails = match ThumbnailUrls::from_thumbnails(&details.snippet.thumbnails) {
        urls if urls.is_empty() => ThumbnailUrls::from_thumbnails(&item.snippet.thumbnails),
        urls => urls,
    };

    let published_at = normalize_timestamp(details.snippet.published_at.as_deref())
        .or_else(|| {
            normalize_timestamp(
                item.content_details
                    .as_ref()
                    .and_then(|d| d.video_published_at.as_deref()),
            )
        })
        .or_else(|| normalize_timestamp(item.snippet.published_at.as_deref()));

    let stats = &details.statistics;

    Ok(VideoRecord {
        video_id: video_id.to_string(),
        playlist_id: playlist.playlist_id.clone(),
        title,
        description,
        thumbnail_default: thumbnails.default,
        thumbnail_medium: thumbnails.medium,
        thumbnail_high: thumbnails.high,
        thumbnail_maxres: thumbnails.maxres,
        duration_seconds: details
            .content_details
            .duration
            .as_deref()
            .map(parse_duration_seconds)
            .unwrap_or(0),
        published_at,
        view_count: parse_count(stats.view_count.as_deref()),
        like_count: parse_count(stats.like_count.as_deref()),
        comment_count: parse_count(stats.comment_count.as_deref()),
        tags: details.snippet.tags.clone(),
        position: item
            .snippet
            .position
            .map(i64::from)
            .unwrap_or(index as i64),
        category: playlist.category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use serde_json::json;

    fn playlist() -> PlaylistRecord {
        let remote: RemotePlaylist = serde_json::from_value(json!({
            "id": "PLmotion",
            "snippet": {
                "title": " Logo Animations ",
                "description": "",
                "thumbnails": {
                    "default": {"url": "https://i.ytimg.com/pl/default.jpg"},
                    "high": {"url": "https://i.ytimg.com/pl/high.jpg"}
                }
            },
            "contentDetails": {"itemCount": 12}
        }))
        .unwrap();
        normalize_playlist(&remote)
    }

    #[test]
    fn test_normalize_playlist() {
        let record = playlist();
        assert_eq!(record.title, "Logo Animations");
        assert_eq!(record.category, Category::MotionGraphics);
        assert_eq!(record.description, None);
        assert_eq!(
            record.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/pl/high.jpg")
        );
        assert_eq!(record.video_count, 12);
    }

    #[test]
    fn test_normalize_video_flattens_nested_fields() {
        let item: RemotePlaylistItem = serde_json::from_value(json!({
            "snippet": {"title": "Sting", "position": 3, "resourceId": {"videoId": "vid1"}},
            "contentDetails": {"videoId": "vid1", "videoPublishedAt": "2023-01-01T00:00:00Z"}
        }))
        .unwrap();
        let details: RemoteVideo = serde_json::from_value(json!({
            "id": "vid1",
            "snippet": {
                "title": "Logo Sting 2024",
                "description": "Five second sting",
                "publishedAt": "2024-03-05T10:15:00+02:00",
                "tags": ["logo", "sting"],
                "thumbnails": {
                    "default": {"url": "https://i.ytimg.com/vi/vid1/default.jpg"},
                    "medium": {"url": "https://i.ytimg.com/vi/vid1/mqdefault.jpg"},
                    "high": {"url": "https://i.ytimg.com/vi/vid1/hqdefault.jpg"}
                }
            },
            "contentDetails": {"duration": "PT1M5S"},
            "statistics": {"viewCount": "1500", "likeCount": "42"}
        }))
        .unwrap();

        let record = normalize_video(&item, Some(&details), &playlist(), 0).unwrap();
        assert_eq!(record.video_id, "vid1");
        assert_eq!(record.playlist_id, "PLmotion");
        assert_eq!(record.title, "Logo Sting 2024");
        assert_eq!(record.duration_seconds, 65);
        assert_eq!(record.published_at.as_deref(), Some("2024-03-05T08:15:00Z"));
        assert_eq!(record.view_count, 1500);
        assert_eq!(record.like_count, 42);
        assert_eq!(record.comment_count, 0);
        assert_eq!(record.tags, vec!["logo", "sting"]);
        assert_eq!(record.position, 3);
        assert_eq!(record.category, Category::MotionGraphics);
        assert!(record.thumbnail_high.is_some());
        assert_eq!(record.thumbnail_maxres, None);
    }

    #[test]
    fn test_normalize_video_falls_back_to_item_fields() {
        let item: RemotePlaylistItem = serde_json::from_value(json!({
            "snippet": {
                "title": "Fallback title",
                "publishedAt": "not a date",
                "resourceId": {"videoId": "vid2"},
                "thumbnails": {"default": {"url": "https://i.ytimg.com/vi/vid2/default.jpg"}}
            },
            "contentDetails": {"videoPublishedAt": "2022-06-01T12:00:00Z"}
        }))
        .unwrap();
        let details: RemoteVideo = serde_json::from_value(json!({"id": "vid2"})).unwrap();

        let record = normalize_video(&item, Some(&details), &playlist(), 7).unwrap();
        assert_eq!(record.title, "Fallback title");
        assert_eq!(record.position, 7);
        assert_eq!(record.duration_seconds, 0);
        assert_eq!(record.published_at.as_deref(), Some("2022-06-01T12:00:00Z"));
        assert_eq!(
            record.thumbnail_default.as_deref(),
            Some("https://i.ytimg.com/vi/vid2/default.jpg")
        );
    }

    #[test]
    fn test_detail_thumbnails_with_only_large_variants() {
        let item: RemotePlaylistItem = serde_json::from_value(json!({
            "snippet": {
                "title": "Breakdown",
                "resourceId": {"videoId": "vid3"},
                "thumbnails": {"default": {"url": "https://i.ytimg.com/vi/vid3/item.jpg"}}
            }
        }))
        .unwrap();
        let details: RemoteVideo = serde_json::from_value(json!({
            "id": "vid3",
            "snippet": {
                "title": "Breakdown",
                "thumbnails": {
                    "medium": {"url": "https://i.ytimg.com/vi/vid3/mqdefault.jpg"},
                    "maxres": {"url": "https://i.ytimg.com/vi/vid3/maxresdefault.jpg"}
                }
            }
        }))
        .unwrap();

        let record = normalize_video(&item, Some(&details), &playlist(), 0).unwrap();
        assert_eq!(record.thumbnail_default, None);
        assert_eq!(
            record.thumbnail_medium.as_deref(),
            Some("https://i.ytimg.com/vi/vid3/mqdefault.jpg")
        );
        assert_eq!(
            record.thumbnail_maxres.as_deref(),
            Some("https://i.ytimg.com/vi/vid3/maxresdefault.jpg")
        );
    }

    #[test]
    fn test_missing_details_are_invalid() {
        let item: RemotePlaylistItem = serde_json::from_value(json!({
            "snippet": {"title": "Private video", "resourceId": {"videoId": "gone"}}
        }))
        .unwrap();
        let err = normalize_video(&item, None, &playlist(), 0).unwrap_err();
        assert!(err.is_recoverable());

        let no_id: RemotePlaylistItem =
            serde_json::from_value(json!({"snippet": {"title": "Odd"}})).unwrap();
        assert!(normalize_video(&no_id, None, &playlist(), 1).is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(Some("12")), 12);
        assert_eq!(parse_count(Some("-4")), 0);
        assert_eq!(parse_count(Some("lots")), 0);
        assert_eq!(parse_count(None), 0);
    }
}
