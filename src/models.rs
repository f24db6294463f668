//! Catalog records: what the importer writes and what the website reads

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

/// Coarse content category shown on the portfolio pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Motion Graphics")]
    MotionGraphics,
    Animation,
    #[serde(rename = "VFX")]
    Vfx,
    Commercial,
    #[serde(rename = "Music Video")]
    MusicVideo,
    Corporate,
    Documentary,
    #[serde(rename = "Social Media")]
    SocialMedia,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::MotionGraphics,
        Category::Animation,
        Category::Vfx,
        Category::Commercial,
        Category::MusicVideo,
        Category::Corporate,
        Category::Documentary,
        Category::SocialMedia,
        Category::Other,
    ];

    /// Label stored in the catalog
    pub fn label(&self) -> &'static str {
        match self {
            Category::MotionGraphics => "Motion Graphics",
            Category::Animation => "Animation",
            Category::Vfx => "VFX",
            Category::Commercial => "Commercial",
            Category::MusicVideo => "Music Video",
            Category::Corporate => "Corporate",
            Category::Documentary => "Documentary",
            Category::SocialMedia => "Social Media",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace(['-', '_'], " ");
        Category::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == wanted)
            .ok_or_else(|| Error::Config(format!("Unknown category: {}", s)))
    }
}

/// Publication state of a case study
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStudyStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl std::fmt::Display for CaseStudyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseStudyStatus::Draft => write!(f, "draft"),
            CaseStudyStatus::Published => write!(f, "published"),
            CaseStudyStatus::Archived => write!(f, "archived"),
        }
    }
}

impl FromStr for CaseStudyStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(CaseStudyStatus::Draft),
            "published" => Ok(CaseStudyStatus::Published),
            "archived" => Ok(CaseStudyStatus::Archived),
            _ => Err(Error::Config(format!("Unknown case study status: {}", s))),
        }
    }
}

/// A normalized playlist ready to be written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistRecord {
    pub playlist_id: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_count: i64,
    pub category: Category,
}

impl PlaylistRecord {
    pub fn validate(&self) -> Result<()> {
        if self.playlist_id.trim().is_empty() {
            return Err(Error::invalid_record("<playlist>", "empty playlist id"));
        }
        if self.title.trim().is_empty() {
            return Err(Error::invalid_record(&self.playlist_id, "empty title"));
        }
        if self.video_count < 0 {
            return Err(Error::invalid_record(&self.playlist_id, "negative video count"));
        }
        Ok(())
    }
}

/// A normalized video ready to be written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    pub playlist_id: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_default: Option<String>,
    pub thumbnail_medium: Option<String>,
    pub thumbnail_high: Option<String>,
    pub thumbnail_maxres: Option<String>,
    pub duration_seconds: i64,
    pub published_at: Option<String>,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub tags: Vec<String>,
    pub position: i64,
    pub category: Category,
}

impl VideoRecord {
    pub fn validate(&self) -> Result<()> {
        if self.video_id.trim().is_empty() {
            return Err(Error::invalid_record("<video>", "empty video id"));
        }
        if self.playlist_id.trim().is_empty() {
            return Err(Error::invalid_record(&self.video_id, "no playlist reference"));
        }
        if self.title.trim().is_empty() {
            return Err(Error::invalid_record(&self.video_id, "empty title"));
        }
        if self.duration_seconds < 0 || self.position < 0 {
            return Err(Error::invalid_record(
                &self.video_id,
                "negative duration or position",
            ));
        }
        if self.view_count < 0 || self.like_count < 0 || self.comment_count < 0 {
            return Err(Error::invalid_record(&self.video_id, "negative counter"));
        }
        Ok(())
    }
}

/// A case study ready to be written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseStudyRecord {
    pub video_id: String,
    pub title: String,
    pub slug: String,
    pub client_name: Option<String>,
    pub challenge: String,
    pub approach: String,
    pub results: String,
    pub key_takeaways: Vec<String>,
    pub metrics: Option<serde_json::Value>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_keywords: Vec<String>,
    pub status: CaseStudyStatus,
    pub featured: bool,
}

impl CaseStudyRecord {
    pub fn validate(&self) -> Result<()> {
        if self.video_id.trim().is_empty() {
            return Err(Error::invalid_record("<case study>", "no video reference"));
        }
        if self.title.trim().is_empty() {
            return Err(Error::invalid_record(&self.video_id, "empty title"));
        }
        if self.slug.is_empty()
            || !self
                .slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(Error::invalid_record(
                &self.video_id,
                format!("invalid slug '{}'", self.slug),
            ));
        }
        Ok(())
    }
}

/// A stored playlist
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Playlist {
    pub playlist_id: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_count: i64,
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A stored video
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Video {
    pub video_id: String,
    pub playlist_id: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_default: Option<String>,
    pub thumbnail_medium: Option<String>,
    pub thumbnail_high: Option<String>,
    pub thumbnail_maxres: Option<String>,
    pub duration_seconds: i64,
    pub published_at: Option<String>,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub tags_json: String,
    pub position: i64,
    pub category: String,
    pub featured: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Video {
    pub fn tags(&self) -> Vec<String> {
        serde_json::from_str(&self.tags_json).unwrap_or_default()
    }

    /// Duration as m:ss or h:mm:ss
    pub fn duration_label(&self) -> String {
        let total = self.duration_seconds.max(0);
        let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
        if h > 0 {
            format!("{}:{:02}:{:02}", h, m, s)
        } else {
            format!("{}:{:02}", m, s)
        }
    }
}

/// A stored case study
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CaseStudy {
    pub id: String,
    pub video_id: String,
    pub title: String,
    pub slug: String,
    pub client_name: Option<String>,
    pub challenge: String,
    pub approach: String,
    pub results: String,
    pub key_takeaways_json: String,
    pub metrics_json: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_keywords_json: String,
    pub status: String,
    pub featured: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl CaseStudy {
    pub fn key_takeaways(&self) -> Vec<String> {
        serde_json::from_str(&self.key_takeaways_json).unwrap_or_default()
    }

    pub fn seo_keywords(&self) -> Vec<String> {
        serde_json::from_str(&self.seo_keywords_json).unwrap_or_default()
    }

    pub fn get_status(&self) -> Result<CaseStudyStatus> {
        self.status.parse()
    }
}
