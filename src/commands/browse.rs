//! Listing commands: what the website will read

use crate::catalog::{CatalogDb, PlaylistSummary, VideoPage, VideoQuery};
use crate::config::Config;
use crate::error::Result;
use crate::models::{CaseStudy, CaseStudyStatus, Category};
use tracing::debug;

/// List videos matching a query
pub async fn cmd_videos(config: &Config, db: &CatalogDb, mut query: VideoQuery) -> Result<VideoPage> {
    // Accept "motion-graphics" as well as the stored label
    if let Some(category) = query.category.take() {
        query.category = Some(
            category
                .parse::<Category>()
                .map(|c| c.label().to_string())
                .unwrap_or(category),
        );
    }
    debug!(?query, "Listing videos");
    db.list_videos(&query, config.database.list_limit).await
}

pub async fn cmd_playlists(db: &CatalogDb) -> Result<Vec<PlaylistSummary>> {
    db.list_playlists().await
}

pub async fn cmd_studies(db: &CatalogDb, status: Option<CaseStudyStatus>) -> Result<Vec<CaseStudy>> {
    db.list_case_studies(status).await
}

/// Print a page of videos
pub fn print_videos(page: &VideoPage) {
    if page.videos.is_empty() {
        println!("No videos match.");
        return;
    }

    println!(
        "\n🎬 Videos {}-{} of {}\n",
        page.offset + 1,
        page.offset + page.videos.len() as i64,
        page.total
    );
    for video in &page.videos {
        let star = if video.featured { "★" } else { " " };
        println!(
            "{} {}  {:>8}  {:>9} views  {}",
            star,
            video.video_id,
            video.duration_label(),
            video.view_count,
            video.title
        );
        println!(
            "    {} | {} | {}",
            video.category,
            video.playlist_id,
            video.published_at.as_deref().unwrap_or("unpublished")
        );
    }

    if page.has_more() {
        println!(
            "\nMore results: --offset {}",
            page.offset + page.videos.len() as i64
        );
    }
}

pub fn print_playlists(playlists: &[PlaylistSummary]) {
    if playlists.is_empty() {
        println!("No playlists imported. Run 'reelsync import' first.");
        return;
    }

    println!("\n📚 Playlists\n");
    for playlist in playlists {
        println!("  {} ({})", playlist.title, playlist.playlist_id);
        println!("    Category: {}", playlist.category);
        println!(
            "    Videos: {} stored of {} on YouTube, {} featured",
            playlist.stored_videos, playlist.video_count, playlist.featured_videos
        );
        println!("    Updated: {}", playlist.updated_at);
        println!();
    }
}

pub fn print_studies(studies: &[CaseStudy]) {
    if studies.is_empty() {
        println!("No case studies.");
        return;
    }

    println!("\n📝 Case Studies\n");
    for study in studies {
        println!("  {} [{}]", study.title, study.status);
        println!("    Slug: {}", study.slug);
        println!("    Video: {}", study.video_id);
        if let Some(client) = &study.client_name {
            println!("    Client: {}", client);
        }
        let takeaways = study.key_takeaways();
        if !takeaways.is_empty() {
            println!("    Takeaways: {}", takeaways.len());
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::{sample_playlist, sample_video, setup_test_db};

    #[tokio::test]
    async fn test_category_filter_accepts_slug_form() {
        let (db, _tmp) = setup_test_db().await;
        db.upsert_playlist(&sample_playlist("PL1", "Motion Graphics"))
            .await
            .unwrap();
        let mut video = sample_video("v1", "PL1", 0);
        video.category = Category::MotionGraphics;
        db.upsert_video(&video).await.unwrap();
        db.upsert_video(&sample_video("v2", "PL1", 1)).await.unwrap();

        let query = VideoQuery {
            category: Some("motion-graphics".to_string()),
            ..Default::default()
        };
        let page = cmd_videos(&Config::default(), &db, query).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.videos[0].video_id, "v1");
        assert_eq!(page.limit, Config::default().database.list_limit);
    }

    #[tokio::test]
    async fn test_listings_on_empty_catalog() {
        let (db, _tmp) = setup_test_db().await;
        assert!(cmd_playlists(&db).await.unwrap().is_empty());
        assert!(cmd_studies(&db, Some(CaseStudyStatus::Draft))
            .await
            .unwrap()
            .is_empty());
    }
}
