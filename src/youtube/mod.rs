//! YouTube Data API access
//!
//! This module provides:
//! - The `CatalogSource` seam the importer reads from
//! - A paginating client for playlists, playlist items and video details
//! - Request throttling

mod rate_limit;
mod types;

pub use rate_limit::*;
pub use types::*;

use crate::config::YouTubeConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Where the importer gets its catalog from
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Every playlist of a channel
    async fn playlists(&self, channel_id: &str) -> Result<Vec<RemotePlaylist>>;

    /// Every item of a playlist, in source order
    async fn playlist_items(&self, playlist_id: &str) -> Result<Vec<RemotePlaylistItem>>;

    /// Detail records for the given videos; unknown ids are simply absent
    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<RemoteVideo>>;
}

/// YouTube Data API v3 client
pub struct YouTubeClient {
    client: Client,
    base_url: Url,
    api_key: String,
    page_size: u32,
    ids_per_request: usize,
    limiter: ApiRateLimiter,
}

impl YouTubeClient {
    /// Create a new client
    pub fn new(config: &YouTubeConfig, api_key: String) -> Result<Self> {
        // Url::join drops the last segment unless the base ends with '/'
        let mut base = config.api_base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key,
            page_size: config.page_size.clamp(1, 50),
            ids_per_request: config.ids_per_request.clamp(1, 50),
            limiter: ApiRateLimiter::new(config.requests_per_second),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Config(format!("Invalid YouTube API URL: {}", e)))
    }

    /// Fetch a single page
    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        page_token: Option<&str>,
    ) -> Result<Page<T>> {
        let mut url = self.endpoint(path)?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
            query.append_pair("key", &self.api_key);
        }

        self.limiter.wait().await;
        debug!(path, page_token = page_token.unwrap_or(""), "YouTube API request");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        Ok(response.json::<Page<T>>().await?)
    }

    /// Follow `nextPageToken` until the listing is exhausted
    async fn paginate<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut seen_tokens: HashSet<String> = HashSet::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page: Page<T> = self.get_page(path, params, page_token.as_deref()).await?;
            pages += 1;
            items.extend(page.items);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => {
                    if !seen_tokens.insert(token.clone()) {
                        return Err(Error::Pagination(format!(
                            "{} returned page token '{}' twice",
                            path, token
                        )));
                    }
                    page_token = Some(token);
                }
                None => break,
            }
        }

        debug!(path, pages, items = items.len(), "Listing complete");
        Ok(items)
    }
}

/// Turn a non-2xx response body into an API error
fn api_error(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => Error::Api {
            status,
            reason: envelope.error.reason().to_string(),
            message: envelope.error.message,
        },
        Err(_) => Error::Api {
            status,
            reason: "unknown".to_string(),
            message: body.chars().take(200).collect(),
        },
    }
}

#[async_trait]
impl CatalogSource for YouTubeClient {
    async fn playlists(&self, channel_id: &str) -> Result<Vec<RemotePlaylist>> {
        info!(channel_id, "Fetching playlists");
        let params = [
            ("part", "snippet,contentDetails".to_string()),
            ("channelId", channel_id.to_string()),
            ("maxResults", self.page_size.to_string()),
        ];
        self.paginate("playlists", &params).await
    }

    async fn playlist_items(&self, playlist_id: &str) -> Result<Vec<RemotePlaylistItem>> {
        debug!(playlist_id, "Fetching playlist items");
        let params = [
            ("part", "snippet,contentDetails".to_string()),
            ("playlistId", playlist_id.to_string()),
            ("maxResults", self.page_size.to_string()),
        ];
        self.paginate("playlistItems", &params).await
    }

    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<RemoteVideo>> {
        let mut videos = Vec::with_capacity(video_ids.len());

        for batch in video_ids.chunks(self.ids_per_request) {
            let params = [
                ("part", "snippet,contentDetails,statistics".to_string()),
                ("id", batch.join(",")),
                ("maxResults", batch.len().to_string()),
            ];
            let page: Page<RemoteVideo> = self.get_page("videos", &params, None).await?;
            videos.extend(page.items);
        }

        Ok(videos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, ids_per_request: usize) -> YouTubeClient {
        let config = YouTubeConfig {
            api_base_url: format!("{}/youtube/v3", server.uri()),
            requests_per_second: 1000,
            ids_per_request,
            timeout_secs: 5,
            ..YouTubeConfig::default()
        };
        YouTubeClient::new(&config, "test-key".to_string()).expect("client should build")
    }

    #[tokio::test]
    async fn test_playlists_follow_page_tokens() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/youtube/v3/playlists"))
            .and(query_param("channelId", "UCstudio"))
            .and(query_param("key", "test-key"))
            .and(query_param_is_missing("pageToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"id": "PL1", "snippet": {"title": "Motion Graphics"}, "contentDetails": {"itemCount": 4}},
                    {"id": "PL2", "snippet": {"title": "VFX Breakdowns"}, "contentDetails": {"itemCount": 2}}
                ],
                "nextPageToken": "page2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/youtube/v3/playlists"))
            .and(query_param("pageToken", "page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"id": "PL3", "snippet": {"title": "Music Videos"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, 50);
        let playlists = client.playlists("UCstudio").await.unwrap();

        let ids: Vec<&str> = playlists.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["PL1", "PL2", "PL3"]);
        assert_eq!(playlists[0].content_details.item_count, Some(4));
        assert_eq!(playlists[2].content_details.item_count, None);
    }

    #[tokio::test]
    async fn test_playlist_items_keep_source_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/youtube/v3/playlistItems"))
            .and(query_param("playlistId", "PL1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"snippet": {"title": "First", "position": 0, "resourceId": {"videoId": "v1"}},
                     "contentDetails": {"videoId": "v1"}},
                    {"snippet": {"title": "Second", "position": 1, "resourceId": {"videoId": "v2"}}}
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, 50);
        let items = client.playlist_items("PL1").await.unwrap();
        let ids: Vec<Option<&str>> = items.iter().map(|i| i.video_id()).collect();
        assert_eq!(ids, vec![Some("v1"), Some("v2")]);
    }

    #[tokio::test]
    async fn test_video_details_are_batched() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/youtube/v3/videos"))
            .and(query_param("id", "a,b"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"id": "a", "contentDetails": {"duration": "PT1M"}},
                    {"id": "b", "contentDetails": {"duration": "PT2M"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/youtube/v3/videos"))
            .and(query_param("id", "c"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": "c", "statistics": {"viewCount": "12"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, 2);
        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let videos = client.video_details(&ids).await.unwrap();

        assert_eq!(videos.len(), 3);
        assert_eq!(videos[2].statistics.view_count.as_deref(), Some("12"));
    }

    #[tokio::test]
    async fn test_api_error_envelope_is_fatal() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/youtube/v3/playlists"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {
                    "code": 403,
                    "message": "The request cannot be completed because you have exceeded your quota.",
                    "errors": [{"reason": "quotaExceeded", "domain": "youtube.quota"}]
                }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, 50);
        let err = client.playlists("UCstudio").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Fatal);
        match err {
            Error::Api { status, reason, .. } => {
                assert_eq!(status, 403);
                assert_eq!(reason, "quotaExceeded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_repeated_page_token_aborts() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/youtube/v3/playlistItems"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [],
                "nextPageToken": "stuck"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, 50);
        let err = client.playlist_items("PL1").await.unwrap_err();
        assert!(matches!(err, Error::Pagination(_)));
        assert_eq!(err.kind(), ErrorKind::Fatal);
    }

    #[test]
    fn test_api_error_without_envelope() {
        let err = api_error(500, "<html>backend error</html>");
        match err {
            Error::Api { status, reason, message } => {
                assert_eq!(status, 500);
                assert_eq!(reason, "unknown");
                assert!(message.contains("backend error"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
