//! Default values for configuration

/// Default YouTube Data API base URL
pub fn default_api_base_url() -> String {
    std::env::var("YOUTUBE_API_BASE_URL")
        .unwrap_or_else(|_| "https://www.googleapis.com/youtube/v3/".to_string())
}

/// Default environment variable name for the YouTube API key
pub fn default_api_key_env() -> String {
    "YOUTUBE_API_KEY".to_string()
}

/// Default channel to import, taken from the environment
pub fn default_channel_id() -> Option<String> {
    std::env::var("YOUTUBE_CHANNEL_ID")
        .ok()
        .filter(|id| !id.trim().is_empty())
}

/// Default page size for list calls (API maximum is 50)
pub fn default_page_size() -> u32 {
    50
}

/// Default number of video ids per details request (API maximum is 50)
pub fn default_ids_per_request() -> usize {
    50
}

/// Default API requests per second
pub fn default_requests_per_second() -> u32 {
    5
}

/// Default request timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Default user agent string
pub fn default_user_agent() -> String {
    format!("reelsync/{}", env!("CARGO_PKG_VERSION"))
}

/// Default database file override, taken from the environment
pub fn default_database_path() -> Option<std::path::PathBuf> {
    std::env::var("REELSYNC_DATABASE")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(std::path::PathBuf::from)
}

/// Default SQLite pool size
pub fn default_max_connections() -> u32 {
    5
}

/// Default page size for catalog listings
pub fn default_list_limit() -> i64 {
    20
}
