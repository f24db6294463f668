//! SQLite schema definition

/// SQL schema for the catalog database
pub const SCHEMA_SQL: &str = r#"
-- Playlists: one row per YouTube playlist
CREATE TABLE IF NOT EXISTS playlists (
    playlist_id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    thumbnail_url TEXT,
    video_count INTEGER NOT NULL DEFAULT 0,
    category TEXT NOT NULL DEFAULT 'Other',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Videos: each belongs to exactly one playlist
CREATE TABLE IF NOT EXISTS videos (
    video_id TEXT PRIMARY KEY,
    playlist_id TEXT NOT NULL REFERENCES playlists(playlist_id),
    title TEXT NOT NULL,
    description TEXT,
    thumbnail_default TEXT,
    thumbnail_medium TEXT,
    thumbnail_high TEXT,
    thumbnail_maxres TEXT,
    duration_seconds INTEGER NOT NULL DEFAULT 0,
    published_at TEXT,
    view_count INTEGER NOT NULL DEFAULT 0,
    like_count INTEGER NOT NULL DEFAULT 0,
    comment_count INTEGER NOT NULL DEFAULT 0,
    tags_json TEXT NOT NULL DEFAULT '[]',
    position INTEGER NOT NULL DEFAULT 0,
    category TEXT NOT NULL DEFAULT 'Other',
    featured INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Case studies: at most one per video
CREATE TABLE IF NOT EXISTS case_studies (
    id TEXT PRIMARY KEY,
    video_id TEXT NOT NULL UNIQUE REFERENCES videos(video_id),
    title TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    client_name TEXT,
    challenge TEXT NOT NULL DEFAULT '',
    approach TEXT NOT NULL DEFAULT '',
    results TEXT NOT NULL DEFAULT '',
    key_takeaways_json TEXT NOT NULL DEFAULT '[]',
    metrics_json TEXT,
    seo_title TEXT,
    seo_description TEXT,
    seo_keywords_json TEXT NOT NULL DEFAULT '[]',
    status TEXT NOT NULL DEFAULT 'draft' CHECK (status IN ('draft', 'published', 'archived')),
    featured INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Import runs: tracking history
CREATE TABLE IF NOT EXISTS import_runs (
    id TEXT PRIMARY KEY,
    channel_id TEXT,
    operation TEXT NOT NULL DEFAULT 'videos',
    started_at TEXT NOT NULL,
    completed_at TEXT,
    status TEXT NOT NULL,
    playlists_written INTEGER DEFAULT 0,
    videos_written INTEGER DEFAULT 0,
    case_studies_written INTEGER DEFAULT 0,
    records_failed INTEGER DEFAULT 0,
    errors_json TEXT
);

-- Indexes for the website's read queries
CREATE INDEX IF NOT EXISTS idx_videos_playlist ON videos(playlist_id, position);
CREATE INDEX IF NOT EXISTS idx_videos_category ON videos(category);
CREATE INDEX IF NOT EXISTS idx_videos_featured ON videos(featured);
CREATE INDEX IF NOT EXISTS idx_videos_published ON videos(published_at);
CREATE INDEX IF NOT EXISTS idx_case_studies_status ON case_studies(status);
CREATE INDEX IF NOT EXISTS idx_runs_started ON import_runs(started_at);
"#;
