//! reelsync CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use reelsync::{
    catalog::{CatalogDb, VideoQuery, VideoSort, SCHEMA_SQL},
    commands::{
        cmd_import, cmd_import_case_studies, cmd_init, cmd_playlists, cmd_set_featured,
        cmd_status, cmd_studies, cmd_videos, print_case_study_stats, print_import_stats,
        print_playlists, print_status, print_studies, print_videos, ImportOptions, InitOptions,
    },
    config::Config,
    error::Result,
    models::CaseStudyStatus,
    progress::LogWriterFactory,
    youtube::YouTubeClient,
};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "reelsync")]
#[command(version, about = "Import a YouTube channel catalog into the studio website database", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "REELSYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config and create the catalog schema
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Import the channel's playlists and videos
    Import {
        /// Only import these playlist IDs
        #[arg(long)]
        playlist: Option<Vec<String>>,

        /// Channel to import (overrides config)
        #[arg(long, env = "YOUTUBE_CHANNEL_ID")]
        channel: Option<String>,
    },

    /// Import case studies from a JSON file and feature their videos
    CaseStudies {
        /// JSON array of case studies
        file: PathBuf,
    },

    /// Mark a video as featured
    Feature {
        /// YouTube video ID
        video_id: String,
    },

    /// Clear a video's featured flag
    Unfeature {
        /// YouTube video ID
        video_id: String,
    },

    /// List videos as the website sees them
    Videos {
        /// Only videos from this playlist
        #[arg(long)]
        playlist: Option<String>,

        /// Only this category (e.g. "VFX" or motion-graphics)
        #[arg(long)]
        category: Option<String>,

        /// Only featured videos
        #[arg(long, conflicts_with = "not_featured")]
        featured: bool,

        /// Only videos that are not featured
        #[arg(long)]
        not_featured: bool,

        /// Match title or description
        #[arg(short, long)]
        search: Option<String>,

        /// Only videos with this tag
        #[arg(long)]
        tag: Option<String>,

        /// Minimum duration in seconds
        #[arg(long)]
        min_duration: Option<i64>,

        /// Maximum duration in seconds
        #[arg(long)]
        max_duration: Option<i64>,

        /// Sort order
        #[arg(long, value_enum, default_value_t = VideoSort::Newest)]
        sort: VideoSort,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<i64>,

        /// Skip this many results
        #[arg(long, default_value = "0")]
        offset: i64,
    },

    /// List playlists with stored video counts
    Playlists,

    /// List case studies
    Studies {
        /// Only this status (draft, published, archived)
        #[arg(long)]
        status: Option<String>,
    },

    /// Show configuration and catalog status
    Status,

    /// Manage the catalog database
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Database management actions
#[derive(Subcommand)]
enum DbAction {
    /// Create the catalog tables (safe to re-run)
    Init,

    /// Print the schema DDL
    Schema,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(kind = %e.kind(), "{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(LogWriterFactory))
        .with(filter)
        .init();

    // Commands that need neither config nor database
    match &cli.command {
        Commands::Init { force } => return handle_init(cli.config.clone(), *force).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "reelsync", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Db {
            action: DbAction::Schema,
        } => {
            println!("{}", SCHEMA_SQL.trim());
            return Ok(());
        }
        _ => {}
    }

    let config_path = cli.config.clone().unwrap_or_else(Config::default_config_path);
    let mut config = Config::load_or_default(&config_path)?;

    let db = match cli.command {
        Commands::Status => CatalogDb::connect(&config).await?,
        _ => CatalogDb::open_initialized(&config).await?,
    };

    let result = dispatch(cli.command, cli.json, &mut config, &db).await;
    db.close().await;
    result
}

async fn dispatch(command: Commands, json: bool, config: &mut Config, db: &CatalogDb) -> Result<()> {
    match command {
        Commands::Import { playlist, channel } => {
            if let Some(channel) = channel {
                config.youtube.channel_id = Some(channel);
            }
            // Fail on missing credentials before any network call
            let credentials = config.import_credentials()?;
            let client = YouTubeClient::new(&config.youtube, credentials.api_key)?;

            let options = ImportOptions {
                channel_id: credentials.channel_id,
                playlist_ids: playlist,
            };
            let stats = cmd_import(config, db, &client, options).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_import_stats(&stats);
            }
        }

        Commands::CaseStudies { file } => {
            let stats = cmd_import_case_studies(db, &file).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_case_study_stats(&stats);
            }
        }

        Commands::Feature { video_id } => {
            let video = cmd_set_featured(db, &video_id, true).await?;
            print_featured(&video, json)?;
        }

        Commands::Unfeature { video_id } => {
            let video = cmd_set_featured(db, &video_id, false).await?;
            print_featured(&video, json)?;
        }

        Commands::Videos {
            playlist,
            category,
            featured,
            not_featured,
            search,
            tag,
            min_duration,
            max_duration,
            sort,
            limit,
            offset,
        } => {
            let query = VideoQuery {
                playlist_id: playlist,
                category,
                featured: match (featured, not_featured) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                search,
                tag,
                min_duration,
                max_duration,
                sort,
                limit,
                offset,
            };
            let page = cmd_videos(config, db, query).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                print_videos(&page);
            }
        }

        Commands::Playlists => {
            let playlists = cmd_playlists(db).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&playlists)?);
            } else {
                print_playlists(&playlists);
            }
        }

        Commands::Studies { status } => {
            let status = status.map(|s| s.parse::<CaseStudyStatus>()).transpose()?;
            let studies = cmd_studies(db, status).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&studies)?);
            } else {
                print_studies(&studies);
            }
        }

        Commands::Status => {
            let status = cmd_status(config, db).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_status(&status);
            }
        }

        Commands::Db {
            action: DbAction::Init,
        } => {
            db.init_schema().await?;
            if json {
                println!(r#"{{"status": "ok", "message": "Catalog schema initialized"}}"#);
            } else {
                println!("✓ Catalog schema initialized at {}", config.paths.db_file.display());
            }
        }

        Commands::Init { .. }
        | Commands::Completions { .. }
        | Commands::Db {
            action: DbAction::Schema,
        } => unreachable!(),
    }

    Ok(())
}

fn print_featured(video: &reelsync::models::Video, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(video)?);
    } else if video.featured {
        println!("★ Featured {} ({})", video.video_id, video.title);
    } else {
        println!("✓ Unfeatured {} ({})", video.video_id, video.title);
    }
    Ok(())
}

async fn handle_init(config: Option<PathBuf>, force: bool) -> Result<()> {
    // A .toml path names the file; anything else names the directory
    let (base_dir, config_path) = match config {
        Some(path) if path.extension().is_some_and(|e| e == "toml") => {
            let base = path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(Config::default_base_dir);
            (base, path)
        }
        Some(dir) => (dir.clone(), dir.join("config.toml")),
        None => {
            let base = Config::default_base_dir();
            (base.clone(), base.join("config.toml"))
        }
    };

    let config = cmd_init(InitOptions {
        base_dir,
        config_path,
        force,
    })
    .await?;

    println!("✓ reelsync initialized successfully");
    println!("  Config: {}", config.paths.config_file.display());
    println!("  Catalog: {}", config.paths.db_file.display());
    println!("\nNext steps:");
    println!("  1. export YOUTUBE_API_KEY=... and YOUTUBE_CHANNEL_ID=...");
    println!("  2. Import the channel: reelsync import");
    println!("  3. Import case studies: reelsync case-studies studies.json");

    Ok(())
}
