//! reelsync - Imports a YouTube channel catalog into the studio website database
//!
//! This crate provides:
//! - A paginating YouTube Data API client behind the `CatalogSource` trait
//! - Normalization of playlists and videos into catalog records
//! - Idempotent upserts into a SQLite catalog, plus case study import
//! - The read queries the website issues, exposed as listing commands

pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod progress;
pub mod upsert;
pub mod youtube;

pub use config::Config;
pub use error::{Error, Result};
