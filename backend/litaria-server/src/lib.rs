/// Litaria Server Library
///
/// Backend for the Litaria multilingual publishing platform: posts with a
/// draft/scheduled/published lifecycle, a single lead post per language,
/// category and subcategory management, author accounts, and image uploads.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Data structures for posts, categories, users
/// - `services`: Business logic layer
/// - `db`: Database access layer and repositories
/// - `jobs`: Background jobs (scheduled publishing)
/// - `middleware`: HTTP middleware for authentication
/// - `security`: Password hashing and token issuance
/// - `uploads`: Image host client
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod models;
pub mod security;
pub mod services;
pub mod uploads;

pub use config::Config;
pub use error::{AppError, Result};
