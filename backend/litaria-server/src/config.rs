/// Configuration management for litaria-server
///
/// All settings come from environment variables with development-friendly
/// defaults. Values that would be unsafe in production (wildcard CORS, the
/// default JWT secret, empty image-host credentials) are rejected when
/// APP_ENV=production.
use anyhow::bail;
use serde::{Deserialize, Serialize};

const DEFAULT_JWT_SECRET: &str = "litaria-dev-secret-change-me";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub uploads: UploadConfig,
    pub sweeper: SweeperConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Auth token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Access token lifetime in hours
    pub token_expiry_hours: i64,
}

/// Image host (Cloudinary) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Folder uploads are organized under
    pub folder: String,
    /// Maximum accepted upload size in bytes
    pub max_file_bytes: usize,
}

/// Scheduled-publish sweeper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweeperConfig {
    /// Seconds between sweep cycles
    pub interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
            Ok(value) => value,
            Err(_) if production => {
                bail!("CORS_ALLOWED_ORIGINS must be set in production")
            }
            Err(_) => "http://localhost:3000".to_string(),
        };
        if production && allowed_origins.trim() == "*" {
            bail!("CORS_ALLOWED_ORIGINS cannot be '*' in production");
        }

        let jwt_secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string());
        if production && jwt_secret == DEFAULT_JWT_SECRET {
            bail!("JWT_SECRET must be set to a non-default value in production");
        }

        let api_secret = std::env::var("CLOUDINARY_API_SECRET").unwrap_or_default();
        if production && api_secret.trim().is_empty() {
            bail!("CLOUDINARY_API_SECRET must be set in production");
        }

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("LITARIA_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("LITARIA_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            cors: CorsConfig { allowed_origins },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/litaria".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            auth: AuthConfig {
                jwt_secret,
                token_expiry_hours: std::env::var("JWT_EXPIRY_HOURS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(24),
            },
            uploads: UploadConfig {
                cloud_name: std::env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
                api_key: std::env::var("CLOUDINARY_API_KEY").unwrap_or_default(),
                api_secret,
                folder: std::env::var("CLOUDINARY_FOLDER")
                    .unwrap_or_else(|_| "litaria-posts".to_string()),
                max_file_bytes: std::env::var("UPLOAD_MAX_FILE_BYTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5 * 1024 * 1024),
            },
            sweeper: SweeperConfig {
                interval_secs: std::env::var("SWEEPER_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(300),
            },
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state; keep them to defaults that do not
    // collide with variables the harness sets.
    #[test]
    fn defaults_are_development_friendly() {
        std::env::remove_var("APP_ENV");
        std::env::remove_var("CORS_ALLOWED_ORIGINS");
        std::env::remove_var("JWT_SECRET");
        let cfg = Config::from_env().expect("default config should load");
        assert_eq!(cfg.app.port, 8080);
        assert_eq!(cfg.sweeper.interval_secs, 300);
        assert!(!cfg.is_production());
    }
}
