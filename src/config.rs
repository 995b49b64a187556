//! Configuration management for the SciSummarize server

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::summarize::DEFAULT_MAX_WORDS;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding uploaded binaries
    pub documents_dir: PathBuf,
    pub document_ttl_hours: i64,
    pub max_upload_bytes: usize,
    pub cleanup_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    pub max_words: usize,
    pub backend: SummaryBackend,
    /// Used by the file backend only
    pub dir: PathBuf,
}

/// Where summary versions are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryBackend {
    Sqlite,
    File,
}

impl StorageConfig {
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: "sqlite:./scisummarize.db".to_string(),
            },
            storage: StorageConfig {
                documents_dir: PathBuf::from("./storage/documents"),
                document_ttl_hours: crate::document::DEFAULT_TTL_HOURS,
                max_upload_bytes: 20 * 1024 * 1024,
                cleanup_interval_secs: 300,
            },
            summary: SummaryConfig {
                max_words: DEFAULT_MAX_WORDS,
                backend: SummaryBackend::Sqlite,
                dir: PathBuf::from("./storage/summaries"),
            },
        }
    }
}

impl Config {
    /// Read configuration from the environment
    ///
    /// Unset variables take their defaults; unparseable ones are logged and
    /// replaced by the default.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
            },
            storage: StorageConfig {
                documents_dir: env::var("STORAGE_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.documents_dir),
                document_ttl_hours: parse_var(
                    "DOCUMENT_TTL_HOURS",
                    defaults.storage.document_ttl_hours,
                ),
                max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", defaults.storage.max_upload_bytes),
                cleanup_interval_secs: parse_var(
                    "CLEANUP_INTERVAL_SECS",
                    defaults.storage.cleanup_interval_secs,
                ),
            },
            summary: SummaryConfig {
                max_words: parse_var("SUMMARY_MAX_WORDS", defaults.summary.max_words),
                backend: match env::var("SUMMARY_BACKEND")
                    .unwrap_or_else(|_| "sqlite".to_string())
                    .to_lowercase()
                    .as_str()
                {
                    "file" => SummaryBackend::File,
                    "sqlite" => SummaryBackend::Sqlite,
                    other => {
                        tracing::warn!("Unknown SUMMARY_BACKEND {:?}, using sqlite", other);
                        SummaryBackend::Sqlite
                    }
                },
                dir: env::var("SUMMARY_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.summary.dir),
            },
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value {:?} for {}, using {}", raw, name, default);
            default
        }),
        Err(_) => default,
    }
}
