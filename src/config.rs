use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::lists::DEFAULT_MAX_COMPARISONS;
use crate::session::DEFAULT_SESSION_TIMEOUT;

/// Base URL used when no catalog API is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the catalog API
    #[arg(long, env = "API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Directory served for static assets
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub session: SessionConfig,
    pub comparison: ComparisonConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub static_dir: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ComparisonConfig {
    pub max_items: usize,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Layer defaults, an optional config file, `CATALOG_*` environment
    /// variables and finally CLI flags (or their direct env equivalents).
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", 8080)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.static_dir", "public")?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("catalog.base_url", DEFAULT_API_BASE_URL)?
            .set_default("catalog.timeout_secs", 3)?
            .set_default("session.cookie_name", "catalog_session")?
            .set_default("session.ttl_secs", DEFAULT_SESSION_TIMEOUT.as_secs())?
            .set_default("comparison.max_items", DEFAULT_MAX_COMPARISONS as u64)?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // E.g. CATALOG_SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix("CATALOG")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Priority: CLI flag > its env var > CATALOG_* env > config file > defaults.
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(url) = cli.api_base_url.filter(|u| !u.trim().is_empty()) {
            builder = builder.set_override("catalog.base_url", url)?;
        }
        if let Some(dir) = cli.static_dir {
            builder = builder.set_override("server.static_dir", dir)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session.ttl_secs)
    }
}
