//! Handles settings for the application.
//!
//! Values come from `config/settings.toml` (or the file given with
//! `--config`), then `TALLY__SECTION__KEY` environment variables, then the
//! command line flags.
use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/settings";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Api {
    /// Delay before every call settles.
    pub latency_ms: u64,
    /// JSON file with the initial records.
    pub seed: Option<String>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            latency_ms: 500,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Auth {
    pub token_ttl_secs: u64,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            token_ttl_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub api: Api,
    pub auth: Auth,
}

#[derive(Debug, Parser)]
#[command(name = "tally", about = "Mock expense and income tracking API")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the listening port.
    #[arg(long)]
    port: Option<u16>,
    /// Override the simulated latency, in milliseconds.
    #[arg(long)]
    latency_ms: Option<u64>,
    /// Override the seed file.
    #[arg(long)]
    seed: Option<String>,
}

impl Settings {
    fn from_sources(config_path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("TALLY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

pub fn load() -> Result<Settings> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut settings = Settings::from_sources(config_path)?;

    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if let Some(latency_ms) = args.latency_ms {
        settings.api.latency_ms = latency_ms;
    }
    if let Some(seed) = args.seed {
        settings.api.seed = Some(seed);
    }

    Ok(settings)
}
