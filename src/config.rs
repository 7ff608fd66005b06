use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Port used when neither flag, `PORT`, nor config file sets one
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EventgraphConfig {
    pub host: String,
    pub port: u16,
    /// JSON dataset to seed from; the bundled one when unset
    pub dataset: Option<String>,
    pub playground: bool,
}

impl Default for EventgraphConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            dataset: None,
            playground: true,
        }
    }
}

impl EventgraphConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("eventgraph.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<EventgraphConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: EventgraphConfig = toml::from_str(&contents)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &EventgraphConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Parse a `PORT` value. Unset or blank means "not configured".
pub fn parse_port(raw: Option<&str>) -> anyhow::Result<Option<u16>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<u16>()
            .map(Some)
            .with_context(|| format!("PORT must be a port number, got {:?}", value)),
    }
}

pub fn port_from_env() -> anyhow::Result<Option<u16>> {
    parse_port(std::env::var("PORT").ok().as_deref())
}

/// Pick the listen port: flag, then `PORT`, then the config file
pub fn resolve_port(flag: Option<u16>, env: Option<u16>, config: &EventgraphConfig) -> u16 {
    flag.or(env).unwrap_or(config.port)
}
