use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::conditional::{Comparison, ObservationMode};

/// Environment variable naming a YAML configuration file.
pub const CONFIG_ENV: &str = "REVALIDATE_CONFIG";
/// Environment variable overriding `listen_addr`.
pub const LISTEN_ENV: &str = "LISTEN";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// Directory the static file handler serves from.
    pub root_dir: PathBuf,
    /// Comparison used when matching `If-None-Match` against `ETag`.
    pub etag_comparison: Comparison,
    /// When the demo computes entity-tags. `after_response` hashes the body;
    /// the other modes derive the tag from the file's size and mtime.
    pub etag_mode: ObservationMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            root_dir: PathBuf::from("public"),
            etag_comparison: Comparison::Weak,
            etag_mode: ObservationMode::AfterResponse,
        }
    }
}

impl Config {
    /// Loads the YAML file named by `REVALIDATE_CONFIG` (defaults when unset),
    /// then applies the `LISTEN` override.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var(LISTEN_ENV) {
            cfg.listen_addr = listen_addr;
        }

        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }
}
