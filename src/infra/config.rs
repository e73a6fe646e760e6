// ============================================================
// Layer 6 — Serve Configuration
// ============================================================
// Settings for the `serve` command. Resolved in two steps:
//
//   1. Defaults, or a JSON config file when `--config` is given
//      (missing keys fall back to defaults)
//   2. Any CLI flag that was passed overrides the file value
//
// Example config file:
//   {
//     "host": "0.0.0.0",
//     "port": 8080,
//     "clinical_artifact": "/srv/models/clinical",
//     "pima_artifact": "/srv/models/pima",
//     "static_dir": "static",
//     "form_bounds": "advisory"
//   }

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, net::SocketAddr, path::{Path, PathBuf}};

use crate::data::schema::BoundsPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServeConfig {
    pub host:              String,
    pub port:              u16,
    pub clinical_artifact: PathBuf,
    pub pima_artifact:     PathBuf,
    /// Serve files from here for routes the API does not claim
    pub static_dir:        Option<PathBuf>,
    /// Bounds policy for the form route
    pub form_bounds:       BoundsPolicy,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host:              "127.0.0.1".to_string(),
            port:              5000,
            clinical_artifact: PathBuf::from("artifacts/clinical"),
            pima_artifact:     PathBuf::from("artifacts/pima"),
            static_dir:        None,
            form_bounds:       BoundsPolicy::Strict,
        }
    }
}

impl ServeConfig {
    /// Defaults, or the contents of `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config in '{}'", path.display()))?;

        tracing::debug!("Loaded serve config from '{}'", path.display());
        Ok(cfg)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid host:port '{}:{}'", self.host, self.port))
    }
}
