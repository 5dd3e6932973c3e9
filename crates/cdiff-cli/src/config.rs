use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cdiff_engine::{CompareOptions, MapResolver};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "cdiff.toml";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub engine: CompareOptions,
    /// Name of the remote environment, e.g. "Production".
    pub remote_label: Option<String>,
    /// JSON object mapping asset IDs to filenames.
    pub asset_labels: Option<PathBuf>,
}

impl CliConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load `path`, or `./cdiff.toml` if it exists, or fall back to defaults.
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    debug!(path = %default.display(), "using config from working directory");
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Load an asset label file: `{ "12": "hero.jpg", ... }`.
pub fn load_asset_labels(path: &Path) -> anyhow::Result<MapResolver> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading asset labels {}", path.display()))?;
    let raw: HashMap<String, String> = serde_json::from_str(&text)
        .with_context(|| format!("parsing asset labels {}", path.display()))?;

    let mut resolver = MapResolver::default();
    for (id, name) in raw {
        match id.parse::<i64>() {
            Ok(id) => resolver.insert(id, name),
            Err(_) => warn!(key = %id, "ignoring non-numeric asset id"),
        }
    }
    Ok(resolver)
}
