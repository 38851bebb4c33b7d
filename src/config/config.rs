use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::store::UnionTopRequest;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub dataset_path: String,
    pub query: UnionTopRequest,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dataset_path: "dataset.json".to_string(),
            query: UnionTopRequest::default(),
        }
    }
}

/// Reads the configuration at `path`. A missing or malformed file falls back
/// to `Config::default()`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Config {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "config not found, using default configuration");
        return Config::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => {
                info!(path = %path.display(), "loaded configuration");
                return config;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "error parsing config, using default configuration");
            }
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "error reading config, using default configuration");
        }
    }

    Config::default()
}
