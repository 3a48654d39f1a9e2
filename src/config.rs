use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_DATA_DIR: &str = ".storycanvas";

/// Runtime configuration for the sync core. The backend base URL and the
/// local data directory are the only externally supplied parameters; both
/// are fixed at construction time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn new(api_base_url: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_base_url: trim_trailing_slash(api_base_url.into()),
            data_dir: data_dir.into(),
        }
    }

    /// Read configuration from `STORYCANVAS_API_URL` and
    /// `STORYCANVAS_DATA_DIR`, falling back to defaults.
    pub fn from_env() -> Self {
        let api_base_url = std::env::var("STORYCANVAS_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let data_dir = std::env::var("STORYCANVAS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        Self::new(api_base_url, data_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, DEFAULT_DATA_DIR)
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
