use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{JobSearchError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerMode {
    Stdio,
    Http,
    Both,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_mode")]
    pub mode: ServerMode,
    #[serde(default)]
    pub http_addr: Option<String>,
    #[serde(default)]
    pub http_port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            http_addr: None,
            http_port: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedInConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LinkedInConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub linkedin: LinkedInConfig,
}

impl Config {
    /// Load from a YAML or JSON file, decided by extension.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| JobSearchError::Config(format!("read {}: {e}", path.display())))?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            serde_yaml::from_str(&raw)
                .map_err(|e| JobSearchError::Config(format!("parse {}: {e}", path.display())))
        } else {
            serde_json::from_str(&raw)
                .map_err(|e| JobSearchError::Config(format!("parse {}: {e}", path.display())))
        }
    }
}

fn default_mode() -> ServerMode {
    ServerMode::Stdio
}

fn default_base_url() -> String {
    "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
