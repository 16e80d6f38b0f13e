use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// `Authorization: Token <key>`
    #[default]
    Token,
    /// `Authorization: Bearer <key>`
    Bearer,
}

impl AuthScheme {
    pub fn header_value(&self, token: &str) -> String {
        match self {
            AuthScheme::Token => format!("Token {}", token),
            AuthScheme::Bearer => format!("Bearer {}", token),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub auth_scheme: AuthScheme,
    #[serde(default)]
    pub allow_insecure_certs: bool,
    /// Board title or id to open on start.
    #[serde(default)]
    pub default_board: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
            auth_scheme: AuthScheme::default(),
            allow_insecure_certs: false,
            default_board: None,
            log_level: default_log_level(),
        }
    }
}

/// Config directory, honouring `TASKMY_CONFIG_DIR` for isolated runs.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = env::var("TASKMY_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "taskmy", "taskmy").map(|p| p.config_dir().to_path_buf())
}

/// Data directory (token, cache, logs), honouring `TASKMY_DATA_DIR`.
pub fn data_dir() -> Option<PathBuf> {
    if let Ok(dir) = env::var("TASKMY_DATA_DIR") {
        return Some(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "taskmy", "taskmy").map(|p| p.data_dir().to_path_buf())
}

impl Config {
    pub fn path() -> Option<PathBuf> {
        config_dir().map(|d| d.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path().context("No config directory available")?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read config at {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config at {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::path().context("No config directory available")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        crate::storage::LocalStorage::atomic_write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_fills_defaults() {
        let cfg: Config = toml::from_str(r#"api_url = "https://kanban.example/api""#).unwrap();
        assert_eq!(cfg.api_url, "https://kanban.example/api");
        assert_eq!(cfg.auth_scheme, AuthScheme::Token);
        assert!(cfg.token.is_none());
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn test_scheme_header() {
        let cfg: Config = toml::from_str(r#"auth_scheme = "bearer""#).unwrap();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.auth_scheme.header_value("abc"), "Bearer abc");
        assert_eq!(AuthScheme::Token.header_value("abc"), "Token abc");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "token = \"k\"\nallow_insecure_certs = true\n").unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.token.as_deref(), Some("k"));
        assert!(cfg.allow_insecure_certs);
        assert!(Config::load_from(&dir.path().join("missing.toml")).is_err());
    }
}
