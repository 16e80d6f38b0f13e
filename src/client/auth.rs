// Where the API token comes from
use crate::config::data_dir;
use crate::storage::LocalStorage;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

/// Supplies the token attached to authenticated requests.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// A token fixed at construction (or none, for anonymous calls such as login).
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

#[derive(Serialize, Deserialize)]
struct StoredToken {
    token: String,
}

/// Token persisted in the data directory, shared by every run of the client.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    current: RwLock<Option<String>>,
}

impl FileTokenStore {
    pub fn default_path() -> Option<PathBuf> {
        data_dir().map(|d| d.join("token.json"))
    }

    pub fn open(path: PathBuf) -> Self {
        let current = match LocalStorage::read_json::<StoredToken>(&path) {
            Ok(stored) => stored.map(|s| s.token),
            Err(e) => {
                tracing::warn!("Ignoring unreadable token file {}: {}", path.display(), e);
                None
            }
        };
        Self {
            path,
            current: RwLock::new(current),
        }
    }

    pub fn save(&self, token: &str) -> Result<()> {
        LocalStorage::write_json(
            &self.path,
            &StoredToken {
                token: token.to_string(),
            },
        )?;
        if let Ok(mut current) = self.current.write() {
            *current = Some(token.to_string());
        }
        Ok(())
    }

    /// Logout: forget the token on disk and in memory.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        if let Ok(mut current) = self.current.write() {
            *current = None;
        }
        Ok(())
    }
}

impl TokenProvider for FileTokenStore {
    fn token(&self) -> Option<String> {
        self.current.read().ok().and_then(|t| t.clone())
    }
}
