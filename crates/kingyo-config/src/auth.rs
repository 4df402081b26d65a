//! Credential storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the access and refresh tokens are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    /// OS keychain, falling back to the credentials file.
    #[default]
    Keyring,
    /// Credentials file only.
    File,
    /// Process memory; tokens vanish on exit.
    Memory,
}

fn default_keyring_service() -> String {
    "kingyo".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub store: TokenStoreKind,

    /// Keyring service name the two token entries live under.
    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,

    /// Credentials file. Empty means `~/.kingyo/credentials.json`.
    #[serde(default)]
    pub credentials_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            store: TokenStoreKind::default(),
            keyring_service: default_keyring_service(),
            credentials_path: String::new(),
        }
    }
}

impl AuthConfig {
    /// Resolved credentials file path, or `None` when no home directory exists
    /// and none was configured.
    #[must_use]
    pub fn credentials_file(&self) -> Option<PathBuf> {
        if !self.credentials_path.is_empty() {
            return Some(PathBuf::from(&self.credentials_path));
        }
        dirs::home_dir().map(|home| home.join(".kingyo").join("credentials.json"))
    }
}
