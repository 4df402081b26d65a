//! Persisted access and refresh tokens.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use kingyo_config::{AuthConfig, TokenStoreKind};

use crate::error::AuthError;

/// The two persisted credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub const ALL: [Self; 2] = [Self::Access, Self::Refresh];

    /// Fixed storage key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Access => "access_token",
            Self::Refresh => "refresh_token",
        }
    }
}

/// Synchronous key-value storage for the two tokens.
pub trait TokenStore: Send + Sync {
    fn get(&self, kind: TokenKind) -> Option<String>;

    /// # Errors
    ///
    /// Returns `AuthError::TokenStore` if the value cannot be persisted.
    fn set(&self, kind: TokenKind, value: &str) -> Result<(), AuthError>;

    /// Removing an absent token is not an error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStore` if stored data cannot be deleted.
    fn remove(&self, kind: TokenKind) -> Result<(), AuthError>;

    /// Short name of the backing storage, for status display.
    fn source(&self) -> &'static str;
}

/// Build the store selected by `[auth] store`.
///
/// # Errors
///
/// Returns `AuthError::TokenStore` if a file-backed store has no usable path.
pub fn open_token_store(config: &AuthConfig) -> Result<Arc<dyn TokenStore>, AuthError> {
    let file = || {
        config
            .credentials_file()
            .map(FileTokenStore::new)
            .ok_or_else(|| {
                AuthError::TokenStore(
                    "home directory not found; set auth.credentials_path".into(),
                )
            })
    };
    Ok(match config.store {
        TokenStoreKind::Memory => Arc::new(MemoryTokenStore::new()),
        TokenStoreKind::File => Arc::new(file()?),
        TokenStoreKind::Keyring => Arc::new(KeyringTokenStore::new(&config.keyring_service, file()?)),
    })
}

// --- Memory ---

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<BTreeMap<TokenKind, String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with both tokens.
    #[must_use]
    pub fn with_tokens(access: &str, refresh: &str) -> Self {
        let store = Self::new();
        {
            let mut tokens = store.tokens.lock().unwrap_or_else(PoisonError::into_inner);
            tokens.insert(TokenKind::Access, access.to_string());
            tokens.insert(TokenKind::Refresh, refresh.to_string());
        }
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
    }

    fn set(&self, kind: TokenKind, value: &str) -> Result<(), AuthError> {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind, value.to_string());
        Ok(())
    }

    fn remove(&self, kind: TokenKind) -> Result<(), AuthError> {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&kind);
        Ok(())
    }

    fn source(&self) -> &'static str {
        "memory"
    }
}

// --- File ---

/// JSON credentials file (`{"access_token": ..., "refresh_token": ...}`),
/// created with mode 0600 on Unix. The file is deleted once both tokens are
/// removed.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> BTreeMap<String, String> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&content).unwrap_or_else(|error| {
            tracing::warn!(%error, path = %self.path.display(), "ignoring unreadable credentials file");
            BTreeMap::new()
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), AuthError> {
        if map.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path).map_err(|e| {
                    AuthError::TokenStore(format!("failed to delete {}: {e}", self.path.display()))
                })?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AuthError::TokenStore(format!("mkdir {}: {e}", parent.display()))
            })?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                }
            }
        }

        let content = serde_json::to_string_pretty(map)
            .map_err(|e| AuthError::TokenStore(format!("encode credentials: {e}")))?;
        fs::write(&self.path, content)
            .map_err(|e| AuthError::TokenStore(format!("write {}: {e}", self.path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                AuthError::TokenStore(format!("chmod {}: {e}", self.path.display()))
            })?;
        }

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read_map()
            .remove(kind.key())
            .filter(|t| !t.trim().is_empty())
    }

    fn set(&self, kind: TokenKind, value: &str) -> Result<(), AuthError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = self.read_map();
        map.insert(kind.key().to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, kind: TokenKind) -> Result<(), AuthError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = self.read_map();
        if map.remove(kind.key()).is_none() && !self.path.exists() {
            return Ok(());
        }
        self.write_map(&map)
    }

    fn source(&self) -> &'static str {
        "file"
    }
}

// --- Keyring ---

/// OS keychain entries `{service}/access_token` and `{service}/refresh_token`,
/// falling back to a credentials file when the keychain is unavailable.
#[derive(Debug)]
pub struct KeyringTokenStore {
    service: String,
    fallback: FileTokenStore,
}

impl KeyringTokenStore {
    #[must_use]
    pub fn new(service: &str, fallback: FileTokenStore) -> Self {
        Self {
            service: service.to_string(),
            fallback,
        }
    }

    fn entry(&self, kind: TokenKind) -> Result<keyring::Entry, keyring::Error> {
        keyring::Entry::new(&self.service, kind.key())
    }

    /// Read through a fresh entry, the same way a later process would.
    fn read_back(&self, kind: TokenKind) -> Option<String> {
        self.entry(kind)
            .and_then(|entry| entry.get_password())
            .ok()
            .filter(|token| !token.is_empty())
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        self.read_back(kind).or_else(|| self.fallback.get(kind))
    }

    fn set(&self, kind: TokenKind, value: &str) -> Result<(), AuthError> {
        match self.entry(kind).and_then(|entry| entry.set_password(value)) {
            Ok(()) if self.read_back(kind).as_deref() == Some(value) => {
                // Drop any older copy left by an earlier fallback.
                self.fallback.remove(kind)
            }
            Ok(()) => {
                // No platform backend: keyring's mock store keeps nothing
                // across entries.
                tracing::warn!(token = kind.key(), "keyring did not retain the token; falling back to file");
                self.fallback.set(kind, value)
            }
            Err(error) => {
                tracing::warn!(%error, token = kind.key(), "keyring store failed; falling back to file");
                self.fallback.set(kind, value)
            }
        }
    }

    fn remove(&self, kind: TokenKind) -> Result<(), AuthError> {
        // A missing keychain entry is fine.
        if let Ok(entry) = self.entry(kind) {
            let _ = entry.delete_credential();
        }
        self.fallback.remove(kind)
    }

    fn source(&self) -> &'static str {
        "keyring"
    }
}
