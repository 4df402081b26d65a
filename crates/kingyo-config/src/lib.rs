//! # kingyo-config
//!
//! Layered configuration loading for the Kingyo client using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`KINGYO_*` prefix, `__` as separator)
//! 2. Project-level `.kingyo/config.toml`
//! 3. User-level `~/.config/kingyo/config.toml`
//! 4. Built-in defaults
//!
//! `KINGYO_API__BASE_URL` maps to `api.base_url`, `KINGYO_AUTH__STORE` to
//! `auth.store`, and so on.
//!
//! ```no_run
//! use kingyo_config::KingyoConfig;
//!
//! let config = KingyoConfig::load_with_dotenv().expect("config");
//! println!("API root: {}", config.api.api_root());
//! ```

mod api;
mod auth;
mod error;
mod general;

pub use api::ApiConfig;
pub use auth::{AuthConfig, TokenStoreKind};
pub use error::ConfigError;
pub use general::GeneralConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const OUTPUT_FORMATS: [&str; 3] = ["json", "table", "raw"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KingyoConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl KingyoConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does not read `.env`; see [`Self::load_with_dotenv`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after populating the environment from `.env`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".kingyo/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("KINGYO_").split("__"))
    }

    /// Check cross-field constraints figment cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when the API base URL is unusable
    /// and `ConfigError::InvalidValue` for an unknown output format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "api".to_string(),
            });
        }
        if !OUTPUT_FORMATS.contains(&self.general.default_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.default_format".to_string(),
                reason: format!(
                    "expected one of {}, got '{}'",
                    OUTPUT_FORMATS.join(", "),
                    self.general.default_format
                ),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kingyo").join("config.toml"))
    }

    /// Walk up from `CARGO_MANIFEST_DIR` (or the current dir) to the first
    /// `.env`. Missing files are ignored.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
