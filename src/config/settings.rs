use std::path::{Path, PathBuf};

use buddyvault_error::{ensure, StatusCode, VaultResult};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{engine::policy::BuddyListSettings, logging::LoggingConfig};

/// Prefix of environment overrides, e.g. `BUDDYVAULT_STORAGE__ZONE=lobby`.
pub const ENV_PREFIX: &str = "BUDDYVAULT";

/// Where records live: `<root>/<zone>/<storage-key>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub root: PathBuf,
    /// Names the sub-directory of one application zone.
    pub zone: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data/buddylists"),
            zone: "default".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn dir(&self) -> PathBuf {
        self.root.join(&self.zone)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageConfig,
    pub buddy_list: BuddyListSettings,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Defaults overridden by `BUDDYVAULT_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Defaults, then `file` if given, then the environment.
    pub fn load_from(file: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("storage.root", defaults.storage.root.display().to_string())?
            .set_default("storage.zone", defaults.storage.zone)?
            .set_default(
                "buddy_list.allow_offline_variables",
                defaults.buddy_list.allow_offline_variables,
            )?
            .set_default(
                "buddy_list.max_buddy_list_size",
                defaults.buddy_list.max_buddy_list_size as u64,
            )?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format.as_str())?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }

        let cfg = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        cfg.try_deserialize()
    }

    /// Rejects settings the store cannot work with.
    pub fn validate(&self) -> VaultResult<()> {
        let zone = &self.storage.zone;
        ensure!(
            !zone.is_empty(),
            StatusCode::InvalidArgs,
            "storage.zone cannot be empty"
        );
        ensure!(
            !zone.contains(['/', '\\']) && zone != "." && zone != "..",
            StatusCode::InvalidArgs,
            "storage.zone '{}' must be a single path component",
            zone
        );
        ensure!(
            self.buddy_list.max_buddy_list_size > 0,
            StatusCode::InvalidArgs,
            "buddy_list.max_buddy_list_size must be positive"
        );
        Ok(())
    }
}
