use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use conhook_common::constants::{DEFAULT_CONFIG_FILE_LOCATION_FROM_HOME, DEFAULT_SERVER};
use conhook_storage::StorageConfig;

const DEFAULT_CACHE_REFRESH_INTERVAL_MS: u64 = 10_000;

const CONFIG_PATH_ENV: &str = "CONHOOK_CONFIG_PATH";
const SERVER_ENV: &str = "CONHOOK_SERVER";

/// On-disk shape; everything is optional and filled with defaults when
/// finalized into [`Config`].
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ConfigFile {
    pub server: Option<String>,
    pub cache_refresh_interval_ms: Option<u64>,
    pub dry_run: Option<bool>,
    pub storage: Option<StorageConfig>,
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Daemon bind address, also used by the CLI to reach it.
    pub server: String,
    pub cache_refresh_interval_ms: u64,
    /// Log deliveries instead of performing them.
    pub dry_run: bool,
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        ConfigFile::default().finalize()
    }
}

impl ConfigFile {
    fn finalize(self) -> Config {
        Config {
            server: self.server.unwrap_or_else(|| DEFAULT_SERVER.to_string()),
            cache_refresh_interval_ms: self
                .cache_refresh_interval_ms
                .unwrap_or(DEFAULT_CACHE_REFRESH_INTERVAL_MS),
            dry_run: self.dry_run.unwrap_or(false),
            storage: self.storage.unwrap_or_default(),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    fn default_config_path() -> Option<PathBuf> {
        match homedir::get_my_home() {
            Ok(Some(home)) => Some(home.join(DEFAULT_CONFIG_FILE_LOCATION_FROM_HOME)),
            _ => None,
        }
    }

    fn load_file(path: &Path) -> Result<ConfigFile> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        toml::from_str(&raw).with_context(|| format!("invalid config file {:?}", path))
    }

    /// Loads configuration from the explicit path if given, else
    /// `$CONHOOK_CONFIG_PATH`, else the file under the home directory, else
    /// defaults. `$CONHOOK_SERVER` overrides the bind address either way.
    pub fn load_config(explicit_path: Option<&Path>) -> Result<Config> {
        let file = if let Some(p) = explicit_path {
            // An explicitly requested file must exist.
            Self::load_file(p)?
        } else {
            let path = env::var(CONFIG_PATH_ENV)
                .ok()
                .map(PathBuf::from)
                .or_else(Self::default_config_path);

            match path {
                Some(ref p) if p.exists() => Self::load_file(p)?,
                Some(_) | None => ConfigFile::default(),
            }
        };

        let mut config = file.finalize();
        if let Ok(server) = env::var(SERVER_ENV) {
            config.server = server;
        }

        Ok(config)
    }
}
