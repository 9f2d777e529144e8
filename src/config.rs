use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::passages::Tier;
use crate::session::DEFAULT_DURATION_SECS;
use crate::store::{self, Storage, DURATION_KEY, PLAYER_NAME_KEY, TIER_KEY};

/// Startup defaults, overridden by stored preferences and CLI flags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub tier: String,
    pub duration_secs: u32,
    pub player_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tier: Tier::Medium.key().to_string(),
            duration_secs: DEFAULT_DURATION_SECS,
            player_name: String::new(),
        }
    }
}

impl Config {
    pub fn tier(&self) -> Tier {
        Tier::from_key(&self.tier)
    }
}

/// Effective session settings after layering flags, stored preferences and config
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub tier: Tier,
    pub duration_secs: u32,
    pub player_name: String,
}

impl Settings {
    pub fn resolve(
        tier: Option<Tier>,
        duration_secs: Option<u32>,
        player_name: Option<String>,
        config: &Config,
        store: &dyn Storage,
    ) -> Self {
        let tier = tier.unwrap_or_else(|| {
            Tier::from_key(&store::load_or(store, TIER_KEY, config.tier.clone()))
        });
        let duration_secs = duration_secs
            .unwrap_or_else(|| store::load_or(store, DURATION_KEY, config.duration_secs));
        let player_name = player_name.unwrap_or_else(|| {
            store::load_or(store, PLAYER_NAME_KEY, config.player_name.clone())
        });

        Self {
            tier,
            duration_secs,
            player_name,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("harf_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => cfg,
                Err(e) => {
                    log::warn!("ignoring malformed config {}: {e}", self.path.display());
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
