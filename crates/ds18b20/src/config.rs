//! Configuration for sensor reads.
//!
//! Config file: `~/.config/ds18b20/config.toml` or `/etc/ds18b20/config.toml`.
//! `$DS18B20_CONFIG` overrides both.
//!
//! ```toml
//! devices_root = "/sys/bus/w1/devices"
//! master = "w1_bus_master1"
//! retry = 2
//!
//! [aliases]
//! attic = "28-000005e2fdc3"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::discovery::{Discovery, DEFAULT_MASTER};
use crate::reader::{FileReader, RawReader, W1_DEVICES_PATH};
use crate::sensor::Sensor;

pub const CONFIG_ENV: &str = "DS18B20_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ds18b20Config {
    /// Directory holding one-wire device nodes
    #[serde(default = "default_devices_root")]
    pub devices_root: PathBuf,

    /// Bus master whose slave listing is used for discovery
    #[serde(default = "default_master")]
    pub master: String,

    /// Extra attempts after a failed read
    #[serde(default)]
    pub retry: u32,

    /// Friendly name -> sensor id
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

fn default_devices_root() -> PathBuf {
    PathBuf::from(W1_DEVICES_PATH)
}

fn default_master() -> String {
    DEFAULT_MASTER.to_string()
}

impl Default for Ds18b20Config {
    fn default() -> Self {
        Self {
            devices_root: default_devices_root(),
            master: default_master(),
            retry: 0,
            aliases: BTreeMap::new(),
        }
    }
}

impl Ds18b20Config {
    /// Get default user config path: ~/.config/ds18b20/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ds18b20").join("config.toml"))
    }

    /// Get system config path: /etc/ds18b20/config.toml
    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/ds18b20/config.toml")
    }

    /// Load configuration
    ///
    /// Priority:
    /// 1. $DS18B20_CONFIG
    /// 2. User config (~/.config/ds18b20/config.toml)
    /// 3. System config (/etc/ds18b20/config.toml)
    /// 4. Defaults
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load_from_path(Path::new(&path));
        }

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from_path(&user_path);
            }
        }

        let system_path = Self::system_config_path();
        if system_path.exists() {
            return Self::load_from_path(&system_path);
        }

        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Ds18b20Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Map an alias to its sensor id; anything else is returned unchanged.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn reader(&self) -> FileReader {
        FileReader::with_root(&self.devices_root)
    }

    pub fn discovery(&self) -> Discovery {
        Discovery::new(&self.devices_root, &self.master)
    }

    /// Sensor for `name` (alias or id) reading from the configured root.
    pub fn sensor(&self, name: &str) -> crate::Result<Sensor> {
        let reader: Arc<dyn RawReader> = Arc::new(self.reader());
        Sensor::with_reader(self.resolve(name), i64::from(self.retry), Some(reader))
    }
}
