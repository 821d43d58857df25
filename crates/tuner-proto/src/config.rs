use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub tuner: TunerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Port to listen on. 0 binds an OS-assigned free port; the bound
    /// address is logged at startup.
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory the web UI is served from.
    #[serde(default = "default_web_root")]
    pub web_root: PathBuf,
    /// Directory effector commands are resolved against.
    #[serde(default = "default_effector_dir")]
    pub effector_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TunerConfig {
    /// Command invoked for `/auto/stop`, relative to `paths.effector_dir`.
    #[serde(default = "default_stop_command")]
    pub stop_command: String,
    /// Path to the channel lineup TOML file.
    #[serde(default = "default_channels_toml")]
    pub channels_toml: PathBuf,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            web_root: default_web_root(),
            effector_dir: default_effector_dir(),
        }
    }
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            stop_command: default_stop_command(),
            channels_toml: default_channels_toml(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            paths: PathsConfig::default(),
            tuner: TunerConfig::default(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8088
}

fn default_web_root() -> PathBuf {
    PathBuf::from("www")
}

fn default_effector_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_stop_command() -> String {
    "stop".to_string()
}

fn default_channels_toml() -> PathBuf {
    platform::config_dir().join("channels.toml")
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
