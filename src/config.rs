use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Directory name used when no data dir is configured: `<cwd>/.store`.
pub const DEFAULT_STORE_DIR: &str = ".store";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MemguardConfig {
    pub log: LogConfig,
    pub guard: GuardConfig,
    pub stats: StatsConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

/// Where to find the store's data directory and which tool calls to guard.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GuardConfig {
    /// Integration file, relative to the working directory.
    pub integration_file: String,
    /// Key of the store's server under `mcpServers`.
    pub service: String,
    /// Argument whose value is the data directory.
    pub data_dir_flag: String,
    /// Only tool names starting with this prefix are validated.
    pub tool_prefix: String,
    /// Mount prefixes treated as removable storage.
    pub external_volume_prefixes: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StatsConfig {
    pub collection: String,
    /// Empty means `<cwd>/.store`.
    pub data_dir: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            integration_file: ".mcp.json".into(),
            service: "chroma".into(),
            data_dir_flag: "--data-dir".into(),
            tool_prefix: "mcp__chroma__".into(),
            external_volume_prefixes: vec!["/Volumes/".into()],
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            collection: "project_memory".into(),
            data_dir: String::new(),
        }
    }
}

/// Returns `~/.memguard/`, if a home directory can be determined.
pub fn default_memguard_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".memguard"))
}

/// Returns the default settings file path: `~/.memguard/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    default_memguard_dir().map(|dir| dir.join("config.toml"))
}

impl MemguardConfig {
    /// Load settings from the default file, then apply env var overrides.
    ///
    /// Without a home directory only the env overrides apply. A settings file that
    /// cannot be read or parsed is an error; callers that must keep going fall
    /// back to [`from_env`](Self::from_env) after reporting it.
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::from_env()),
        }
    }

    /// Built-in defaults with env var overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read settings file {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse settings file {}", path.display()))?
        } else {
            info!("no settings file at {}, using defaults", path.display());
            MemguardConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (MEMGUARD_COLLECTION, MEMGUARD_DATA_DIR, MEMGUARD_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MEMGUARD_COLLECTION") {
            self.stats.collection = val;
        }
        if let Ok(val) = std::env::var("MEMGUARD_DATA_DIR") {
            self.stats.data_dir = val;
        }
        if let Ok(val) = std::env::var("MEMGUARD_LOG_LEVEL") {
            self.log.level = val;
        }
    }

    /// Resolve the stats data directory against `cwd` when unset or relative.
    pub fn resolved_data_dir(&self, cwd: &Path) -> PathBuf {
        if self.stats.data_dir.is_empty() {
            cwd.join(DEFAULT_STORE_DIR)
        } else {
            cwd.join(&self.stats.data_dir)
        }
    }
}
