//! Project-level MCP integration file (`.mcp.json`) and data directory discovery.
//!
//! The file maps server names to launch specs:
//!
//! ```json
//! { "mcpServers": { "chroma": { "command": "uvx", "args": ["chroma-mcp", "--data-dir", "/path"] } } }
//! ```
//!
//! It is kept as a raw [`serde_json::Value`] so lookups can walk it without caring
//! whether someone put a number where a list was expected.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::GuardConfig;

/// Parsed integration file. Read-only; loaded fresh on every invocation.
#[derive(Debug, Clone)]
pub struct IntegrationConfig {
    root: Value,
}

impl IntegrationConfig {
    /// Load the integration file named `file_name` from the current directory.
    ///
    /// Returns `None` when the file is absent, or when it cannot be read or parsed
    /// (after printing a warning to stderr). Never fails.
    pub fn load(file_name: &str) -> Option<Self> {
        let path = match std::env::current_dir() {
            Ok(cwd) => cwd.join(file_name),
            Err(e) => {
                eprintln!("Warning: could not load {file_name}: {e}");
                return None;
            }
        };
        Self::load_optional(&path)
    }

    /// Same as [`load`](Self::load) but for an explicit path.
    pub fn load_optional(path: &Path) -> Option<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no integration file");
            return None;
        }
        match Self::load_from(path) {
            Ok(config) => Some(config),
            Err(e) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                eprintln!("Warning: could not load {name}: {e:#}");
                None
            }
        }
    }

    /// Read and parse an integration file, surfacing I/O and JSON errors.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&contents)
    }

    /// Parse integration file contents. Any valid JSON is accepted.
    pub fn parse(contents: &str) -> Result<Self> {
        let root = serde_json::from_str(contents).context("invalid JSON")?;
        Ok(Self { root })
    }

    /// Launch command of a server, if present and a string.
    pub fn command(&self, service: &str) -> Option<&str> {
        self.server(service)?.get("command")?.as_str()
    }

    /// Launch arguments of a server. Non-string entries are dropped.
    pub fn args(&self, service: &str) -> Option<Vec<&str>> {
        let args = self.server(service)?.get("args")?.as_array()?;
        Some(args.iter().filter_map(Value::as_str).collect())
    }

    fn server(&self, service: &str) -> Option<&Value> {
        self.root.get("mcpServers")?.get(service)
    }
}

/// Find the value following `flag` in the launch args of `service`.
///
/// Returns `None` if the integration file, the server, or the flag is missing, or
/// if the flag is the last argument. Args that are not strings never match and
/// never count as a value.
pub fn extract_storage_location(
    config: Option<&IntegrationConfig>,
    service: &str,
    flag: &str,
) -> Option<PathBuf> {
    let config = config?;
    let args = config.server(service)?.get("args")?.as_array()?;

    let pos = args.iter().position(|arg| arg.as_str() == Some(flag))?;
    let value = args.get(pos + 1)?.as_str()?;
    debug!(service, flag, value, "resolved storage location");
    Some(PathBuf::from(value))
}

/// Load the integration file from the working directory and resolve the store's
/// data directory from it.
pub fn resolve_storage_location(guard: &GuardConfig) -> Option<PathBuf> {
    let config = IntegrationConfig::load(&guard.integration_file);
    extract_storage_location(config.as_ref(), &guard.service, &guard.data_dir_flag)
}
