//! Pre-operation validation of the store's data directory.
//!
//! [`PathGuard::evaluate`] walks a fixed sequence of checks and stops at the first
//! that applies:
//!
//! | State | Condition | Verdict |
//! |-------|-----------|---------|
//! | [`GuardState::NoConfig`] | no data dir configured | Allowed |
//! | [`GuardState::NotExist`] | path missing | Blocked |
//! | [`GuardState::NotAccessible`] | not readable and writable | Blocked |
//! | [`GuardState::ExternalVolume`] | under a removable mount prefix | AllowedWithWarning |
//! | [`GuardState::Local`] | anything else | Allowed |
//!
//! Accessibility is checked before the volume type, so an unreadable path on an
//! external volume blocks instead of warning.

pub mod probe;

use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::GuardConfig;
pub use probe::{PathProbe, SystemProbe};

/// Exit code telling the host to block the pending tool call.
pub const HALT_EXIT_CODE: u8 = 2;
/// Exit code telling the host to go ahead.
pub const CONTINUE_EXIT_CODE: u8 = 0;

/// The tool call the host is about to make. Only `tool_name` is read.
#[derive(Debug, Clone, Default)]
pub struct OperationRequest {
    pub tool_name: Option<String>,
}

impl OperationRequest {
    /// Parse a hook payload. Anything that is not a JSON object yields `None`;
    /// a `tool_name` that is missing or not a string is left unset.
    pub fn parse(input: &str) -> Option<Self> {
        let value: Value = match serde_json::from_str(input) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "ignoring unparsable hook payload");
                return None;
            }
        };
        let Some(fields) = value.as_object() else {
            debug!("ignoring hook payload that is not an object");
            return None;
        };
        Some(Self {
            tool_name: fields
                .get("tool_name")
                .and_then(Value::as_str)
                .map(str::to_owned),
        })
    }
}

/// Where the ordered checks stopped for one data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    NoConfig,
    NotExist(PathBuf),
    NotAccessible(PathBuf),
    ExternalVolume(PathBuf),
    Local(PathBuf),
}

impl GuardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoConfig => "no_config",
            Self::NotExist(_) => "not_exist",
            Self::NotAccessible(_) => "not_accessible",
            Self::ExternalVolume(_) => "external_volume",
            Self::Local(_) => "local",
        }
    }

    pub fn verdict(&self) -> Verdict {
        match self {
            Self::NoConfig | Self::Local(_) => Verdict::Allowed,
            Self::ExternalVolume(_) => Verdict::AllowedWithWarning,
            Self::NotExist(_) | Self::NotAccessible(_) => Verdict::Blocked,
        }
    }

    /// The data directory this state was reached for, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NoConfig => None,
            Self::NotExist(p) | Self::NotAccessible(p) | Self::ExternalVolume(p) | Self::Local(p) => {
                Some(p.as_path())
            }
        }
    }
}

impl std::fmt::Display for GuardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The allow / warn / block decision for a pending store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    AllowedWithWarning,
    Blocked,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::AllowedWithWarning => "allowed_with_warning",
            Self::Blocked => "blocked",
        }
    }

    /// Only `Blocked` halts; warnings are advisory.
    pub fn signal(self) -> HookSignal {
        match self {
            Self::Blocked => HookSignal::Halt,
            Self::Allowed | Self::AllowedWithWarning => HookSignal::Continue,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the hook process reports back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookSignal {
    Continue,
    Halt,
}

impl HookSignal {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Continue => CONTINUE_EXIT_CODE,
            Self::Halt => HALT_EXIT_CODE,
        }
    }
}

/// Result of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub state: GuardState,
    pub verdict: Verdict,
    pub diagnostics: Vec<String>,
}

impl Validation {
    /// Write each diagnostic as its own line.
    pub fn emit(&self, out: &mut impl Write) -> std::io::Result<()> {
        for line in &self.diagnostics {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    pub fn signal(&self) -> HookSignal {
        self.verdict.signal()
    }
}

/// Validates the store data directory against a [`GuardConfig`].
#[derive(Debug)]
pub struct PathGuard<'a, P: PathProbe = SystemProbe> {
    config: &'a GuardConfig,
    probe: P,
}

impl<'a> PathGuard<'a, SystemProbe> {
    pub fn new(config: &'a GuardConfig) -> Self {
        Self::with_probe(config, SystemProbe)
    }
}

impl<'a, P: PathProbe> PathGuard<'a, P> {
    pub fn with_probe(config: &'a GuardConfig, probe: P) -> Self {
        Self { config, probe }
    }

    /// Whether a tool call belongs to the store's MCP server.
    pub fn should_validate(&self, tool_name: &str) -> bool {
        tool_name.starts_with(&self.config.tool_prefix)
    }

    /// Run the ordered checks for `location`.
    pub fn evaluate(&self, location: Option<&Path>) -> GuardState {
        let Some(path) = location else {
            return GuardState::NoConfig;
        };
        let path = path.to_path_buf();

        if !self.probe.exists(&path) {
            return GuardState::NotExist(path);
        }
        if !self.probe.is_accessible(&path) {
            return GuardState::NotAccessible(path);
        }

        let absolute = self.probe.absolute(&path);
        let absolute = absolute.to_string_lossy();
        if self
            .config
            .external_volume_prefixes
            .iter()
            .any(|prefix| absolute.starts_with(prefix.as_str()))
        {
            return GuardState::ExternalVolume(path);
        }

        GuardState::Local(path)
    }

    /// Evaluate `location` and attach the diagnostics for the resulting state.
    pub fn validate(&self, location: Option<&Path>) -> Validation {
        let state = self.evaluate(location);
        let diagnostics = self.diagnostics(&state);
        debug!(state = %state, diagnostics = diagnostics.len(), "path validated");
        Validation {
            verdict: state.verdict(),
            state,
            diagnostics,
        }
    }

    /// Decide a hook invocation.
    ///
    /// `resolve_location` is only called for tool names under the configured
    /// prefix; anything else continues without touching the integration file.
    pub fn check_request<F>(
        &self,
        request: Option<&OperationRequest>,
        resolve_location: F,
    ) -> Option<Validation>
    where
        F: FnOnce() -> Option<PathBuf>,
    {
        let tool_name = request?.tool_name.as_deref()?;
        if !self.should_validate(tool_name) {
            debug!(tool_name, "not a store operation, skipping");
            return None;
        }
        let location = resolve_location();
        Some(self.validate(location.as_deref()))
    }

    fn diagnostics(&self, state: &GuardState) -> Vec<String> {
        match state {
            GuardState::NoConfig | GuardState::Local(_) => Vec::new(),
            GuardState::NotExist(path) => vec![
                format!("Memory store path does not exist: {}", path.display()),
                format!(
                    "Run the store setup to create it, or point {} in {} at an existing directory",
                    self.config.data_dir_flag, self.config.integration_file
                ),
            ],
            GuardState::NotAccessible(path) => vec![
                format!("Memory store path is not accessible: {}", path.display()),
                format!("Check read/write permissions on {}", path.display()),
            ],
            GuardState::ExternalVolume(path) => vec![
                format!(
                    "⚠️  Memory store is on an external volume: {} (it may be unmounted mid-session, causing connection failures)",
                    path.display()
                ),
                "⚠️  Recommendation: migrate the store to local storage".to_string(),
            ],
        }
    }
}
