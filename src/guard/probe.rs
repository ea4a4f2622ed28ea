//! Filesystem checks used by the guard.

use std::path::{Path, PathBuf};

/// The three filesystem questions the guard asks about a data directory.
pub trait PathProbe {
    fn exists(&self, path: &Path) -> bool;

    /// True only if the current process may both read and write `path`.
    fn is_accessible(&self, path: &Path) -> bool;

    /// Absolute form of `path`, used for mount prefix matching.
    fn absolute(&self, path: &Path) -> PathBuf;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl PathProbe for SystemProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    #[cfg(unix)]
    fn is_accessible(&self, path: &Path) -> bool {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
            return false;
        };
        // SAFETY: `c_path` is NUL-terminated and outlives the call.
        unsafe { libc::access(c_path.as_ptr(), libc::R_OK | libc::W_OK) == 0 }
    }

    #[cfg(not(unix))]
    fn is_accessible(&self, path: &Path) -> bool {
        std::fs::metadata(path)
            .map(|m| !m.permissions().readonly())
            .unwrap_or(false)
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
    }
}
