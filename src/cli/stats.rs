use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

use memguard::config::MemguardConfig;
use memguard::stats;

/// Print the type-count report for one collection as a single JSON line.
///
/// The document is written for every outcome, including errors; the returned
/// exit code is non-zero only for an `error` status.
pub fn stats(
    config: &MemguardConfig,
    collection: Option<&str>,
    data_dir: Option<&Path>,
) -> Result<u8> {
    let collection = collection.unwrap_or(&config.stats.collection);
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let data_dir = match data_dir {
        Some(dir) => cwd.join(dir),
        None => config.resolved_data_dir(&cwd),
    };

    let report = stats::report(collection, &data_dir);
    let json = report.to_json().context("failed to serialize stats report")?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").context("failed to write stats report")?;

    Ok(report.status.exit_code())
}
