//! CLI `guard` command — the pre-tool-use hook.
//!
//! Reads the host's tool-call payload from stdin and answers with an exit code.
//! Diagnostics go to stderr; stdout is never written.

use anyhow::{Context, Result};
use std::io::Read;

use memguard::config::MemguardConfig;
use memguard::guard::{HookSignal, OperationRequest, PathGuard, CONTINUE_EXIT_CODE};
use memguard::integration::resolve_storage_location;

/// Run the hook and return the process exit code.
///
/// Internal failures never block the tool call: they are reported on stderr and
/// the hook continues.
pub fn guard(config: &MemguardConfig) -> u8 {
    match run(config) {
        Ok(signal) => signal.exit_code(),
        Err(e) => {
            eprintln!("Hook error: {e:#}");
            CONTINUE_EXIT_CODE
        }
    }
}

fn run(config: &MemguardConfig) -> Result<HookSignal> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read hook payload from stdin")?;

    let request = OperationRequest::parse(&input);
    let guard = PathGuard::new(&config.guard);

    let Some(validation) =
        guard.check_request(request.as_ref(), || resolve_storage_location(&config.guard))
    else {
        return Ok(HookSignal::Continue);
    };

    if let Err(e) = validation.emit(&mut std::io::stderr().lock()) {
        tracing::warn!(error = %e, "failed to write guard diagnostics");
    }

    tracing::info!(
        state = %validation.state,
        verdict = %validation.verdict,
        "store operation checked"
    );
    Ok(validation.signal())
}
