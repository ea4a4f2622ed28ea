//! CLI `check` command — run the guard against the configured data directory
//! and print a readable report.

use anyhow::Result;

use memguard::config::MemguardConfig;
use memguard::guard::PathGuard;
use memguard::integration::{extract_storage_location, IntegrationConfig};

/// Print the guard state for the current project. Returns the hook exit code the
/// same location would produce.
pub fn check(config: &MemguardConfig) -> Result<u8> {
    let guard_config = &config.guard;
    let integration = IntegrationConfig::load(&guard_config.integration_file);
    let location = extract_storage_location(
        integration.as_ref(),
        &guard_config.service,
        &guard_config.data_dir_flag,
    );

    let validation = PathGuard::new(guard_config).validate(location.as_deref());

    println!("Memory Store Guard");
    println!("{}", "=".repeat(40));
    println!(
        "  Integration file:  {} ({})",
        guard_config.integration_file,
        if integration.is_some() { "loaded" } else { "not found" }
    );
    println!("  Server:            {}", guard_config.service);
    match integration.as_ref().and_then(|c| c.command(&guard_config.service)) {
        Some(command) => println!("  Command:           {command}"),
        None => println!("  Command:           (not set)"),
    }
    match integration.as_ref().and_then(|c| c.args(&guard_config.service)) {
        Some(args) => println!("  Args:              {}", args.join(" ")),
        None => println!("  Args:              (not set)"),
    }
    match validation.state.path() {
        Some(path) => println!("  Data dir:          {}", path.display()),
        None => println!(
            "  Data dir:          (no {} argument configured)",
            guard_config.data_dir_flag
        ),
    }
    println!();
    println!("  State:             {}", validation.state);
    println!("  Verdict:           {}", validation.verdict);

    if !validation.diagnostics.is_empty() {
        println!();
        validation.emit(&mut std::io::stdout().lock())?;
    }

    Ok(validation.signal().exit_code())
}
