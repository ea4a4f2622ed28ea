//! Path guard and type statistics for a persistent vector-memory store.
//!
//! memguard sits in front of the memory store an AI coding assistant talks to over
//! MCP. It has two jobs, each run once per process invocation:
//!
//! | Command | Input | Output |
//! |---------|-------|--------|
//! | `memguard guard` | tool-call JSON on stdin | exit code (0 = continue, 2 = halt) |
//! | `memguard check` | none | human-readable guard report |
//! | `memguard stats` | collection + data dir | one JSON document on stdout |
//!
//! # Guard
//!
//! Before a store operation runs, the configured data directory is checked in a
//! fixed order: it must exist, it must be readable and writable, and it should not
//! live on a removable volume. The first two failures block the operation; the
//! last only warns.
//!
//! # Modules
//!
//! - [`config`] — Settings loading from TOML files and environment variables
//! - [`integration`] — `.mcp.json` parsing and data directory discovery
//! - [`guard`] — The path validation state machine and hook exit signals
//! - [`db`] — Read-only access to the SQLite-backed store
//! - [`store`] — Store and collection traits plus the SQLite implementation
//! - [`stats`] — Bounded type-tag aggregation

pub mod config;
pub mod db;
pub mod guard;
pub mod integration;
pub mod stats;
pub mod store;
