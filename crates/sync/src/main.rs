// crates/sync/src/main.rs
//! One-shot memory sync binary.
//!
//! Mirrors `.jsonl` session transcripts from every OpenClaw instance into
//! PostgreSQL. Designed to be re-invoked periodically (e.g. every five
//! minutes) by an external scheduler; each invocation is idempotent and
//! resumable. Exits non-zero only on startup-level failures — per-session
//! errors are logged and do not affect the exit code.

use anyhow::{Context, Result};
use openclaw_memory_db::{Database, DbConfig};
use openclaw_memory_sync::run_sync;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Root directory holding the `.openclaw*` instance directories:
/// `OPENCLAW_DIR` if set, the home directory otherwise.
fn sync_root() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("OPENCLAW_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir().context("cannot determine home directory; set OPENCLAW_DIR")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let root = sync_root()?;
    let config = DbConfig::from_env();
    let db = Database::connect(&config)
        .await
        .context("cannot reach the memory database")?;

    run_sync(&db, &root).await?;
    Ok(())
}
