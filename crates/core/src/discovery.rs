// crates/core/src/discovery.rs
//! Instance discovery: enumerate OpenClaw instance directories under a root.
//!
//! An instance root is a directory named `.openclaw` (the reserved `default`
//! instance) or `.openclaw-<label>`. It only qualifies when its session log
//! directory `agents/main/sessions` exists. Everything else is silently
//! skipped — discovery is a filter, not a validator.

use crate::error::DiscoveryError;
use regex_lite::Regex;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Directory-name convention for instance roots.
const INSTANCE_DIR_PATTERN: &str = r"^\.openclaw(-\w+)?$";

/// Relative path from an instance root to its session log directory.
const SESSIONS_SUBDIR: &[&str] = &["agents", "main", "sessions"];

/// One discovered instance: normalized name plus its session log directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    /// Lowercased instance name; the unsuffixed directory maps to `default`.
    pub name: String,
    /// Directory holding the instance's `<session_id>.jsonl` files.
    pub sessions_dir: PathBuf,
}

/// Derive the normalized instance name from a qualifying directory name.
fn instance_name(dir_name: &str) -> String {
    match dir_name.strip_prefix(".openclaw-") {
        Some(label) if !label.is_empty() => label.to_lowercase(),
        _ => "default".to_string(),
    }
}

/// Enumerate all qualifying instances under `root`.
///
/// Returns an empty vec (not an error) when the root holds no qualifying
/// entries. Fails only when the root itself cannot be read.
pub async fn discover_instances(root: &Path) -> Result<Vec<Instance>, DiscoveryError> {
    let pattern = Regex::new(INSTANCE_DIR_PATTERN).unwrap();

    let mut entries =
        fs::read_dir(root)
            .await
            .map_err(|source| DiscoveryError::RootUnreadable {
                path: root.to_path_buf(),
                source,
            })?;

    let mut instances = Vec::new();

    while let Ok(Some(entry)) = entries.next_entry().await {
        let file_type = match entry.file_type().await {
            Ok(ft) => ft,
            Err(_) => continue,
        };
        if !file_type.is_dir() {
            continue;
        }

        let dir_name = entry.file_name().to_string_lossy().to_string();
        if !pattern.is_match(&dir_name) {
            continue;
        }

        let mut sessions_dir = entry.path();
        for part in SESSIONS_SUBDIR {
            sessions_dir.push(part);
        }

        let has_sessions = fs::metadata(&sessions_dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !has_sessions {
            debug!(dir = %dir_name, "Skipping instance without a sessions directory");
            continue;
        }

        instances.push(Instance {
            name: instance_name(&dir_name),
            sessions_dir,
        });
    }

    Ok(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    /// Helper: create `<root>/<dir>/agents/main/sessions`.
    async fn mk_instance(root: &Path, dir: &str) {
        let mut path = root.join(dir);
        for part in SESSIONS_SUBDIR {
            path.push(part);
        }
        fs::create_dir_all(&path).await.unwrap();
    }

    #[tokio::test]
    async fn discovers_suffixed_and_default_instances() {
        let tmp = TempDir::new().unwrap();
        mk_instance(tmp.path(), ".openclaw").await;
        mk_instance(tmp.path(), ".openclaw-Work").await;
        mk_instance(tmp.path(), ".openclaw-home_lab").await;

        let mut names: Vec<String> = discover_instances(tmp.path())
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        names.sort();

        assert_eq!(names, vec!["default", "home_lab", "work"]);
    }

    #[tokio::test]
    async fn skips_non_matching_directories() {
        let tmp = TempDir::new().unwrap();
        mk_instance(tmp.path(), ".openclaw").await;
        mk_instance(tmp.path(), "openclaw").await; // no leading dot
        mk_instance(tmp.path(), ".openclawx").await; // no hyphen separator
        mk_instance(tmp.path(), ".openclaw-bad-name").await; // hyphen not in \w+
        mk_instance(tmp.path(), ".other").await;

        let instances = discover_instances(tmp.path()).await.unwrap();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].name, "default");
    }

    #[tokio::test]
    async fn skips_instances_without_sessions_dir() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".openclaw-empty"))
            .await
            .unwrap();
        mk_instance(tmp.path(), ".openclaw-full").await;

        let instances = discover_instances(tmp.path()).await.unwrap();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].name, "full");
        assert!(instances[0].sessions_dir.ends_with("agents/main/sessions"));
    }

    #[tokio::test]
    async fn empty_root_yields_empty_set() {
        let tmp = TempDir::new().unwrap();
        let instances = discover_instances(tmp.path()).await.unwrap();
        assert!(instances.is_empty());
    }

    #[tokio::test]
    async fn unreadable_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("does-not-exist");
        let err = discover_instances(&missing).await.unwrap_err();
        assert!(matches!(err, DiscoveryError::RootUnreadable { .. }));
    }

    #[tokio::test]
    async fn plain_files_matching_the_pattern_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".openclaw-file"), b"")
            .await
            .unwrap();

        let instances = discover_instances(tmp.path()).await.unwrap();
        assert!(instances.is_empty());
    }
}
