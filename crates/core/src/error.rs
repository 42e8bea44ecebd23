// crates/core/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during instance discovery.
///
/// Discovery failures are the only fatal condition in this crate: if the
/// root cannot be enumerated at all, the whole run has nothing to work on.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Cannot read instances root {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
