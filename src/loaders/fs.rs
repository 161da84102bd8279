//! # FsLoader: resources from a directory
//!
//! Treats every resource id as a path relative to a root directory and reads it
//! with `tokio::fs`. Loaded bytes are forwarded to an optional sink channel.
//!
//! ## Attributes
//! - `max_bytes`: fail the resource if the file is larger than this many bytes.
//!
//! ## Rules
//! - Absolute ids and ids containing `..` are rejected (they would escape the root).
//! - A read that is still running when the resource times out is abandoned.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use super::loader::{LoadRequest, LoadSignals, Loader};

/// Bytes of one loaded resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedResource {
    /// Resource identifier.
    pub id: Arc<str>,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Loader backed by the local filesystem.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
    sink: Option<mpsc::UnboundedSender<LoadedResource>>,
}

impl FsLoader {
    /// Creates a loader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sink: None,
        }
    }

    /// Forwards loaded bytes to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: mpsc::UnboundedSender<LoadedResource>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, id: &str) -> Result<PathBuf, String> {
        let rel = Path::new(id);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if id.is_empty() || escapes {
            return Err(format!("path {id:?} escapes loader root"));
        }
        Ok(self.root.join(rel))
    }
}

impl Loader for FsLoader {
    fn load(&self, request: LoadRequest, signals: LoadSignals) {
        let path = match self.resolve(&request.id) {
            Ok(path) => path,
            Err(reason) => {
                signals.failed(reason);
                return;
            }
        };
        let max_bytes = match request.settings.attr("max_bytes").map(str::parse::<u64>) {
            None => None,
            Some(Ok(n)) => Some(n),
            Some(Err(_)) => {
                signals.failed("attribute max_bytes is not an unsigned integer");
                return;
            }
        };
        let sink = self.sink.clone();
        signals.started();

        tokio::spawn(async move {
            let read = tokio::select! {
                read = tokio::fs::read(&path) => read,
                _ = request.cancel.cancelled() => {
                    debug!(id = %request.id, "read abandoned");
                    return;
                }
            };
            match read {
                Ok(bytes) => {
                    if let Some(limit) = max_bytes.filter(|n| bytes.len() as u64 > *n) {
                        signals.failed(format!("{} bytes exceeds max_bytes={limit}", bytes.len()));
                        return;
                    }
                    if let Some(sink) = sink {
                        let _ = sink.send(LoadedResource {
                            id: Arc::clone(&request.id),
                            bytes,
                        });
                    }
                    signals.succeeded();
                }
                Err(e) => signals.failed(format!("{}: {e}", path.display())),
            }
        });
    }

    fn name(&self) -> &str {
        "FsLoader"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_rejects_escapes() {
        let loader = FsLoader::new("/srv/assets");
        assert_eq!(
            loader.resolve("js/app.js").unwrap(),
            PathBuf::from("/srv/assets/js/app.js")
        );
        assert!(loader.resolve("../etc/passwd").is_err());
        assert!(loader.resolve("/etc/passwd").is_err());
        assert!(loader.resolve("").is_err());
    }
}
