use std::path::{Path, PathBuf};

/// Small persistent store for cross-invocation state. Injected rather than
/// ambient so the pipeline stays testable without a real home directory.
///
/// The first-run check is read-check-then-write; races between concurrent
/// invocations are benign because the marker's effect is cosmetic.
pub struct StateStore {
    root: PathBuf,
}

impl StateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// True exactly once per store lifetime, on the invocation that creates
    /// the marker.
    pub fn first_run(&self) -> bool {
        let marker = self.root.join("first-run-marker");
        if marker.exists() {
            return false;
        }
        if std::fs::create_dir_all(&self.root).is_err() {
            return false;
        }
        std::fs::write(&marker, b"").is_ok()
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join("counter-agent.log")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
