//! Scratch directory trees for discovery tests.

use std::{fs, path::PathBuf};

use tempfile::TempDir;

use crate::discovery::CONFIG_FILENAME;

/// A temporary directory tree, removed on drop.
pub struct TestDir {
    /// The temporary root.
    root: TempDir,
}

impl TestDir {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    /// Creates `rel` (and its parents) under the root. `""` is the root itself.
    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.root.path().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Writes `.scry.toml` with `content` into `rel`, creating the directory.
    pub fn config(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir(rel).join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }
}
