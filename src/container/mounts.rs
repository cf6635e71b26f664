// file: src/container/mounts.rs
// version: 0.3.0
// guid: 5e72a0c8-91d4-4f3b-86e5-d208c4b7f931

//! Bind mount specifications rendered into `docker run --mount` arguments

use serde::Serialize;
use std::path::{Path, PathBuf};

/// A single bind mount from the host into the container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MountSpec {
    pub source: PathBuf,
    pub target: PathBuf,
    pub read_only: bool,
}

impl MountSpec {
    /// Create a read-write bind mount
    pub fn bind(source: impl AsRef<Path>, target: impl AsRef<Path>) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            target: target.as_ref().to_path_buf(),
            read_only: false,
        }
    }

    /// Create a read-only bind mount
    pub fn bind_readonly(source: impl AsRef<Path>, target: impl AsRef<Path>) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            target: target.as_ref().to_path_buf(),
            read_only: true,
        }
    }

    /// Render to the value of a `--mount` argument
    pub fn render(&self) -> String {
        let mut spec = format!(
            "type=bind,source={},target={}",
            self.source.display(),
            self.target.display()
        );
        if self.read_only {
            spec.push_str(",readonly");
        }
        spec
    }
}

/// Render a mount table into `docker run` arguments, in insertion order
pub fn mount_args(mounts: &[MountSpec]) -> Vec<String> {
    let mut args = Vec::with_capacity(mounts.len() * 2);
    for mount in mounts {
        args.push("--mount".to_string());
        args.push(mount.render());
    }
    args
}
