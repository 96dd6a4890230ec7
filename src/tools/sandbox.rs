//! Path confinement for the file tools.

use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};

use super::error::ToolError;

/// A directory that every file tool operation is confined to.
///
/// The root is created on construction and stored canonicalized so that
/// containment checks compare real paths.
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;
        let root = root.canonicalize()?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a caller-supplied path against the root.
    ///
    /// The path is normalized lexically first, so `..` never climbs above the
    /// root. Symlinks in the existing part of the normalized path are then
    /// followed, and the result must stay under the root. Absolute inputs
    /// outside the root and dangling symlinks are violations.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, ToolError> {
        let violation = || {
            log::warn!("rejected path outside sandbox: {relative:?}");
            ToolError::SandboxViolation {
                path: relative.to_string(),
            }
        };

        let mut requested = Path::new(relative);
        if requested.is_absolute() {
            requested = requested.strip_prefix(&self.root).map_err(|_| violation())?;
        }
        let normalized = normalize(requested).ok_or_else(violation)?;
        let joined = self.root.join(normalized);
        let (existing, rest) = split_existing(&joined);
        let mut resolved = existing.canonicalize().map_err(|_| violation())?;
        resolved.extend(rest);

        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            Err(violation())
        }
    }
}

/// Folds `.` and `..` out of a relative path. Returns `None` for absolute
/// paths and for a `..` with nothing left to pop.
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(parts.into_iter().collect())
}

/// Splits a path into its longest existing ancestor and the components
/// after it. `symlink_metadata` is used so a dangling link counts as present
/// and later fails canonicalization.
fn split_existing(path: &Path) -> (PathBuf, Vec<OsString>) {
    let mut existing = path.to_path_buf();
    let mut rest = Vec::new();

    while existing.symlink_metadata().is_err() {
        match existing.file_name() {
            Some(name) => {
                rest.push(name.to_os_string());
                existing.pop();
            }
            None => break,
        }
    }
    rest.reverse();
    (existing, rest)
}
