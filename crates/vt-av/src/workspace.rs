//! Temp-artifact management for multi-stage operations.
//!
//! A [`Workspace`] is a scope that owns every intermediate file an operation
//! creates. Artifacts live directly in the temp root (the platform temp
//! directory unless configured otherwise) under a caller-chosen prefix and a
//! random suffix, so concurrent operations never collide. Dropping the
//! workspace removes everything it still owns, which covers normal
//! completion, early returns, and errors propagated with `?` alike.

use std::path::{Path, PathBuf};

use tempfile::TempPath;
use vt_core::Result;

/// One uniquely named temp file.
///
/// The file is created empty on allocation and removed when the artifact is
/// released or dropped.
#[derive(Debug)]
pub struct TempArtifact {
    path: TempPath,
}

impl TempArtifact {
    /// Allocate a new, empty, uniquely named file in `root`.
    pub fn create(root: &Path, prefix: &str, suffix: &str) -> Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(root)?;
        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    /// Location of the artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the artifact. A file that is already gone is not an error.
    pub fn release(self) -> Result<()> {
        match self.path.close() {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Scope owning the temp artifacts of one operation.
///
/// # Example
///
/// ```
/// use vt_av::Workspace;
///
/// let dir = tempfile::tempdir()?;
/// let leaked = {
///     let mut workspace = Workspace::new(dir.path());
///     let list = workspace.create_temp("ffmpeg_merge_", ".txt")?;
///     assert!(list.exists());
///     list
/// };
/// // Dropping the workspace removed the file.
/// assert!(!leaked.exists());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    artifacts: Vec<TempArtifact>,
}

impl Workspace {
    /// Create an empty workspace whose artifacts go into `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            artifacts: Vec::new(),
        }
    }

    /// Allocate and register a new artifact, returning its path.
    pub fn create_temp(&mut self, prefix: &str, suffix: &str) -> Result<PathBuf> {
        let artifact = TempArtifact::create(&self.root, prefix, suffix)?;
        let path = artifact.path().to_path_buf();
        tracing::trace!(path = %path.display(), "temp artifact created");
        self.artifacts.push(artifact);
        Ok(path)
    }

    /// Number of artifacts currently owned.
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the workspace owns no artifacts.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Release every artifact.
    ///
    /// All artifacts are attempted even if one fails; the first failure is
    /// returned. Releasing an empty workspace is a no-op.
    pub fn release_all(&mut self) -> Result<()> {
        let mut first_err = None;
        for artifact in self.artifacts.drain(..) {
            let path = artifact.path().to_path_buf();
            if let Err(e) = artifact.release() {
                tracing::warn!("failed to remove temp artifact {}: {e}", path.display());
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        // Failures were already logged by release_all.
        let _ = self.release_all();
    }
}
