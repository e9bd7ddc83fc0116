//! Filesystem side of exports: partial-file commits and sequence directories with cleanup.

use std::io;
use std::path::{Path, PathBuf};

fn partial_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".partial");
    PathBuf::from(os)
}

fn create_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// A still image staged next to its destination until committed.
///
/// Dropping an uncommitted `StagedFile` removes the partial file.
#[derive(Debug)]
pub(crate) struct StagedFile {
    target: PathBuf,
    partial: Option<PathBuf>,
}

impl StagedFile {
    /// Write `bytes` to `<target>.partial`, creating parent directories.
    pub(crate) fn write(target: &Path, bytes: &[u8]) -> io::Result<Self> {
        create_parent(target)?;
        let partial = partial_path(target);
        let staged = Self {
            target: target.to_path_buf(),
            partial: Some(partial.clone()),
        };
        std::fs::write(&partial, bytes)?;
        Ok(staged)
    }

    /// Move the partial file onto the target path.
    pub(crate) fn commit(mut self) -> io::Result<PathBuf> {
        if let Some(partial) = self.partial.take()
            && let Err(e) = std::fs::rename(&partial, &self.target)
        {
            remove_quietly(&partial);
            return Err(e);
        }
        Ok(self.target.clone())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Some(partial) = self.partial.take() {
            remove_quietly(&partial);
        }
    }
}

/// Numbered frames written into one output directory.
///
/// Cleanup runs at most once: on [`SequenceDir::discard`] or when dropped unfinished. A
/// directory this writer created is removed entirely; a pre-existing one only loses the frames
/// written here.
#[derive(Debug)]
pub(crate) struct SequenceDir {
    dir: PathBuf,
    created: bool,
    written: Vec<PathBuf>,
    settled: bool,
}

impl SequenceDir {
    pub(crate) fn create(dir: &Path) -> io::Result<Self> {
        let created = !dir.exists();
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            created,
            written: Vec::new(),
            settled: false,
        })
    }

    /// Write one frame file; the path is tracked for cleanup before the write starts.
    pub(crate) fn write_frame(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<&Path> {
        let path = self.dir.join(file_name);
        self.written.push(path);
        let path = &self.written[self.written.len() - 1];
        std::fs::write(path, bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote frame");
        Ok(path)
    }

    /// Keep everything written and return the frame paths in order.
    pub(crate) fn finish(mut self) -> Vec<PathBuf> {
        self.settled = true;
        std::mem::take(&mut self.written)
    }

    /// Remove partial output now.
    pub(crate) fn discard(mut self) {
        self.cleanup();
    }

    fn cleanup(&mut self) {
        if self.settled {
            return;
        }
        self.settled = true;
        if self.created {
            if let Err(e) = std::fs::remove_dir_all(&self.dir) {
                tracing::warn!(
                    dir = %self.dir.display(),
                    error = %e,
                    "failed to remove output directory"
                );
            }
        } else {
            for path in &self.written {
                remove_quietly(path);
            }
        }
        tracing::debug!(
            dir = %self.dir.display(),
            frames = self.written.len(),
            "discarded sequence output"
        );
    }
}

impl Drop for SequenceDir {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn remove_quietly(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove partial output")
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/output.rs"]
mod tests;
