//! All-or-nothing output files.
//!
//! Bytes go to a hidden sibling of the target first and are renamed into place
//! on [`StagedFile::commit`]. A staged file that is dropped uncommitted is
//! removed, so a failed run never leaves anything at the target path.

use crate::util::{HistMatchError, HistMatchResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Output written next to its target and not yet visible there.
#[derive(Debug)]
pub struct StagedFile {
    staging: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedFile {
    /// Writes `bytes` to the staging sibling of `target`.
    pub fn write(target: &Path, bytes: &[u8]) -> HistMatchResult<Self> {
        let staged = Self {
            staging: staging_path(target),
            target: target.to_path_buf(),
            committed: false,
        };
        fs::write(&staged.staging, bytes).map_err(|err| HistMatchError::io(target, err))?;
        Ok(staged)
    }

    /// Final location of the file.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Moves the staged bytes to the target path.
    pub fn commit(mut self) -> HistMatchResult<()> {
        fs::rename(&self.staging, &self.target)
            .map_err(|err| HistMatchError::io(&self.target, err))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.staging);
        }
    }
}

/// Writes `bytes` to `target` through a staging file.
pub fn write_atomic(target: &Path, bytes: &[u8]) -> HistMatchResult<()> {
    StagedFile::write(target, bytes)?.commit()
}

fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_owned());
    target.with_file_name(format!(".{name}.partial"))
}

#[cfg(test)]
mod tests {
    use super::{staging_path, write_atomic, StagedFile};
    use crate::util::HistMatchError;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("histmatch-staged-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn uncommitted_file_is_removed_on_drop() {
        let dir = scratch_dir("drop");
        let target = dir.join("out.txt");
        let staged = StagedFile::write(&target, b"hello").unwrap();
        assert!(staging_path(&target).exists());
        drop(staged);
        assert!(!staging_path(&target).exists());
        assert!(!target.exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn commit_publishes_bytes() {
        let dir = scratch_dir("commit");
        let target = dir.join("out.txt");
        write_atomic(&target, b"abc").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"abc");
        assert!(!staging_path(&target).exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn failed_write_names_the_target() {
        let dir = scratch_dir("missing");
        let target = dir.join("no_such_dir").join("out.txt");
        let err = write_atomic(&target, b"abc").unwrap_err();
        match err {
            HistMatchError::Io { path, .. } => assert_eq!(path, target),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!target.exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
