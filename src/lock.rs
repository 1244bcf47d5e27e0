use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{DeployError, DeployResult};

/// Default lock file path.
pub const LOCK_FILE: &str = ".deploy.lock";

/// Exclusive advisory lock held for the duration of a
/// deployment. Two invocations racing on the same checkout would
/// otherwise interleave remote mutations; the second one fails
/// fast instead.
pub struct DeployLock {
    file: File,
    path: PathBuf,
}

impl DeployLock {
    /// Take the lock, failing immediately if another process
    /// holds it.
    pub fn acquire(path: &Path) -> DeployResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;

        file.try_lock_exclusive()
            .map_err(|_| DeployError::LockHeld(path.display().to_string()))?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for DeployLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        let _ = fs::remove_file(&self.path);
    }
}
