use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DeployResult;

/// Local directory holding pending migration files.
pub const MIGRATIONS_DIR: &str = "migrations";

/// Subdirectory migrations move into once applied.
pub const APPLIED_DIR: &str = "applied";

/// Pending migration files: `*.sql` directly inside `dir`,
/// sorted by filename. Filenames carry numeric prefixes by
/// convention, so lexical order is application order. The
/// `applied/` subdirectory (and anything else nested) is not
/// scanned.
pub fn pending(dir: &Path) -> DeployResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Move every pending file into the `applied/` subdirectory,
/// creating it on demand. Called after the remote run regardless
/// of individual migration outcomes, so the repository stays the
/// single record of what has been shipped.
pub fn archive(dir: &Path, pending: &[PathBuf]) -> DeployResult<()> {
    let applied = dir.join(APPLIED_DIR);
    fs::create_dir_all(&applied)?;

    for file in pending {
        if let Some(name) = file.file_name() {
            fs::rename(file, applied.join(name))?;
        }
    }

    Ok(())
}
