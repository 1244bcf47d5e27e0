use chrono::Utc;

use crate::cmd;
use crate::error::DeployResult;
use crate::output::Reporter;

/// Whether the working tree has uncommitted changes (staged,
/// unstaged, or untracked).
pub fn is_dirty() -> DeployResult<bool> {
    Ok(!cmd::run("git", &["status", "--porcelain"])?.is_empty())
}

/// Short hash of the current HEAD commit.
pub fn short_hash() -> DeployResult<String> {
    cmd::run("git", &["rev-parse", "--short", "HEAD"])
}

/// Commit any local changes with a timestamped message, then
/// push. A push with nothing new exits zero and counts as
/// success.
pub fn sync(reporter: &mut dyn Reporter) -> DeployResult<()> {
    if is_dirty()? {
        reporter.run("git", &["add", "-A"])?;
        let message = format!("Deploy {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
        reporter.run("git", &["commit", "-m", &message])?;
    } else {
        reporter.note("working tree clean, pushing anyway");
    }

    reporter.run("git", &["push"])
}

/// Commit and push the archival of applied migration files, as a
/// separate commit. Skipped when the move changed nothing the
/// repository tracks.
pub fn archive_commit(reporter: &mut dyn Reporter, migrations_dir: &str) -> DeployResult<()> {
    if !is_dirty()? {
        reporter.note("nothing to commit after archival");
        return Ok(());
    }

    reporter.run("git", &["add", migrations_dir])?;
    reporter.run("git", &["commit", "-m", "Archive applied migrations"])?;
    reporter.run("git", &["push"])
}
