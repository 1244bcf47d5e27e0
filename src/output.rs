use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cmd;
use crate::error::{DeployError, DeployResult};

/// Default path of the quiet-mode log sink.
pub const LOG_FILE: &str = "deploy.log";

/// How many log lines to surface when a fatal stage fails in
/// quiet mode.
const TAIL_LINES: usize = 40;

/// Presentation strategy for pipeline output.
///
/// The pipeline is defined once; a reporter decides whether the
/// underlying commands stream to the terminal ([`Verbose`]) or
/// are captured into a log file with one milestone line per
/// stage ([`Quiet`]). Control flow never depends on the
/// reporter.
pub trait Reporter {
    /// One always-visible line marking a pipeline stage.
    fn milestone(&mut self, text: &str);

    /// A secondary detail line. Visible in verbose mode, written
    /// to the log in quiet mode.
    fn note(&mut self, text: &str);

    /// Run a command through this reporter's output policy.
    fn run(&mut self, program: &str, args: &[&str]) -> DeployResult<()>;

    /// Run a shell pipeline through this reporter's output
    /// policy.
    fn run_shell(&mut self, script: &str) -> DeployResult<()>;

    /// Report a tolerated stage failure. The pipeline continues.
    fn warn(&mut self, stage: &str, err: &DeployError);

    /// Report a fatal stage failure. The pipeline aborts after
    /// this call.
    fn fail(&mut self, stage: &str, err: &DeployError);
}

/// Stream everything straight to the terminal.
pub struct Verbose;

impl Reporter for Verbose {
    fn milestone(&mut self, text: &str) {
        eprintln!("{text}...");
    }

    fn note(&mut self, text: &str) {
        eprintln!("  {text}");
    }

    fn run(&mut self, program: &str, args: &[&str]) -> DeployResult<()> {
        cmd::run_interactive(program, args)
    }

    fn run_shell(&mut self, script: &str) -> DeployResult<()> {
        cmd::run_pipeline(script)
    }

    fn warn(&mut self, stage: &str, err: &DeployError) {
        eprintln!("warning: {stage}: {err} (continuing)");
    }

    fn fail(&mut self, stage: &str, err: &DeployError) {
        eprintln!();
        eprintln!("FAILED: {stage}: {err}");
    }
}

/// Capture command output into a log file and print only
/// milestones. On a fatal failure, surface the tail of the log.
pub struct Quiet {
    log: File,
    path: PathBuf,
}

impl Quiet {
    /// Create the log sink, truncating any previous run's log.
    pub fn create(path: &Path) -> DeployResult<Self> {
        let log = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            log,
            path: path.to_path_buf(),
        })
    }

    /// Path of the log sink.
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.path
    }

    fn log_line(&mut self, line: &str) {
        // Log writes are best-effort, they must never fail a
        // deployment.
        let _ = writeln!(self.log, "{line}");
    }

    /// Last [`TAIL_LINES`] lines of the log.
    #[must_use]
    pub fn tail(&self) -> Vec<String> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        let lines: Vec<&str> = content.lines().collect();
        let start = lines.len().saturating_sub(TAIL_LINES);
        lines[start..].iter().map(ToString::to_string).collect()
    }
}

impl Reporter for Quiet {
    fn milestone(&mut self, text: &str) {
        eprintln!("{text}...");
        self.log_line(&format!("=== {text}"));
    }

    fn note(&mut self, text: &str) {
        self.log_line(text);
    }

    fn run(&mut self, program: &str, args: &[&str]) -> DeployResult<()> {
        self.log_line(&format!("$ {}", cmd::format_command(program, args)));
        cmd::run_logged(program, args, &self.log)
    }

    fn run_shell(&mut self, script: &str) -> DeployResult<()> {
        self.log_line(&format!("$ {script}"));
        cmd::run_pipeline_logged(script, &self.log)
    }

    fn warn(&mut self, stage: &str, err: &DeployError) {
        self.log_line(&format!("warning: {stage}: {err}"));
        eprintln!("warning: {stage}: {err} (continuing)");
    }

    fn fail(&mut self, stage: &str, err: &DeployError) {
        eprintln!();
        eprintln!("FAILED: {stage}: {err}");
        let tail = self.tail();
        if !tail.is_empty() {
            eprintln!("--- last {} lines of {} ---", tail.len(), self.path.display());
            for line in tail {
                eprintln!("{line}");
            }
        }
        eprintln!("full log: {}", self.path.display());
    }
}
