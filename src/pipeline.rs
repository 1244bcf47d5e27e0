use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::Parser;

use crate::compose;
use crate::config::{CONF_FILE, DeployConfig};
use crate::docker;
use crate::error::{DeployError, DeployResult};
use crate::git;
use crate::health;
use crate::lock::{DeployLock, LOCK_FILE};
use crate::migrate;
use crate::output::{LOG_FILE, Quiet, Reporter, Verbose};
use crate::remote;
use crate::ssh::SshSession;

/// Local production env file, renamed to `.env` on the remote
/// side.
pub const ENV_PRODUCTION: &str = ".env.production";

/// One pipeline stage: a name shown as a milestone, a unit of
/// work, and whether its failure aborts the run.
struct Stage<'a> {
    name: &'static str,
    fatal: bool,
    run: Box<dyn FnMut(&mut dyn Reporter) -> DeployResult<()> + 'a>,
}

impl<'a> Stage<'a> {
    fn fatal(
        name: &'static str,
        run: impl FnMut(&mut dyn Reporter) -> DeployResult<()> + 'a,
    ) -> Self {
        Self {
            name,
            fatal: true,
            run: Box::new(run),
        }
    }

    fn tolerated(
        name: &'static str,
        run: impl FnMut(&mut dyn Reporter) -> DeployResult<()> + 'a,
    ) -> Self {
        Self {
            name,
            fatal: false,
            run: Box::new(run),
        }
    }
}

/// Execute stages in order. A fatal stage error aborts the run
/// with a failure banner; a tolerated one is reported and the
/// pipeline continues.
fn drive(reporter: &mut dyn Reporter, stages: Vec<Stage<'_>>) -> DeployResult<()> {
    for mut stage in stages {
        reporter.milestone(stage.name);
        match (stage.run)(&mut *reporter) {
            Ok(()) => {}
            Err(err) if stage.fatal => {
                reporter.fail(stage.name, &err);
                return Err(err);
            }
            Err(err) => reporter.warn(stage.name, &err),
        }
    }
    Ok(())
}

/// Deployment pipeline against a single remote host.
///
/// Both modes are one stage list run by [`drive`]; the reporter
/// decides presentation, never control flow.
pub struct Pipeline {
    config: DeployConfig,
}

impl Pipeline {
    #[must_use]
    pub const fn new(config: DeployConfig) -> Self {
        Self { config }
    }

    /// Full deployment: push source, build, transfer image and
    /// config, stage migrations, restart the remote stack (which
    /// applies them), archive, probe health.
    pub fn full(&self, reporter: &mut dyn Reporter) -> DeployResult<()> {
        let config = &self.config;
        let migrations_dir = Path::new(migrate::MIGRATIONS_DIR);
        let pending = migrate::pending(migrations_dir)?;
        let ssh = SshSession::new(&config.host);

        let mut stages: Vec<Stage<'_>> = Vec::new();

        stages.push(Stage::tolerated("Pushing source", |r: &mut dyn Reporter| {
            git::sync(r)
        }));

        stages.push(Stage::fatal("Building image", |r: &mut dyn Reporter| {
            let commit = git::short_hash()?;
            let built_at = Utc::now().to_rfc3339();
            docker::build_image(r, config, &commit, &built_at)
        }));

        stages.push(Stage::fatal(
            "Transferring image",
            |r: &mut dyn Reporter| docker::transfer_image(r, config),
        ));

        stages.push(Stage::fatal(
            "Copying configuration",
            |r: &mut dyn Reporter| {
                let descriptor = compose::load(Path::new(compose::COMPOSE_FILE))?;
                if !compose::references_image(&descriptor, &config.image) {
                    r.note(&format!(
                        "no service in {} runs {}",
                        compose::COMPOSE_FILE,
                        config.image
                    ));
                }

                ssh.exec_through(r, &format!("mkdir -p {}", config.remote_dir))?;
                ssh.copy_to(
                    r,
                    compose::COMPOSE_FILE,
                    &format!("{}/{}", config.remote_dir, compose::COMPOSE_FILE),
                )?;

                if Path::new(ENV_PRODUCTION).exists() {
                    let remote_env = format!("{}/.env", config.remote_dir);
                    ssh.copy_to(r, ENV_PRODUCTION, &remote_env)?;
                    ssh.exec_through(r, &format!("chmod 600 {remote_env}"))?;
                }
                Ok(())
            },
        ));

        if !pending.is_empty() {
            stages.push(Stage::fatal(
                "Staging migrations",
                |r: &mut dyn Reporter| {
                    ssh.exec_through(
                        r,
                        &format!(
                            "mkdir -p {}/{}",
                            config.remote_dir,
                            migrate::MIGRATIONS_DIR
                        ),
                    )?;
                    for file in &pending {
                        let name = file
                            .file_name()
                            .and_then(|n| n.to_str())
                            .ok_or_else(|| {
                                DeployError::Other(format!(
                                    "unusable migration filename: {}",
                                    file.display()
                                ))
                            })?;
                        ssh.copy_to(
                            r,
                            &file.display().to_string(),
                            &format!(
                                "{}/{}/{name}",
                                config.remote_dir,
                                migrate::MIGRATIONS_DIR
                            ),
                        )?;
                    }
                    r.note(&format!("{} migration(s) staged", pending.len()));
                    Ok(())
                },
            ));
        }

        stages.push(Stage::fatal(
            "Restarting remote stack",
            |r: &mut dyn Reporter| ssh.exec_through(r, &remote::restart_script(config)),
        ));

        if !pending.is_empty() {
            stages.push(Stage::tolerated(
                "Archiving migrations",
                |r: &mut dyn Reporter| {
                    migrate::archive(migrations_dir, &pending)?;
                    git::archive_commit(r, migrate::MIGRATIONS_DIR)
                },
            ));
        }

        stages.push(Stage::tolerated(
            "Checking health",
            |r: &mut dyn Reporter| {
                let status = health::probe(&ssh, config);
                r.milestone(&format!(
                    "Health {} - http://{}:{}",
                    status.label(),
                    config.host_only(),
                    config.port
                ));
                Ok(())
            },
        ));

        drive(reporter, stages)?;
        reporter.milestone("Deployment complete");
        Ok(())
    }

    /// Quick mode: restart the running stack and probe health.
    /// Nothing is rebuilt or transferred.
    pub fn quick(&self, reporter: &mut dyn Reporter) -> DeployResult<()> {
        let config = &self.config;
        let ssh = SshSession::new(&config.host);

        let stages = vec![
            Stage::fatal("Restarting application", |r: &mut dyn Reporter| {
                ssh.exec_through(r, &remote::quick_restart(config))
            }),
            Stage::tolerated("Checking health", |r: &mut dyn Reporter| {
                let status = health::probe(&ssh, config);
                r.milestone(&format!("Status: {}", status.label()));
                Ok(())
            }),
        ];

        drive(reporter, stages)
    }
}

#[derive(Parser)]
#[command(name = "slipway")]
#[command(about = "Deploy a containerized app to a single host over SSH")]
struct Cli {
    /// Deployment mode: "quick" restarts the remote stack without
    /// rebuilding; anything else runs the full pipeline
    mode: Option<String>,

    /// Capture command output into the deploy log and print only
    /// one milestone line per stage
    #[arg(short, long)]
    quiet: bool,

    /// Configuration override file
    #[arg(long, default_value = CONF_FILE)]
    config: PathBuf,
}

/// Parse the CLI, resolve configuration, take the deployment
/// lock, and run the selected mode.
pub fn run() -> DeployResult<()> {
    let cli = Cli::parse();
    let config = DeployConfig::load(&cli.config)?;
    let _lock = DeployLock::acquire(Path::new(LOCK_FILE))?;

    let mut reporter: Box<dyn Reporter> = if cli.quiet {
        Box::new(Quiet::create(Path::new(LOG_FILE))?)
    } else {
        Box::new(Verbose)
    };

    let pipeline = Pipeline::new(config);
    match cli.mode.as_deref() {
        Some("quick") => pipeline.quick(reporter.as_mut()),
        _ => pipeline.full(reporter.as_mut()),
    }
}
