use crate::cmd;
use crate::config::DeployConfig;
use crate::error::DeployResult;
use crate::output::Reporter;

/// Build the application image, tagged from configuration. The
/// current commit hash and build time are passed as build args so
/// the application can report what it is running.
pub fn build_image(
    reporter: &mut dyn Reporter,
    config: &DeployConfig,
    commit: &str,
    built_at: &str,
) -> DeployResult<()> {
    let commit_arg = format!("GIT_COMMIT={commit}");
    let time_arg = format!("BUILD_TIME={built_at}");

    reporter.run(
        "docker",
        &[
            "build",
            "--build-arg",
            &commit_arg,
            "--build-arg",
            &time_arg,
            "-t",
            &config.image,
            ".",
        ],
    )
}

/// Stream the built image to the remote host over a single piped
/// SSH channel: `docker save | gzip | ssh | docker load`. No
/// registry, no intermediate file on either side.
pub fn transfer_image(reporter: &mut dyn Reporter, config: &DeployConfig) -> DeployResult<()> {
    // Query image size for logging and progress
    let size_bytes = cmd::run(
        "docker",
        &["image", "inspect", "--format", "{{.Size}}", &config.image],
    )?;
    let size_bytes: u64 = size_bytes.parse().unwrap_or(0);
    let size_mb = size_bytes / (1024 * 1024);

    reporter.note(&format!(
        "streaming {} ({size_mb} MB) to {}",
        config.image, config.host
    ));

    // Use pv for a progress bar when available, plain pipe otherwise
    let progress = if cmd::command_exists("pv") {
        format!("pv -s {size_bytes} -p -t -e -r -b")
    } else {
        "cat".to_string()
    };

    let pipeline = format!(
        "docker save {} | {progress} | gzip | \
         ssh {} 'gunzip | docker load'",
        config.image, config.host
    );
    reporter.run_shell(&pipeline)
}
