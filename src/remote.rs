use crate::config::DeployConfig;
use crate::migrate::MIGRATIONS_DIR;

/// Flat warm-up after `up -d`, giving the database service time
/// to accept connections. There is no readiness signal to poll,
/// so the delay is fixed.
pub const DB_WARMUP_SECS: u32 = 10;

/// Flat settle delay after migrations, before pruning.
pub const SETTLE_SECS: u32 = 5;

/// The script run in a single SSH session for a full deploy:
/// restart the stack, apply any staged migrations in filename
/// order, clean up.
///
/// Only infrastructure steps (`cd`, `up -d`) can fail the
/// script. Teardown tolerates a stack that is not running, each
/// migration failure is caught and reported inline (a re-applied
/// migration failing is expected after a partial run), and image
/// pruning is best-effort.
#[must_use]
pub fn restart_script(config: &DeployConfig) -> String {
    format!(
        r#"set -e
cd {dir}
docker compose down 2>/dev/null || true
docker compose up -d
sleep {warmup}
if ls {mig}/*.sql >/dev/null 2>&1; then
    for f in $(ls {mig}/*.sql | sort); do
        echo "applying $f"
        if ! docker exec -i {db} psql -U {user} -d {name} < "$f"; then
            echo "warning: $f failed (may already be applied)"
        fi
    done
    rm -f {mig}/*.sql
fi
sleep {settle}
docker image prune -f >/dev/null 2>&1 || true
"#,
        dir = config.remote_dir,
        warmup = DB_WARMUP_SECS,
        mig = MIGRATIONS_DIR,
        db = config.db_container,
        user = config.db_user,
        name = config.db_name,
        settle = SETTLE_SECS,
    )
}

/// Quick-mode command: restart the running stack in place,
/// nothing rebuilt, nothing transferred.
#[must_use]
pub fn quick_restart(config: &DeployConfig) -> String {
    format!("cd {} && docker compose restart", config.remote_dir)
}

/// Health probe run on the remote host against the application
/// port. Silent, bounded, and allowed to fail.
#[must_use]
pub fn health_probe(config: &DeployConfig) -> String {
    format!("curl -s -m 10 http://localhost:{}/health", config.port)
}
