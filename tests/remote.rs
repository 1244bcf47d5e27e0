use std::collections::HashMap;

use slipway::DeployConfig;
use slipway::remote::{health_probe, quick_restart, restart_script};

fn config() -> DeployConfig {
    DeployConfig::resolve(&HashMap::new(), |_| None).unwrap()
}

#[test]
fn restart_script_targets_the_remote_dir() {
    let script = restart_script(&config());

    assert!(script.starts_with("set -e\ncd /home/deploy/app\n"));
}

#[test]
fn restart_script_tolerates_nothing_running() {
    let script = restart_script(&config());

    assert!(script.contains("docker compose down 2>/dev/null || true"));
}

#[test]
fn restart_script_warms_up_before_migrating() {
    let script = restart_script(&config());

    let up = script.find("docker compose up -d").unwrap();
    let warmup = script.find("sleep 10").unwrap();
    let apply = script.find("psql").unwrap();
    assert!(up < warmup);
    assert!(warmup < apply);
}

#[test]
fn restart_script_applies_in_sorted_filename_order() {
    let script = restart_script(&config());

    assert!(script.contains("ls migrations/*.sql | sort"));
}

#[test]
fn restart_script_uses_configured_database() {
    let mut overrides = HashMap::new();
    overrides.insert("DB_CONTAINER".to_string(), "shop-db".to_string());
    overrides.insert("DB_USER".to_string(), "shop".to_string());
    overrides.insert("DB_NAME".to_string(), "orders".to_string());
    let config = DeployConfig::resolve(&overrides, |_| None).unwrap();

    let script = restart_script(&config);

    assert!(script.contains("docker exec -i shop-db psql -U shop -d orders"));
}

#[test]
fn restart_script_survives_a_failed_migration() {
    let script = restart_script(&config());

    // A failed apply is caught in a conditional, so `set -e`
    // cannot abort the loop
    assert!(script.contains("if ! docker exec -i"));
    assert!(script.contains("may already be applied"));
}

#[test]
fn restart_script_removes_remote_copies() {
    let script = restart_script(&config());

    assert!(script.contains("rm -f migrations/*.sql"));
}

#[test]
fn restart_script_settles_then_prunes_best_effort() {
    let script = restart_script(&config());

    let settle = script.find("sleep 5").unwrap();
    let prune = script.find("docker image prune -f").unwrap();
    assert!(settle < prune);
    assert!(script.contains("docker image prune -f >/dev/null 2>&1 || true"));
}

#[test]
fn quick_restart_only_restarts() {
    let command = quick_restart(&config());

    assert_eq!(command, "cd /home/deploy/app && docker compose restart");
    assert!(!command.contains("build"));
    assert!(!command.contains("save"));
    assert!(!command.contains("psql"));
}

#[test]
fn health_probe_targets_the_configured_port() {
    let mut overrides = HashMap::new();
    overrides.insert("APP_PORT".to_string(), "8080".to_string());
    let config = DeployConfig::resolve(&overrides, |_| None).unwrap();

    assert_eq!(
        health_probe(&config),
        "curl -s -m 10 http://localhost:8080/health"
    );
}
