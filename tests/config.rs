use std::collections::HashMap;
use std::fs;

use slipway::DeployConfig;
use slipway::config::parse_conf;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn all_defaults_when_nothing_set() {
    let config = DeployConfig::resolve(&HashMap::new(), no_env).unwrap();

    assert_eq!(config.host, "deploy@your-server");
    assert_eq!(config.port, 3000);
    assert_eq!(config.remote_dir, "/home/deploy/app");
    assert_eq!(config.image, "myapp:latest");
    assert_eq!(config.db_container, "app-db");
    assert_eq!(config.db_user, "postgres");
    assert_eq!(config.db_name, "appdb");
}

#[test]
fn environment_fills_still_unset_names() {
    let env = |name: &str| (name == "APP_PORT").then(|| "8080".to_string());

    let config = DeployConfig::resolve(&HashMap::new(), env).unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.host, "deploy@your-server");
}

#[test]
fn override_file_wins_over_environment() {
    let mut overrides = HashMap::new();
    overrides.insert("APP_PORT".to_string(), "9000".to_string());
    overrides.insert("DEPLOY_HOST".to_string(), "deploy@10.0.0.5".to_string());
    let env = |name: &str| match name {
        "APP_PORT" => Some("8080".to_string()),
        "IMAGE_NAME" => Some("other:tag".to_string()),
        _ => None,
    };

    let config = DeployConfig::resolve(&overrides, env).unwrap();

    assert_eq!(config.port, 9000);
    assert_eq!(config.host, "deploy@10.0.0.5");
    // Not in the file, so the environment fills it
    assert_eq!(config.image, "other:tag");
}

#[test]
fn unparseable_port_is_an_error() {
    let mut overrides = HashMap::new();
    overrides.insert("APP_PORT".to_string(), "three thousand".to_string());

    let result = DeployConfig::resolve(&overrides, no_env);

    assert!(result.is_err());
}

#[test]
fn load_reads_override_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deploy.conf");
    fs::write(
        &path,
        "# production target\nDB_CONTAINER=shop-db\nDB_NAME=\"shop\"\n",
    )
    .unwrap();

    let config = DeployConfig::load(&path).unwrap();

    assert_eq!(config.db_container, "shop-db");
    assert_eq!(config.db_name, "shop");
}

#[test]
fn load_tolerates_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    let config = DeployConfig::load(&dir.path().join("absent.conf")).unwrap();

    assert_eq!(config.db_user, "postgres");
}

#[test]
fn parse_conf_trims_keys_and_values() {
    let conf = parse_conf("  REMOTE_DIR = /srv/app  \n");

    assert_eq!(conf.get("REMOTE_DIR").unwrap(), "/srv/app");
}
