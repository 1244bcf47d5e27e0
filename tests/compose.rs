use std::fs;

use docker_compose_types::Compose;
use slipway::DeployError;
use slipway::compose::{load, references_image};

const MINIMAL: &str = "services:\n  app:\n    image: myapp:latest\n    restart: unless-stopped\n  db:\n    image: postgres:16\n";

#[test]
fn accepts_a_minimal_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docker-compose.yml");
    fs::write(&path, MINIMAL).unwrap();

    let compose: Compose = load(&path).unwrap();

    assert_eq!(compose.services.0.len(), 2);
}

#[test]
fn missing_descriptor_is_file_not_found() {
    let dir = tempfile::tempdir().unwrap();

    let result = load(&dir.path().join("docker-compose.yml"));

    assert!(matches!(result, Err(DeployError::FileNotFound(_))));
}

#[test]
fn descriptor_without_services_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docker-compose.yml");
    fs::write(&path, "services: {}\n").unwrap();

    let result = load(&path);

    assert!(matches!(result, Err(DeployError::InvalidConfig(_))));
}

#[test]
fn malformed_yaml_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docker-compose.yml");
    fs::write(&path, "services: [not: {valid\n").unwrap();

    let result = load(&path);

    assert!(matches!(result, Err(DeployError::Yaml(_))));
}

#[test]
fn finds_the_deployed_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docker-compose.yml");
    fs::write(&path, MINIMAL).unwrap();
    let compose = load(&path).unwrap();

    assert!(references_image(&compose, "myapp:latest"));
    assert!(!references_image(&compose, "myapp:v2"));
}
