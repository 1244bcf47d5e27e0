use std::fs;
use std::path::Path;

use docker_compose_types::Compose;

use crate::error::{DeployError, DeployResult};

/// The orchestration descriptor copied verbatim to the remote
/// host.
pub const COMPOSE_FILE: &str = "docker-compose.yml";

/// Load and validate the local compose descriptor before it is
/// transferred. Catches a missing or malformed file before the
/// remote host sees it.
pub fn load(path: &Path) -> DeployResult<Compose> {
    if !path.exists() {
        return Err(DeployError::FileNotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path)?;
    let compose: Compose = serde_yaml::from_str(&content)?;

    if compose.services.0.is_empty() {
        return Err(DeployError::InvalidConfig(format!(
            "{} declares no services",
            path.display()
        )));
    }

    Ok(compose)
}

/// Whether any service in the descriptor runs the given image.
/// Deploying an image no service references is almost always a
/// tag mismatch between the build and the descriptor.
#[must_use]
pub fn references_image(compose: &Compose, image: &str) -> bool {
    compose
        .services
        .0
        .values()
        .flatten()
        .any(|service| service.image.as_deref() == Some(image))
}
