use crate::config::DeployConfig;
use crate::remote;
use crate::ssh::SshSession;

/// Tokens whose literal presence in the health body classifies
/// the application as healthy. Case-sensitive.
pub const HEALTHY_TOKENS: [&str; 3] = ["ok", "true", "healthy"];

/// Advisory deployment health. Never affects the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// The health endpoint answered with a recognized token.
    Healthy,
    /// No recognized answer yet. Not an error, the application
    /// may still be warming up.
    Starting,
}

impl HealthStatus {
    /// Operator-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Healthy => "OK",
            Self::Starting => "Starting",
        }
    }
}

/// Classify a health response body by literal substring match.
#[must_use]
pub fn classify(body: &str) -> HealthStatus {
    if HEALTHY_TOKENS.iter().any(|token| body.contains(token)) {
        HealthStatus::Healthy
    } else {
        HealthStatus::Starting
    }
}

/// Probe the application's health endpoint on the remote host.
/// An unreachable endpoint is "not yet healthy", never an error.
#[must_use]
pub fn probe(ssh: &SshSession, config: &DeployConfig) -> HealthStatus {
    ssh.exec(&remote::health_probe(config))
        .map_or(HealthStatus::Starting, |body| classify(&body))
}
