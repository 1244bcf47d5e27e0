use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use crate::error::{DeployError, DeployResult};

/// Default path of the optional override file.
pub const CONF_FILE: &str = "deploy.conf";

/// Deployment settings, resolved once at startup and passed
/// explicitly into the pipeline.
///
/// Every setting has a default, so a missing override file or an
/// empty environment never causes failure. Resolution order per
/// name: override file, then environment variable, then the
/// hard-coded default.
///
/// | Field | Env var | Default |
/// |---|---|---|
/// | `host` | `DEPLOY_HOST` | `deploy@your-server` |
/// | `port` | `APP_PORT` | `3000` |
/// | `remote_dir` | `REMOTE_DIR` | `/home/deploy/app` |
/// | `image` | `IMAGE_NAME` | `myapp:latest` |
/// | `db_container` | `DB_CONTAINER` | `app-db` |
/// | `db_user` | `DB_USER` | `postgres` |
/// | `db_name` | `DB_NAME` | `appdb` |
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub host: String,
    pub port: u16,
    pub remote_dir: String,
    pub image: String,
    pub db_container: String,
    pub db_user: String,
    pub db_name: String,
}

impl DeployConfig {
    /// Load configuration from the override file at `path` (if
    /// present), the process environment, and defaults.
    pub fn load(path: &Path) -> DeployResult<Self> {
        let overrides = if path.exists() {
            parse_conf(&fs::read_to_string(path)?)
        } else {
            HashMap::new()
        };
        Self::resolve(&overrides, |name| env::var(name).ok())
    }

    /// Resolve every field against an override map and an
    /// environment lookup.
    pub fn resolve(
        overrides: &HashMap<String, String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> DeployResult<Self> {
        let get = |name: &str, default: &str| {
            overrides
                .get(name)
                .cloned()
                .or_else(|| lookup(name))
                .unwrap_or_else(|| default.to_string())
        };

        let port_raw = get("APP_PORT", "3000");
        let port: u16 = port_raw.parse().map_err(|_| {
            DeployError::InvalidConfig(format!("APP_PORT must be a port number, got '{port_raw}'"))
        })?;

        Ok(Self {
            host: get("DEPLOY_HOST", "deploy@your-server"),
            port,
            remote_dir: get("REMOTE_DIR", "/home/deploy/app"),
            image: get("IMAGE_NAME", "myapp:latest"),
            db_container: get("DB_CONTAINER", "app-db"),
            db_user: get("DB_USER", "postgres"),
            db_name: get("DB_NAME", "appdb"),
        })
    }

    /// Host part of the SSH destination, without any `user@`
    /// prefix. Used for operator-facing URLs.
    #[must_use]
    pub fn host_only(&self) -> &str {
        self.host
            .rsplit_once('@')
            .map_or(self.host.as_str(), |(_, host)| host)
    }
}

/// Parse `KEY=value` lines from an override file. Blank lines and
/// `#` comments are ignored; surrounding single or double quotes
/// on the value are stripped.
#[must_use]
pub fn parse_conf(content: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = trimmed.split_once('=') {
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| {
                    value
                        .strip_prefix('\'')
                        .and_then(|v| v.strip_suffix('\''))
                })
                .unwrap_or(value);
            values.insert(key.trim().to_string(), value.to_string());
        }
    }

    values
}
