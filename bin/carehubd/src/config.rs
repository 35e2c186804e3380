//! Server configuration.
//!
//! Loaded from a TOML file; a bare name resolves to
//! `/etc/carehub/<name>.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the SQLite database.
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Token signing secret.
    pub secret: String,

    /// Token lifetime in days.
    #[serde(default = "default_expire_days")]
    pub expire_days: i64,
}

fn default_expire_days() -> i64 {
    30
}

/// First-start admin account settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    pub admin_email: String,

    /// When unset, a password is generated on first start and logged once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
}

impl ServerConfig {
    /// Resolve a config argument: a path with `/` or `.` is used as-is,
    /// a bare name maps to `/etc/carehub/<name>.toml`.
    pub fn resolve_path(arg: &str) -> PathBuf {
        if arg.contains('/') || arg.contains('.') {
            PathBuf::from(arg)
        } else {
            PathBuf::from(format!("/etc/carehub/{}.toml", arg))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read config {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_path_variants() {
        assert_eq!(
            ServerConfig::resolve_path("prod"),
            PathBuf::from("/etc/carehub/prod.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./local.toml"),
            PathBuf::from("./local.toml")
        );
    }

    #[test]
    fn load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carehub.toml");
        std::fs::write(
            &path,
            r#"
[storage]
data_dir = "/var/lib/carehub"

[jwt]
secret = "test-secret"

[bootstrap]
admin_email = "admin@example.org"
"#,
        )
        .unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.storage.data_dir, "/var/lib/carehub");
        assert_eq!(config.jwt.secret, "test-secret");
        assert_eq!(config.jwt.expire_days, 30);
        assert_eq!(config.bootstrap.admin_email, "admin@example.org");
        assert!(config.bootstrap.admin_password.is_none());
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(ServerConfig::load(Path::new("/nonexistent/carehub.toml")).is_err());
    }
}
