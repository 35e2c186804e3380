//! Bootstrap — first-start checks and admin account creation.

use std::sync::Arc;

use rand::Rng;
use tracing::info;

use carehub_auth::model::{CreateUser, Role};
use carehub_auth::AuthService;

use crate::config::ServerConfig;

/// Verify server configuration is ready for use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.jwt.secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    if config.bootstrap.admin_email.is_empty() {
        anyhow::bail!("bootstrap.admin_email is empty in configuration.");
    }
    Ok(())
}

/// Ensure the configured admin account exists. Creates it on first start;
/// a generated password is logged exactly once.
pub fn ensure_admin(auth: &Arc<AuthService>, config: &ServerConfig) -> anyhow::Result<()> {
    let email = &config.bootstrap.admin_email;
    if auth
        .find_by_email(email)
        .map_err(|e| anyhow::anyhow!("admin lookup failed: {}", e))?
        .is_some()
    {
        info!(email, "admin account already exists");
        return Ok(());
    }

    let (password, generated) = match &config.bootstrap.admin_password {
        Some(p) => (p.clone(), false),
        None => (
            rand::thread_rng().gen_range(10_000_000u32..100_000_000).to_string(),
            true,
        ),
    };

    auth.create_user(CreateUser {
        email: email.clone(),
        password: password.clone(),
        role: Role::Admin,
        staff_info: None,
        course_id: None,
    })
    .map_err(|e| anyhow::anyhow!("failed to create admin account: {}", e))?;

    if generated {
        // Shown once on stdout; the secret stays out of the log stream.
        println!("Created admin account {} with generated password: {}", email, password);
        println!("Change it after first login.");
        info!(email, "created admin account with generated password");
    } else {
        info!(email, "created admin account");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use carehub_auth::AuthConfig;
    use carehub_store::SqliteStore;

    use super::*;
    use crate::config::{BootstrapConfig, JwtConfig, StorageConfig};

    fn config() -> ServerConfig {
        ServerConfig {
            storage: StorageConfig { data_dir: "/tmp/carehub".to_string() },
            jwt: JwtConfig { secret: "s3cret".to_string(), expire_days: 30 },
            bootstrap: BootstrapConfig {
                admin_email: "admin@example.org".to_string(),
                admin_password: Some("bootpass1".to_string()),
            },
        }
    }

    #[test]
    fn verify_rejects_empty_fields() {
        let mut c = config();
        assert!(verify_config(&c).is_ok());
        c.jwt.secret = String::new();
        assert!(verify_config(&c).is_err());

        let mut c = config();
        c.bootstrap.admin_email = String::new();
        assert!(verify_config(&c).is_err());
    }

    #[test]
    fn ensure_admin_is_idempotent() {
        let store: carehub_store::Store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let auth = AuthService::new(store, AuthConfig::default()).unwrap();
        let c = config();

        ensure_admin(&auth, &c).unwrap();
        ensure_admin(&auth, &c).unwrap();

        let login = auth.login("admin@example.org", "bootpass1").unwrap();
        assert_eq!(login.role, Role::Admin);
    }

    #[test]
    fn ensure_admin_generates_password_when_unset() {
        let store: carehub_store::Store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let auth = AuthService::new(store, AuthConfig::default()).unwrap();
        let mut c = config();
        c.bootstrap.admin_password = None;

        ensure_admin(&auth, &c).unwrap();

        let admin = auth.find_by_email("admin@example.org").unwrap().unwrap();
        assert_eq!(admin.role, Some(Role::Admin));
        // A credential was derived from the generated password.
        assert!(!admin.credential.is_unset());
        assert!(!admin.credential.verify(""));
    }
}
