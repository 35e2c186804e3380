//! `carehubd` — the CareHub server binary.
//!
//! Usage:
//!   carehubd -c <config-name-or-path> [--listen <addr>]
//!
//! A bare config name resolves to `/etc/carehub/<name>.toml`.

mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use carehub_attendance::AttendanceModule;
use carehub_auth::AuthModule;
use carehub_core::Module;
use carehub_donations::DonationsModule;
use carehub_records::RecordsModule;
use carehub_store::SqliteStore;

use config::ServerConfig;

/// CareHub server.
#[derive(Parser, Debug)]
#[command(name = "carehubd", about = "CareHub case-management server")]
struct Cli {
    /// Config name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    bootstrap::verify_config(&server_config)?;

    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let store: carehub_store::Store = Arc::new(
        SqliteStore::open(&data_dir.join("carehub.db"))
            .map_err(|e| anyhow::anyhow!("failed to open store: {}", e))?,
    );

    let auth_config = carehub_auth::AuthConfig {
        jwt_secret: server_config.jwt.secret.clone(),
        token_ttl_days: server_config.jwt.expire_days,
    };
    let auth_module = AuthModule::new(store.clone(), auth_config)
        .map_err(|e| anyhow::anyhow!("auth module: {}", e))?;
    let auth = auth_module.service().clone();
    info!("Auth module initialized");

    bootstrap::ensure_admin(&auth, &server_config)?;

    let records_module = RecordsModule::new(store.clone(), auth.clone())
        .map_err(|e| anyhow::anyhow!("records module: {}", e))?;
    info!("Records module initialized");

    let attendance_module = AttendanceModule::new(store.clone(), auth.clone())
        .map_err(|e| anyhow::anyhow!("attendance module: {}", e))?;
    info!("Attendance module initialized");

    let donations_module = DonationsModule::new(store.clone(), auth.verifier())
        .map_err(|e| anyhow::anyhow!("donations module: {}", e))?;
    info!("Donations module initialized");

    let module_routes = vec![
        (auth_module.name(), auth_module.routes()),
        (records_module.name(), records_module.routes()),
        (attendance_module.name(), attendance_module.routes()),
        (donations_module.name(), donations_module.routes()),
    ];

    let app = routes::build_router(module_routes);

    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("CareHub server listening on {}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
