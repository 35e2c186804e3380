//! Auth module — identity, credentials, and role-gated access.
//!
//! # Resources
//!
//! - **User** — identity record with a salted password credential, a
//!   closed role, and an optional embedded staff profile
//! - **Session token** — stateless signed JWT carrying `{id, role}`,
//!   30-day expiry, no server-side session table
//!
//! # Usage
//!
//! ```ignore
//! use carehub_auth::{AuthModule, service::AuthConfig};
//!
//! let module = AuthModule::new(store, AuthConfig::default())?;
//! let router = module.routes(); // Mount under /api
//! ```

pub mod api;
pub mod credential;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use carehub_core::Module;
use carehub_store::Store;

pub use api::{authorize, protect};
pub use credential::Credential;
pub use model::{Claims, Role};
pub use service::{AuthConfig, AuthError, AuthService, TokenVerifier};

/// Auth module implementing the Module trait.
///
/// Holds the AuthService and provides HTTP routes for login, register,
/// and user administration.
pub struct AuthModule {
    service: Arc<AuthService>,
}

impl AuthModule {
    /// Create a new AuthModule.
    pub fn new(store: Store, config: AuthConfig) -> Result<Self, carehub_core::ServiceError> {
        let service = AuthService::new(store, config).map_err(carehub_core::ServiceError::from)?;
        Ok(Self { service })
    }

    /// Get a reference to the underlying AuthService.
    pub fn service(&self) -> &Arc<AuthService> {
        &self.service
    }
}

impl Module for AuthModule {
    fn name(&self) -> &str {
        "auth"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
