//! Records module — patient and student profiles.
//!
//! Each profile is backed 1:1 by a user account owned by the auth
//! module. Creating a profile creates the account first and rolls it
//! back if the profile insert fails; deleting a profile removes the
//! account too.

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use carehub_auth::AuthService;
use carehub_core::Module;
use carehub_store::Store;

pub use service::{RecordsError, RecordsService};

pub struct RecordsModule {
    service: Arc<RecordsService>,
}

impl RecordsModule {
    pub fn new(store: Store, auth: Arc<AuthService>) -> Result<Self, carehub_core::ServiceError> {
        let service =
            RecordsService::new(store, auth).map_err(carehub_core::ServiceError::from)?;
        Ok(Self { service })
    }

    pub fn service(&self) -> &Arc<RecordsService> {
        &self.service
    }
}

impl Module for RecordsModule {
    fn name(&self) -> &str {
        "records"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone(), self.service.auth.verifier())
    }
}
