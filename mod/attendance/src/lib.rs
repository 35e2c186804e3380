//! Attendance module — daily staff check-in/check-out.

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use carehub_auth::{AuthService, TokenVerifier};
use carehub_core::Module;
use carehub_store::Store;

pub use service::{AttendanceError, AttendanceService};

pub struct AttendanceModule {
    service: Arc<AttendanceService>,
    verifier: TokenVerifier,
}

impl AttendanceModule {
    pub fn new(store: Store, auth: Arc<AuthService>) -> Result<Self, carehub_core::ServiceError> {
        let verifier = auth.verifier();
        let service =
            AttendanceService::new(store, auth).map_err(carehub_core::ServiceError::from)?;
        Ok(Self { service, verifier })
    }
}

impl Module for AttendanceModule {
    fn name(&self) -> &str {
        "attendance"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone(), self.verifier.clone())
    }
}
