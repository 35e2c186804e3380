//! Donations module — ledger of cash and in-kind donations.

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use carehub_auth::TokenVerifier;
use carehub_core::Module;
use carehub_store::Store;

pub use service::{DonationError, DonationService};

pub struct DonationsModule {
    service: Arc<DonationService>,
    verifier: TokenVerifier,
}

impl DonationsModule {
    pub fn new(store: Store, verifier: TokenVerifier) -> Result<Self, carehub_core::ServiceError> {
        let service = DonationService::new(store).map_err(carehub_core::ServiceError::from)?;
        Ok(Self { service, verifier })
    }
}

impl Module for DonationsModule {
    fn name(&self) -> &str {
        "donations"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone(), self.verifier.clone())
    }
}
