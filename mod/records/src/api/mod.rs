mod patients;
mod students;

use std::sync::Arc;

use axum::Router;

use carehub_auth::TokenVerifier;

use crate::service::RecordsService;

pub type AppState = Arc<RecordsService>;

pub fn build_router(svc: AppState, verifier: TokenVerifier) -> Router {
    Router::new()
        .merge(patients::routes(svc.clone(), verifier.clone()))
        .merge(students::routes(svc, verifier))
}
