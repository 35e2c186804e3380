use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{middleware, Json, Router};

use carehub_auth::model::Role;
use carehub_auth::{authorize, protect, TokenVerifier};
use carehub_core::{ListParams, ListResult, ServiceError};

use crate::model::{CreateDonation, Donation};
use crate::service::DonationService;

/// Roles allowed to work with the donation ledger.
const FINANCE: &[Role] = &[Role::FinancialController, Role::Admin, Role::ExecutiveDirector];

pub type AppState = Arc<DonationService>;

pub fn build_router(svc: AppState, verifier: TokenVerifier) -> Router {
    Router::new()
        .route("/donations", get(list).post(create))
        .route("/donations/{id}", get(get_one).put(update).delete(delete))
        .route_layer(middleware::from_fn(
            move |req: axum::extract::Request, next: middleware::Next| {
                authorize(FINANCE, req, next)
            },
        ))
        .route_layer(middleware::from_fn_with_state(verifier, protect))
        .with_state(svc)
}

async fn create(
    State(svc): State<AppState>,
    Json(input): Json<CreateDonation>,
) -> Result<(StatusCode, Json<Donation>), ServiceError> {
    let donation = svc.create(input)?;
    Ok((StatusCode::CREATED, Json(donation)))
}

async fn list(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<Donation>>, ServiceError> {
    Ok(Json(svc.list(&params)?))
}

async fn get_one(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Donation>, ServiceError> {
    Ok(Json(svc.get(&id)?))
}

async fn update(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<Donation>, ServiceError> {
    Ok(Json(svc.update(&id, patch)?))
}

async fn delete(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete(&id)?;
    Ok(Json(serde_json::json!({ "message": "Donation removed" })))
}
