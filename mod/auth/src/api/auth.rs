use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use carehub_core::ServiceError;

use crate::api::AppState;
use crate::model::{AuthResponse, LoginRequest, RegisterRequest};

/// Public routes: no token required.
pub fn routes(svc: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .with_state(svc)
}

async fn login(
    State(svc): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ServiceError> {
    let resp = svc.login(&req.email, &req.password)?;
    Ok(Json(resp))
}

async fn register(
    State(svc): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ServiceError> {
    let resp = svc.register(req)?;
    Ok((StatusCode::CREATED, Json(resp)))
}
