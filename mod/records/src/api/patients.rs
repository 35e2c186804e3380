use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{middleware, Json, Router};
use serde::Deserialize;

use carehub_auth::model::Role;
use carehub_auth::{authorize, protect, TokenVerifier};
use carehub_core::{ListParams, ListResult, ServiceError};

use crate::api::AppState;
use crate::model::{CreatePatient, CreatedPatient, PatientView};
use crate::service::Period;

/// Roles allowed to work with patient records.
const PATIENT_ACCESS: &[Role] = &[Role::Admin, Role::ExecutiveDirector, Role::MentalHealthCounselor];

pub fn routes(svc: AppState, verifier: TokenVerifier) -> Router {
    Router::new()
        .route("/patients", get(list_patients).post(create_patient))
        .route("/patients/stats/active-count", get(active_count))
        .route("/patients/stats/new-enrollments", get(new_enrollments))
        .route("/patients/{id}", get(get_patient).put(update_patient).delete(delete_patient))
        .route_layer(middleware::from_fn(
            move |req: axum::extract::Request, next: middleware::Next| {
                authorize(PATIENT_ACCESS, req, next)
            },
        ))
        .route_layer(middleware::from_fn_with_state(verifier, protect))
        .with_state(svc)
}

async fn create_patient(
    State(svc): State<AppState>,
    Json(input): Json<CreatePatient>,
) -> Result<(StatusCode, Json<CreatedPatient>), ServiceError> {
    let created = svc.create_patient(input)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_patients(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<PatientView>>, ServiceError> {
    Ok(Json(svc.list_patients(&params)?))
}

async fn get_patient(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PatientView>, ServiceError> {
    Ok(Json(svc.get_patient(&id)?))
}

async fn update_patient(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<PatientView>, ServiceError> {
    Ok(Json(svc.update_patient(&id, patch)?))
}

async fn delete_patient(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_patient(&id)?;
    Ok(Json(serde_json::json!({
        "message": "Patient and associated user account removed"
    })))
}

async fn active_count(
    State(svc): State<AppState>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let count = svc.active_patient_count()?;
    Ok(Json(serde_json::json!({ "count": count })))
}

#[derive(Deserialize)]
struct StatsQuery {
    period: Option<String>,
}

async fn new_enrollments(
    State(svc): State<AppState>,
    Query(q): Query<StatsQuery>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let period = Period::parse(q.period.as_deref());
    let count = svc.new_enrollments(period, chrono::Utc::now())?;
    Ok(Json(serde_json::json!({ "count": count })))
}
