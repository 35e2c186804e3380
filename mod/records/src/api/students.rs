use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{middleware, Json, Router};

use carehub_auth::model::Role;
use carehub_auth::{authorize, protect, TokenVerifier};
use carehub_core::{ListParams, ListResult, ServiceError};

use crate::api::AppState;
use crate::model::{CreateStudent, StudentView};

/// Roles allowed to work with student records.
const STUDENT_ACCESS: &[Role] = &[Role::Admin, Role::ExecutiveDirector];

pub fn routes(svc: AppState, verifier: TokenVerifier) -> Router {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route("/students/{id}", get(get_student).put(update_student).delete(delete_student))
        .route_layer(middleware::from_fn(
            move |req: axum::extract::Request, next: middleware::Next| {
                authorize(STUDENT_ACCESS, req, next)
            },
        ))
        .route_layer(middleware::from_fn_with_state(verifier, protect))
        .with_state(svc)
}

async fn create_student(
    State(svc): State<AppState>,
    Json(input): Json<CreateStudent>,
) -> Result<(StatusCode, Json<StudentView>), ServiceError> {
    let view = svc.create_student(input)?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn list_students(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<StudentView>>, ServiceError> {
    Ok(Json(svc.list_students(&params)?))
}

async fn get_student(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StudentView>, ServiceError> {
    Ok(Json(svc.get_student(&id)?))
}

async fn update_student(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<StudentView>, ServiceError> {
    Ok(Json(svc.update_student(&id, patch)?))
}

async fn delete_student(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_student(&id)?;
    Ok(Json(serde_json::json!({
        "message": "Student and associated user account removed"
    })))
}
