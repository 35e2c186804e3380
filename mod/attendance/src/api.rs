use std::sync::Arc;

use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use serde::Deserialize;

use carehub_auth::model::{Claims, Role};
use carehub_auth::{authorize, protect, TokenVerifier};
use carehub_core::ServiceError;

use crate::model::{AttendanceView, StaffAttendance};
use crate::service::AttendanceService;

/// Roles that keep attendance records.
const STAFF_ROLES: &[Role] = &[
    Role::Staff,
    Role::Admin,
    Role::ExecutiveDirector,
    Role::FinancialController,
    Role::MentalHealthCounselor,
];

/// Roles allowed to read everyone's records.
const ATTENDANCE_ADMIN: &[Role] = &[Role::Admin, Role::ExecutiveDirector];

pub type AppState = Arc<AttendanceService>;

pub fn build_router(svc: AppState, verifier: TokenVerifier) -> Router {
    let staff = Router::new()
        .route("/attendance/staff/check-in", post(check_in))
        .route("/attendance/staff/check-out", post(check_out))
        .route("/attendance/staff/me", get(my_attendance))
        .route_layer(middleware::from_fn(
            move |req: axum::extract::Request, next: middleware::Next| {
                authorize(STAFF_ROLES, req, next)
            },
        ));

    let admin = Router::new()
        .route("/attendance/staff", get(all_attendance))
        .route_layer(middleware::from_fn(
            move |req: axum::extract::Request, next: middleware::Next| {
                authorize(ATTENDANCE_ADMIN, req, next)
            },
        ));

    staff
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(verifier, protect))
        .with_state(svc)
}

async fn check_in(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<(StatusCode, Json<StaffAttendance>), ServiceError> {
    let record = svc.check_in(&claims.id, chrono::Utc::now())?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn check_out(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<StaffAttendance>, ServiceError> {
    let record = svc.check_out(&claims.id, chrono::Utc::now())?;
    Ok(Json(record))
}

async fn my_attendance(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<StaffAttendance>>, ServiceError> {
    Ok(Json(svc.my_attendance(&claims.id)?))
}

#[derive(Deserialize)]
struct DayQuery {
    date: Option<String>,
}

async fn all_attendance(
    State(svc): State<AppState>,
    Query(q): Query<DayQuery>,
) -> Result<Json<Vec<AttendanceView>>, ServiceError> {
    Ok(Json(svc.all_attendance(q.date.as_deref())?))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use carehub_auth::model::CreateUser;
    use carehub_auth::{AuthConfig, AuthService};
    use carehub_store::SqliteStore;

    use super::*;

    fn app() -> (Router, Arc<AuthService>) {
        let store: carehub_store::Store =
            Arc::new(SqliteStore::open_in_memory().unwrap());
        let auth = AuthService::new(store.clone(), AuthConfig::default()).unwrap();
        let svc = AttendanceService::new(store, auth.clone()).unwrap();
        (build_router(svc, auth.verifier()), auth)
    }

    fn token_for(auth: &AuthService, email: &str, role: Role) -> String {
        let staff_info = role.is_staff_like().then(|| carehub_auth::model::StaffInfo {
            full_name: "Test Staffer".to_string(),
            gender: carehub_auth::model::Gender::Other,
            position: "Officer".to_string(),
            employment_status: carehub_auth::model::EmploymentStatus::FullTime,
        });
        let user = auth
            .create_user(CreateUser {
                email: email.to_string(),
                password: "pw123456".to_string(),
                role,
                staff_info,
                course_id: None,
            })
            .unwrap();
        auth.issue_token(&user.id, role).unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn req(method: &str, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn check_in_then_out_over_http() {
        let (app, auth) = app();
        let token = token_for(&auth, "staff@x.com", Role::Staff);

        let (status, body) =
            send(&app, req("POST", "/attendance/staff/check-in", &token)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert!(body["status"].is_string());

        let (status, _) =
            send(&app, req("POST", "/attendance/staff/check-in", &token)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) =
            send(&app, req("POST", "/attendance/staff/check-out", &token)).await;
        assert_eq!(status, StatusCode::OK, "{}", body);

        let (status, body) = send(&app, req("GET", "/attendance/staff/me", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn patients_cannot_check_in() {
        let (app, auth) = app();
        let token = token_for(&auth, "p@x.com", Role::Patient);
        let (status, body) =
            send(&app, req("POST", "/attendance/staff/check-in", &token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn only_admins_see_everyone() {
        let (app, auth) = app();
        let staff = token_for(&auth, "staff@x.com", Role::Staff);
        let admin = token_for(&auth, "boss@x.com", Role::Admin);

        send(&app, req("POST", "/attendance/staff/check-in", &staff)).await;

        let (status, _) = send(&app, req("GET", "/attendance/staff", &staff)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&app, req("GET", "/attendance/staff", &admin)).await;
        assert_eq!(status, StatusCode::OK);
        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["staff_name"], "Test Staffer");
    }
}
