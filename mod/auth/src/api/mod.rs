//! HTTP surface: public auth routes, protected user administration,
//! and the token middleware other modules reuse.

mod auth;
pub mod middleware;
mod users;

use std::sync::Arc;

use axum::Router;

pub use middleware::{authorize, protect};

use crate::service::AuthService;

pub type AppState = Arc<AuthService>;

/// Assemble the module router. Routes carry their own prefixes
/// ("/auth/...", "/users/...") and are nested under /api by the server.
pub fn build_router(svc: AppState) -> Router {
    Router::new().merge(auth::routes(svc.clone())).merge(users::routes(svc))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use carehub_store::SqliteStore;

    use super::*;
    use crate::service::AuthConfig;

    fn app() -> (Router, AppState) {
        let store: carehub_store::Store =
            Arc::new(SqliteStore::open_in_memory().unwrap());
        let svc = AuthService::new(store, AuthConfig::default()).unwrap();
        (build_router(svc.clone()), svc)
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

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_token(uri: &str, token: &str) -> Request<Body> {
        Request::get(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    }

    async fn register(app: &Router, email: &str, role: &str) -> Value {
        let (status, body) = send(
            app,
            post_json(
                "/auth/register",
                json!({"email": email, "password": "hunter22", "role": role}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body
    }

    #[tokio::test]
    async fn register_then_login() {
        let (app, _svc) = app();
        let body = register(&app, "a@x.com", "student").await;
        assert_eq!(body["role"], "student");
        assert!(body["token"].as_str().is_some());
        assert!(body.get("credential").is_none());

        let (status, body) = send(
            &app,
            post_json("/auth/login", json!({"email": "a@x.com", "password": "hunter22"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "a@x.com");
    }

    #[tokio::test]
    async fn duplicate_register_is_bad_request() {
        let (app, _svc) = app();
        register(&app, "a@x.com", "student").await;
        let (status, body) = send(
            &app,
            post_json(
                "/auth/register",
                json!({"email": "a@x.com", "password": "again", "role": "patient"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn login_failure_is_uniform_401() {
        let (app, _svc) = app();
        register(&app, "a@x.com", "student").await;

        let (s1, b1) = send(
            &app,
            post_json("/auth/login", json!({"email": "a@x.com", "password": "wrong"})),
        )
        .await;
        let (s2, b2) = send(
            &app,
            post_json("/auth/login", json!({"email": "ghost@x.com", "password": "wrong"})),
        )
        .await;
        assert_eq!(s1, StatusCode::UNAUTHORIZED);
        assert_eq!(s2, StatusCode::UNAUTHORIZED);
        assert_eq!(b1["message"], b2["message"]);
        assert_eq!(b1["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn protected_routes_require_token() {
        let (app, _svc) = app();

        let (status, body) =
            send(&app, Request::get("/users").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");

        let (status, _) = send(&app, get_with_token("/users", "not-a-jwt")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn role_gate_forbids_students_and_admits_admins() {
        let (app, _svc) = app();
        let student = register(&app, "s@x.com", "student").await;
        let admin = register(&app, "boss@x.com", "admin").await;

        let (status, body) =
            send(&app, get_with_token("/users", student["token"].as_str().unwrap())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "PERMISSION_DENIED");

        let (status, body) =
            send(&app, get_with_token("/users", admin["token"].as_str().unwrap())).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["total"], 2);
    }

    #[tokio::test]
    async fn role_case_is_normalized_at_the_boundary() {
        let (app, _svc) = app();
        // Register with a shouty role spelling; the stored role, the token,
        // and the gate all see the one canonical value.
        let admin = register(&app, "boss@x.com", "ADMIN").await;
        assert_eq!(admin["role"], "admin");

        let (status, _) =
            send(&app, get_with_token("/users", admin["token"].as_str().unwrap())).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn me_returns_token_identity() {
        let (app, _svc) = app();
        let student = register(&app, "s@x.com", "student").await;
        let (status, body) =
            send(&app, get_with_token("/users/me", student["token"].as_str().unwrap())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], student["id"]);
        assert_eq!(body["role"], "student");
    }

    #[tokio::test]
    async fn user_admin_crud_over_http() {
        let (app, _svc) = app();
        let admin = register(&app, "boss@x.com", "admin").await;
        let token = admin["token"].as_str().unwrap().to_string();

        let (status, created) = send(
            &app,
            Request::post("/users")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "email": "nurse@x.com",
                        "password": "pw123456",
                        "role": "nurse",
                        "staff_info": {
                            "full_name": "Ama Owusu",
                            "gender": "Female",
                            "position": "Ward Nurse",
                            "employment_status": "full-time"
                        }
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", created);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, fetched) =
            send(&app, get_with_token(&format!("/users/{}", id), &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["email"], "nurse@x.com");
        assert!(fetched.get("credential").is_none());

        let (status, updated) = send(
            &app,
            Request::put(format!("/users/{}", id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"is_active": false}).to_string()))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["is_active"], false);

        let (status, _) = send(
            &app,
            Request::delete(format!("/users/{}", id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) =
            send(&app, get_with_token(&format!("/users/{}", id), &token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
