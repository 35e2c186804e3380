use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{middleware, Json, Router};

use carehub_core::{ListParams, ListResult, ServiceError};

use crate::api::middleware::{authorize, protect};
use crate::api::AppState;
use crate::model::{Claims, CreateUser, PublicUser, Role, UpdateUser};

/// Roles allowed to administer user records.
const USER_ADMIN: &[Role] = &[Role::Admin, Role::ExecutiveDirector];

/// Protected routes: every route requires a token, the admin subset
/// additionally requires an allow-listed role.
pub fn routes(svc: AppState) -> Router {
    let verifier = svc.verifier();

    let admin = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/instructors", get(list_instructors))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route_layer(middleware::from_fn(
            move |req: axum::extract::Request, next: middleware::Next| {
                authorize(USER_ADMIN, req, next)
            },
        ));

    Router::new()
        .route("/users/me", get(me))
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(verifier, protect))
        .with_state(svc)
}

async fn list_users(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<PublicUser>>, ServiceError> {
    let result = svc.list_users(&params)?;
    Ok(Json(ListResult {
        items: result.items.iter().map(|u| u.public()).collect(),
        total: result.total,
    }))
}

async fn create_user(
    State(svc): State<AppState>,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<PublicUser>), ServiceError> {
    let user = svc.create_user(input)?;
    Ok((StatusCode::CREATED, Json(user.public())))
}

async fn list_instructors(
    State(svc): State<AppState>,
) -> Result<Json<Vec<PublicUser>>, ServiceError> {
    let users = svc.list_instructors()?;
    Ok(Json(users.iter().map(|u| u.public()).collect()))
}

async fn me(Extension(claims): Extension<Claims>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "id": claims.id, "role": claims.role }))
}

async fn get_user(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PublicUser>, ServiceError> {
    let user = svc.get_user(&id)?;
    Ok(Json(user.public()))
}

async fn update_user(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUser>,
) -> Result<Json<PublicUser>, ServiceError> {
    let user = svc.update_user(&id, input)?;
    Ok(Json(user.public()))
}

async fn delete_user(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    svc.delete_user(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
