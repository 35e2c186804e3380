use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use carehub_core::ServiceError;

use crate::model::{Claims, Role};
use crate::service::TokenVerifier;

/// Require a valid bearer token; insert its [`Claims`] into the request.
///
/// Mounted with `middleware::from_fn_with_state(verifier, protect)`.
pub async fn protect(
    State(verifier): State<TokenVerifier>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ServiceError::Unauthorized("Not authorized, no token".to_string()))?;

    let claims = verifier
        .verify(token)
        .map_err(|_| ServiceError::Unauthorized("Not authorized, token failed".to_string()))?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Require the caller's role to be on the allow-list.
///
/// Runs after [`protect`]; a missing claims extension means the route was
/// wired without it, which reads the same as an unauthenticated call.
pub async fn authorize(
    allowed: &'static [Role],
    req: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| ServiceError::Unauthorized("Not authorized, no token".to_string()))?;

    if !allowed.contains(&claims.role) {
        return Err(ServiceError::Forbidden(format!(
            "User role {} is not authorized to access this route",
            claims.role
        )));
    }
    Ok(next.run(req).await)
}
