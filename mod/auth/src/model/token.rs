use serde::{Deserialize, Serialize};

use crate::model::{Role, StaffInfo};

/// JWT claims payload.
///
/// The token carries exactly the caller's id and role plus expiry
/// metadata. Role is trusted as of issuance — a role change only takes
/// effect when a new token is issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub id: String,

    /// Role at issuance time, lowercase.
    pub role: Role,

    /// Issued at (unix timestamp).
    pub iat: i64,

    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// Request body for POST /auth/login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for POST /auth/register.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub staff_info: Option<StaffInfo>,
}

/// Response body for successful login/register.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}
