use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, Header, Validation};

use crate::model::{AuthResponse, Claims, CreateUser, RegisterRequest, Role};
use crate::service::{AuthError, AuthService};

/// Stateless JWT verifier.
///
/// Cloneable so route middleware in other modules can hold one without
/// holding the whole [`AuthService`].
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Decode and validate a bearer token, checking signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::Unauthorized(format!("token rejected: {}", e)))
    }
}

impl AuthService {
    /// Sign a token for the given user id and role.
    pub fn issue_token(&self, user_id: &str, role: Role) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            id: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {}", e)))
    }

    /// Authenticate by email and password.
    ///
    /// Unknown email and wrong password both return [`AuthError::InvalidCredentials`]
    /// with the same message.
    pub fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let user = self
            .find_by_email(email)?
            .ok_or(AuthError::InvalidCredentials)?;
        if !user.credential.verify(password) {
            return Err(AuthError::InvalidCredentials);
        }
        let role = match user.role {
            Some(role) => role,
            None => {
                tracing::warn!(user_id = %user.id, "login refused: stored account has no role");
                return Err(AuthError::MisconfiguredAccount);
            }
        };
        let token = self.issue_token(&user.id, role)?;
        Ok(AuthResponse { id: user.id, email: user.email, role, token })
    }

    /// Self-service registration: create a user and sign them in.
    pub fn register(&self, req: RegisterRequest) -> Result<AuthResponse, AuthError> {
        let user = self.create_user(CreateUser {
            email: req.email,
            password: req.password,
            role: req.role,
            staff_info: req.staff_info,
            course_id: None,
        })?;
        let token = self.issue_token(&user.id, req.role)?;
        Ok(AuthResponse { id: user.id, email: user.email, role: req.role, token })
    }
}
